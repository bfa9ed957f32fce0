//! SurrealDB implementation of [`ListingRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wander_core::WanderResult;
use wander_core::models::listing::{CreateListing, Listing};
use wander_core::repository::ListingRepository;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ListingRow {
    host_id: String,
    title: String,
    description: String,
    location: String,
    country: String,
    price: f64,
    created_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self, id: Uuid) -> Result<Listing, DbError> {
        let host_id = Uuid::parse_str(&self.host_id)
            .map_err(|e| DbError::Query(format!("invalid host UUID: {e}")))?;
        Ok(Listing {
            id,
            host_id,
            title: self.title,
            description: self.description,
            location: self.location,
            country: self.country,
            price: self.price,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Listing repository.
#[derive(Clone)]
pub struct SurrealListingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealListingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ListingRepository for SurrealListingRepository<C> {
    async fn create(&self, input: CreateListing) -> WanderResult<Listing> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('listing', $id) SET \
                 host_id = $host_id, \
                 title = $title, \
                 description = $description, \
                 location = $location, \
                 country = $country, \
                 price = $price",
            )
            .bind(("id", id_str.clone()))
            .bind(("host_id", input.host_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("location", input.location))
            .bind(("country", input.country))
            .bind(("price", input.price))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> WanderResult<Listing> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('listing', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }
}
