//! SurrealDB implementation of [`BookingRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wander_core::WanderResult;
use wander_core::models::booking::{Booking, BookingStatus, CreateBooking};
use wander_core::repository::BookingRepository;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct BookingRow {
    listing_id: String,
    user_id: String,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    number_of_guests: u32,
    total_price: f64,
    status: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct BookingRowWithId {
    record_id: String,
    listing_id: String,
    user_id: String,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    number_of_guests: u32,
    total_price: f64,
    status: String,
    created_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<BookingStatus, DbError> {
    match s {
        "Pending" => Ok(BookingStatus::Pending),
        "Confirmed" => Ok(BookingStatus::Confirmed),
        "Cancelled" => Ok(BookingStatus::Cancelled),
        other => Err(DbError::Query(format!("unknown booking status: {other}"))),
    }
}

fn status_to_string(s: BookingStatus) -> &'static str {
    match s {
        BookingStatus::Pending => "Pending",
        BookingStatus::Confirmed => "Confirmed",
        BookingStatus::Cancelled => "Cancelled",
    }
}

impl BookingRow {
    fn into_booking(self, id: Uuid) -> Result<Booking, DbError> {
        let listing_id = Uuid::parse_str(&self.listing_id)
            .map_err(|e| DbError::Query(format!("invalid listing UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        Ok(Booking {
            id,
            listing_id,
            user_id,
            check_in: self.check_in,
            check_out: self.check_out,
            number_of_guests: self.number_of_guests,
            total_price: self.total_price,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

impl BookingRowWithId {
    fn try_into_booking(self) -> Result<Booking, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let listing_id = Uuid::parse_str(&self.listing_id)
            .map_err(|e| DbError::Query(format!("invalid listing UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        Ok(Booking {
            id,
            listing_id,
            user_id,
            check_in: self.check_in,
            check_out: self.check_out,
            number_of_guests: self.number_of_guests,
            total_price: self.total_price,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Booking repository.
#[derive(Clone)]
pub struct SurrealBookingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBookingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BookingRepository for SurrealBookingRepository<C> {
    async fn create(&self, input: CreateBooking) -> WanderResult<Booking> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('booking', $id) SET \
                 listing_id = $listing_id, \
                 user_id = $user_id, \
                 check_in = $check_in, \
                 check_out = $check_out, \
                 number_of_guests = $number_of_guests, \
                 total_price = $total_price, \
                 status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("listing_id", input.listing_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("check_in", input.check_in))
            .bind(("check_out", input.check_out))
            .bind(("number_of_guests", input.number_of_guests))
            .bind(("total_price", input.total_price))
            .bind(("status", status_to_string(input.status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> WanderResult<Booking> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('booking', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> WanderResult<Booking> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('booking', $id) SET status = $status")
            .bind(("id", id_str.clone()))
            .bind(("status", status_to_string(status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> WanderResult<Vec<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM booking \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;

        let bookings = rows
            .into_iter()
            .map(|row| row.try_into_booking())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(bookings)
    }
}
