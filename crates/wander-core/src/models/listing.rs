//! Listing domain model.
//!
//! Listings are owned by the wider marketplace; the booking core only
//! needs the nightly rate and the display fields carried in
//! notification emails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    /// Nightly rate. Non-negative.
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListing {
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub price: f64,
}
