//! Booking domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    /// Reserved for a future manual-approval flow. No operation
    /// currently produces it.
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub number_of_guests: u32,
    /// Derived: nights x nightly rate, computed at creation.
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub number_of_guests: u32,
    pub total_price: f64,
    pub status: BookingStatus,
}

/// A booking resolved together with its referenced listing, as
/// returned by the user-bookings listing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWithListing {
    pub booking: Booking,
    pub listing: super::listing::Listing,
}
