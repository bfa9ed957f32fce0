//! Notification collaborator contract.
//!
//! Booking-side sends are best-effort: the lifecycle transition
//! commits regardless of delivery outcome. OTP delivery is the one
//! synchronous dependency — signup cannot proceed without the code, so
//! its failure surfaces to the caller.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::WanderResult;

/// Everything a booking confirmation email carries.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub listing_title: String,
    pub listing_location: String,
    pub listing_country: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub number_of_guests: u32,
    pub nights: i64,
    pub total_price: f64,
}

#[derive(Debug, Clone)]
pub struct BookingCancellation {
    pub booking_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub listing_title: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn send_booking_confirmation(
        &self,
        details: BookingConfirmation,
    ) -> impl Future<Output = WanderResult<()>> + Send;

    fn send_booking_cancellation(
        &self,
        details: BookingCancellation,
    ) -> impl Future<Output = WanderResult<()>> + Send;

    fn send_otp(&self, email: &str, code: &str) -> impl Future<Output = WanderResult<()>> + Send;
}
