//! Pending-signup OTP challenge.
//!
//! One live challenge per email — a new request overwrites the prior
//! record. The record is consumed on successful signup and purged on
//! expiry detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub email: String,
    /// Six decimal digits.
    pub code: String,
    pub username: String,
    /// Already hashed — the pending credential is never held in clear.
    pub password_hash: String,
    /// Issued by the service clock, not database time, so the expiry
    /// window is checked against a single time source.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOtpChallenge {
    pub email: String,
    pub code: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
