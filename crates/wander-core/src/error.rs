//! Error types for the Wander system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WanderError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Operation not permitted: {reason}")]
    Forbidden { reason: String },

    #[error("Check-out date must be after check-in date")]
    InvalidDateRange,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("No verification code pending for this email")]
    NoPendingOtp,

    #[error("Verification code expired")]
    OtpExpired,

    #[error("Verification code does not match")]
    OtpMismatch,

    #[error("Notification delivery failed: {0}")]
    NotificationFailure(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

pub type WanderResult<T> = Result<T, WanderError>;
