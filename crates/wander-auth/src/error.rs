//! Authentication error types.

use thiserror::Error;
use wander_core::WanderError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for WanderError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => WanderError::Unauthorized,
            AuthError::Crypto(msg) => WanderError::Crypto(msg),
        }
    }
}
