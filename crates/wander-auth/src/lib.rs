//! Wander Auth — OTP-gated signup, password hashing, and opaque
//! session token issuance.

pub mod config;
pub mod error;
pub mod otp;
pub mod password;
pub mod service;
pub mod session;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput, RequestOtpInput, SignupOutput};
