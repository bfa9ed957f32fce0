//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OTP challenge lifetime in seconds (default: 300 = 5 minutes).
    /// A confirmation attempt at exactly this age is already expired.
    pub otp_ttl_secs: u64,
    /// Session lifetime in seconds (default: 1_209_600 = 14 days).
    pub session_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_ttl_secs: 300,
            session_lifetime_secs: 1_209_600,
            pepper: None,
            min_password_length: 8,
        }
    }
}
