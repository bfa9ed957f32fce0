//! Environment-based server configuration.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};
use wander_auth::AuthConfig;
use wander_db::DbConfig;
use wander_mailer::SmtpConfig;

pub struct ServerConfig {
    pub db: DbConfig,
    pub smtp: SmtpConfig,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn load() -> Self {
        Self {
            db: DbConfig {
                url: try_load("WANDER_DB_URL", "127.0.0.1:8000"),
                namespace: try_load("WANDER_DB_NAMESPACE", "wander"),
                database: try_load("WANDER_DB_NAME", "main"),
                username: try_load("WANDER_DB_USER", "root"),
                password: try_load("WANDER_DB_PASS", "root"),
            },
            smtp: SmtpConfig {
                server: try_load("WANDER_SMTP_SERVER", "localhost"),
                port: try_load("WANDER_SMTP_PORT", "587"),
                username: try_load("WANDER_SMTP_USER", ""),
                password: try_load("WANDER_SMTP_PASS", ""),
                from_email: try_load("WANDER_SMTP_FROM", "noreply@wander.example"),
                from_name: try_load("WANDER_SMTP_FROM_NAME", "Wander"),
            },
            auth: AuthConfig {
                otp_ttl_secs: try_load("WANDER_OTP_TTL_SECS", "300"),
                session_lifetime_secs: try_load("WANDER_SESSION_LIFETIME_SECS", "1209600"),
                pepper: env::var("WANDER_PASSWORD_PEPPER").ok(),
                min_password_length: try_load("WANDER_MIN_PASSWORD_LENGTH", "8"),
            },
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
