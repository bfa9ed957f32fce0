//! Wander Mailer — SMTP implementation of the notification contract.

mod smtp;

pub use smtp::{SmtpConfig, SmtpMailer};
