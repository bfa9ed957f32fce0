//! Domain models for Wander.
//!
//! These are the core types shared across all crates.

pub mod booking;
pub mod listing;
pub mod otp;
pub mod session;
pub mod user;
