//! Wander Core — domain models, error taxonomy, collaborator contracts,
//! and the pure booking/price calculator.
//!
//! This crate has no knowledge of any concrete database or transport.
//! Everything with a side effect is expressed as a trait (`repository`,
//! `notify`, `clock`) implemented by the outer crates.

pub mod clock;
pub mod error;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod repository;

pub use error::{WanderError, WanderResult};
