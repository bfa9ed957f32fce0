//! Wander Database — SurrealDB connection management, schema
//! migrations, and repository implementations for the `wander-core`
//! traits.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use schema::run_migrations;
