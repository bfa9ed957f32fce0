//! Database-specific error types and conversions.

use wander_core::WanderError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for WanderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WanderError::NotFound { entity, id },
            other => WanderError::Database(other.to_string()),
        }
    }
}
