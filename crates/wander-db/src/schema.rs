//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration ledger
// -----------------------------------------------------------------------

// The ledger records which schema versions have been applied, so a
// restart only runs what is new.
const MIGRATION_LEDGER_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct LedgerRow {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token_hash ON TABLE session \
    COLUMNS token_hash UNIQUE;

-- =======================================================================
-- Listings
-- =======================================================================
DEFINE TABLE listing SCHEMAFULL;
DEFINE FIELD host_id ON TABLE listing TYPE string;
DEFINE FIELD title ON TABLE listing TYPE string;
DEFINE FIELD description ON TABLE listing TYPE string;
DEFINE FIELD location ON TABLE listing TYPE string;
DEFINE FIELD country ON TABLE listing TYPE string;
DEFINE FIELD price ON TABLE listing TYPE float \
    ASSERT $value >= 0;
DEFINE FIELD created_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Bookings
-- =======================================================================
DEFINE TABLE booking SCHEMAFULL;
DEFINE FIELD listing_id ON TABLE booking TYPE string;
DEFINE FIELD user_id ON TABLE booking TYPE string;
DEFINE FIELD check_in ON TABLE booking TYPE datetime;
DEFINE FIELD check_out ON TABLE booking TYPE datetime;
DEFINE FIELD number_of_guests ON TABLE booking TYPE int \
    ASSERT $value >= 1;
DEFINE FIELD total_price ON TABLE booking TYPE float \
    ASSERT $value >= 0;
DEFINE FIELD status ON TABLE booking TYPE string \
    ASSERT $value IN ['Pending', 'Confirmed', 'Cancelled'];
DEFINE FIELD created_at ON TABLE booking TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_booking_user ON TABLE booking COLUMNS user_id;
DEFINE INDEX idx_booking_listing ON TABLE booking COLUMNS listing_id;

-- =======================================================================
-- OTP challenges (record id = email)
-- =======================================================================
DEFINE TABLE otp_challenge SCHEMAFULL;
DEFINE FIELD code ON TABLE otp_challenge TYPE string;
DEFINE FIELD username ON TABLE otp_challenge TYPE string;
DEFINE FIELD password_hash ON TABLE otp_challenge TYPE string;
DEFINE FIELD created_at ON TABLE otp_challenge TYPE datetime;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Bring the database schema up to the latest version.
///
/// Applies, in order, every migration the ledger has not yet seen.
/// Safe to call on every startup and from every test fixture.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_LEDGER_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Query(e.to_string()))?;

    let applied = applied_version(db).await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        info!(
            version = migration.version,
            name = migration.name,
            "applying schema migration"
        );

        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Query(format!(
                "schema migration v{} ({}) failed: {e}",
                migration.version, migration.name,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Query(format!(
                    "could not record schema migration v{}: {e}",
                    migration.version,
                ))
            })?;

        info!(version = migration.version, "schema migration applied");
    }

    Ok(())
}

/// Highest version the ledger has recorded, 0 for a fresh database.
async fn applied_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let rows: Vec<LedgerRow> = result.take(0)?;
    Ok(rows.first().map(|row| row.version).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_defines_every_table() {
        for table in ["user", "session", "listing", "booking", "otp_challenge"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} ")),
                "missing table definition: {table}"
            );
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "migration versions must ascend"
            );
        }
    }
}
