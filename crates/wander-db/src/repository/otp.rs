//! SurrealDB implementation of [`OtpRepository`].
//!
//! Challenges are keyed by email (the record id), which gives the
//! overwrite-on-reissue semantics for free: UPSERT on the same record
//! replaces the prior challenge. Storing them in the database rather
//! than a process-local map keeps the flow correct across multiple
//! server instances.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use wander_core::WanderResult;
use wander_core::models::otp::{CreateOtpChallenge, OtpChallenge};
use wander_core::repository::OtpRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OtpRow {
    code: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl OtpRow {
    fn into_challenge(self, email: String) -> OtpChallenge {
        OtpChallenge {
            email,
            code: self.code,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

/// SurrealDB implementation of the OTP challenge repository.
#[derive(Clone)]
pub struct SurrealOtpRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOtpRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OtpRepository for SurrealOtpRepository<C> {
    async fn upsert(&self, input: CreateOtpChallenge) -> WanderResult<OtpChallenge> {
        let email = input.email.clone();

        let result = self
            .db
            .query(
                "UPSERT type::record('otp_challenge', $email) SET \
                 code = $code, \
                 username = $username, \
                 password_hash = $password_hash, \
                 created_at = $created_at",
            )
            .bind(("email", input.email))
            .bind(("code", input.code))
            .bind(("username", input.username))
            .bind(("password_hash", input.password_hash))
            .bind(("created_at", input.created_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OtpRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "otp_challenge".into(),
            id: email.clone(),
        })?;

        Ok(row.into_challenge(email))
    }

    async fn get_by_email(&self, email: &str) -> WanderResult<OtpChallenge> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('otp_challenge', $email)")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OtpRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "otp_challenge".into(),
            id: email.to_string(),
        })?;

        Ok(row.into_challenge(email.to_string()))
    }

    async fn delete(&self, email: &str) -> WanderResult<()> {
        self.db
            .query("DELETE type::record('otp_challenge', $email)")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn take_matching(&self, email: &str, code: &str) -> WanderResult<Option<OtpChallenge>> {
        // Conditional delete returning the prior record: consuming a
        // challenge and checking the code happen in one statement, so
        // two concurrent confirmations cannot both succeed.
        let mut result = self
            .db
            .query(
                "DELETE type::record('otp_challenge', $email) \
                 WHERE code = $code RETURN BEFORE",
            )
            .bind(("email", email.to_string()))
            .bind(("code", code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OtpRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.into_challenge(email.to_string())))
    }
}
