//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in
//! `wander-db`; services stay generic over these traits so tests can
//! run against the in-memory engine.

use uuid::Uuid;

use crate::error::WanderResult;
use crate::models::{
    booking::{Booking, BookingStatus, CreateBooking},
    listing::{CreateListing, Listing},
    otp::{CreateOtpChallenge, OtpChallenge},
    session::{CreateSession, Session},
    user::{CreateUser, User},
};

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

pub trait ListingRepository: Send + Sync {
    fn create(&self, input: CreateListing) -> impl Future<Output = WanderResult<Listing>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WanderResult<Listing>> + Send;
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

pub trait BookingRepository: Send + Sync {
    fn create(&self, input: CreateBooking) -> impl Future<Output = WanderResult<Booking>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WanderResult<Booking>> + Send;
    /// Unconditional status write. Re-applying a status that is
    /// already set succeeds, which makes cancellation idempotent.
    fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> impl Future<Output = WanderResult<Booking>> + Send;
    /// All bookings for a user, newest created first.
    fn list_by_user(&self, user_id: Uuid)
    -> impl Future<Output = WanderResult<Vec<Booking>>> + Send;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Persist a confirmed user. The credential arrives pre-hashed.
    fn create(&self, input: CreateUser) -> impl Future<Output = WanderResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WanderResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = WanderResult<User>> + Send;
    fn get_by_username(&self, username: &str) -> impl Future<Output = WanderResult<User>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = WanderResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = WanderResult<Session>> + Send;
    /// Invalidate a single session (logout).
    fn invalidate(&self, id: Uuid) -> impl Future<Output = WanderResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// OTP challenges (keyed by email)
// ---------------------------------------------------------------------------

pub trait OtpRepository: Send + Sync {
    /// Create or replace the challenge for an email. At most one live
    /// record per email.
    fn upsert(
        &self,
        input: CreateOtpChallenge,
    ) -> impl Future<Output = WanderResult<OtpChallenge>> + Send;
    fn get_by_email(&self, email: &str)
    -> impl Future<Output = WanderResult<OtpChallenge>> + Send;
    fn delete(&self, email: &str) -> impl Future<Output = WanderResult<()>> + Send;
    /// Atomically delete and return the challenge, but only when the
    /// stored code matches. `None` means another caller consumed it
    /// first (or the code no longer matches) — this is the conditional
    /// update that closes the read-then-delete race on concurrent
    /// confirmations.
    fn take_matching(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = WanderResult<Option<OtpChallenge>>> + Send;
}
