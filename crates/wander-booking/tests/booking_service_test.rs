//! Integration tests for the booking lifecycle against in-memory
//! SurrealDB, with a recording mailer standing in for SMTP.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use wander_booking::{BookingService, CreateBookingInput};
use wander_core::WanderError;
use wander_core::models::booking::BookingStatus;
use wander_core::models::listing::CreateListing;
use wander_core::models::user::CreateUser;
use wander_core::notify::{BookingCancellation, BookingConfirmation, Notifier};
use wander_core::repository::{ListingRepository, UserRepository};
use wander_db::repository::{
    SurrealBookingRepository, SurrealListingRepository, SurrealUserRepository,
};

/// Mailer that records deliveries and can be flipped into a failing
/// state.
#[derive(Clone, Default)]
struct RecordingMailer {
    confirmations: Arc<Mutex<Vec<BookingConfirmation>>>,
    cancellations: Arc<Mutex<Vec<BookingCancellation>>>,
    fail: Arc<AtomicBool>,
}

impl Notifier for RecordingMailer {
    async fn send_booking_confirmation(
        &self,
        details: BookingConfirmation,
    ) -> Result<(), WanderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(WanderError::NotificationFailure("smtp down".into()));
        }
        self.confirmations.lock().unwrap().push(details);
        Ok(())
    }

    async fn send_booking_cancellation(
        &self,
        details: BookingCancellation,
    ) -> Result<(), WanderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(WanderError::NotificationFailure("smtp down".into()));
        }
        self.cancellations.lock().unwrap().push(details);
        Ok(())
    }

    async fn send_otp(&self, _email: &str, _code: &str) -> Result<(), WanderError> {
        Ok(())
    }
}

type Db = surrealdb::engine::local::Db;
type TestService = BookingService<
    SurrealBookingRepository<Db>,
    SurrealListingRepository<Db>,
    SurrealUserRepository<Db>,
    RecordingMailer,
>;

struct Fixture {
    svc: TestService,
    mailer: RecordingMailer,
    guest_id: Uuid,
    listing_id: Uuid,
}

/// Spin up in-memory DB, run migrations, create a host, a guest, and
/// a listing at 1200/night.
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wander_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let host = user_repo
        .create(CreateUser {
            username: "host".into(),
            email: "host@example.com".into(),
            password_hash: "h".into(),
        })
        .await
        .unwrap();
    let guest = user_repo
        .create(CreateUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "h".into(),
        })
        .await
        .unwrap();

    let listing_repo = SurrealListingRepository::new(db.clone());
    let listing = listing_repo
        .create(CreateListing {
            host_id: host.id,
            title: "Seaside Cottage".into(),
            description: "Two bedrooms by the shore".into(),
            location: "Goa".into(),
            country: "India".into(),
            price: 1200.0,
        })
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let svc = BookingService::new(
        SurrealBookingRepository::new(db.clone()),
        SurrealListingRepository::new(db.clone()),
        SurrealUserRepository::new(db),
        Arc::new(mailer.clone()),
    );

    Fixture {
        svc,
        mailer,
        guest_id: guest.id,
        listing_id: listing.id,
    }
}

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn booking_input(fx: &Fixture, check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> CreateBookingInput {
    CreateBookingInput {
        listing_id: fx.listing_id,
        user_id: fx.guest_id,
        check_in,
        check_out,
        number_of_guests: 2,
    }
}

/// Give detached notification tasks a moment to run.
async fn drain_notifications() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn create_booking_derives_price_and_confirms() {
    let fx = setup().await;

    let created = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();

    assert_eq!(created.nights, 3);
    assert_eq!(created.booking.total_price, 3600.0);
    assert_eq!(created.booking.status, BookingStatus::Confirmed);
    assert_eq!(created.booking.listing_id, fx.listing_id);
    assert_eq!(created.booking.user_id, fx.guest_id);

    drain_notifications().await;
    let sent = fx.mailer.confirmations.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].booking_id, created.booking.id);
    assert_eq!(sent[0].listing_title, "Seaside Cottage");
    assert_eq!(sent[0].guest_email, "alice@example.com");
    assert_eq!(sent[0].nights, 3);
    assert_eq!(sent[0].total_price, 3600.0);
}

#[tokio::test]
async fn reversed_dates_persist_nothing() {
    let fx = setup().await;

    let err = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 6, 4), date(2024, 6, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, WanderError::InvalidDateRange));

    let bookings = fx.svc.list_user_bookings(fx.guest_id).await.unwrap();
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn zero_guests_is_rejected() {
    let fx = setup().await;

    let mut input = booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4));
    input.number_of_guests = 0;

    let err = fx.svc.create_booking(input).await.unwrap_err();
    assert!(matches!(err, WanderError::InvalidInput { .. }));
}

#[tokio::test]
async fn missing_listing_is_not_found() {
    let fx = setup().await;

    let mut input = booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4));
    input.listing_id = Uuid::new_v4();

    let err = fx.svc.create_booking(input).await.unwrap_err();
    assert!(matches!(err, WanderError::NotFound { .. }));
}

#[tokio::test]
async fn cancel_requires_ownership() {
    let fx = setup().await;

    let created = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();

    let err = fx
        .svc
        .cancel_booking(created.booking.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, WanderError::Forbidden { .. }));

    // The booking is untouched.
    let bookings = fx.svc.list_user_bookings(fx.guest_id).await.unwrap();
    assert_eq!(bookings[0].booking.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn cancel_twice_stays_cancelled() {
    let fx = setup().await;

    let created = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();

    let first = fx
        .svc
        .cancel_booking(created.booking.id, fx.guest_id)
        .await
        .unwrap();
    assert_eq!(first.status, BookingStatus::Cancelled);

    // Re-cancelling silently succeeds again.
    let second = fx
        .svc
        .cancel_booking(created.booking.id, fx.guest_id)
        .await
        .unwrap();
    assert_eq!(second.status, BookingStatus::Cancelled);

    drain_notifications().await;
    assert_eq!(fx.mailer.cancellations.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn cancel_missing_booking_is_not_found() {
    let fx = setup().await;

    let err = fx
        .svc
        .cancel_booking(Uuid::new_v4(), fx.guest_id)
        .await
        .unwrap_err();
    assert!(matches!(err, WanderError::NotFound { .. }));
}

#[tokio::test]
async fn list_user_bookings_newest_first_with_listing() {
    let fx = setup().await;

    let first = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();
    let second = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 7, 1), date(2024, 7, 2)))
        .await
        .unwrap();

    let bookings = fx.svc.list_user_bookings(fx.guest_id).await.unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].booking.id, second.booking.id);
    assert_eq!(bookings[1].booking.id, first.booking.id);
    assert_eq!(bookings[0].listing.title, "Seaside Cottage");
}

#[tokio::test]
async fn mailer_failure_never_fails_the_transition() {
    let fx = setup().await;
    fx.mailer.fail.store(true, Ordering::SeqCst);

    // Creation commits despite the dead mailer.
    let created = fx
        .svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();
    assert_eq!(created.booking.status, BookingStatus::Confirmed);

    // Cancellation too.
    let cancelled = fx
        .svc
        .cancel_booking(created.booking.id, fx.guest_id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    drain_notifications().await;
    assert!(fx.mailer.confirmations.lock().unwrap().is_empty());
    assert!(fx.mailer.cancellations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn overlapping_bookings_are_allowed() {
    let fx = setup().await;

    // Same listing, same dates — both succeed; conflicts are resolved
    // outside this system.
    fx.svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();
    fx.svc
        .create_booking(booking_input(&fx, date(2024, 6, 1), date(2024, 6, 4)))
        .await
        .unwrap();

    let bookings = fx.svc.list_user_bookings(fx.guest_id).await.unwrap();
    assert_eq!(bookings.len(), 2);
}
