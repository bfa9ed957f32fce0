//! Integration tests for the OTP signup flow against in-memory
//! SurrealDB, with a recording mailer and a manually advanced clock.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use wander_auth::config::AuthConfig;
use wander_auth::service::{AuthService, LoginInput, RequestOtpInput};
use wander_core::WanderError;
use wander_core::clock::Clock;
use wander_core::notify::{BookingCancellation, BookingConfirmation, Notifier};
use wander_db::repository::{
    SurrealOtpRepository, SurrealSessionRepository, SurrealUserRepository,
};

/// Mailer that records sent codes and can be flipped into a failing
/// state.
#[derive(Clone, Default)]
struct RecordingMailer {
    sent_otps: Arc<Mutex<Vec<(String, String)>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingMailer {
    fn last_code(&self) -> String {
        self.sent_otps
            .lock()
            .unwrap()
            .last()
            .expect("no OTP sent")
            .1
            .clone()
    }
}

impl Notifier for RecordingMailer {
    async fn send_booking_confirmation(
        &self,
        _details: BookingConfirmation,
    ) -> Result<(), WanderError> {
        Ok(())
    }

    async fn send_booking_cancellation(
        &self,
        _details: BookingCancellation,
    ) -> Result<(), WanderError> {
        Ok(())
    }

    async fn send_otp(&self, email: &str, code: &str) -> Result<(), WanderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(WanderError::NotificationFailure("smtp down".into()));
        }
        self.sent_otps
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    fn new(start: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    fn advance_secs(&self, secs: i64) {
        *self.0.lock().unwrap() += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

type TestService = AuthService<
    SurrealUserRepository<surrealdb::engine::local::Db>,
    SurrealSessionRepository<surrealdb::engine::local::Db>,
    SurrealOtpRepository<surrealdb::engine::local::Db>,
    RecordingMailer,
    ManualClock,
>;

/// Spin up in-memory DB, run migrations, and wire the service.
async fn setup() -> (TestService, RecordingMailer, ManualClock) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wander_db::run_migrations(&db).await.unwrap();

    let mailer = RecordingMailer::default();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());

    let svc = AuthService::with_clock(
        SurrealUserRepository::new(db.clone()),
        SurrealSessionRepository::new(db.clone()),
        SurrealOtpRepository::new(db),
        mailer.clone(),
        AuthConfig::default(),
        clock.clone(),
    );

    (svc, mailer, clock)
}

fn signup_request(email: &str) -> RequestOtpInput {
    RequestOtpInput {
        email: email.into(),
        username: "alice".into(),
        password: "correct-horse-battery".into(),
    }
}

#[tokio::test]
async fn request_and_confirm_happy_path() {
    let (svc, mailer, _clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let code = mailer.last_code();

    let output = svc.confirm_signup("a@x.com", &code).await.unwrap();
    assert_eq!(output.user.username, "alice");
    assert_eq!(output.user.email, "a@x.com");
    assert!(output.user.password_hash.starts_with("$argon2id$"));
    assert!(!output.session_token.is_empty());

    // The session is live: the token resolves back to the new user.
    let me = svc.current_user(&output.session_token).await.unwrap();
    assert_eq!(me.id, output.user.id);

    // Replay: the consumed code can never confirm again.
    let err = svc.confirm_signup("a@x.com", &code).await.unwrap_err();
    assert!(matches!(err, WanderError::NoPendingOtp));
}

#[tokio::test]
async fn registered_email_is_rejected() {
    let (svc, mailer, _clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let code = mailer.last_code();
    svc.confirm_signup("a@x.com", &code).await.unwrap();

    let err = svc.request_otp(signup_request("a@x.com")).await.unwrap_err();
    assert!(matches!(err, WanderError::EmailAlreadyRegistered));
}

#[tokio::test]
async fn wrong_code_does_not_consume_challenge() {
    let (svc, mailer, _clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let code = mailer.last_code();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = svc.confirm_signup("a@x.com", wrong).await.unwrap_err();
    assert!(matches!(err, WanderError::OtpMismatch));

    // The record survived the mismatch, so the correct code still
    // works inside the window.
    svc.confirm_signup("a@x.com", &code).await.unwrap();
}

#[tokio::test]
async fn expired_at_exactly_five_minutes() {
    let (svc, mailer, clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let code = mailer.last_code();

    clock.advance_secs(300);

    let err = svc.confirm_signup("a@x.com", &code).await.unwrap_err();
    assert!(matches!(err, WanderError::OtpExpired));

    // Expired records are purged on detection; the right code is no
    // longer confirmable.
    let err = svc.confirm_signup("a@x.com", &code).await.unwrap_err();
    assert!(matches!(err, WanderError::NoPendingOtp));
}

#[tokio::test]
async fn valid_one_second_before_expiry() {
    let (svc, mailer, clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let code = mailer.last_code();

    clock.advance_secs(299);

    svc.confirm_signup("a@x.com", &code).await.unwrap();
}

#[tokio::test]
async fn reissue_overwrites_prior_challenge() {
    let (svc, mailer, _clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let first_code = mailer.last_code();
    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let second_code = mailer.last_code();

    assert_eq!(mailer.sent_otps.lock().unwrap().len(), 2);

    if first_code != second_code {
        let err = svc
            .confirm_signup("a@x.com", &first_code)
            .await
            .unwrap_err();
        assert!(matches!(err, WanderError::OtpMismatch));
    }

    svc.confirm_signup("a@x.com", &second_code).await.unwrap();
}

#[tokio::test]
async fn otp_delivery_failure_is_surfaced() {
    let (svc, mailer, _clock) = setup().await;
    mailer.fail.store(true, Ordering::SeqCst);

    let err = svc.request_otp(signup_request("a@x.com")).await.unwrap_err();
    assert!(matches!(err, WanderError::NotificationFailure(_)));
}

#[tokio::test]
async fn short_password_is_rejected() {
    let (svc, _mailer, _clock) = setup().await;

    let err = svc
        .request_otp(RequestOtpInput {
            email: "a@x.com".into(),
            username: "alice".into(),
            password: "short".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WanderError::InvalidInput { .. }));
}

#[tokio::test]
async fn confirm_without_request_is_no_pending_otp() {
    let (svc, _mailer, _clock) = setup().await;

    let err = svc.confirm_signup("fresh@x.com", "123456").await.unwrap_err();
    assert!(matches!(err, WanderError::NoPendingOtp));
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() {
    let (svc, _mailer, _clock) = setup().await;

    // Neither a username nor an email matches; the response must not
    // reveal which lookup failed.
    let err = svc
        .login(LoginInput {
            username_or_email: "ghost@x.com".into(),
            password: "whatever-it-takes".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WanderError::Unauthorized));
}

#[tokio::test]
async fn login_and_logout() {
    let (svc, mailer, _clock) = setup().await;

    svc.request_otp(signup_request("a@x.com")).await.unwrap();
    let code = mailer.last_code();
    svc.confirm_signup("a@x.com", &code).await.unwrap();

    // By username.
    let login = svc
        .login(LoginInput {
            username_or_email: "alice".into(),
            password: "correct-horse-battery".into(),
        })
        .await
        .unwrap();
    assert_eq!(login.user.email, "a@x.com");

    // By email.
    svc.login(LoginInput {
        username_or_email: "a@x.com".into(),
        password: "correct-horse-battery".into(),
    })
    .await
    .unwrap();

    // Wrong password.
    let err = svc
        .login(LoginInput {
            username_or_email: "alice".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WanderError::Unauthorized));

    // Logout kills the session.
    svc.logout(login.session.id).await.unwrap();
    let err = svc.current_user(&login.session_token).await.unwrap_err();
    assert!(matches!(err, WanderError::Unauthorized));
}
