//! Authentication service — OTP-gated signup, login, and logout.

use chrono::Duration;
use tracing::info;
use uuid::Uuid;
use wander_core::clock::{Clock, SystemClock};
use wander_core::error::{WanderError, WanderResult};
use wander_core::models::otp::CreateOtpChallenge;
use wander_core::models::session::{CreateSession, Session};
use wander_core::models::user::{CreateUser, User};
use wander_core::notify::Notifier;
use wander_core::repository::{OtpRepository, SessionRepository, UserRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::otp;
use crate::password;
use crate::session;

/// Input for OTP issuance (signup step one).
#[derive(Debug)]
pub struct RequestOtpInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub username_or_email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    pub session: Session,
}

/// Successful signup result — the account plus an established session.
#[derive(Debug)]
pub struct SignupOutput {
    pub user: User,
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    pub session: Session,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate, and over [`Clock`] so the OTP
/// expiry window is deterministic under test.
pub struct AuthService<U, S, O, N, C = SystemClock>
where
    U: UserRepository,
    S: SessionRepository,
    O: OtpRepository,
    N: Notifier,
    C: Clock,
{
    user_repo: U,
    session_repo: S,
    otp_repo: O,
    mailer: N,
    config: AuthConfig,
    clock: C,
}

impl<U, S, O, N> AuthService<U, S, O, N, SystemClock>
where
    U: UserRepository,
    S: SessionRepository,
    O: OtpRepository,
    N: Notifier,
{
    pub fn new(user_repo: U, session_repo: S, otp_repo: O, mailer: N, config: AuthConfig) -> Self {
        Self::with_clock(user_repo, session_repo, otp_repo, mailer, config, SystemClock)
    }
}

impl<U, S, O, N, C> AuthService<U, S, O, N, C>
where
    U: UserRepository,
    S: SessionRepository,
    O: OtpRepository,
    N: Notifier,
    C: Clock,
{
    pub fn with_clock(
        user_repo: U,
        session_repo: S,
        otp_repo: O,
        mailer: N,
        config: AuthConfig,
        clock: C,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            otp_repo,
            mailer,
            config,
            clock,
        }
    }

    /// Issue an OTP challenge for a new signup.
    ///
    /// The password is hashed here, before the pending record is
    /// written — no code path holds a clear-text credential in
    /// storage. A new request overwrites any prior challenge for the
    /// same email.
    ///
    /// Unlike booking notifications, OTP delivery failure is surfaced:
    /// without the code the user cannot complete signup.
    pub async fn request_otp(&self, input: RequestOtpInput) -> WanderResult<()> {
        if input.email.is_empty() || input.username.is_empty() {
            return Err(WanderError::InvalidInput {
                message: "email and username are required".into(),
            });
        }
        if input.password.len() < self.config.min_password_length {
            return Err(WanderError::InvalidInput {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        // Reject emails that already belong to a confirmed account.
        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => return Err(WanderError::EmailAlreadyRegistered),
            Err(WanderError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;
        let code = otp::generate_code();

        self.otp_repo
            .upsert(CreateOtpChallenge {
                email: input.email.clone(),
                code: code.clone(),
                username: input.username,
                password_hash,
                created_at: self.clock.now(),
            })
            .await?;

        self.mailer.send_otp(&input.email, &code).await?;

        info!(email = %input.email, "OTP challenge issued");
        Ok(())
    }

    /// Complete signup: verify the code, create the account from the
    /// pending username/hash, and establish a session.
    ///
    /// The challenge is consumed atomically at the storage layer, so a
    /// code can confirm at most one signup even under concurrent
    /// attempts. An expired challenge is purged on detection and can
    /// never be confirmed afterwards.
    pub async fn confirm_signup(&self, email: &str, code: &str) -> WanderResult<SignupOutput> {
        let challenge = match self.otp_repo.get_by_email(email).await {
            Ok(c) => c,
            Err(WanderError::NotFound { .. }) => return Err(WanderError::NoPendingOtp),
            Err(e) => return Err(e),
        };

        let ttl = Duration::seconds(self.config.otp_ttl_secs as i64);
        if self.clock.now() - challenge.created_at >= ttl {
            self.otp_repo.delete(email).await?;
            return Err(WanderError::OtpExpired);
        }

        // A mismatch does not consume the record: a later attempt with
        // the correct code inside the window still succeeds.
        if challenge.code != code {
            return Err(WanderError::OtpMismatch);
        }

        let consumed = self
            .otp_repo
            .take_matching(email, code)
            .await?
            .ok_or(WanderError::NoPendingOtp)?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: consumed.username,
                email: consumed.email,
                password_hash: consumed.password_hash,
            })
            .await?;

        let (session_token, session) = self.establish_session(user.id).await?;

        info!(user_id = %user.id, "signup confirmed");
        Ok(SignupOutput {
            user,
            session_token,
            session,
        })
    }

    /// Authenticate with username/email + password and establish a
    /// session.
    pub async fn login(&self, input: LoginInput) -> WanderResult<LoginOutput> {
        // Look up user — try username first, then email.
        let user = match self
            .user_repo
            .get_by_username(&input.username_or_email)
            .await
        {
            Ok(u) => u,
            Err(WanderError::NotFound { .. }) => self
                .user_repo
                .get_by_email(&input.username_or_email)
                .await
                .map_err(|_| AuthError::InvalidCredentials)?,
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let (session_token, session) = self.establish_session(user.id).await?;

        Ok(LoginOutput {
            user,
            session_token,
            session,
        })
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> WanderResult<()> {
        self.session_repo.invalidate(session_id).await
    }

    /// Resolve the caller behind a raw session token.
    ///
    /// Expired sessions are invalidated on sight and rejected.
    pub async fn current_user(&self, session_token: &str) -> WanderResult<User> {
        let token_hash = session::hash_session_token(session_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                WanderError::NotFound { .. } => WanderError::Unauthorized,
                other => other,
            })?;

        if session.expires_at <= self.clock.now() {
            let _ = self.session_repo.invalidate(session.id).await;
            return Err(WanderError::Unauthorized);
        }

        self.user_repo.get_by_id(session.user_id).await
    }

    async fn establish_session(&self, user_id: Uuid) -> WanderResult<(String, Session)> {
        let raw_token = session::generate_session_token();
        let token_hash = session::hash_session_token(&raw_token);
        let expires_at =
            self.clock.now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                user_id,
                token_hash,
                expires_at,
            })
            .await?;

        Ok((raw_token, session))
    }
}
