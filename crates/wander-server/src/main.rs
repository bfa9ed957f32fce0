//! Wander Server — application entry point.
//!
//! Wires configuration, database, mailer, and the auth/booking
//! services. The HTTP boundary that maps these services to transport
//! status codes is mounted separately.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wander_auth::AuthService;
use wander_booking::BookingService;
use wander_db::repository::{
    SurrealBookingRepository, SurrealListingRepository, SurrealOtpRepository,
    SurrealSessionRepository, SurrealUserRepository,
};
use wander_db::run_migrations;
use wander_mailer::SmtpMailer;

mod config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("wander=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Wander server...");

    let config = config::ServerConfig::load();

    let db = match wander_db::connect(&config.db).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&db).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let mailer = Arc::new(SmtpMailer::new(config.smtp));

    let _auth_service = AuthService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealSessionRepository::new(db.clone()),
        SurrealOtpRepository::new(db.clone()),
        mailer.as_ref().clone(),
        config.auth,
    );

    let _booking_service = BookingService::new(
        SurrealBookingRepository::new(db.clone()),
        SurrealListingRepository::new(db.clone()),
        SurrealUserRepository::new(db),
        Arc::clone(&mailer),
    );

    tracing::info!("Wander services initialized");

    // TODO: mount the REST boundary on these services.

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");

    tracing::info!("Wander server stopped.");
}
