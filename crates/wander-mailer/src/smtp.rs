//! SMTP [`Notifier`] implementation using lettre.
//!
//! A fresh transport is built per send and the blocking send runs on
//! the blocking pool, so callers awaiting a result never tie up an
//! async worker.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use wander_core::error::{WanderError, WanderResult};
use wander_core::notify::{BookingCancellation, BookingConfirmation, Notifier};

/// SMTP delivery configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay address (e.g., `smtp.gmail.com`).
    pub server: String,
    /// Usually 587 for STARTTLS.
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

/// SMTP mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    server: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            server: config.server,
            port: config.port,
            credentials: Credentials::new(config.username, config.password),
            from_email: config.from_email,
            from_name: config.from_name,
        }
    }

    fn build_transport(&self) -> WanderResult<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.server)
            .map_err(|e| WanderError::NotificationFailure(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();
        Ok(transport)
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    async fn send_html(&self, to: &str, subject: &str, html_body: String) -> WanderResult<()> {
        let email = Message::builder()
            .from(self.from_header().parse().map_err(|e| {
                WanderError::NotificationFailure(format!("invalid from address: {e}"))
            })?)
            .to(to.parse().map_err(|e| {
                WanderError::NotificationFailure(format!("invalid to address: {e}"))
            })?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| WanderError::NotificationFailure(format!("failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| WanderError::NotificationFailure(format!("failed to send: {e}")))
        })
        .await
        .map_err(|e| WanderError::NotificationFailure(format!("email task failed: {e}")))?
        .map(|_| ())
    }
}

impl Notifier for SmtpMailer {
    async fn send_booking_confirmation(&self, details: BookingConfirmation) -> WanderResult<()> {
        let check_in = details.check_in.format("%A, %-d %B %Y");
        let check_out = details.check_out.format("%A, %-d %B %Y");

        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Booking confirmed</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Booking confirmed</h2>
        <p>Hello {guest_name}, your booking has been confirmed.</p>
        <table style="width: 100%; border-collapse: collapse;">
            <tr><td style="padding: 6px 0; color: #555;">Booking ID</td><td>#{booking_id}</td></tr>
            <tr><td style="padding: 6px 0; color: #555;">Property</td><td>{title}</td></tr>
            <tr><td style="padding: 6px 0; color: #555;">Location</td><td>{location}, {country}</td></tr>
            <tr><td style="padding: 6px 0; color: #555;">Check-in</td><td>{check_in}</td></tr>
            <tr><td style="padding: 6px 0; color: #555;">Check-out</td><td>{check_out}</td></tr>
            <tr><td style="padding: 6px 0; color: #555;">Guests</td><td>{guests}</td></tr>
            <tr><td style="padding: 6px 0; color: #555;">Nights</td><td>{nights}</td></tr>
        </table>
        <p style="background-color: #2563eb; color: white; padding: 12px; text-align: center; font-size: 20px;">
            Total: {total:.2}
        </p>
        <p style="color: #666; font-size: 14px;">
            Contact the host if you have any questions. Have a wonderful stay!
        </p>
    </div>
</body>
</html>
            "#,
            guest_name = details.guest_name,
            booking_id = details.booking_id,
            title = details.listing_title,
            location = details.listing_location,
            country = details.listing_country,
            check_in = check_in,
            check_out = check_out,
            guests = details.number_of_guests,
            nights = details.nights,
            total = details.total_price,
        );

        let subject = format!("Booking confirmed - {}", details.listing_title);
        self.send_html(&details.guest_email, &subject, html_body)
            .await
    }

    async fn send_booking_cancellation(&self, details: BookingCancellation) -> WanderResult<()> {
        let check_in = details.check_in.format("%-d %B %Y");
        let check_out = details.check_out.format("%-d %B %Y");

        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Booking cancelled</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #dc2626;">Booking cancelled</h2>
        <p>Hello {guest_name}, your booking has been cancelled.</p>
        <ul>
            <li>Booking ID: #{booking_id}</li>
            <li>Property: {title}</li>
            <li>Check-in: {check_in}</li>
            <li>Check-out: {check_out}</li>
        </ul>
        <p>We hope to see you again soon.</p>
    </div>
</body>
</html>
            "#,
            guest_name = details.guest_name,
            booking_id = details.booking_id,
            title = details.listing_title,
            check_in = check_in,
            check_out = check_out,
        );

        let subject = format!("Booking cancelled - {}", details.listing_title);
        self.send_html(&details.guest_email, &subject, html_body)
            .await
    }

    async fn send_otp(&self, email: &str, code: &str) -> WanderResult<()> {
        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Your verification code</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Verify your email address</h2>
        <p>Your verification code is:</p>
        <p style="font-size: 32px; letter-spacing: 8px; font-weight: bold;">{code}</p>
        <p>It expires in 5 minutes.</p>
        <p style="color: #666; font-size: 14px;">
            If you didn't request this code, you can safely ignore this email.
        </p>
    </div>
</body>
</html>
            "#
        );

        self.send_html(email, "Your verification code", html_body)
            .await
    }
}
