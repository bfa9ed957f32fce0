//! Booking lifecycle service.
//!
//! State machine: `Confirmed` → `Cancelled` (terminal). `Pending` is
//! reserved and never entered. Every transition fires a best-effort
//! email on a detached task: the transition's commit is independent of
//! delivery outcome, and failures are logged and swallowed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;
use wander_core::error::{WanderError, WanderResult};
use wander_core::models::booking::{Booking, BookingStatus, BookingWithListing, CreateBooking};
use wander_core::models::listing::Listing;
use wander_core::models::user::User;
use wander_core::notify::{BookingCancellation, BookingConfirmation, Notifier};
use wander_core::pricing;
use wander_core::repository::{BookingRepository, ListingRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub listing_id: Uuid,
    /// The authenticated caller. Session resolution happens at the
    /// boundary before this service is reached.
    pub user_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub number_of_guests: u32,
}

/// The persisted booking plus the derived night count.
#[derive(Debug, Clone)]
pub struct BookingCreated {
    pub booking: Booking,
    pub nights: i64,
}

/// Booking lifecycle service.
///
/// Generic over repository implementations; the notifier is shared
/// behind an `Arc` so dispatch can outlive the request on a detached
/// task.
pub struct BookingService<B, L, U, N>
where
    B: BookingRepository,
    L: ListingRepository,
    U: UserRepository,
    N: Notifier + 'static,
{
    booking_repo: B,
    listing_repo: L,
    user_repo: U,
    mailer: Arc<N>,
}

impl<B, L, U, N> BookingService<B, L, U, N>
where
    B: BookingRepository,
    L: ListingRepository,
    U: UserRepository,
    N: Notifier + 'static,
{
    pub fn new(booking_repo: B, listing_repo: L, user_repo: U, mailer: Arc<N>) -> Self {
        Self {
            booking_repo,
            listing_repo,
            user_repo,
            mailer,
        }
    }

    /// Create a booking against an existing listing.
    ///
    /// The total price is always derived from nights x the listing's
    /// nightly rate — never taken from the caller. All validation runs
    /// before anything is persisted; the confirmation email is
    /// dispatched after the write and cannot fail the operation.
    ///
    /// Overlapping bookings for the same listing and date range are
    /// not rejected; conflicts are resolved outside this system.
    pub async fn create_booking(&self, input: CreateBookingInput) -> WanderResult<BookingCreated> {
        if input.number_of_guests < 1 {
            return Err(WanderError::InvalidInput {
                message: "number of guests must be at least 1".into(),
            });
        }

        let listing = self.listing_repo.get_by_id(input.listing_id).await?;
        let guest = self.user_repo.get_by_id(input.user_id).await?;

        let quote = pricing::quote(input.check_in, input.check_out, listing.price)?;

        let booking = self
            .booking_repo
            .create(CreateBooking {
                listing_id: input.listing_id,
                user_id: input.user_id,
                check_in: input.check_in,
                check_out: input.check_out,
                number_of_guests: input.number_of_guests,
                total_price: quote.total_price,
                status: BookingStatus::Confirmed,
            })
            .await?;

        self.dispatch_confirmation(&booking, &listing, &guest, quote.nights);

        Ok(BookingCreated {
            booking,
            nights: quote.nights,
        })
    }

    /// Cancel a booking.
    ///
    /// Only the booking's owner may cancel. The write is
    /// unconditional, so cancelling an already-cancelled booking
    /// succeeds again and leaves it `Cancelled`.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        requesting_user_id: Uuid,
    ) -> WanderResult<Booking> {
        let booking = self.booking_repo.get_by_id(booking_id).await?;

        if booking.user_id != requesting_user_id {
            return Err(WanderError::Forbidden {
                reason: "only the booking owner may cancel it".into(),
            });
        }

        let cancelled = self
            .booking_repo
            .set_status(booking_id, BookingStatus::Cancelled)
            .await?;

        // The status change has committed; anything past this point is
        // best-effort.
        match self.lookup_notification_parties(&cancelled).await {
            Ok((listing, guest)) => self.dispatch_cancellation(&cancelled, &listing, &guest),
            Err(err) => warn!(
                booking_id = %booking_id,
                error = %err,
                "skipping cancellation email"
            ),
        }

        Ok(cancelled)
    }

    /// All bookings for a user, newest created first, each resolved
    /// with its listing.
    pub async fn list_user_bookings(&self, user_id: Uuid) -> WanderResult<Vec<BookingWithListing>> {
        let bookings = self.booking_repo.list_by_user(user_id).await?;

        let mut resolved = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let listing = self.listing_repo.get_by_id(booking.listing_id).await?;
            resolved.push(BookingWithListing { booking, listing });
        }

        Ok(resolved)
    }

    async fn lookup_notification_parties(
        &self,
        booking: &Booking,
    ) -> WanderResult<(Listing, User)> {
        let listing = self.listing_repo.get_by_id(booking.listing_id).await?;
        let guest = self.user_repo.get_by_id(booking.user_id).await?;
        Ok((listing, guest))
    }

    fn dispatch_confirmation(&self, booking: &Booking, listing: &Listing, guest: &User, nights: i64) {
        let details = BookingConfirmation {
            booking_id: booking.id,
            guest_name: guest.username.clone(),
            guest_email: guest.email.clone(),
            listing_title: listing.title.clone(),
            listing_location: listing.location.clone(),
            listing_country: listing.country.clone(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            number_of_guests: booking.number_of_guests,
            nights,
            total_price: booking.total_price,
        };

        let mailer = Arc::clone(&self.mailer);
        let booking_id = booking.id;
        tokio::spawn(async move {
            if let Err(err) = mailer.send_booking_confirmation(details).await {
                warn!(
                    booking_id = %booking_id,
                    error = %err,
                    "booking confirmation email failed"
                );
            }
        });
    }

    fn dispatch_cancellation(&self, booking: &Booking, listing: &Listing, guest: &User) {
        let details = BookingCancellation {
            booking_id: booking.id,
            guest_name: guest.username.clone(),
            guest_email: guest.email.clone(),
            listing_title: listing.title.clone(),
            check_in: booking.check_in,
            check_out: booking.check_out,
        };

        let mailer = Arc::clone(&self.mailer);
        let booking_id = booking.id;
        tokio::spawn(async move {
            if let Err(err) = mailer.send_booking_cancellation(details).await {
                warn!(
                    booking_id = %booking_id,
                    error = %err,
                    "booking cancellation email failed"
                );
            }
        });
    }
}
