//! SurrealDB repository implementations.

mod booking;
mod listing;
mod otp;
mod session;
mod user;

pub use booking::SurrealBookingRepository;
pub use listing::SurrealListingRepository;
pub use otp::SurrealOtpRepository;
pub use session::SurrealSessionRepository;
pub use user::SurrealUserRepository;
