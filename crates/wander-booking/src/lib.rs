//! Wander Booking — the booking lifecycle: creation with derived
//! pricing, owner-checked cancellation, and per-user listing, with
//! fire-and-forget email notification.

pub mod service;

pub use service::{BookingCreated, BookingService, CreateBookingInput};
