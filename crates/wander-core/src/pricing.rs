//! Booking price calculator.
//!
//! Pure and deterministic: given a date range and a nightly rate it
//! derives the night count and total price. The total is always
//! recomputed here at creation time — caller-supplied prices are never
//! trusted.

use chrono::{DateTime, Utc};

use crate::error::{WanderError, WanderResult};

const SECONDS_PER_DAY: i64 = 86_400;

/// A computed booking quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub nights: i64,
    pub total_price: f64,
}

/// Compute `nights = ceil((check_out - check_in) / 1 day)` and the
/// total price at the given nightly rate.
///
/// Night counting is calendar-day granular with a ceiling policy: a
/// stay ending mid-day still counts as a full night, so checkout times
/// left unspecified never undercharge.
///
/// Returns [`WanderError::InvalidDateRange`] when the range yields
/// zero or negative nights (`check_out <= check_in`).
pub fn quote(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    nightly_rate: f64,
) -> WanderResult<Quote> {
    let seconds = (check_out - check_in).num_seconds();
    // Ceiling division; `i64::div_ceil` is feature-gated on this toolchain.
    let nights = seconds.div_euclid(SECONDS_PER_DAY)
        + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) != 0);

    if nights <= 0 {
        return Err(WanderError::InvalidDateRange);
    }

    Ok(Quote {
        nights,
        total_price: nights as f64 * nightly_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn three_nights_at_1200() {
        let q = quote(date(2024, 6, 1), date(2024, 6, 4), 1200.0).unwrap();
        assert_eq!(q.nights, 3);
        assert_eq!(q.total_price, 3600.0);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = quote(date(2024, 6, 4), date(2024, 6, 1), 1200.0).unwrap_err();
        assert!(matches!(err, WanderError::InvalidDateRange));
    }

    #[test]
    fn same_day_is_rejected() {
        let err = quote(date(2024, 6, 1), date(2024, 6, 1), 1200.0).unwrap_err();
        assert!(matches!(err, WanderError::InvalidDateRange));
    }

    #[test]
    fn fractional_day_rounds_up() {
        // Check-in at 10:00, check-out the next day at 15:00 — more
        // than one day but less than two, so two nights are charged.
        let check_in = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 6, 2, 15, 0, 0).unwrap();
        let q = quote(check_in, check_out, 100.0).unwrap();
        assert_eq!(q.nights, 2);
        assert_eq!(q.total_price, 200.0);
    }

    #[test]
    fn partial_day_counts_as_one_night() {
        let check_in = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 6, 2, 11, 0, 0).unwrap();
        let q = quote(check_in, check_out, 80.0).unwrap();
        assert_eq!(q.nights, 1);
    }

    #[test]
    fn quote_is_idempotent() {
        let a = quote(date(2024, 6, 1), date(2024, 6, 8), 99.5).unwrap();
        let b = quote(date(2024, 6, 1), date(2024, 6, 8), 99.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_rate_gives_zero_total() {
        let q = quote(date(2024, 6, 1), date(2024, 6, 3), 0.0).unwrap();
        assert_eq!(q.nights, 2);
        assert_eq!(q.total_price, 0.0);
    }
}
