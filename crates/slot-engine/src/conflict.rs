//! Detect double bookings in a list of stored bookings.
//!
//! Performs pairwise comparison between active bookings of the same provider
//! on the same date. Adjacent bookings (one ends exactly when the next
//! starts) are NOT double bookings. Buffer time is a scheduling preference
//! and is not considered here.

use serde::Serialize;

use crate::booking::Booking;

/// Two active bookings that share time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleBooking {
    pub booking_a: Booking,
    pub booking_b: Booking,
    pub overlap_minutes: i64,
}

/// Find every pair of active bookings for the same provider and date whose
/// intervals overlap.
///
/// Pairs are reported once, in input order (`booking_a` precedes
/// `booking_b` in `bookings`).
pub fn find_double_bookings(bookings: &[Booking]) -> Vec<DoubleBooking> {
    let mut found = Vec::new();

    for (i, a) in bookings.iter().enumerate() {
        if !a.is_active() {
            continue;
        }
        for b in &bookings[i + 1..] {
            if !b.is_active() || a.provider_id != b.provider_id || a.date != b.date {
                continue;
            }
            let (wa, wb) = (a.window(), b.window());
            if wa.overlaps(&wb) {
                found.push(DoubleBooking {
                    booking_a: a.clone(),
                    booking_b: b.clone(),
                    overlap_minutes: wa.overlap_minutes(&wb),
                });
            }
        }
    }

    if !found.is_empty() {
        tracing::warn!(count = found.len(), "double bookings detected");
    }
    found
}
