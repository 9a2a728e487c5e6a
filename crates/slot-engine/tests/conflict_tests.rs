//! Tests for the double-booking audit.

use chrono::{NaiveDate, NaiveTime};
use slot_engine::{find_double_bookings, Booking, BookingStatus, PaymentStatus};

/// Helper to create a booking for `provider` on 2026-03-16 (or another day).
fn booking(
    id: &str,
    provider: &str,
    day: u32,
    start: (u32, u32),
    end: (u32, u32),
    status: BookingStatus,
) -> Booking {
    Booking {
        id: id.to_string(),
        provider_id: provider.to_string(),
        service_id: "cut".to_string(),
        customer_id: "sam".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        status,
        payment_status: PaymentStatus::Paid,
        total_amount: Default::default(),
        deposit_amount: None,
    }
}

#[test]
fn overlapping_active_bookings_detected() {
    let bookings = vec![
        booking("a", "alex", 16, (9, 0), (10, 0), BookingStatus::Confirmed),
        booking("b", "alex", 16, (9, 30), (10, 30), BookingStatus::CheckedIn),
    ];

    let found = find_double_bookings(&bookings);

    assert_eq!(found.len(), 1, "should detect exactly one double booking");
    assert_eq!(found[0].booking_a.id, "a");
    assert_eq!(found[0].booking_b.id, "b");
    assert_eq!(found[0].overlap_minutes, 30);
}

#[test]
fn adjacent_bookings_are_fine() {
    let bookings = vec![
        booking("a", "alex", 16, (9, 0), (10, 0), BookingStatus::Confirmed),
        booking("b", "alex", 16, (10, 0), (11, 0), BookingStatus::Confirmed),
    ];
    assert!(find_double_bookings(&bookings).is_empty());
}

#[test]
fn different_providers_or_days_never_conflict() {
    let bookings = vec![
        booking("a", "alex", 16, (9, 0), (10, 0), BookingStatus::Confirmed),
        booking("b", "jordan", 16, (9, 0), (10, 0), BookingStatus::Confirmed),
        booking("c", "alex", 17, (9, 0), (10, 0), BookingStatus::Confirmed),
    ];
    assert!(find_double_bookings(&bookings).is_empty());
}

#[test]
fn inactive_bookings_are_ignored() {
    let bookings = vec![
        booking("a", "alex", 16, (9, 0), (10, 0), BookingStatus::Confirmed),
        booking("b", "alex", 16, (9, 0), (10, 0), BookingStatus::Cancelled),
        booking("c", "alex", 16, (9, 0), (10, 0), BookingStatus::NoShow),
        booking("d", "alex", 16, (9, 0), (10, 0), BookingStatus::Completed),
    ];
    assert!(find_double_bookings(&bookings).is_empty());
}

#[test]
fn every_pair_is_reported() {
    let bookings = vec![
        booking("a", "alex", 16, (9, 0), (12, 0), BookingStatus::Confirmed),
        booking("b", "alex", 16, (10, 0), (11, 0), BookingStatus::Confirmed),
        booking("c", "alex", 16, (10, 30), (11, 30), BookingStatus::Confirmed),
    ];

    let found = find_double_bookings(&bookings);

    assert_eq!(found.len(), 3);
    assert_eq!(found[0].overlap_minutes, 60); // a-b
    assert_eq!(found[1].overlap_minutes, 60); // a-c
    assert_eq!(found[2].overlap_minutes, 30); // b-c
}

#[test]
fn empty_list_has_no_conflicts() {
    assert!(find_double_bookings(&[]).is_empty());
}
