//! Tests for the in-memory booking store and its atomic check-and-insert.

use std::thread;

use chrono::{NaiveDate, NaiveTime, Weekday};
use slot_engine::{
    find_double_bookings, BookingOutcome, BookingStatus, BookingStore, DaySchedule, EngineError,
    InMemoryBookingStore, NewBooking, PaymentStatus, ProviderCalendar, Rejection, SlotConfig,
    WeeklySchedule,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn calendar() -> ProviderCalendar {
    let week = WeeklySchedule::new().with(
        Weekday::Mon,
        DaySchedule::open(t(9, 0), t(18, 0)).with_break(t(12, 0), t(13, 0)),
    );
    ProviderCalendar::new("alex", week)
}

fn request(customer: &str, start: NaiveTime, minutes: i64) -> NewBooking {
    NewBooking {
        service_id: "cut".to_string(),
        customer_id: customer.to_string(),
        date: monday(),
        start_time: start,
        duration_minutes: minutes,
        payment_status: PaymentStatus::Paid,
        total_amount: Default::default(),
        deposit_amount: None,
    }
}

#[test]
fn accepted_booking_is_stored_confirmed() {
    let store = InMemoryBookingStore::new();
    let outcome = store
        .insert_if_free(&calendar(), request("sam", t(10, 0), 45), &SlotConfig::default())
        .unwrap();

    let booking = outcome.booking().expect("slot is free").clone();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.provider_id, "alex");
    assert_eq!(booking.end_time, t(10, 45));
    assert_eq!(store.get(&booking.id).unwrap(), booking);
    assert_eq!(store.bookings_on("alex", monday()).unwrap().len(), 1);
}

#[test]
fn second_overlapping_insert_is_rejected() {
    let store = InMemoryBookingStore::new();
    let config = SlotConfig::default();
    store
        .insert_if_free(&calendar(), request("sam", t(10, 0), 45), &config)
        .unwrap();

    let second = store
        .insert_if_free(&calendar(), request("kim", t(10, 30), 30), &config)
        .unwrap();
    assert_eq!(second.rejection(), Some(Rejection::SlotTaken));

    let third = store
        .insert_if_free(&calendar(), request("kim", t(10, 45), 30), &config)
        .unwrap();
    assert!(matches!(third, BookingOutcome::Accepted(_)));
}

#[test]
fn stale_calendar_bookings_are_ignored() {
    let store = InMemoryBookingStore::new();
    let config = SlotConfig::default();
    store
        .insert_if_free(&calendar(), request("sam", t(10, 0), 30), &config)
        .unwrap();

    // The caller's calendar was loaded before the first insert and has no
    // bookings; the store still sees the committed one.
    let stale = calendar();
    let outcome = store
        .insert_if_free(&stale, request("kim", t(10, 0), 30), &config)
        .unwrap();
    assert_eq!(outcome.rejection(), Some(Rejection::SlotTaken));
}

#[test]
fn concurrent_requests_for_same_slot_admit_exactly_one() {
    let store = InMemoryBookingStore::new();
    let cal = calendar();
    let config = SlotConfig::default();

    let outcomes: Vec<BookingOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let (store, cal, config) = (&store, &cal, &config);
                scope.spawn(move || {
                    store
                        .insert_if_free(cal, request(&format!("c{i}"), t(15, 0), 30), config)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = outcomes.iter().filter(|o| o.booking().is_some()).count();
    assert_eq!(accepted, 1);
    assert!(outcomes
        .iter()
        .filter_map(|o| o.rejection())
        .all(|r| r == Rejection::SlotTaken));
    assert!(find_double_bookings(&store.all().unwrap()).is_empty());
}

#[test]
fn cancelling_frees_the_slot() {
    let store = InMemoryBookingStore::new();
    let config = SlotConfig::default();
    let first = store
        .insert_if_free(&calendar(), request("sam", t(10, 0), 30), &config)
        .unwrap();
    let id = first.booking().unwrap().id.clone();

    let cancelled = store.update_status(&id, BookingStatus::Cancelled).unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let again = store
        .insert_if_free(&calendar(), request("kim", t(10, 0), 30), &config)
        .unwrap();
    assert!(again.booking().is_some());
}

#[test]
fn illegal_transition_leaves_booking_untouched() {
    let store = InMemoryBookingStore::new();
    let outcome = store
        .insert_if_free(&calendar(), request("sam", t(10, 0), 30), &SlotConfig::default())
        .unwrap();
    let id = outcome.booking().unwrap().id.clone();

    let err = store.update_status(&id, BookingStatus::Completed).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
    assert_eq!(store.get(&id).unwrap().status, BookingStatus::Confirmed);
}

#[test]
fn unknown_booking_is_reported() {
    let store = InMemoryBookingStore::new();
    assert!(matches!(
        store.get("nope").unwrap_err(),
        EngineError::UnknownBooking(_)
    ));
    assert!(store.update_status("nope", BookingStatus::Cancelled).is_err());
}

#[test]
fn invalid_duration_is_an_error_not_a_rejection() {
    let store = InMemoryBookingStore::new();
    let err = store
        .insert_if_free(&calendar(), request("sam", t(10, 0), 0), &SlotConfig::default())
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(store.all().unwrap().is_empty());
}
