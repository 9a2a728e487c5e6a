//! Tests for slot generation.

use chrono::{NaiveDate, NaiveTime, Weekday};
use slot_engine::{
    available_starts_for_service, generate_slots, validate_booking, Booking, BookingStatus,
    DaySchedule, PaymentStatus, ProviderCalendar, ScheduleOverride, SlotConfig, TimeOff,
    WeeklySchedule,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Monday 2026-03-16.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

/// Sunday 2026-03-22.
fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 22).unwrap()
}

/// Mon-Sat 09:00-18:00 with a 12:00-13:00 break, Sunday closed, no buffer.
fn standard_week() -> WeeklySchedule {
    let workday = DaySchedule::open(t(9, 0), t(18, 0)).with_break(t(12, 0), t(13, 0));
    let mut week = WeeklySchedule::new();
    for day in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ] {
        week.set(day, workday.clone());
    }
    week.set(Weekday::Sun, DaySchedule::closed());
    week
}

fn calendar() -> ProviderCalendar {
    ProviderCalendar::new("alex", standard_week())
}

fn booking(id: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime, status: BookingStatus) -> Booking {
    Booking {
        id: id.to_string(),
        provider_id: "alex".to_string(),
        service_id: "fade".to_string(),
        customer_id: "sam".to_string(),
        date,
        start_time: start,
        end_time: end,
        status,
        payment_status: PaymentStatus::Paid,
        total_amount: Default::default(),
        deposit_amount: None,
    }
}

fn slots(cal: &ProviderCalendar, date: NaiveDate) -> Vec<NaiveTime> {
    generate_slots(cal, date, &SlotConfig::default()).unwrap()
}

// ── Break handling ──────────────────────────────────────────────────────────

#[test]
fn open_day_with_break_skips_break_slots() {
    let result = slots(&calendar(), monday());

    assert!(result.contains(&t(9, 0)));
    assert!(result.contains(&t(11, 30)));
    assert!(!result.contains(&t(12, 0)));
    assert!(!result.contains(&t(12, 30)));
    assert!(result.contains(&t(13, 0)));
    assert_eq!(result.last(), Some(&t(17, 30)));
    // 09:00-11:30 (6) + 13:00-17:30 (10)
    assert_eq!(result.len(), 16);
}

#[test]
fn output_is_sorted_and_unique() {
    let result = slots(&calendar(), monday());
    for pair in result.windows(2) {
        assert!(pair[0] < pair[1], "{:?} not before {:?}", pair[0], pair[1]);
    }
}

#[test]
fn finer_granularity_enumerates_more_starts() {
    let config = SlotConfig::default().with_granularity(15);
    let result = generate_slots(&calendar(), monday(), &config).unwrap();
    assert!(result.contains(&t(11, 45)));
    assert!(!result.contains(&t(12, 45)));
    assert_eq!(result.len(), 32);
}

// ── Bookings ────────────────────────────────────────────────────────────────

#[test]
fn confirmed_booking_removes_overlapping_slots() {
    let cal = calendar().with_booking(booking("b1", monday(), t(10, 0), t(10, 45), BookingStatus::Confirmed));
    let result = slots(&cal, monday());

    assert!(result.contains(&t(9, 30)));
    assert!(!result.contains(&t(10, 0)));
    assert!(!result.contains(&t(10, 30)), "10:30-11:00 overlaps a booking ending 10:45");
    assert!(result.contains(&t(11, 0)));
}

#[test]
fn checked_in_booking_blocks_like_confirmed() {
    let cal = calendar().with_booking(booking("b1", monday(), t(15, 0), t(15, 30), BookingStatus::CheckedIn));
    assert!(!slots(&cal, monday()).contains(&t(15, 0)));
}

#[test]
fn inactive_bookings_do_not_block() {
    let cal = calendar()
        .with_booking(booking("b1", monday(), t(9, 0), t(9, 30), BookingStatus::Cancelled))
        .with_booking(booking("b2", monday(), t(9, 30), t(10, 0), BookingStatus::NoShow))
        .with_booking(booking("b3", monday(), t(10, 0), t(10, 30), BookingStatus::Completed));
    let result = slots(&cal, monday());
    assert!(result.contains(&t(9, 0)));
    assert!(result.contains(&t(9, 30)));
    assert!(result.contains(&t(10, 0)));
}

#[test]
fn bookings_on_other_dates_are_ignored() {
    let tuesday = monday().succ_opt().unwrap();
    let cal = calendar().with_booking(booking("b1", tuesday, t(9, 0), t(18, 0), BookingStatus::Confirmed));
    assert_eq!(slots(&cal, monday()).len(), 16);
    assert!(slots(&cal, tuesday).is_empty());
}

#[test]
fn buffer_extends_bookings() {
    let mut week = standard_week();
    week.set(
        Weekday::Mon,
        DaySchedule::open(t(9, 0), t(18, 0)).with_buffer(15),
    );
    let cal = ProviderCalendar::new("alex", week)
        .with_booking(booking("b1", monday(), t(10, 0), t(10, 30), BookingStatus::Confirmed));

    let buffered = slots(&cal, monday());
    assert!(!buffered.contains(&t(10, 30)), "10:30 falls inside the 15-minute buffer");
    assert!(buffered.contains(&t(11, 0)));

    let unbuffered = generate_slots(&cal, monday(), &SlotConfig::default().without_buffer()).unwrap();
    assert!(unbuffered.contains(&t(10, 30)));
}

#[test]
fn buffer_is_kept_before_bookings() {
    let mut week = standard_week();
    week.set(
        Weekday::Mon,
        DaySchedule::open(t(9, 0), t(18, 0)).with_buffer(15),
    );
    let cal = ProviderCalendar::new("alex", week)
        .with_booking(booking("b1", monday(), t(10, 0), t(10, 45), BookingStatus::Confirmed));

    let buffered = slots(&cal, monday());
    assert!(buffered.contains(&t(9, 0)));
    assert!(!buffered.contains(&t(9, 30)), "09:30-10:00 leaves no buffer before 10:00");
    assert!(!buffered.contains(&t(10, 30)));
    assert!(buffered.contains(&t(11, 0)), "10:45 plus 15 minutes of buffer");

    // Every listed slot passes the booking gate at slot length.
    for start in &buffered {
        let verdict = validate_booking(&cal, monday(), *start, 30, &SlotConfig::default()).unwrap();
        assert!(verdict.is_accepted(), "{start} listed but rejected: {verdict:?}");
    }
}

// ── Closures and exceptions ─────────────────────────────────────────────────

#[test]
fn closed_weekday_yields_nothing() {
    let cal = calendar();
    for week in 0..4 {
        let date = sunday() + chrono::Duration::weeks(week);
        assert!(slots(&cal, date).is_empty(), "{date} should be closed");
    }
}

#[test]
fn weekday_without_entry_yields_nothing() {
    let week = WeeklySchedule::new().with(Weekday::Mon, DaySchedule::open(t(9, 0), t(12, 0)));
    let cal = ProviderCalendar::new("alex", week);
    assert!(slots(&cal, monday().succ_opt().unwrap()).is_empty());
}

#[test]
fn full_day_time_off_yields_nothing() {
    let cal = calendar().with_time_off(TimeOff::full_day(monday(), "Vacation"));
    assert!(slots(&cal, monday()).is_empty());
}

#[test]
fn partial_time_off_removes_its_window() {
    let cal = calendar().with_time_off(TimeOff::partial(monday(), t(14, 0), t(16, 0), "Doctor"));
    let result = slots(&cal, monday());
    assert!(result.contains(&t(13, 30)));
    assert!(!result.contains(&t(14, 0)));
    assert!(!result.contains(&t(15, 30)));
    assert!(result.contains(&t(16, 0)));
}

#[test]
fn override_opens_closed_sunday() {
    let cal = calendar().with_override(ScheduleOverride {
        date: sunday(),
        reason: "Wedding party".to_string(),
        schedule: DaySchedule::open(t(10, 0), t(14, 0)),
    });
    let result = slots(&cal, sunday());
    assert_eq!(result.first(), Some(&t(10, 0)));
    assert_eq!(result.last(), Some(&t(13, 30)));
    assert_eq!(result.len(), 8);

    // The following Sunday still follows the weekly template.
    assert!(slots(&cal, sunday() + chrono::Duration::weeks(1)).is_empty());
}

#[test]
fn override_replaces_rather_than_merges() {
    // Monday normally breaks at 12:00; the override has no break at all.
    let cal = calendar().with_override(ScheduleOverride {
        date: monday(),
        reason: "Extended hours".to_string(),
        schedule: DaySchedule::open(t(7, 0), t(22, 0)),
    });
    let result = slots(&cal, monday());
    assert_eq!(result.first(), Some(&t(7, 0)));
    assert!(result.contains(&t(12, 0)));
    assert_eq!(result.last(), Some(&t(21, 30)));
}

#[test]
fn override_can_close_an_open_day() {
    let cal = calendar().with_override(ScheduleOverride {
        date: monday(),
        reason: "Training".to_string(),
        schedule: DaySchedule::closed(),
    });
    assert!(slots(&cal, monday()).is_empty());
}

#[test]
fn full_day_time_off_beats_override() {
    let cal = calendar()
        .with_override(ScheduleOverride {
            date: sunday(),
            reason: "Event".to_string(),
            schedule: DaySchedule::open(t(10, 0), t(14, 0)),
        })
        .with_time_off(TimeOff::full_day(sunday(), "Sick"));
    assert!(slots(&cal, sunday()).is_empty());
}

// ── Behaviour ───────────────────────────────────────────────────────────────

#[test]
fn generation_is_idempotent() {
    let cal = calendar()
        .with_booking(booking("b1", monday(), t(10, 0), t(10, 45), BookingStatus::Confirmed))
        .with_time_off(TimeOff::partial(monday(), t(14, 0), t(16, 0), "Doctor"));
    assert_eq!(slots(&cal, monday()), slots(&cal, monday()));
}

#[test]
fn last_slot_starts_before_close_even_if_it_overruns() {
    let week = WeeklySchedule::new().with(Weekday::Mon, DaySchedule::open(t(9, 0), t(10, 15)));
    let cal = ProviderCalendar::new("alex", week);
    assert_eq!(slots(&cal, monday()), vec![t(9, 0), t(9, 30), t(10, 0)]);
}

#[test]
fn invalid_schedule_is_reported() {
    let week = WeeklySchedule::new().with(Weekday::Mon, DaySchedule::open(t(18, 0), t(9, 0)));
    let cal = ProviderCalendar::new("alex", week);
    let err = generate_slots(&cal, monday(), &SlotConfig::default()).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn zero_granularity_is_rejected() {
    let config = SlotConfig::default().with_granularity(0);
    assert!(generate_slots(&calendar(), monday(), &config).is_err());
}

// ── Duration-aware starts ───────────────────────────────────────────────────

#[test]
fn service_starts_fit_the_whole_service() {
    let result = available_starts_for_service(&calendar(), monday(), 45, &SlotConfig::default()).unwrap();
    assert!(result.contains(&t(11, 0)));
    assert!(!result.contains(&t(11, 30)), "11:30 + 45 min runs into the break");
    assert!(result.contains(&t(17, 0)));
    assert!(!result.contains(&t(17, 30)), "17:30 + 45 min runs past close");
    assert_eq!(result.len(), 14);
}

#[test]
fn service_starts_avoid_bookings_inside_the_service() {
    let cal = calendar().with_booking(booking("b1", monday(), t(10, 0), t(10, 45), BookingStatus::Confirmed));
    let plain = slots(&cal, monday());
    let fitted = available_starts_for_service(&cal, monday(), 45, &SlotConfig::default()).unwrap();

    // 09:30 looks free at 30-minute granularity but a 45-minute service
    // would run into the 10:00 booking.
    assert!(plain.contains(&t(9, 30)));
    assert!(!fitted.contains(&t(9, 30)));
    assert!(fitted.contains(&t(9, 0)));
}

#[test]
fn service_starts_reject_non_positive_duration() {
    let err = available_starts_for_service(&calendar(), monday(), 0, &SlotConfig::default()).unwrap_err();
    assert!(err.is_invalid_input());
}
