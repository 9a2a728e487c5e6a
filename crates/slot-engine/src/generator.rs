//! Availability generation: the bookable slot starts of one provider on one date.
//!
//! Slots are enumerated at a fixed granularity without knowing which service
//! the customer will pick. The result is a hint for rendering choices; the
//! booking itself is decided by [`validate_booking`](crate::validate_booking).

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::calendar::ProviderCalendar;
use crate::config::SlotConfig;
use crate::error::Result;
use crate::interval::TimeWindow;
use crate::resolve::{resolve_day, EffectiveDay, OpenDay};
use crate::validator::{self, Verdict};

/// Generate the ordered, duplicate-free slot starts for `calendar` on `date`.
///
/// A candidate start `t` walks from opening time in `granularity` steps while
/// `t` is before closing time. It is dropped when `[t, t + granularity)`
/// overlaps the break, a partial time-off window, or an active booking. When
/// the config applies the day's buffer, the slot must also keep that many
/// minutes clear on either side of every active booking.
///
/// Closed days, full-day time off and missing schedules all yield an empty
/// list.
///
/// # Errors
/// Returns an error only when the config or the calendar snapshot is invalid.
pub fn generate_slots(
    calendar: &ProviderCalendar,
    date: NaiveDate,
    config: &SlotConfig,
) -> Result<Vec<NaiveTime>> {
    config.validate()?;
    calendar.validate()?;

    let day = match resolve_day(calendar, date) {
        EffectiveDay::Open(day) => day,
        EffectiveDay::Closed { .. } => return Ok(Vec::new()),
    };

    let blocked = blocked_windows(&day);
    let booked: Vec<TimeWindow> = calendar.active_bookings_on(date).map(|b| b.window()).collect();
    let buffer = validator::buffer_minutes(&day, config);
    let step = i64::from(config.granularity_minutes);

    let slots: Vec<NaiveTime> = candidate_starts(&day, step)
        .filter(|slot| !blocked.iter().any(|b| slot.overlaps(b)))
        .filter(|slot| !booked.iter().any(|b| validator::collides(*slot, *b, buffer)))
        .map(|slot| slot.start.time())
        .collect();

    tracing::debug!(
        provider_id = %calendar.provider_id,
        %date,
        granularity = step,
        count = slots.len(),
        "generated slots"
    );
    Ok(slots)
}

/// Slot starts at which a service of `duration_minutes` fits entirely.
///
/// This is [`generate_slots`] narrowed by the booking gate, so every start it
/// returns would be accepted by [`validate_booking`](crate::validate_booking)
/// against the same snapshot.
pub fn available_starts_for_service(
    calendar: &ProviderCalendar,
    date: NaiveDate,
    duration_minutes: i64,
    config: &SlotConfig,
) -> Result<Vec<NaiveTime>> {
    validator::check_duration(duration_minutes)?;
    let slots = generate_slots(calendar, date, config)?;

    let day = match resolve_day(calendar, date) {
        EffectiveDay::Open(day) => day,
        EffectiveDay::Closed { .. } => return Ok(Vec::new()),
    };

    Ok(slots
        .into_iter()
        .filter(|start| {
            let candidate = TimeWindow::starting_at(date.and_time(*start), duration_minutes);
            matches!(
                validator::evaluate(&day, calendar.active_bookings_on(date), candidate, config),
                Verdict::Accepted(_)
            )
        })
        .collect())
}

/// Fixed-width slot windows from opening time while the start is before close.
fn candidate_starts(day: &OpenDay, step_minutes: i64) -> impl Iterator<Item = TimeWindow> + '_ {
    let step = Duration::minutes(step_minutes);
    std::iter::successors(Some(day.opens_at()), move |t| Some(*t + step))
        .take_while(move |t| *t < day.closes_at())
        .map(move |t| TimeWindow::starting_at(t, step_minutes))
}

/// Break and partial time-off windows on `day`.
fn blocked_windows(day: &OpenDay) -> Vec<TimeWindow> {
    let mut blocked: Vec<TimeWindow> = day.break_window.into_iter().collect();
    blocked.extend(day.time_off.iter().copied());
    blocked
}
