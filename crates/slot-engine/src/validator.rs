//! The booking gate: decide whether a proposed appointment may be accepted.
//!
//! [`validate_booking`] is the only function that accepts a booking. It is
//! re-run at write time (see [`crate::store`]) even when the customer picked
//! the start from [`generate_slots`](crate::generator::generate_slots),
//! because the generator works at slot granularity and the service may be
//! longer than one slot.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::booking::Booking;
use crate::calendar::ProviderCalendar;
use crate::clock::is_whole_minute;
use crate::config::SlotConfig;
use crate::error::{EngineError, Result};
use crate::interval::TimeWindow;
use crate::resolve::{resolve_day, EffectiveDay, OpenDay};

/// Longest appointment the engine will consider, in minutes.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Why a booking request was turned down. These are ordinary outcomes, not
/// failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    #[error("requested time is outside the provider's working hours")]
    OutsideHours,

    #[error("requested time overlaps the provider's break")]
    OnBreak,

    #[error("provider is unavailable at the requested time")]
    ProviderUnavailable,

    #[error("requested time overlaps an existing booking")]
    SlotTaken,

    #[error("provider does not accept online bookings")]
    BookingClosed,

    #[error("requested time is in the past")]
    InPast,

    #[error("requested date is too far ahead")]
    TooFarAhead,
}

/// Outcome of a booking check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum Verdict {
    /// The interval the booking would occupy.
    Accepted(TimeWindow),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Verdict::Accepted(_) => None,
            Verdict::Rejected(r) => Some(*r),
        }
    }
}

/// Check whether `duration_minutes` starting at `start` on `date` can be booked
/// with the provider described by `calendar`.
///
/// Checks run from provider configuration to existing bookings: closed day,
/// working hours, break, partial time off, then active bookings. The first
/// failing check names the rejection.
///
/// # Errors
/// Returns [`EngineError::InvalidInput`] for a non-positive or oversized
/// duration or a start with seconds, and the calendar's own validation error if the snapshot breaks
/// an invariant.
pub fn validate_booking(
    calendar: &ProviderCalendar,
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: i64,
    config: &SlotConfig,
) -> Result<Verdict> {
    check_duration(duration_minutes)?;
    if !is_whole_minute(start) {
        return Err(EngineError::InvalidInput(format!(
            "start time {start} is not on a whole minute"
        )));
    }
    config.validate()?;
    calendar.validate()?;

    let candidate = TimeWindow::starting_at(date.and_time(start), duration_minutes);
    let verdict = match resolve_day(calendar, date) {
        EffectiveDay::Closed { .. } => Verdict::Rejected(Rejection::ProviderUnavailable),
        EffectiveDay::Open(day) => evaluate(&day, calendar.active_bookings_on(date), candidate, config),
    };

    tracing::debug!(
        provider_id = %calendar.provider_id,
        %date,
        %start,
        duration_minutes,
        ?verdict,
        "validated booking request"
    );
    Ok(verdict)
}

pub(crate) fn check_duration(duration_minutes: i64) -> Result<()> {
    if duration_minutes <= 0 || duration_minutes > MAX_DURATION_MINUTES {
        return Err(EngineError::InvalidInput(format!(
            "duration must be between 1 and {MAX_DURATION_MINUTES} minutes, got {duration_minutes}"
        )));
    }
    Ok(())
}

/// Run every check for `candidate` against an already-resolved open day.
pub(crate) fn evaluate<'a>(
    day: &OpenDay,
    bookings: impl IntoIterator<Item = &'a Booking>,
    candidate: TimeWindow,
    config: &SlotConfig,
) -> Verdict {
    if !day.hours.contains(&candidate) {
        return Verdict::Rejected(Rejection::OutsideHours);
    }
    if day.break_window.is_some_and(|b| candidate.overlaps(&b)) {
        return Verdict::Rejected(Rejection::OnBreak);
    }
    if day.time_off.iter().any(|t| candidate.overlaps(t)) {
        return Verdict::Rejected(Rejection::ProviderUnavailable);
    }

    let buffer = buffer_minutes(day, config);
    let taken = bookings
        .into_iter()
        .filter(|b| b.is_active())
        .any(|b| collides(candidate, b.window(), buffer));
    if taken {
        return Verdict::Rejected(Rejection::SlotTaken);
    }
    Verdict::Accepted(candidate)
}

/// Buffer applied around bookings on `day` under `config`.
pub(crate) fn buffer_minutes(day: &OpenDay, config: &SlotConfig) -> i64 {
    if config.apply_buffer {
        i64::from(day.buffer_minutes)
    } else {
        0
    }
}

/// Two bookings collide when they overlap or sit closer than `buffer`
/// minutes apart in either order.
pub(crate) fn collides(candidate: TimeWindow, existing: TimeWindow, buffer: i64) -> bool {
    candidate.overlaps(&existing.extended_by(buffer)) || candidate.extended_by(buffer).overlaps(&existing)
}
