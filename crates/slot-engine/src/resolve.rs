//! Effective-schedule resolution for a single date.
//!
//! Precedence, first match wins:
//!
//! 1. full-day time off: closed
//! 2. an override for the date: its schedule verbatim, open or closed
//! 3. the weekly entry for the weekday: closed if missing or switched off
//! 4. otherwise open per the weekly entry
//!
//! Partial time off never closes the day; it is carried on the open day as
//! blocked windows. Override and template are never blended.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::ProviderCalendar;
use crate::interval::TimeWindow;
use crate::schedule::DaySchedule;

/// Why a date has no availability at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClosedReason {
    TimeOff,
    OverrideClosed,
    WeeklyClosed,
    NoSchedule,
}

/// Which configuration produced an open day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleSource {
    Weekly,
    Override,
}

/// Working hours for one concrete date after all exceptions are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDay {
    pub date: NaiveDate,
    pub hours: TimeWindow,
    pub break_window: Option<TimeWindow>,
    pub time_off: Vec<TimeWindow>,
    pub buffer_minutes: u32,
    pub source: ScheduleSource,
}

impl OpenDay {
    pub fn opens_at(&self) -> NaiveDateTime {
        self.hours.start
    }

    pub fn closes_at(&self) -> NaiveDateTime {
        self.hours.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum EffectiveDay {
    Closed { reason: ClosedReason },
    Open(OpenDay),
}

impl EffectiveDay {
    pub fn open_day(&self) -> Option<&OpenDay> {
        match self {
            EffectiveDay::Open(day) => Some(day),
            EffectiveDay::Closed { .. } => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, EffectiveDay::Open(_))
    }
}

/// Resolve the effective schedule of `calendar` on `date`.
///
/// The calendar is assumed valid; see [`ProviderCalendar::validate`].
pub fn resolve_day(calendar: &ProviderCalendar, date: NaiveDate) -> EffectiveDay {
    if calendar.time_off_on(date).any(|t| t.is_full_day()) {
        return closed(calendar, date, ClosedReason::TimeOff);
    }

    let (schedule, source) = match calendar.override_for(date) {
        Some(o) => (&o.schedule, ScheduleSource::Override),
        None => match calendar.weekly.get(date.weekday()) {
            Some(s) => (s, ScheduleSource::Weekly),
            None => return closed(calendar, date, ClosedReason::NoSchedule),
        },
    };

    match open_day(calendar, date, schedule, source) {
        Some(day) => {
            tracing::debug!(
                provider_id = %calendar.provider_id,
                %date,
                source = ?day.source,
                opens = %day.hours.start.time(),
                closes = %day.hours.end.time(),
                "resolved open day"
            );
            EffectiveDay::Open(day)
        }
        None => {
            let reason = match source {
                ScheduleSource::Override => ClosedReason::OverrideClosed,
                ScheduleSource::Weekly => ClosedReason::WeeklyClosed,
            };
            closed(calendar, date, reason)
        }
    }
}

fn closed(calendar: &ProviderCalendar, date: NaiveDate, reason: ClosedReason) -> EffectiveDay {
    tracing::debug!(provider_id = %calendar.provider_id, %date, ?reason, "day closed");
    EffectiveDay::Closed { reason }
}

fn open_day(
    calendar: &ProviderCalendar,
    date: NaiveDate,
    schedule: &DaySchedule,
    source: ScheduleSource,
) -> Option<OpenDay> {
    let (start, end) = schedule.hours()?;
    let break_window = schedule
        .break_window()
        .map(|(bs, be)| TimeWindow::on(date, bs, be));
    let time_off = calendar
        .time_off_on(date)
        .filter_map(|t| t.window())
        .collect();

    Some(OpenDay {
        date,
        hours: TimeWindow::on(date, start, end),
        break_window,
        time_off,
        buffer_minutes: schedule.buffer_time,
        source,
    })
}
