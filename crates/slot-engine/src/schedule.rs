//! Provider schedule configuration: the weekly template, per-date overrides
//! and time off.
//!
//! These are plain records loaded by the caller. Nothing here consults the
//! clock or a store; [`ProviderCalendar`](crate::calendar::ProviderCalendar)
//! bundles them with the bookings for resolution.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::{hhmm, hhmm_opt, is_whole_minute};
use crate::error::{EngineError, Result};
use crate::interval::TimeWindow;

/// Opening hours for one day, as configured in the weekly template or an
/// override.
///
/// When `is_open` is false the remaining fields are ignored, which lets a
/// closed day keep the hours it had before it was switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub is_open: bool,
    #[serde(default, with = "hhmm_opt")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub break_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub break_end: Option<NaiveTime>,
    /// Minutes kept free before and after each appointment.
    #[serde(default)]
    pub buffer_time: u32,
}

impl DaySchedule {
    pub fn open(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            is_open: true,
            start: Some(start),
            end: Some(end),
            break_start: None,
            break_end: None,
            buffer_time: 0,
        }
    }

    pub fn closed() -> Self {
        Self {
            is_open: false,
            start: None,
            end: None,
            break_start: None,
            break_end: None,
            buffer_time: 0,
        }
    }

    pub fn with_break(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_time = minutes;
        self
    }

    /// Open and close times, or `None` for a closed day.
    pub fn hours(&self) -> Option<(NaiveTime, NaiveTime)> {
        if !self.is_open {
            return None;
        }
        Some((self.start?, self.end?))
    }

    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((self.break_start?, self.break_end?))
    }

    /// Check the ordering invariants of an open day.
    pub fn validate(&self, provider_id: &str) -> Result<()> {
        if !self.is_open {
            return Ok(());
        }
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(EngineError::schedule(
                    provider_id,
                    "open day needs both start and end",
                ))
            }
        };
        let times = [Some(start), Some(end), self.break_start, self.break_end];
        if let Some(t) = times.into_iter().flatten().find(|t| !is_whole_minute(*t)) {
            return Err(EngineError::schedule(
                provider_id,
                format!("{t} is not on a whole minute"),
            ));
        }
        if start >= end {
            return Err(EngineError::schedule(
                provider_id,
                format!("opening time {start} is not before closing time {end}"),
            ));
        }
        match (self.break_start, self.break_end) {
            (None, None) => Ok(()),
            (Some(bs), Some(be)) => {
                if start <= bs && bs < be && be <= end {
                    Ok(())
                } else {
                    Err(EngineError::schedule(
                        provider_id,
                        format!("break {bs}-{be} must be ordered and within {start}-{end}"),
                    ))
                }
            }
            _ => Err(EngineError::schedule(
                provider_id,
                "break needs both start and end",
            )),
        }
    }
}

/// One row of the weekly template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub day_of_week: Weekday,
    #[serde(flatten)]
    pub schedule: DaySchedule,
}

/// The provider's recurring week. At most one entry per weekday; a weekday
/// without an entry is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    entries: Vec<WeeklyEntry>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`WeeklySchedule::set`].
    pub fn with(mut self, weekday: Weekday, schedule: DaySchedule) -> Self {
        self.set(weekday, schedule);
        self
    }

    /// Insert or replace the entry for `weekday`.
    pub fn set(&mut self, weekday: Weekday, schedule: DaySchedule) {
        match self.entries.iter_mut().find(|e| e.day_of_week == weekday) {
            Some(entry) => entry.schedule = schedule,
            None => self.entries.push(WeeklyEntry {
                day_of_week: weekday,
                schedule,
            }),
        }
    }

    pub fn get(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.entries
            .iter()
            .find(|e| e.day_of_week == weekday)
            .map(|e| &e.schedule)
    }

    pub fn entries(&self) -> &[WeeklyEntry] {
        &self.entries
    }

    pub fn validate(&self, provider_id: &str) -> Result<()> {
        let mut seen = [false; 7];
        for entry in &self.entries {
            let idx = entry.day_of_week.num_days_from_monday() as usize;
            if seen[idx] {
                return Err(EngineError::duplicate_weekday(provider_id, entry.day_of_week));
            }
            seen[idx] = true;
            entry.schedule.validate(provider_id)?;
        }
        Ok(())
    }
}

/// A date on which the weekly template is replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverride {
    pub date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    pub schedule: DaySchedule,
}

/// Whether time off covers the whole date or a window within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimeOffKind {
    FullDay,
    Partial {
        #[serde(with = "hhmm")]
        start: NaiveTime,
        #[serde(with = "hhmm")]
        end: NaiveTime,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOff {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: TimeOffKind,
    #[serde(default)]
    pub reason: String,
}

impl TimeOff {
    pub fn full_day(date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            date,
            kind: TimeOffKind::FullDay,
            reason: reason.into(),
        }
    }

    pub fn partial(
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            date,
            kind: TimeOffKind::Partial { start, end },
            reason: reason.into(),
        }
    }

    pub fn is_full_day(&self) -> bool {
        matches!(self.kind, TimeOffKind::FullDay)
    }

    /// The blocked window for a partial entry; `None` for a full day.
    pub fn window(&self) -> Option<TimeWindow> {
        match self.kind {
            TimeOffKind::FullDay => None,
            TimeOffKind::Partial { start, end } => Some(TimeWindow::on(self.date, start, end)),
        }
    }

    pub fn validate(&self, provider_id: &str) -> Result<()> {
        if let TimeOffKind::Partial { start, end } = self.kind {
            if !is_whole_minute(start) || !is_whole_minute(end) {
                return Err(EngineError::schedule(
                    provider_id,
                    format!("time off on {} must start and end on whole minutes", self.date),
                ));
            }
            if start >= end {
                return Err(EngineError::schedule(
                    provider_id,
                    format!("time off on {} runs backwards ({start}-{end})", self.date),
                ));
            }
        }
        Ok(())
    }
}
