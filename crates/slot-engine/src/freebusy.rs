//! Busy/free view of one provider's day.
//!
//! Collects every blocked window inside the effective hours (break, partial
//! time off, active bookings), merges overlapping ones, and reports the gaps
//! between them as free windows. The provider dashboard sees why each block
//! is busy; the customer-facing view only sees that it is.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::ProviderCalendar;
use crate::config::SlotConfig;
use crate::error::Result;
use crate::interval::TimeWindow;
use crate::resolve::{resolve_day, EffectiveDay};
use crate::validator;

/// How much detail busy blocks carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Each busy block lists its causes.
    Detailed,
    /// Busy blocks carry no causes, so nothing about bookings or time off leaks.
    #[default]
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusyCause {
    Break,
    TimeOff,
    Booking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Empty when the view is [`Visibility::Opaque`].
    pub causes: Vec<BusyCause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub day: EffectiveDay,
    pub busy: Vec<BusyBlock>,
    pub free: Vec<FreeWindow>,
    pub visibility: Visibility,
}

/// Build the busy/free view of `calendar` on `date`.
///
/// A closed day has neither busy nor free windows.
pub fn day_view(
    calendar: &ProviderCalendar,
    date: NaiveDate,
    config: &SlotConfig,
    visibility: Visibility,
) -> Result<DayView> {
    config.validate()?;
    calendar.validate()?;

    let day = resolve_day(calendar, date);
    let (busy, free) = match &day {
        EffectiveDay::Closed { .. } => (Vec::new(), Vec::new()),
        EffectiveDay::Open(open) => {
            let buffer = validator::buffer_minutes(open, config);
            let mut blocks: Vec<(TimeWindow, BusyCause)> = Vec::new();
            blocks.extend(open.break_window.map(|w| (w, BusyCause::Break)));
            blocks.extend(open.time_off.iter().map(|w| (*w, BusyCause::TimeOff)));
            blocks.extend(
                calendar
                    .active_bookings_on(date)
                    .map(|b| (b.window().extended_by(buffer), BusyCause::Booking)),
            );

            let merged = merge_busy_periods(&blocks, open.hours);
            let free = find_free_windows(&merged, open.hours);
            let busy = merged
                .into_iter()
                .map(|(w, causes)| BusyBlock {
                    start: w.start,
                    end: w.end,
                    causes: match visibility {
                        Visibility::Detailed => causes.into_iter().collect(),
                        Visibility::Opaque => Vec::new(),
                    },
                })
                .collect();
            (busy, free)
        }
    };

    Ok(DayView {
        date,
        day,
        busy,
        free,
        visibility,
    })
}

/// Merge overlapping or adjacent busy windows, clipped to `hours`.
///
/// Returns a sorted, non-overlapping list with the union of causes per block.
fn merge_busy_periods(
    blocks: &[(TimeWindow, BusyCause)],
    hours: TimeWindow,
) -> Vec<(TimeWindow, BTreeSet<BusyCause>)> {
    let mut clipped: Vec<(TimeWindow, BusyCause)> = blocks
        .iter()
        .filter(|(w, _)| w.overlaps(&hours))
        .map(|(w, cause)| {
            (
                TimeWindow::new(w.start.max(hours.start), w.end.min(hours.end)),
                *cause,
            )
        })
        .collect();
    clipped.sort_by_key(|(w, _)| (w.start, w.end));

    let mut merged: Vec<(TimeWindow, BTreeSet<BusyCause>)> = Vec::new();
    for (w, cause) in clipped {
        if let Some((last, causes)) = merged.last_mut() {
            if w.start <= last.end {
                last.end = last.end.max(w.end);
                causes.insert(cause);
                continue;
            }
        }
        merged.push((w, BTreeSet::from([cause])));
    }
    merged
}

/// Gaps between merged busy windows inside `hours`.
fn find_free_windows(merged: &[(TimeWindow, BTreeSet<BusyCause>)], hours: TimeWindow) -> Vec<FreeWindow> {
    let mut free = Vec::new();
    let mut cursor = hours.start;

    for (busy, _) in merged {
        if cursor < busy.start {
            free.push(FreeWindow {
                start: cursor,
                end: busy.start,
                duration_minutes: (busy.start - cursor).num_minutes(),
            });
        }
        cursor = cursor.max(busy.end);
    }

    if cursor < hours.end {
        free.push(FreeWindow {
            start: cursor,
            end: hours.end,
            duration_minutes: (hours.end - cursor).num_minutes(),
        });
    }
    free
}

/// First free window of at least `min_minutes` on `date`, if any.
pub fn first_free_window(
    calendar: &ProviderCalendar,
    date: NaiveDate,
    config: &SlotConfig,
    min_minutes: i64,
) -> Result<Option<FreeWindow>> {
    let view = day_view(calendar, date, config, Visibility::Opaque)?;
    Ok(view.free.into_iter().find(|w| w.duration_minutes >= min_minutes))
}
