//! Half-open interval primitive shared by every conflict decision.
//!
//! Intervals are `[start, end)`. Two intervals that merely touch
//! (`a.end == b.start`) do not overlap: a booking ending at 10:00 leaves
//! 10:00 free for the next one.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// True when `[a_start, a_end)` and `[b_start, b_end)` share at least one instant.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// A concrete `[start, end)` window on the provider's local timeline.
///
/// Windows are anchored to a date so that arithmetic near midnight never
/// wraps: a 45-minute service starting at 23:30 ends on the next day rather
/// than at 00:15 of the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Window between two wall-clock times on `date`.
    pub fn on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: date.and_time(start),
            end: date.and_time(end),
        }
    }

    /// Window of `minutes` length starting at `start`.
    pub fn starting_at(start: NaiveDateTime, minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// True when `other` lies entirely within this window.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Minutes shared with `other`, zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeWindow) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        (self.end.min(other.end) - self.start.max(other.start)).num_minutes()
    }

    /// The same window with its end pushed out by `minutes`.
    pub fn extended_by(&self, minutes: i64) -> Self {
        Self {
            start: self.start,
            end: self.end + Duration::minutes(minutes),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
