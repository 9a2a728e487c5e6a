//! Everything the engine needs to know about one provider, loaded up front.
//!
//! The caller reads the provider's schedule rows and bookings from its store
//! and hands them over as a [`ProviderCalendar`]. Resolution, generation and
//! validation are pure functions of this value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::config::BookingSettings;
use crate::error::{EngineError, Result};
use crate::schedule::{ScheduleOverride, TimeOff, WeeklySchedule};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCalendar {
    pub provider_id: String,
    #[serde(default)]
    pub weekly: WeeklySchedule,
    #[serde(default)]
    pub overrides: Vec<ScheduleOverride>,
    #[serde(default)]
    pub time_off: Vec<TimeOff>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub booking_settings: BookingSettings,
}

impl ProviderCalendar {
    pub fn new(provider_id: impl Into<String>, weekly: WeeklySchedule) -> Self {
        Self {
            provider_id: provider_id.into(),
            weekly,
            ..Self::default()
        }
    }

    pub fn with_override(mut self, entry: ScheduleOverride) -> Self {
        self.overrides.push(entry);
        self
    }

    pub fn with_time_off(mut self, entry: TimeOff) -> Self {
        self.time_off.push(entry);
        self
    }

    pub fn with_booking(mut self, booking: Booking) -> Self {
        self.bookings.push(booking);
        self
    }

    pub fn override_for(&self, date: NaiveDate) -> Option<&ScheduleOverride> {
        self.overrides.iter().find(|o| o.date == date)
    }

    pub fn time_off_on(&self, date: NaiveDate) -> impl Iterator<Item = &TimeOff> {
        self.time_off.iter().filter(move |t| t.date == date)
    }

    /// Bookings on `date` that still occupy their interval.
    pub fn active_bookings_on(&self, date: NaiveDate) -> impl Iterator<Item = &Booking> {
        self.bookings
            .iter()
            .filter(move |b| b.date == date && b.is_active())
    }

    /// Check every invariant of the snapshot.
    ///
    /// Bookings belonging to a different provider are a loading mistake by
    /// the caller and are reported as invalid input.
    pub fn validate(&self) -> Result<()> {
        let id = self.provider_id.as_str();
        self.weekly.validate(id)?;

        for (i, o) in self.overrides.iter().enumerate() {
            if self.overrides[..i].iter().any(|prev| prev.date == o.date) {
                return Err(EngineError::duplicate_override(id, o.date));
            }
            o.schedule.validate(id)?;
        }

        for entry in &self.time_off {
            entry.validate(id)?;
        }

        for booking in &self.bookings {
            if booking.provider_id != self.provider_id {
                return Err(EngineError::InvalidInput(format!(
                    "booking {} belongs to provider {}, not {}",
                    booking.id, booking.provider_id, self.provider_id
                )));
            }
            booking.validate()?;
        }
        Ok(())
    }
}
