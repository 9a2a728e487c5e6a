//! Tunables for slot computation and per-provider booking rules.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Longest step allowed between candidate slots (half a day).
pub const MAX_GRANULARITY_MINUTES: u32 = 720;

/// How candidate slots are enumerated and how bookings block time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotConfig {
    /// Step between candidate slot starts, in minutes.
    pub granularity_minutes: u32,
    /// Extend each active booking by the day's buffer time.
    pub apply_buffer: bool,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 30,
            apply_buffer: true,
        }
    }
}

impl SlotConfig {
    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    pub fn without_buffer(mut self) -> Self {
        self.apply_buffer = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.granularity_minutes == 0 || self.granularity_minutes > MAX_GRANULARITY_MINUTES {
            return Err(EngineError::InvalidInput(format!(
                "slot granularity must be between 1 and {MAX_GRANULARITY_MINUTES} minutes, got {}",
                self.granularity_minutes
            )));
        }
        Ok(())
    }
}

/// Rules a provider sets on how customers may book them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingSettings {
    pub allow_online_booking: bool,
    /// How many days ahead a customer may book; unlimited when `None`.
    pub max_advance_booking: Option<u32>,
    /// Customers may cancel only more than this many hours before the start.
    pub cancellation_window: u32,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            allow_online_booking: true,
            max_advance_booking: None,
            cancellation_window: 24,
        }
    }
}
