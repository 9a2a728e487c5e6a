//! Error types for slot-engine operations.
//!
//! These cover caller contract violations only. Expected booking outcomes
//! (slot taken, outside hours, ...) are reported through
//! [`Verdict`](crate::validator::Verdict), never as errors.

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::booking::BookingStatus;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed request data (bad duration, reversed interval, unparseable time).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Schedule configuration that breaks a data-model invariant.
    #[error("Invalid schedule for provider {provider_id}: {message}")]
    InvalidSchedule {
        provider_id: String,
        message: String,
    },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown booking: {0}")]
    UnknownBooking(String),

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Booking store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// True for the 4xx-equivalent category: the caller sent something the
    /// engine cannot act on.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput(_)
                | EngineError::InvalidSchedule { .. }
                | EngineError::UnknownProvider(_)
                | EngineError::UnknownService(_)
                | EngineError::UnknownBooking(_)
                | EngineError::Json(_)
        )
    }

    pub(crate) fn schedule(provider_id: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidSchedule {
            provider_id: provider_id.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn duplicate_weekday(provider_id: &str, weekday: Weekday) -> Self {
        Self::schedule(provider_id, format!("more than one weekly entry for {weekday}"))
    }

    pub(crate) fn duplicate_override(provider_id: &str, date: NaiveDate) -> Self {
        Self::schedule(provider_id, format!("more than one override for {date}"))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
