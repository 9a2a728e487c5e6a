//! Bookings, their lifecycle, and the services they are made for.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::{hhmm, is_whole_minute};
use crate::error::{EngineError, Result};
use crate::interval::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its interval.
    ///
    /// Completed bookings are in the past; cancelled and no-show bookings
    /// release their slot.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::CheckedIn)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Confirmed, CheckedIn)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (CheckedIn, Completed)
                | (CheckedIn, Cancelled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    DepositPaid,
    Paid,
    Refunded,
}

/// A bookable service. Only `duration` matters to slot computation; the
/// money fields are copied onto each booking and decide its payment status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Length in minutes.
    pub duration: u32,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub deposit_required: bool,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
}

impl Service {
    /// Payment status a freshly confirmed booking of this service starts in.
    pub fn initial_payment_status(&self) -> PaymentStatus {
        if self.deposit_required {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Paid
        }
    }

    /// Deposit owed on a new booking, if the service asks for one.
    pub fn deposit_due(&self) -> Option<Decimal> {
        if self.deposit_required {
            self.deposit_amount
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub provider_id: String,
    pub service_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// Service price at the time of booking.
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
}

impl Booking {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::on(self.date, self.start_time, self.end_time)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn validate(&self) -> Result<()> {
        if !is_whole_minute(self.start_time) || !is_whole_minute(self.end_time) {
            return Err(EngineError::InvalidInput(format!(
                "booking {} times must be whole minutes",
                self.id
            )));
        }
        if self.start_time >= self.end_time {
            return Err(EngineError::InvalidInput(format!(
                "booking {} ends at {} which is not after its start {}",
                self.id, self.end_time, self.start_time
            )));
        }
        Ok(())
    }

    /// Move the booking to `next`, refusing transitions the lifecycle does
    /// not allow.
    pub fn transition(&mut self, next: BookingStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::info!(
            booking_id = %self.id,
            from = ?self.status,
            to = ?next,
            "booking status changed"
        );
        self.status = next;
        Ok(())
    }

    pub fn check_in(&mut self) -> Result<()> {
        self.transition(BookingStatus::CheckedIn)
    }

    pub fn complete(&mut self) -> Result<()> {
        self.transition(BookingStatus::Completed)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.transition(BookingStatus::Cancelled)
    }

    pub fn mark_no_show(&mut self) -> Result<()> {
        self.transition(BookingStatus::NoShow)
    }
}
