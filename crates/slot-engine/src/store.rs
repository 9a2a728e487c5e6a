//! Booking persistence seam with atomic check-and-insert.
//!
//! Two customers looking at the same free slot may both submit it. A store
//! must re-run [`validate_booking`] against its latest committed bookings and
//! insert in the same atomic step, so that at most one of two overlapping
//! inserts succeeds. [`InMemoryBookingStore`] does this under a single lock;
//! a database-backed store would use a transaction or an exclusion
//! constraint.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus, PaymentStatus};
use crate::calendar::ProviderCalendar;
use crate::config::SlotConfig;
use crate::error::{EngineError, Result};
use crate::validator::{validate_booking, Rejection, Verdict};

/// A booking the caller wants to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub service_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub deposit_amount: Option<Decimal>,
}

/// Result of the booking command: the stored booking, or why it was refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum BookingOutcome {
    Accepted(Booking),
    Rejected(Rejection),
}

impl BookingOutcome {
    pub fn booking(&self) -> Option<&Booking> {
        match self {
            BookingOutcome::Accepted(b) => Some(b),
            BookingOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            BookingOutcome::Accepted(_) => None,
            BookingOutcome::Rejected(r) => Some(*r),
        }
    }
}

pub trait BookingStore: Send + Sync {
    /// All bookings of `provider_id` on `date`, in any status.
    fn bookings_on(&self, provider_id: &str, date: NaiveDate) -> Result<Vec<Booking>>;

    fn get(&self, booking_id: &str) -> Result<Booking>;

    fn all(&self) -> Result<Vec<Booking>>;

    /// Validate `request` against the latest stored bookings of the provider
    /// and insert it as `Confirmed` if accepted, atomically.
    ///
    /// `calendar` supplies the schedule configuration; its `bookings` field is
    /// ignored in favour of the store's own.
    fn insert_if_free(
        &self,
        calendar: &ProviderCalendar,
        request: NewBooking,
        config: &SlotConfig,
    ) -> Result<BookingOutcome>;

    /// Apply a lifecycle transition and return the updated booking.
    fn update_status(&self, booking_id: &str, next: BookingStatus) -> Result<Booking>;
}

#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Booking>>> {
        self.bookings
            .lock()
            .map_err(|_| EngineError::Store("booking store lock poisoned".to_string()))
    }
}

impl BookingStore for InMemoryBookingStore {
    fn bookings_on(&self, provider_id: &str, date: NaiveDate) -> Result<Vec<Booking>> {
        let bookings = self.lock()?;
        Ok(bookings
            .iter()
            .filter(|b| b.provider_id == provider_id && b.date == date)
            .cloned()
            .collect())
    }

    fn get(&self, booking_id: &str) -> Result<Booking> {
        let bookings = self.lock()?;
        bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownBooking(booking_id.to_string()))
    }

    fn all(&self) -> Result<Vec<Booking>> {
        Ok(self.lock()?.clone())
    }

    fn insert_if_free(
        &self,
        calendar: &ProviderCalendar,
        request: NewBooking,
        config: &SlotConfig,
    ) -> Result<BookingOutcome> {
        let mut bookings = self.lock()?;

        let mut snapshot = calendar.clone();
        snapshot.bookings = bookings
            .iter()
            .filter(|b| b.provider_id == calendar.provider_id && b.date == request.date)
            .cloned()
            .collect();

        let verdict = validate_booking(
            &snapshot,
            request.date,
            request.start_time,
            request.duration_minutes,
            config,
        )?;

        let window = match verdict {
            Verdict::Accepted(window) => window,
            Verdict::Rejected(reason) => {
                tracing::warn!(
                    provider_id = %calendar.provider_id,
                    date = %request.date,
                    start = %request.start_time,
                    %reason,
                    "booking rejected"
                );
                return Ok(BookingOutcome::Rejected(reason));
            }
        };

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            provider_id: calendar.provider_id.clone(),
            service_id: request.service_id,
            customer_id: request.customer_id,
            date: request.date,
            start_time: window.start.time(),
            end_time: window.end.time(),
            status: BookingStatus::Confirmed,
            payment_status: request.payment_status,
            total_amount: request.total_amount,
            deposit_amount: request.deposit_amount,
        };
        bookings.push(booking.clone());

        tracing::info!(
            booking_id = %booking.id,
            provider_id = %booking.provider_id,
            date = %booking.date,
            start = %booking.start_time,
            end = %booking.end_time,
            "booking confirmed"
        );
        Ok(BookingOutcome::Accepted(booking))
    }

    fn update_status(&self, booking_id: &str, next: BookingStatus) -> Result<Booking> {
        let mut bookings = self.lock()?;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| EngineError::UnknownBooking(booking_id.to_string()))?;
        booking.transition(next)?;
        Ok(booking.clone())
    }
}
