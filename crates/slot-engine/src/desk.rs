//! The booking front desk: availability queries and the booking command.
//!
//! [`BookingDesk`] ties a shop's services and provider schedules to a
//! [`BookingStore`]. Queries read the store's current bookings; the booking
//! command applies the provider's booking settings and then hands the request
//! to the store's atomic check-and-insert.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::access::{authorize, Action, Role};
use crate::booking::{Booking, BookingStatus, Service};
use crate::calendar::ProviderCalendar;
use crate::clock::hhmm;
use crate::config::SlotConfig;
use crate::conflict::{find_double_bookings, DoubleBooking};
use crate::error::{EngineError, Result};
use crate::freebusy::{day_view, DayView, Visibility};
use crate::generator::{available_starts_for_service, generate_slots};
use crate::snapshot::ShopSnapshot;
use crate::store::{BookingOutcome, BookingStore, InMemoryBookingStore, NewBooking};
use crate::validator::{validate_booking, Rejection, Verdict};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub provider_id: String,
    pub service_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
}

pub struct BookingDesk<S: BookingStore = InMemoryBookingStore> {
    services: Vec<Service>,
    calendars: Vec<ProviderCalendar>,
    store: S,
    config: SlotConfig,
}

impl BookingDesk<InMemoryBookingStore> {
    /// Build a desk over an in-memory store seeded with the snapshot's bookings.
    pub fn from_snapshot(mut snapshot: ShopSnapshot) -> Result<Self> {
        snapshot.validate()?;
        let bookings = snapshot
            .providers
            .iter_mut()
            .flat_map(|p| std::mem::take(&mut p.bookings))
            .collect();
        Self::new(snapshot, InMemoryBookingStore::with_bookings(bookings))
    }
}

impl<S: BookingStore> BookingDesk<S> {
    /// Build a desk over `store`. Bookings embedded in `snapshot` are ignored;
    /// the store is the only source of bookings.
    pub fn new(snapshot: ShopSnapshot, store: S) -> Result<Self> {
        snapshot.validate()?;
        let calendars = snapshot
            .providers
            .into_iter()
            .map(|mut p| {
                p.bookings.clear();
                p
            })
            .collect();
        Ok(Self {
            services: snapshot.services,
            calendars,
            store,
            config: snapshot.config,
        })
    }

    pub fn with_config(mut self, config: SlotConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn service(&self, service_id: &str) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == service_id)
            .ok_or_else(|| EngineError::UnknownService(service_id.to_string()))
    }

    fn schedule(&self, provider_id: &str) -> Result<&ProviderCalendar> {
        self.calendars
            .iter()
            .find(|c| c.provider_id == provider_id)
            .ok_or_else(|| EngineError::UnknownProvider(provider_id.to_string()))
    }

    /// The provider's schedule together with the store's bookings on `date`.
    pub fn calendar_on(&self, provider_id: &str, date: NaiveDate) -> Result<ProviderCalendar> {
        let mut calendar = self.schedule(provider_id)?.clone();
        calendar.bookings = self.store.bookings_on(provider_id, date)?;
        Ok(calendar)
    }

    /// Slot starts for `provider_id` on `date` at the configured granularity.
    pub fn availability(&self, provider_id: &str, date: NaiveDate) -> Result<Vec<NaiveTime>> {
        let calendar = self.calendar_on(provider_id, date)?;
        generate_slots(&calendar, date, &self.config)
    }

    /// Slot starts at which `service_id` fits entirely.
    pub fn availability_for_service(
        &self,
        provider_id: &str,
        date: NaiveDate,
        service_id: &str,
    ) -> Result<Vec<NaiveTime>> {
        let duration = i64::from(self.service(service_id)?.duration);
        let calendar = self.calendar_on(provider_id, date)?;
        available_starts_for_service(&calendar, date, duration, &self.config)
    }

    pub fn day_view(&self, provider_id: &str, date: NaiveDate, visibility: Visibility) -> Result<DayView> {
        let calendar = self.calendar_on(provider_id, date)?;
        day_view(&calendar, date, &self.config, visibility)
    }

    /// Run the booking gate without writing anything.
    pub fn check(&self, request: &BookingRequest) -> Result<Verdict> {
        let duration = i64::from(self.service(&request.service_id)?.duration);
        let calendar = self.calendar_on(&request.provider_id, request.date)?;
        validate_booking(&calendar, request.date, request.start_time, duration, &self.config)
    }

    /// Book `request` if the provider's settings allow it and the slot is free.
    ///
    /// `now` is the provider's local wall-clock time, used for the "not in the
    /// past" and advance-booking rules.
    pub fn book(&self, request: &BookingRequest, now: NaiveDateTime) -> Result<BookingOutcome> {
        let schedule = self.schedule(&request.provider_id)?;
        let service = self.service(&request.service_id)?;

        if let Some(reason) = settings_rejection(schedule, request, now) {
            tracing::warn!(
                provider_id = %request.provider_id,
                date = %request.date,
                start = %request.start_time,
                %reason,
                "booking refused by provider settings"
            );
            return Ok(BookingOutcome::Rejected(reason));
        }

        let new_booking = NewBooking {
            service_id: service.id.clone(),
            customer_id: request.customer_id.clone(),
            date: request.date,
            start_time: request.start_time,
            duration_minutes: i64::from(service.duration),
            payment_status: service.initial_payment_status(),
            total_amount: service.price,
            deposit_amount: service.deposit_due(),
        };
        self.store.insert_if_free(schedule, new_booking, &self.config)
    }

    /// Cancel a booking on behalf of `role`.
    ///
    /// Customers must cancel before the provider's cancellation window opens;
    /// providers and admins may cancel at any time.
    pub fn cancel(&self, role: &Role, booking_id: &str, now: NaiveDateTime) -> Result<Booking> {
        let booking = self.store.get(booking_id)?;
        authorize(role, &Action::CancelBooking(&booking))?;

        if matches!(role, Role::Customer(_)) {
            let window = self.schedule(&booking.provider_id)?.booking_settings.cancellation_window;
            let starts_at = booking.date.and_time(booking.start_time);
            if starts_at - now < Duration::hours(i64::from(window)) {
                return Err(EngineError::Forbidden(format!(
                    "booking {booking_id} starts within {window} hours and can no longer be cancelled online"
                )));
            }
        }
        self.store.update_status(booking_id, BookingStatus::Cancelled)
    }

    /// Check in, complete or mark a no-show on behalf of `role`.
    pub fn update_status(&self, role: &Role, booking_id: &str, next: BookingStatus) -> Result<Booking> {
        let booking = self.store.get(booking_id)?;
        authorize(role, &Action::UpdateBookingStatus(&booking))?;
        self.store.update_status(booking_id, next)
    }

    /// Every overlapping pair of active bookings currently stored.
    pub fn audit(&self) -> Result<Vec<DoubleBooking>> {
        Ok(find_double_bookings(&self.store.all()?))
    }

    /// Reassemble a snapshot with the store's bookings attached to their providers.
    pub fn snapshot(&self) -> Result<ShopSnapshot> {
        let bookings = self.store.all()?;
        let providers = self
            .calendars
            .iter()
            .map(|c| {
                let mut calendar = c.clone();
                calendar.bookings = bookings
                    .iter()
                    .filter(|b| b.provider_id == c.provider_id)
                    .cloned()
                    .collect();
                calendar
            })
            .collect();
        Ok(ShopSnapshot {
            config: self.config,
            services: self.services.clone(),
            providers,
        })
    }
}

fn settings_rejection(
    schedule: &ProviderCalendar,
    request: &BookingRequest,
    now: NaiveDateTime,
) -> Option<Rejection> {
    let settings = &schedule.booking_settings;
    if !settings.allow_online_booking {
        return Some(Rejection::BookingClosed);
    }
    if request.date.and_time(request.start_time) < now {
        return Some(Rejection::InPast);
    }
    if let Some(days) = settings.max_advance_booking {
        if request.date > now.date() + Duration::days(i64::from(days)) {
            return Some(Rejection::TooFarAhead);
        }
    }
    None
}
