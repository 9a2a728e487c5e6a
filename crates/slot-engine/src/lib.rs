//! # slot-engine
//!
//! Appointment availability and double-booking prevention for a barbershop.
//!
//! The engine derives bookable slots for a provider on a given day from the
//! weekly schedule, breaks, buffer time, time off, per-date overrides and
//! existing bookings, and gates new bookings against the same data. It holds
//! no state of its own: callers load a [`ProviderCalendar`] and pass it in.
//!
//! ## Modules
//!
//! - [`interval`] — half-open `[start, end)` overlap primitive
//! - [`schedule`] — weekly template, overrides, time off
//! - [`booking`] — bookings, status lifecycle, services
//! - [`calendar`] — one provider's schedule and bookings as a snapshot
//! - [`resolve`] — effective schedule for a date (time off > override > weekly)
//! - [`generator`] — slot starts at fixed granularity
//! - [`validator`] — the booking gate
//! - [`conflict`] — double-booking audit
//! - [`freebusy`] — busy/free view of a day
//! - [`store`] — booking store with atomic check-and-insert
//! - [`desk`] — availability queries and the booking command
//! - [`access`] — role capability policy
//! - [`snapshot`] — serializable shop data
//! - [`config`] — slot and booking settings
//! - [`clock`] — `"HH:MM"` time format
//! - [`error`] — error types

pub mod access;
pub mod booking;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod desk;
pub mod error;
pub mod freebusy;
pub mod generator;
pub mod interval;
pub mod resolve;
pub mod schedule;
pub mod snapshot;
pub mod store;
pub mod validator;

pub use access::{authorize, Action, Role};
pub use booking::{Booking, BookingStatus, PaymentStatus, Service};
pub use calendar::ProviderCalendar;
pub use config::{BookingSettings, SlotConfig};
pub use conflict::{find_double_bookings, DoubleBooking};
pub use desk::{BookingDesk, BookingRequest};
pub use error::EngineError;
pub use freebusy::{day_view, DayView, Visibility};
pub use generator::{available_starts_for_service, generate_slots};
pub use interval::{overlaps, TimeWindow};
pub use resolve::{resolve_day, EffectiveDay};
pub use schedule::{DaySchedule, ScheduleOverride, TimeOff, TimeOffKind, WeeklySchedule};
pub use snapshot::ShopSnapshot;
pub use store::{BookingOutcome, BookingStore, InMemoryBookingStore, NewBooking};
pub use validator::{validate_booking, Rejection, Verdict};
