//! Who may do what.
//!
//! A single capability check used by the layer around the engine. The slot
//! generator and booking validator never look at roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "camelCase")]
pub enum Role {
    Admin,
    Provider(String),
    Customer(String),
}

/// Something a caller wants to do.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    ViewAvailability,
    /// Book an appointment for this customer.
    Book { customer_id: &'a str },
    /// Edit the weekly schedule, overrides or time off of this provider.
    ManageSchedule { provider_id: &'a str },
    /// Cancel this booking.
    CancelBooking(&'a Booking),
    /// Check in, complete or mark a no-show.
    UpdateBookingStatus(&'a Booking),
    ViewAllBookings,
}

/// Allow or refuse `action` for `role`.
///
/// Admins may do anything. Providers act on their own schedule and their
/// own bookings and may book walk-in customers. Customers view availability
/// and book or cancel for themselves.
pub fn authorize(role: &Role, action: &Action<'_>) -> Result<()> {
    let allowed = match (role, action) {
        (Role::Admin, _) => true,
        (_, Action::ViewAvailability) => true,

        (Role::Provider(_), Action::Book { .. }) => true,
        (Role::Provider(own), Action::ManageSchedule { provider_id }) => own == provider_id,
        (Role::Provider(own), Action::CancelBooking(b))
        | (Role::Provider(own), Action::UpdateBookingStatus(b)) => *own == b.provider_id,

        (Role::Customer(own), Action::Book { customer_id }) => own == customer_id,
        (Role::Customer(own), Action::CancelBooking(b)) => *own == b.customer_id,

        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(EngineError::Forbidden(format!("{role} may not {}", describe(action))))
    }
}

fn describe(action: &Action<'_>) -> String {
    match action {
        Action::ViewAvailability => "view availability".to_string(),
        Action::Book { customer_id } => format!("book for customer {customer_id}"),
        Action::ManageSchedule { provider_id } => format!("manage the schedule of {provider_id}"),
        Action::CancelBooking(b) => format!("cancel booking {}", b.id),
        Action::UpdateBookingStatus(b) => format!("update booking {}", b.id),
        Action::ViewAllBookings => "view all bookings".to_string(),
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Provider(id) => write!(f, "provider:{id}"),
            Role::Customer(id) => write!(f, "customer:{id}"),
        }
    }
}

impl FromStr for Role {
    type Err = EngineError;

    /// Parses `admin`, `provider:<id>` or `customer:<id>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            None if s.eq_ignore_ascii_case("admin") => Ok(Role::Admin),
            Some((kind, id)) if !id.is_empty() => match kind.to_ascii_lowercase().as_str() {
                "provider" => Ok(Role::Provider(id.to_string())),
                "customer" => Ok(Role::Customer(id.to_string())),
                _ => Err(EngineError::InvalidInput(format!("unknown role '{s}'"))),
            },
            _ => Err(EngineError::InvalidInput(format!("unknown role '{s}'"))),
        }
    }
}
