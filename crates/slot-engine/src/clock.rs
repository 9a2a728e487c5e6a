//! Wall-clock time parsing and the `"HH:MM"` wire format.
//!
//! Schedule and booking records store times of day as `"HH:MM"` strings.
//! Seconds (`"HH:MM:SS"`) are accepted on input and dropped, so every time
//! the engine holds survives a round trip through `"HH:MM"`.
//! For optional fields an empty string means "not set", which is how the
//! schedule editor stores a day without a break.

use chrono::{NaiveTime, Timelike};

use crate::error::{EngineError, Result};

/// Parse `"HH:MM"` or `"HH:MM:SS"` into a [`NaiveTime`] on a whole minute.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
        .and_then(|t| t.with_second(0))
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid time of day '{s}'")))
}

/// True when `t` has no seconds or fractions, i.e. `"HH:MM"` represents it exactly.
pub fn is_whole_minute(t: NaiveTime) -> bool {
    t.second() == 0 && t.nanosecond() == 0
}

/// Format a time of day as `"HH:MM"`.
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Serde adapter for required `"HH:MM"` fields.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional `"HH:MM"` fields. `null`, a missing field and
/// `""` all read as `None`.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&super::format_time(*t)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_time(&raw).map(Some).map_err(de::Error::custom),
        }
    }
}
