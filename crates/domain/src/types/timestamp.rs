//! Event date-times as the remote API writes them
//!
//! The remote API hands back timestamps with a UTC offset
//! (`2025-09-01T18:00:00-05:00`), while people usually type wall-clock values
//! without one (`2025-09-01T18:00:00`). `EventTimestamp` keeps whichever form it
//! was given so a value written back to the API looks the way it came in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EventForgeError, Result};

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A point in time attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTimestamp {
    /// Carries an explicit UTC offset
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock time with no offset
    Local(NaiveDateTime),
}

impl EventTimestamp {
    /// Wall-clock date-time, ignoring any offset.
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(dt) => dt.naive_local(),
            Self::Local(naive) => *naive,
        }
    }

    /// Calendar date on the event's own wall clock.
    pub fn calendar_date(&self) -> NaiveDate {
        self.wall_clock().date()
    }

    pub fn year(&self) -> i32 {
        self.calendar_date().year()
    }

    pub fn month(&self) -> u32 {
        self.calendar_date().month()
    }

    pub fn day(&self) -> u32 {
        self.calendar_date().day()
    }

    /// Elapsed time from `earlier` to `self`.
    ///
    /// Two zoned values are compared as instants; as soon as either side has no
    /// offset the wall clocks are compared instead.
    pub fn duration_since(&self, earlier: &Self) -> Duration {
        match (self, earlier) {
            (Self::Zoned(later), Self::Zoned(earlier)) => *later - *earlier,
            _ => self.wall_clock() - earlier.wall_clock(),
        }
    }

    /// Shift by `duration`, keeping the offset (or lack of one).
    ///
    /// # Errors
    /// Returns `EventForgeError::InvalidInput` when the result is out of range.
    pub fn checked_add(&self, duration: Duration) -> Result<Self> {
        let shifted = match self {
            Self::Zoned(dt) => dt.checked_add_signed(duration).map(Self::Zoned),
            Self::Local(naive) => naive.checked_add_signed(duration).map(Self::Local),
        };

        shifted.ok_or_else(|| {
            EventForgeError::InvalidInput(format!("timestamp {self} shifted by {duration} is out of range"))
        })
    }

    /// Sort key: the UTC instant for zoned values, the wall clock otherwise.
    pub fn ordering_key(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(dt) => dt.naive_utc(),
            Self::Local(naive) => *naive,
        }
    }

    /// Whether `self` is strictly later than `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self.duration_since(other) > Duration::zero()
    }
}

impl FromStr for EventTimestamp {
    type Err = EventForgeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::Zoned(dt));
        }

        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Ok(Self::Zoned(dt));
        }

        LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(Self::Local)
            .ok_or_else(|| EventForgeError::InvalidInput(format!("unrecognised date-time '{s}'")))
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zoned(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
            Self::Local(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl Serialize for EventTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
