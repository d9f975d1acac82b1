//! Time remaining until a deadline, as shown next to pools and proposals.

use std::fmt;

use chrono::{DateTime, Utc};

/// Whole days and hours left before a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Open { days: i64, hours: i64 },
    Ended,
}

impl Remaining {
    /// Compute the remaining time from `now` until `deadline`.
    #[must_use]
    pub fn until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let left = deadline - now;
        if left <= chrono::Duration::zero() {
            return Self::Ended;
        }
        let hours_total = left.num_hours();
        Self::Open {
            days: hours_total / 24,
            hours: hours_total % 24,
        }
    }

    #[must_use]
    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ended => write!(f, "ended"),
            Self::Open { days, hours } if *days > 0 => write!(f, "{days}d {hours}h left"),
            Self::Open { hours, .. } => write!(f, "{hours}h left"),
        }
    }
}

/// Convert remote nanoseconds-since-epoch into a UTC timestamp.
///
/// Every `i64` maps to a timestamp; negative values fall before the epoch.
#[must_use]
pub fn from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

/// Convert a UTC timestamp into remote nanoseconds-since-epoch.
#[must_use]
pub fn to_nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}
