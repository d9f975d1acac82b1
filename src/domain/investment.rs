//! Fixed-term investments held by the core service.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::money::Btc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Investment {
    pub amount: Btc,
    /// Term length in days.
    pub duration_days: u64,
    pub start_time: DateTime<Utc>,
    pub expected_return: Option<Btc>,
}

impl Investment {
    #[must_use]
    pub fn matures_at(&self) -> DateTime<Utc> {
        let days = i64::try_from(self.duration_days).unwrap_or(i64::MAX);
        self.start_time
            .checked_add_signed(chrono::Duration::try_days(days).unwrap_or(chrono::Duration::MAX))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
