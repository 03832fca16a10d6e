//! Canonical UTC calendar-day key.
//!
//! The day key is the granularity of the daily-submission limit. It is always
//! derived from the timestamp recorded on the inserted row, never from a
//! separately sampled "now", so the duplicate check and the stored row cannot
//! disagree about which day a thought belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC calendar-day string in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayKey(String);

impl DayKey {
    /// Derive the day key for an instant, using the UTC calendar.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use thought_backend::domain::DayKey;
    ///
    /// let ts = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
    /// assert_eq!(DayKey::from_timestamp(ts).as_str(), "2024-03-09");
    /// ```
    pub fn from_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp.format("%Y-%m-%d").to_string())
    }

    /// The key as a string slice, suitable for the claim table column.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the key, yielding the owned column value.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
