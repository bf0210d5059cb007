//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: u64) -> Self {
        let dt = DateTime::<Utc>::from_timestamp(secs as i64, 0).unwrap_or_default();
        Self(dt)
    }

    /// Calendar date in `YYYY-MM-DD` form, as printed on reports.
    pub fn date_label(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Wall-clock time in `HH:MM` form, as shown next to chat turns.
    pub fn time_label(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
