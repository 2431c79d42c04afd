//! Calendar event as handed over by the event source.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Hours credited to an all-day event, whatever its span.
pub const ALL_DAY_HOURS: f64 = 24.0;

/// A parsed calendar event. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Event title (ICS `SUMMARY`).
    pub title: String,
    /// Free-text, multi-line description (ICS `DESCRIPTION`).
    pub description: String,
    /// True when the calendar gave DATE values rather than date-times.
    #[serde(default)]
    pub all_day: bool,
}

impl RawEvent {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            title: title.into(),
            description: description.into(),
            all_day: false,
        }
    }

    /// Mark the event as an all-day entry.
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Duration in hours.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MalformedEvent`] when `end` precedes `start`.
    pub fn duration_hours(&self) -> Result<f64, EventError> {
        if self.end < self.start {
            return Err(EventError::MalformedEvent {
                start: self.start,
                end: self.end,
            });
        }
        if self.all_day {
            return Ok(ALL_DAY_HOURS);
        }
        let seconds = (self.end - self.start).num_milliseconds() as f64 / 1000.0;
        Ok(seconds / 3600.0)
    }

    /// Instant at which the event counts as finished.
    ///
    /// All-day events run until the last second of their end date.
    pub fn effective_end(&self) -> DateTime<Utc> {
        if !self.all_day {
            return self.end;
        }
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        self.end.date_naive().and_time(last_second).and_utc()
    }
}
