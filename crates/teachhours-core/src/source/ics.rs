//! ICS/iCalendar parsing into [`RawEvent`]s.
//!
//! Uses the `ical` crate for line unfolding and component structure, then
//! reads the handful of VEVENT properties the aggregation needs:
//! `SUMMARY`, `DESCRIPTION`, `DTSTART` and `DTEND`.
//!
//! Date-time handling:
//! - `20240916T080000Z` is taken as UTC
//! - `TZID=` times are resolved in that IANA zone; unknown zone names fall
//!   back to UTC
//! - floating times (no `Z`, no `TZID`) are taken as UTC
//! - `VALUE=DATE` values (`20240916`) make the event all-day
//! - a missing `DTEND` gives a zero-length event
//! - a missing `DTSTART` leaves the event undated

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;

use crate::error::SourceError;
use crate::event::RawEvent;

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Events read from one ICS document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
    /// Events with a start time, in file order.
    pub events: Vec<RawEvent>,
    /// Titles of VEVENTs without `DTSTART`.
    pub undated: Vec<String>,
}

impl Calendar {
    /// Number of VEVENTs read, dated or not.
    pub fn len(&self) -> usize {
        self.events.len() + self.undated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A DTSTART/DTEND value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum IcsTime {
    DateTime(DateTime<Utc>),
    Date(DateTime<Utc>),
}

impl IcsTime {
    fn instant(self) -> DateTime<Utc> {
        match self {
            IcsTime::DateTime(t) | IcsTime::Date(t) => t,
        }
    }

    fn is_date(self) -> bool {
        matches!(self, IcsTime::Date(_))
    }
}

enum ParsedEvent {
    Dated(RawEvent),
    Undated { title: String },
}

/// Parse ICS text and return its events in file order.
///
/// # Errors
///
/// - [`SourceError::Parse`] if the text is not valid iCalendar data
/// - [`SourceError::Empty`] if no usable VEVENT is found
pub fn parse_ics(content: &str) -> Result<Calendar, SourceError> {
    let reader = ical::IcalParser::new(content.as_bytes());
    let mut calendar = Calendar::default();

    for calendar_result in reader {
        let parsed =
            calendar_result.map_err(|e| SourceError::Parse(format!("ICS parse error: {e}")))?;

        for event in &parsed.events {
            match parse_event(event) {
                Ok(ParsedEvent::Dated(raw)) => calendar.events.push(raw),
                Ok(ParsedEvent::Undated { title }) => {
                    tracing::warn!(%title, "calendar event has no DTSTART");
                    calendar.undated.push(title);
                }
                Err(reason) => tracing::warn!(%reason, "dropping calendar event"),
            }
        }
    }

    if calendar.is_empty() {
        return Err(SourceError::Empty);
    }

    tracing::debug!(
        count = calendar.events.len(),
        undated = calendar.undated.len(),
        "parsed calendar events"
    );
    Ok(calendar)
}

/// Convert one VEVENT.
fn parse_event(event: &IcalEvent) -> Result<ParsedEvent, String> {
    let mut title = String::new();
    let mut description = String::new();
    let mut start = None;
    let mut end = None;

    for property in &event.properties {
        match property.name.as_str() {
            "SUMMARY" => {
                title = unescape_text(property.value.as_deref().unwrap_or_default());
            }
            "DESCRIPTION" => {
                description = unescape_text(property.value.as_deref().unwrap_or_default());
            }
            "DTSTART" => start = Some(parse_time(property)?),
            "DTEND" => end = Some(parse_time(property)?),
            _ => {}
        }
    }

    let Some(start) = start else {
        return Ok(ParsedEvent::Undated { title });
    };
    let end = end.unwrap_or(start);

    let mut raw = RawEvent::new(start.instant(), end.instant(), title, description);
    if start.is_date() {
        raw = raw.all_day();
    }
    Ok(ParsedEvent::Dated(raw))
}

fn parse_time(property: &Property) -> Result<IcsTime, String> {
    let value = property
        .value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| format!("{} has no value", property.name))?;

    if let Some(stripped) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(stripped, DATE_TIME_FORMAT)
            .map_err(|e| format!("invalid {} '{value}': {e}", property.name))?;
        return Ok(IcsTime::DateTime(naive.and_utc()));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT) {
        let utc = match param(property, "TZID") {
            Some(tzid) => zoned_to_utc(naive, tzid),
            None => naive.and_utc(),
        };
        return Ok(IcsTime::DateTime(utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|e| format!("invalid {} '{value}': {e}", property.name))?;
    Ok(IcsTime::Date(date.and_time(chrono::NaiveTime::MIN).and_utc()))
}

fn param<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

/// Resolve a wall-clock time given with `TZID=` to UTC.
fn zoned_to_utc(naive: NaiveDateTime, tzid: &str) -> DateTime<Utc> {
    let tzid = tzid.trim_matches('"');
    let Ok(tz) = tzid.parse::<Tz>() else {
        tracing::warn!(tzid, "unknown time zone, reading time as UTC");
        return naive.and_utc();
    };

    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Wall-clock time skipped by a DST jump
        None => {
            let offset = tz.offset_from_utc_datetime(&naive).fix();
            (naive - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
        }
    }
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\N`, `\,`, `\;`, `\\`).
pub fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
