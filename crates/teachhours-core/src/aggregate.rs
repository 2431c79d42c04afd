//! Folding classified events into per-(code, category) hour totals.
//!
//! Each in-scope event goes through three independent checks: course code
//! extraction, category classification and duration. An event that fails any
//! of them is left out of the table and every failure is recorded as an
//! [`EventWarning`]; the fold always runs to the end of its input.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::{classify, Category};
use crate::code::{extract_code, CourseCode};
use crate::error::EventError;
use crate::event::RawEvent;

/// Aggregation key: course code plus category.
///
/// Codes are compared by exact, case-sensitive text equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeCategoryKey {
    pub code: String,
    pub category: Category,
}

impl CodeCategoryKey {
    pub fn new(code: impl Into<String>, category: Category) -> Self {
        Self {
            code: code.into(),
            category,
        }
    }
}

/// An event that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent {
    pub course: CourseCode,
    pub category: Category,
    /// Duration in hours, never negative.
    pub hours: f64,
}

/// A non-fatal problem with one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWarning {
    pub title: String,
    /// `None` for events without a start time.
    pub start: Option<DateTime<Utc>>,
    pub error: EventError,
}

/// Run every check on `event`.
///
/// # Errors
///
/// Returns all failures found, in the order code, category, duration.
pub fn classify_event(event: &RawEvent) -> Result<ClassifiedEvent, Vec<EventError>> {
    let course = extract_code(&event.description);
    let category = classify(&event.title);
    let hours = event.duration_hours();

    match (course, category, hours) {
        (Ok(course), Ok(category), Ok(hours)) => Ok(ClassifiedEvent {
            course,
            category,
            hours,
        }),
        (course, category, hours) => Err([course.err(), category.err(), hours.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}

/// Accumulated hours per (code, category), in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationTable {
    entries: IndexMap<CodeCategoryKey, f64>,
    names: IndexMap<String, Option<String>>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `hours` to the entry for (`course.code`, `category`).
    ///
    /// The first non-empty display name seen for a code is kept.
    pub fn add(&mut self, course: &CourseCode, category: Category, hours: f64) {
        let name = self.names.entry(course.code.clone()).or_insert(None);
        if name.is_none() {
            name.clone_from(&course.name);
        }
        *self
            .entries
            .entry(CodeCategoryKey::new(course.code.clone(), category))
            .or_insert(0.0) += hours;
    }

    /// Hours recorded for `code` in `category` (zero when absent).
    pub fn hours(&self, code: &str, category: Category) -> f64 {
        self.entries
            .get(&CodeCategoryKey::new(code, category))
            .copied()
            .unwrap_or(0.0)
    }

    /// Entries in first-seen key order.
    pub fn entries(&self) -> impl Iterator<Item = (&CodeCategoryKey, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Distinct codes in first-seen order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Display name captured for `code`, if any.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).and_then(|n| n.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum `other` into `self` key by key.
    pub fn merge(&mut self, other: &AggregationTable) {
        for (key, hours) in other.entries() {
            let course = CourseCode {
                code: key.code.clone(),
                name: other.name(&key.code).map(str::to_string),
            };
            self.add(&course, key.category, hours);
        }
    }
}

/// Result of one fold over in-scope events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub table: AggregationTable,
    pub warnings: Vec<EventWarning>,
}

impl Aggregation {
    /// Combine two aggregations: tables are summed, warnings concatenated.
    pub fn merge(mut self, other: Aggregation) -> Self {
        self.table.merge(&other.table);
        self.warnings.extend(other.warnings);
        self
    }
}

/// Fold `events` into an [`Aggregation`].
pub fn aggregate<'a, I>(events: I) -> Aggregation
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    let mut aggregation = Aggregation::default();

    for event in events {
        match classify_event(event) {
            Ok(classified) => {
                tracing::debug!(
                    code = %classified.course.code,
                    category = %classified.category,
                    hours = classified.hours,
                    "classified event"
                );
                aggregation
                    .table
                    .add(&classified.course, classified.category, classified.hours);
            }
            Err(errors) => {
                for error in errors {
                    tracing::debug!(title = %event.title, %error, "event excluded");
                    aggregation.warnings.push(EventWarning {
                        title: event.title.clone(),
                        start: Some(event.start),
                        error,
                    });
                }
            }
        }
    }

    aggregation
}
