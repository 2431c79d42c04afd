//! One processing pass: time filter, then aggregation.

use chrono::{DateTime, Utc};

use crate::aggregate::{aggregate, Aggregation, EventWarning};
use crate::error::EventError;
use crate::event::RawEvent;
use crate::filter::partition;
use crate::report::{Report, RowOrder};
use crate::source::Calendar;
use crate::weights::CategoryWeights;

/// Options for a run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Reference instant for `done_only`.
    pub now: DateTime<Utc>,
    /// Only count events that have already ended.
    pub done_only: bool,
}

impl RunOptions {
    /// Whole-term run: every event counts.
    pub fn all(now: DateTime<Utc>) -> Self {
        Self {
            now,
            done_only: false,
        }
    }

    /// Only events ended at or before `now`.
    pub fn done(now: DateTime<Utc>) -> Self {
        Self {
            now,
            done_only: true,
        }
    }
}

/// Everything produced by one run, before report structuring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub aggregation: Aggregation,
    /// In-scope events handed to the aggregator.
    pub processed: usize,
    /// Events excluded by the time filter.
    pub skipped_future: usize,
}

impl RunOutcome {
    pub fn report(&self, weights: &CategoryWeights, order: RowOrder) -> Report {
        Report::build(self, weights, order)
    }
}

/// Filter `events` by time, then aggregate what remains.
pub fn run(events: &[RawEvent], options: &RunOptions) -> RunOutcome {
    let part = partition(events, options.now, options.done_only);
    let processed = part.in_scope.len();
    let aggregation = aggregate(part.in_scope);

    tracing::info!(
        processed,
        skipped_future = part.skipped_future,
        warnings = aggregation.warnings.len(),
        "aggregation finished"
    );

    RunOutcome {
        aggregation,
        processed,
        skipped_future: part.skipped_future,
    }
}

/// [`run`] over a parsed calendar.
///
/// Undated events can't be checked against `now`, so they are always in
/// scope: each one counts as processed and yields a
/// [`EventError::MissingStart`] warning.
pub fn run_calendar(calendar: &Calendar, options: &RunOptions) -> RunOutcome {
    let mut outcome = run(&calendar.events, options);

    for title in &calendar.undated {
        outcome.processed += 1;
        outcome.aggregation.warnings.push(EventWarning {
            title: title.clone(),
            start: None,
            error: EventError::MissingStart,
        });
    }
    outcome
}
