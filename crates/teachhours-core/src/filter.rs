//! Temporal scoping of events.

use chrono::{DateTime, Utc};

use crate::event::RawEvent;

/// Events split by the time filter.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    /// Events to aggregate, in input order.
    pub in_scope: Vec<&'a RawEvent>,
    /// Events left out because they end after `now`.
    pub skipped_future: usize,
}

/// Split `events` into in-scope and skipped-future events.
///
/// With `done_only` unset every event is in scope (expected total for the
/// whole term). With `done_only` set, only events whose end is at or before
/// `now` are kept. No ordering of `events` is assumed.
pub fn partition(events: &[RawEvent], now: DateTime<Utc>, done_only: bool) -> Partition<'_> {
    if !done_only {
        return Partition {
            in_scope: events.iter().collect(),
            skipped_future: 0,
        };
    }

    let (in_scope, future): (Vec<&RawEvent>, Vec<&RawEvent>) =
        events.iter().partition(|e| e.effective_end() <= now);

    Partition {
        in_scope,
        skipped_future: future.len(),
    }
}
