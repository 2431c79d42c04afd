//! Core error types for teachhours-core.
//!
//! Two layers of errors live here:
//! - [`EventError`]: per-event problems found while classifying a calendar
//!   event. These never abort a run; they are collected as warnings.
//! - [`CoreError`]: run-level failures (configuration, calendar source,
//!   output encoding) that stop a command.

use crate::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for teachhours-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar source errors
    #[error("Calendar source error: {0}")]
    Source(#[from] SourceError),

    /// Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while obtaining calendar events.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed or returned a non-success status
    #[error("Failed to fetch calendar from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Local calendar file could not be read
    #[error("Failed to read calendar file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid iCalendar data
    #[error("Failed to parse calendar: {0}")]
    Parse(String),

    /// The calendar contained no events at all
    #[error("Calendar contains no events")]
    Empty,

    /// No calendar location was given on the command line, in the
    /// environment or in the configuration file
    #[error("No calendar location configured (set ICAL or source.ical_url)")]
    NotConfigured,

    /// The async runtime used for fetching could not be created
    #[error("Failed to create runtime: {0}")]
    Runtime(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Why a single calendar event was left out of the aggregation.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventError {
    /// Line five of the description does not carry a course code
    #[error("Could not extract course code")]
    MissingCode,

    /// Title contains none of the category markers
    #[error("No category (TP/TD/CM) found")]
    MissingCategory,

    /// Title contains more than one distinct category marker
    #[error("Multiple categories ({}) found", join_markers(.markers))]
    AmbiguousCategory { markers: Vec<Category> },

    /// VEVENT has no `DTSTART`, so it can't be placed in time
    #[error("Event has no start time")]
    MissingStart,

    /// End timestamp lies before the start timestamp
    #[error("Event ends ({end}) before it starts ({start})")]
    MalformedEvent {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

fn join_markers(markers: &[Category]) -> String {
    markers
        .iter()
        .map(|c| c.marker())
        .collect::<Vec<_>>()
        .join("/")
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
