//! Event source: where calendar events come from.
//!
//! A calendar is either a local `.ics` file or an `http(s)://` URL (the usual
//! case: a timetable export link). The location is taken, in order of
//! precedence, from an explicit argument, the `ICAL` environment variable
//! (a `.env` file in the working directory is honored) or `source.ical_url`
//! in the configuration file.

mod ics;

pub use ics::{parse_ics, unescape_text, Calendar};

use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::SourceError;
use crate::storage::Config;

/// Environment variable holding the calendar URL.
pub const ICAL_ENV: &str = "ICAL";

/// Where to read the calendar from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarLocation {
    Url(Url),
    File(PathBuf),
}

impl CalendarLocation {
    /// Interpret `raw` as an http(s) URL, falling back to a file path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => CalendarLocation::Url(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(CalendarLocation::File)
                .unwrap_or_else(|_| CalendarLocation::File(PathBuf::from(raw))),
            _ => CalendarLocation::File(PathBuf::from(raw)),
        }
    }

    /// Pick the location from `explicit`, then `ICAL`, then the config file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotConfigured`] if none of them is set.
    pub fn resolve(explicit: Option<&str>, config: &Config) -> Result<Self, SourceError> {
        if let Some(raw) = explicit.filter(|s| !s.trim().is_empty()) {
            return Ok(Self::parse(raw.trim()));
        }

        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        if let Ok(raw) = std::env::var(ICAL_ENV) {
            if !raw.trim().is_empty() {
                return Ok(Self::parse(raw.trim()));
            }
        }

        config
            .source
            .ical_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| Self::parse(raw.trim()))
            .ok_or(SourceError::NotConfigured)
    }
}

impl fmt::Display for CalendarLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarLocation::Url(url) => write!(f, "{url}"),
            CalendarLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Download ICS text from `url`.
///
/// # Errors
///
/// Returns [`SourceError::Fetch`] on network failure or non-success status.
pub async fn fetch(url: &Url) -> Result<String, SourceError> {
    let wrap = |source| SourceError::Fetch {
        url: url.to_string(),
        source,
    };

    tracing::info!(%url, "fetching calendar");
    reqwest::Client::new()
        .get(url.clone())
        .send()
        .await
        .map_err(wrap)?
        .error_for_status()
        .map_err(wrap)?
        .text()
        .await
        .map_err(wrap)
}

/// Read the raw ICS text at `location`.
///
/// # Errors
///
/// Returns [`SourceError::Fetch`] or [`SourceError::Read`].
pub async fn read(location: &CalendarLocation) -> Result<String, SourceError> {
    match location {
        CalendarLocation::Url(url) => fetch(url).await,
        CalendarLocation::File(path) => {
            tracing::info!(path = %path.display(), "reading calendar file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SourceError::Read {
                    path: path.clone(),
                    source,
                })
        }
    }
}

/// Read and parse the calendar at `location`.
///
/// # Errors
///
/// Any [`SourceError`]: fetch/read failure, invalid ICS, or no events.
pub async fn load(location: &CalendarLocation) -> Result<Calendar, SourceError> {
    let content = read(location).await?;
    parse_ics(&content)
}

/// Blocking wrapper around [`load`] that drives its own runtime.
///
/// # Errors
///
/// Same as [`load`], plus [`SourceError::Runtime`].
pub fn load_blocking(location: &CalendarLocation) -> Result<Calendar, SourceError> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| SourceError::Runtime(e.to_string()))?;
    rt.block_on(load(location))
}
