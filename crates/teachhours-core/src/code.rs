//! Course code extraction from event descriptions.
//!
//! The calendar export writes the course on the fifth line of every event
//! description, as `CODE - Course name`. Only that line is looked at: if the
//! export format drifts, events fail with [`EventError::MissingCode`] instead
//! of being attributed to whatever code-like token shows up elsewhere.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::EventError;

/// 1-based line of the description that carries the course.
pub const CODE_LINE: usize = 5;

static RE_CODE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z0-9]+) - (.*)$").expect("valid regex"));

/// A course code with its optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseCode {
    pub code: String,
    pub name: Option<String>,
}

/// Extract the course code from line five of `description`.
///
/// # Errors
///
/// Returns [`EventError::MissingCode`] when the description has fewer than
/// five lines or line five does not start with `CODE - `.
pub fn extract_code(description: &str) -> Result<CourseCode, EventError> {
    let line = description
        .split('\n')
        .nth(CODE_LINE - 1)
        .ok_or(EventError::MissingCode)?;
    let line = line.trim_end_matches('\r').trim_start();

    let caps = RE_CODE_LINE.captures(line).ok_or(EventError::MissingCode)?;
    let code = caps[1].to_string();
    let name = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Ok(CourseCode { code, name })
}
