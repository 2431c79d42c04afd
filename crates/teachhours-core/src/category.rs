//! Teaching categories and title classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EventError;

/// Teaching format of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Lecture (cours magistral)
    Cm,
    /// Supervised exercise session (travaux dirigés)
    Td,
    /// Practical lab (travaux pratiques)
    Tp,
}

impl Category {
    /// Markers in the order titles are scanned.
    pub const SCAN_ORDER: [Category; 3] = [Category::Tp, Category::Td, Category::Cm];

    /// Column order used by reports.
    pub const ALL: [Category; 3] = [Category::Cm, Category::Td, Category::Tp];

    /// Substring identifying this category in an event title.
    pub fn marker(&self) -> &'static str {
        match self {
            Category::Cm => "CM",
            Category::Td => "TD",
            Category::Tp => "TP",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Classify an event title into exactly one category.
///
/// Markers are matched as case-sensitive substrings with no word-boundary
/// check, so `"ATDX"` contains `TD`.
///
/// # Errors
///
/// - [`EventError::MissingCategory`] when no marker occurs in the title
/// - [`EventError::AmbiguousCategory`] when two or more distinct markers occur
pub fn classify(title: &str) -> Result<Category, EventError> {
    let found: Vec<Category> = Category::SCAN_ORDER
        .into_iter()
        .filter(|c| title.contains(c.marker()))
        .collect();

    match found.len() {
        0 => Err(EventError::MissingCategory),
        1 => Ok(found[0]),
        _ => Err(EventError::AmbiguousCategory { markers: found }),
    }
}
