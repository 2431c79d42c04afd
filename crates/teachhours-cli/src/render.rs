//! Plain-text rendering of a [`Report`].

use std::fmt;

use teachhours_core::{Category, CategoryHours, EventError, EventWarning, Report};

const WIDE_RULE: usize = 120;
const NARROW_RULE: usize = 80;
const LABEL_WIDTH: usize = 50;
const CATEGORY_WIDTH: usize = 8;
const TOTAL_WIDTH: usize = 14;

/// Up to two decimals, trailing zeros dropped, padded so decimal points line
/// up, then right-aligned to `width`.
pub fn format_number(value: f64, width: usize) -> String {
    let fixed = format!("{value:.2}");
    let mut text = fixed.trim_end_matches('0').trim_end_matches('.').to_string();
    match text.split_once('.') {
        None => text.push_str("   "),
        Some((_, decimals)) if decimals.len() == 1 => text.push(' '),
        Some(_) => {}
    }
    format!("{text:>width$}")
}

/// One warning line for the warnings block.
pub fn warning_line(warning: &EventWarning) -> String {
    let title = &warning.title;
    match &warning.error {
        EventError::MissingCode => format!("Warning: Could not extract code from event: {title}"),
        EventError::MissingCategory => {
            format!("Warning: No category (TP/TD/CM) found in event: {title}")
        }
        EventError::AmbiguousCategory { markers } => {
            let markers: Vec<&str> = markers.iter().map(|c| c.marker()).collect();
            format!(
                "ERROR: Multiple categories ({}) found in event: {title}",
                markers.join("/")
            )
        }
        EventError::MissingStart => format!("Warning: Event has no start time: {title}"),
        EventError::MalformedEvent { start, end } => format!(
            "Warning: Event ends before it starts ({} > {}): {title}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        ),
    }
}

fn hours_columns(hours: &CategoryHours) -> String {
    Category::ALL
        .iter()
        .map(|c| format_number(hours.get(*c), CATEGORY_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full text report: counts, warnings, summary table and total row.
pub struct TextReport<'a> {
    pub report: &'a Report,
    /// Print the "Skipped N future events" line.
    pub done_only: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let wide = "=".repeat(WIDE_RULE);

        writeln!(f, "\nProcessed {} events", report.processed)?;
        if self.done_only && report.skipped_future > 0 {
            writeln!(f, "Skipped {} future events", report.skipped_future)?;
        }
        writeln!(f)?;

        if !report.warnings.is_empty() {
            let narrow = "=".repeat(NARROW_RULE);
            writeln!(f, "{narrow}\nWARNINGS AND ERRORS:\n{narrow}")?;
            for warning in &report.warnings {
                writeln!(f, "{}", warning_line(warning))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{wide}\nHOURS SUMMARY BY CODE\n{wide}\n")?;
        writeln!(
            f,
            "{:<LABEL_WIDTH$} {:>CATEGORY_WIDTH$} {:>CATEGORY_WIDTH$} {:>CATEGORY_WIDTH$} \
             {:>TOTAL_WIDTH$} {:>TOTAL_WIDTH$}",
            "Code & Name", "CM", "TD", "TP", "Total hours", "Total HETD"
        )?;
        writeln!(f, "{}", "-".repeat(WIDE_RULE))?;

        for row in &report.rows {
            write_row(f, &row.label(), &row.hours, row.total_hours, row.weighted_hours)?;
        }

        writeln!(f, "{wide}")?;
        let total = &report.total;
        write_row(f, "TOTAL", &total.hours, total.total_hours, total.weighted_hours)?;
        writeln!(f, "{wide}")
    }
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    hours: &CategoryHours,
    total: f64,
    weighted: f64,
) -> fmt::Result {
    writeln!(
        f,
        "{label:<LABEL_WIDTH$} {} {} {}",
        hours_columns(hours),
        format_number(total, TOTAL_WIDTH),
        format_number(weighted, TOTAL_WIDTH)
    )
}
