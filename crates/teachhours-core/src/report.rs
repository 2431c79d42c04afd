//! Structured hours report.
//!
//! Turns an [`AggregationTable`] into one row per course code plus a grand
//! total row. Values are kept unrounded; rounding is a display concern.

use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregationTable, EventWarning};
use crate::category::Category;
use crate::pipeline::RunOutcome;
use crate::weights::CategoryWeights;

/// Hours per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryHours {
    pub cm: f64,
    pub td: f64,
    pub tp: f64,
}

impl CategoryHours {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Cm => self.cm,
            Category::Td => self.td,
            Category::Tp => self.tp,
        }
    }

    fn slot(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Cm => &mut self.cm,
            Category::Td => &mut self.td,
            Category::Tp => &mut self.tp,
        }
    }

    /// Raw hours across categories.
    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Weighted (HETD) hours across categories.
    pub fn weighted(&self, weights: &CategoryWeights) -> f64 {
        Category::ALL
            .iter()
            .map(|c| weights.apply(*c, self.get(*c)))
            .sum()
    }
}

/// One course code in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub code: String,
    pub name: Option<String>,
    pub hours: CategoryHours,
    pub total_hours: f64,
    pub weighted_hours: f64,
}

impl ReportRow {
    /// `CODE - Name`, with `Unknown` standing in for a missing name.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name.as_deref().unwrap_or("Unknown"))
    }
}

/// Grand total across all codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalRow {
    pub hours: CategoryHours,
    pub total_hours: f64,
    pub weighted_hours: f64,
}

/// Ordering of report rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Order in which codes first appeared in the calendar
    #[default]
    FirstSeen,
    /// Alphabetical by code
    Code,
}

/// Everything a renderer needs about one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub total: TotalRow,
    /// In-scope events examined by the aggregator.
    pub processed: usize,
    /// Events left out because they had not ended yet.
    pub skipped_future: usize,
    pub warnings: Vec<EventWarning>,
}

impl Report {
    /// Build the report for a finished run.
    pub fn build(outcome: &RunOutcome, weights: &CategoryWeights, order: RowOrder) -> Self {
        let mut rows = rows_from_table(&outcome.aggregation.table, weights);
        if order == RowOrder::Code {
            rows.sort_by(|a, b| a.code.cmp(&b.code));
        }
        let total = total_of(&rows);

        Self {
            rows,
            total,
            processed: outcome.processed,
            skipped_future: outcome.skipped_future,
            warnings: outcome.aggregation.warnings.clone(),
        }
    }
}

/// One row per code, in the table's first-seen order.
pub fn rows_from_table(table: &AggregationTable, weights: &CategoryWeights) -> Vec<ReportRow> {
    table
        .codes()
        .map(|code| {
            let mut hours = CategoryHours::default();
            for category in Category::ALL {
                *hours.slot(category) = table.hours(code, category);
            }
            ReportRow {
                code: code.to_string(),
                name: table.name(code).map(str::to_string),
                hours,
                total_hours: hours.total(),
                weighted_hours: hours.weighted(weights),
            }
        })
        .collect()
}

/// Column-wise sum of `rows`.
pub fn total_of(rows: &[ReportRow]) -> TotalRow {
    rows.iter().fold(TotalRow::default(), |mut acc, row| {
        for category in Category::ALL {
            *acc.hours.slot(category) += row.hours.get(category);
        }
        acc.total_hours += row.total_hours;
        acc.weighted_hours += row.weighted_hours;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CourseCode;

    fn course(code: &str, name: Option<&str>) -> CourseCode {
        CourseCode {
            code: code.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn weighted_total_matches_hetd_example() {
        let mut table = AggregationTable::new();
        let inf = course("INF1", Some("Algo"));
        table.add(&inf, Category::Cm, 7.0);
        table.add(&inf, Category::Td, 7.0);
        table.add(&inf, Category::Tp, 3.5);

        let rows = rows_from_table(&table, &CategoryWeights::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_hours, 17.5);
        assert!((rows[0].weighted_hours - (10.5 + 7.0 + 3.5 * 2.0 / 3.0)).abs() < 1e-9);
        assert_eq!(format!("{:.2}", rows[0].weighted_hours), "19.83");
    }

    #[test]
    fn grand_total_is_sum_of_rows() {
        let mut table = AggregationTable::new();
        table.add(&course("A", None), Category::Cm, 2.0);
        table.add(&course("B", None), Category::Tp, 3.0);
        table.add(&course("C", None), Category::Td, 1.25);
        table.add(&course("A", None), Category::Tp, 1.5);

        let weights = CategoryWeights::default();
        let rows = rows_from_table(&table, &weights);
        let total = total_of(&rows);

        let raw: f64 = rows.iter().map(|r| r.total_hours).sum();
        let weighted: f64 = rows.iter().map(|r| r.weighted_hours).sum();
        assert!((total.total_hours - raw).abs() < 1e-9);
        assert!((total.weighted_hours - weighted).abs() < 1e-9);
        assert_eq!(total.hours.cm, 2.0);
        assert_eq!(total.hours.tp, 4.5);
        assert_eq!(total.hours.td, 1.25);
    }

    #[test]
    fn custom_weights_are_used() {
        let mut table = AggregationTable::new();
        table.add(&course("A", None), Category::Cm, 2.0);
        let weights = CategoryWeights {
            cm: 2.0,
            ..CategoryWeights::default()
        };
        let rows = rows_from_table(&table, &weights);
        assert_eq!(rows[0].weighted_hours, 4.0);
    }

    #[test]
    fn label_falls_back_to_unknown() {
        let row = ReportRow {
            code: "X1".into(),
            name: None,
            hours: CategoryHours::default(),
            total_hours: 0.0,
            weighted_hours: 0.0,
        };
        assert_eq!(row.label(), "X1 - Unknown");
    }

    #[test]
    fn empty_table_gives_zero_totals() {
        let rows = rows_from_table(&AggregationTable::new(), &CategoryWeights::default());
        assert!(rows.is_empty());
        assert_eq!(total_of(&rows), TotalRow::default());
    }
}
