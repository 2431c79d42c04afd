//! # teachhours Core Library
//!
//! This library turns a teaching timetable exported as an iCalendar file into
//! hours taught per course code and teaching category (CM / TD / TP), plus the
//! weighted "HETD" equivalent. The `teachhours` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Source**: reads or downloads the ICS export and parses it into
//!   [`RawEvent`]s
//! - **Filter**: keeps every event, or only the ones already finished
//! - **Classification**: course code from line five of the description,
//!   category from marker substrings in the title
//! - **Aggregation**: per-(code, category) hour totals, with per-event
//!   problems collected as warnings instead of aborting the run
//! - **Report**: per-code rows, grand total and weighted hours
//!
//! ## Key Components
//!
//! - [`run`] / [`run_calendar`]: one filtering + aggregation pass
//! - [`Report`]: structured result handed to renderers
//! - [`CategoryWeights`]: HETD weighting policy
//! - [`Config`]: application configuration management

pub mod aggregate;
pub mod category;
pub mod code;
pub mod error;
pub mod event;
pub mod filter;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod storage;
pub mod weights;

pub use aggregate::{
    aggregate, Aggregation, AggregationTable, ClassifiedEvent, CodeCategoryKey, EventWarning,
};
pub use category::{classify, Category};
pub use code::{extract_code, CourseCode};
pub use error::{ConfigError, CoreError, EventError, SourceError};
pub use event::RawEvent;
pub use filter::{partition, Partition};
pub use pipeline::{run, run_calendar, RunOptions, RunOutcome};
pub use report::{CategoryHours, Report, ReportRow, RowOrder, TotalRow};
pub use source::{Calendar, CalendarLocation};
pub use storage::Config;
pub use weights::CategoryWeights;
