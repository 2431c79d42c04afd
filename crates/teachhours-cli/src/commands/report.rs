//! Report subcommand: load the calendar, aggregate, print.

use chrono::{DateTime, Utc};
use clap::Args;
use teachhours_core::error::Result;
use teachhours_core::{run_calendar, source, CalendarLocation, Config, RowOrder, RunOptions};

use crate::render::TextReport;

#[derive(Args)]
pub struct ReportArgs {
    /// Only include events that have already occurred
    #[arg(long)]
    done: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Calendar URL or .ics path (defaults to $ICAL, then source.ical_url)
    #[arg(short, long)]
    source: Option<String>,
    /// List codes alphabetically instead of in calendar order
    #[arg(long)]
    sort_by_code: bool,
    /// Reference time for --done, RFC 3339 (defaults to now)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{raw}': {e}"))
}

pub fn run(args: ReportArgs) -> Result<()> {
    let config = Config::load()?;
    let location = CalendarLocation::resolve(args.source.as_deref(), &config)?;
    tracing::debug!(%location, "resolved calendar location");

    let options = RunOptions {
        now: args.now.unwrap_or_else(Utc::now),
        done_only: args.done,
    };
    let order = if args.sort_by_code {
        RowOrder::Code
    } else {
        config.row_order()
    };

    if !args.json {
        println!("Loading ICS calendar and calculating hours...\n");
        println!("Fetching calendar from: {location}");
        if options.done_only {
            println!(
                "Filtering to show only past events (before {})\n",
                options.now.format("%Y-%m-%d %H:%M")
            );
        }
    }

    let calendar = source::load_blocking(&location)?;
    let report = run_calendar(&calendar, &options).report(&config.weights, order);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            TextReport {
                report: &report,
                done_only: options.done_only,
            }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_now_accepts_offsets() {
        let t = parse_now("2024-10-01T10:00:00+02:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2024-10-01T08:00:00+00:00");
    }

    #[test]
    fn parse_now_rejects_garbage() {
        assert!(parse_now("yesterday").is_err());
    }
}
