//! Integration tests for the calendar-to-report workflow.
//!
//! Parses an ICS export, runs the time filter and aggregator, and checks the
//! structured report a renderer would receive.

use chrono::{TimeZone, Utc};
use indoc::indoc;
use teachhours_core::source::parse_ics;
use teachhours_core::{
    run, run_calendar, Category, CategoryWeights, EventError, RowOrder, RunOptions,
};

const TERM: &str = indoc! {r"
    BEGIN:VCALENDAR
    VERSION:2.0
    PRODID:-//ADE//Export//FR
    BEGIN:VEVENT
    DTSTART:20240916T080000Z
    DTEND:20240916T120000Z
    SUMMARY:ZZ9 CM Amphi
    DESCRIPTION:\nGroupe 1\nJ. Doe\n\nZZ9 - Systèmes\n
    END:VEVENT
    BEGIN:VEVENT
    DTSTART:20240917T080000Z
    DTEND:20240917T110000Z
    SUMMARY:INF301 CM Amphi
    DESCRIPTION:\nGroupe 1\nJ. Doe\n\nINF301 - Algorithmique\n
    END:VEVENT
    BEGIN:VEVENT
    DTSTART:20240918T080000Z
    DTEND:20240918T100000Z
    SUMMARY:INF301 TD G1
    DESCRIPTION:\nGroupe 1\nJ. Doe\n\nINF301 - Algorithmique\n
    END:VEVENT
    BEGIN:VEVENT
    DTSTART:20241120T080000Z
    DTEND:20241120T110000Z
    SUMMARY:INF301 TP G1
    DESCRIPTION:\nGroupe 1\nJ. Doe\n\nINF301 - Algorithmique\n
    END:VEVENT
    BEGIN:VEVENT
    DTSTART:20240919T080000Z
    DTEND:20240919T100000Z
    SUMMARY:INF301 TD/TP
    DESCRIPTION:\nGroupe 1\nJ. Doe\n\nINF301 - Algorithmique\n
    END:VEVENT
    BEGIN:VEVENT
    DTSTART:20240920T080000Z
    DTEND:20240920T090000Z
    SUMMARY:Réunion CM
    DESCRIPTION:Salle 3
    END:VEVENT
    END:VCALENDAR
"};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap()
}

#[test]
fn whole_term_report() {
    let events = parse_ics(TERM).unwrap().events;
    assert_eq!(events.len(), 6);

    let outcome = run(&events, &RunOptions::all(now()));
    let report = outcome.report(&CategoryWeights::default(), RowOrder::FirstSeen);

    assert_eq!(report.processed, 6);
    assert_eq!(report.skipped_future, 0);

    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["ZZ9", "INF301"]);

    let inf = &report.rows[1];
    assert_eq!(inf.label(), "INF301 - Algorithmique");
    assert_eq!(inf.hours.cm, 3.0);
    assert_eq!(inf.hours.td, 2.0);
    assert_eq!(inf.hours.tp, 3.0);
    assert_eq!(inf.total_hours, 8.0);
    assert!((inf.weighted_hours - (4.5 + 2.0 + 2.0)).abs() < 1e-9);

    assert_eq!(report.total.hours.cm, 7.0);
    assert_eq!(report.total.total_hours, 12.0);
    assert!((report.total.weighted_hours - (6.0 + 8.5)).abs() < 1e-9);

    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.warnings[0].title, "INF301 TD/TP");
    assert_eq!(
        report.warnings[0].error,
        EventError::AmbiguousCategory {
            markers: vec![Category::Tp, Category::Td],
        }
    );
    assert_eq!(report.warnings[1].title, "Réunion CM");
    assert_eq!(report.warnings[1].error, EventError::MissingCode);
}

#[test]
fn done_only_report_skips_future_sessions() {
    let events = parse_ics(TERM).unwrap().events;
    let outcome = run(&events, &RunOptions::done(now()));
    let report = outcome.report(&CategoryWeights::default(), RowOrder::FirstSeen);

    assert_eq!(report.processed, 5);
    assert_eq!(report.skipped_future, 1);
    assert_eq!(report.processed + report.skipped_future, events.len());

    let inf = report.rows.iter().find(|r| r.code == "INF301").unwrap();
    assert_eq!(inf.hours.tp, 0.0);
    assert_eq!(inf.total_hours, 5.0);
}

#[test]
fn sorted_report_orders_rows_by_code() {
    let calendar = parse_ics(TERM).unwrap();
    let report = run_calendar(&calendar, &RunOptions::all(now()))
        .report(&CategoryWeights::default(), RowOrder::Code);

    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["INF301", "ZZ9"]);
}

#[test]
fn report_serializes_to_json() {
    let calendar = parse_ics(TERM).unwrap();
    let report = run_calendar(&calendar, &RunOptions::all(now()))
        .report(&CategoryWeights::default(), RowOrder::FirstSeen);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["processed"], 6);
    assert_eq!(json["rows"][1]["code"], "INF301");
    assert_eq!(json["warnings"][0]["error"]["kind"], "ambiguous_category");
    assert_eq!(json["warnings"][0]["error"]["markers"][0], "TP");
}

#[test]
fn hetd_example_rounds_to_19_83() {
    let ics = indoc! {r"
        BEGIN:VCALENDAR
        BEGIN:VEVENT
        DTSTART:20240916T080000Z
        DTEND:20240916T150000Z
        SUMMARY:CM
        DESCRIPTION:1\n2\n3\n4\nABC1 - Cours
        END:VEVENT
        BEGIN:VEVENT
        DTSTART:20240917T080000Z
        DTEND:20240917T150000Z
        SUMMARY:TD
        DESCRIPTION:1\n2\n3\n4\nABC1 - Cours
        END:VEVENT
        BEGIN:VEVENT
        DTSTART:20240918T080000Z
        DTEND:20240918T113000Z
        SUMMARY:TP
        DESCRIPTION:1\n2\n3\n4\nABC1 - Cours
        END:VEVENT
        END:VCALENDAR
    "};
    let calendar = parse_ics(ics).unwrap();
    let report = run_calendar(&calendar, &RunOptions::all(now()))
        .report(&CategoryWeights::default(), RowOrder::FirstSeen);

    assert_eq!(report.rows[0].total_hours, 17.5);
    assert_eq!(format!("{:.2}", report.rows[0].weighted_hours), "19.83");
}

#[test]
fn zoned_session_counts_as_done_once_it_ended() {
    let ics = indoc! {r"
        BEGIN:VCALENDAR
        BEGIN:VEVENT
        DTSTART;TZID=Europe/Paris:20240916T080000
        DTEND;TZID=Europe/Paris:20240916T100000
        SUMMARY:INF301 CM
        DESCRIPTION:1\n2\n3\n4\nINF301 - Algorithmique
        END:VEVENT
        END:VCALENDAR
    "};
    let calendar = parse_ics(ics).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 9, 16, 9, 0, 0).unwrap();

    let report = run_calendar(&calendar, &RunOptions::done(now))
        .report(&CategoryWeights::default(), RowOrder::FirstSeen);

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_future, 0);
    assert_eq!(report.rows[0].hours.cm, 2.0);
}

#[test]
fn undated_session_is_reported_as_warning() {
    let ics = indoc! {r"
        BEGIN:VCALENDAR
        BEGIN:VEVENT
        DTSTART:20240916T080000Z
        DTEND:20240916T100000Z
        SUMMARY:INF301 CM
        DESCRIPTION:1\n2\n3\n4\nINF301 - Algorithmique
        END:VEVENT
        BEGIN:VEVENT
        SUMMARY:INF301 TD
        DESCRIPTION:1\n2\n3\n4\nINF301 - Algorithmique
        END:VEVENT
        END:VCALENDAR
    "};
    let calendar = parse_ics(ics).unwrap();
    let report = run_calendar(&calendar, &RunOptions::all(now()))
        .report(&CategoryWeights::default(), RowOrder::FirstSeen);

    assert_eq!(report.processed, 2);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].title, "INF301 TD");
    assert_eq!(report.warnings[0].error, EventError::MissingStart);
    assert_eq!(report.total.total_hours, 2.0);
}
