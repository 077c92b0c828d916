// crates/eol-history/tests/common/mod.rs
// ============================================================================
// Module: History Test Helpers
// Description: Run record and limits fixtures.
// Purpose: Build realistic records for history writer tests.
// Dependencies: eol-core, time
// ============================================================================

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]

use eol_core::LimitOperator;
use eol_core::RunRecord;
use eol_core::SequenceReport;
use eol_core::StepId;
use eol_core::StepOutcome;
use eol_core::StepResult;
use eol_core::TestLimit;
use eol_core::TraceTimestamp;
use eol_core::Verdict;
use time::Date;
use time::Month;
use time::OffsetDateTime;

/// Local clock reading on 2026-05-04 at the given time.
pub fn at(hour: u8, minute: u8, second: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(2026, Month::May, 4).unwrap();
    date.with_hms(hour, minute, second).unwrap().assume_utc()
}

/// Limit with only a name and operator.
pub fn limit(name: &str, operator: LimitOperator) -> TestLimit {
    TestLimit {
        name: name.to_string(),
        low: String::new(),
        high: String::new(),
        expected: String::new(),
        unit: String::new(),
        operator,
    }
}

/// Limits for power-on, wifi RSSI, and the modem IMEI.
pub fn limits() -> Vec<TestLimit> {
    vec![
        limit("system_start", LimitOperator::Log),
        TestLimit {
            low: "-70".to_string(),
            unit: "dBm".to_string(),
            ..limit("wifi", LimitOperator::Ge)
        },
        limit("lte_modem_configuration", LimitOperator::Log),
    ]
}

/// Passing record with a wifi value and no modem result.
pub fn passing_record(logged_at: OffsetDateTime) -> RunRecord {
    let report = SequenceReport {
        results: vec![
            StepResult::from_outcome(StepId::SystemStart, StepOutcome::pass()),
            StepResult::from_outcome(
                StepId::AppCheck("wifi".to_string()),
                StepOutcome::pass_with("-52"),
            ),
        ],
        failure: None,
    };
    record(logged_at, report, Verdict::Pass)
}

/// Record failing at the wifi check.
pub fn failing_record(logged_at: OffsetDateTime) -> RunRecord {
    let wifi = StepId::AppCheck("wifi".to_string());
    let report = SequenceReport {
        results: vec![
            StepResult::from_outcome(StepId::SystemStart, StepOutcome::pass()),
            StepResult::from_outcome(wifi.clone(), StepOutcome::fail("Wi-Fi, disabled")),
        ],
        failure: Some(wifi),
    };
    record(logged_at, report, Verdict::Fail)
}

fn record(logged_at: OffsetDateTime, report: SequenceReport, verdict: Verdict) -> RunRecord {
    RunRecord {
        logged_at,
        part_number: "PN-100".into(),
        start_time: TraceTimestamp::from_remote("5/4/2026 9:10:00 AM"),
        end_time: TraceTimestamp::from_remote("5/4/2026 9:12:41 AM"),
        trace_enabled: true,
        verdict,
        serial: "SN0000000042".into(),
        report,
    }
}
