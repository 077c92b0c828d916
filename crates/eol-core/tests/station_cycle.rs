// crates/eol-core/tests/station_cycle.rs
// ============================================================================
// Module: Station Cycle Tests
// Description: Full device cycles against in-memory collaborators.
// ============================================================================
//! ## Overview
//! Validates cycle ordering, early rejections, alternate uploads, history
//! logging, and operator timeout handling.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use common::FakeTrace;
use common::ManualClock;
use common::MemoryHistory;
use common::ScriptedConsole;
use common::ScriptedRunner;
use common::sequence;
use eol_core::AlternateSerial;
use eol_core::BackCheck;
use eol_core::CycleOutcome;
use eol_core::Notice;
use eol_core::PartNumber;
use eol_core::PartNumberCheck;
use eol_core::Sequencer;
use eol_core::Station;
use eol_core::StationError;
use eol_core::StationSettings;
use eol_core::TraceError;
use eol_core::Verdict;
use time::Duration;

// ============================================================================
// SECTION: Helpers
// ============================================================================

type TestStation = Station<ScriptedConsole, FakeTrace, ScriptedRunner, MemoryHistory, ManualClock>;

fn station(console: ScriptedConsole, trace: FakeTrace, runner: ScriptedRunner) -> TestStation {
    station_with_clock(console, trace, runner, ManualClock::new())
}

fn station_with_clock(
    console: ScriptedConsole,
    trace: FakeTrace,
    runner: ScriptedRunner,
    clock: ManualClock,
) -> TestStation {
    let mut settings = StationSettings::new(PartNumber::new("PN-100"));
    settings.alternate_keys.insert("imei".to_string(), "IMEI".to_string());
    let sequencer =
        Sequencer::new(sequence(&["system_start", "imei", "wifi"]), runner, []).unwrap();
    Station::new(settings, console, trace, sequencer, MemoryHistory::default(), clock)
}

fn passing_runner() -> ScriptedRunner {
    ScriptedRunner::new().pass("system_start").value("imei", "356938035643809").pass("wifi")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests that a passing device is logged, uploaded, and announced in order.
#[test]
fn passing_cycle_logs_and_reports() {
    let console = ScriptedConsole::new().employee("E123").serial("SN-0001");
    let mut station = station(console, FakeTrace::accepting(), passing_runner());

    let outcome = station.run_cycle().unwrap();
    let record = outcome.record().unwrap();
    assert_eq!(record.verdict, Verdict::Pass);
    assert_eq!(record.start_time.as_str(), "start");
    assert_eq!(record.end_time.as_str(), "end");
    assert!(record.trace_enabled);

    let trace = station.trace();
    assert_eq!(
        trace.calls,
        vec![
            "validate_serial",
            "validate_part_number",
            "start_test",
            "end_time",
            "send_alternate",
            "send_result"
        ]
    );
    assert_eq!(
        trace.alternates,
        vec![AlternateSerial { key: "IMEI".to_string(), value: "356938035643809".to_string() }]
    );
    assert_eq!(trace.results, vec![(Verdict::Pass, String::new(), "E123".to_string())]);
    assert_eq!(station.history().records.len(), 1);
    assert!(matches!(
        station.console().notices().last(),
        Some(Notice::Verdict { verdict: Verdict::Pass, .. })
    ));
}

/// Tests that a failing step is reported with its name as the fail string.
#[test]
fn failing_cycle_sends_fail_string() {
    let console = ScriptedConsole::new().employee("E123").serial("SN-0001");
    let runner = ScriptedRunner::new().pass("system_start").fail("imei").pass("wifi");
    let mut station = station(console, FakeTrace::accepting(), runner);

    let outcome = station.run_cycle().unwrap();
    assert_eq!(outcome.record().unwrap().verdict, Verdict::Fail);
    assert_eq!(station.trace().results, vec![(Verdict::Fail, "imei".to_string(), "E123".to_string())]);
    assert!(station.trace().alternates.is_empty());
    let notices = station.console().notices();
    assert!(notices.iter().any(|notice| matches!(notice, Notice::StepFailed { step, .. } if step == "imei")));
}

/// Tests that a wrong-length serial ends the cycle before any remote call.
#[test]
fn serial_rejection_stops_cycle() {
    let console = ScriptedConsole::new().employee("E123").serial("SHORT");
    let mut trace = FakeTrace::accepting();
    trace.serial_len = 30;
    let mut station = station(console, trace, passing_runner());

    assert_eq!(station.run_cycle().unwrap(), CycleOutcome::SerialRejected);
    assert_eq!(station.trace().calls, vec!["validate_serial"]);
    assert!(station.history().records.is_empty());
}

/// Tests that a part number mismatch is reported and nothing is logged.
#[test]
fn part_number_mismatch_stops_cycle() {
    let console = ScriptedConsole::new().employee("E123").serial("SN-0001");
    let mut trace = FakeTrace::accepting();
    trace.part_number = PartNumberCheck::Mismatch { reported: PartNumber::new("PN-999") };
    let mut station = station(console, trace, passing_runner());

    assert_eq!(
        station.run_cycle().unwrap(),
        CycleOutcome::PartNumberMismatch { reported: PartNumber::new("PN-999") }
    );
    assert!(station.history().records.is_empty());
    assert!(matches!(
        station.console().notices().first(),
        Some(Notice::PartNumberMismatch { reported, .. }) if reported == "PN-999"
    ));
}

/// Tests that a backcheck rejection carries the traceability message.
#[test]
fn backcheck_rejection_stops_cycle() {
    let console = ScriptedConsole::new().employee("E123").serial("SN-0001");
    let mut trace = FakeTrace::accepting();
    trace.back_check = BackCheck::Rejected { message: "Serial en cuarentena".to_string() };
    let mut station = station(console, trace, passing_runner());

    assert_eq!(
        station.run_cycle().unwrap(),
        CycleOutcome::BackCheckRejected { message: "Serial en cuarentena".to_string() }
    );
    assert!(!station.trace().calls.contains(&"end_time".to_string()));
}

/// Tests that an empty employee entry aborts before the serial prompt.
#[test]
fn missing_operator_aborts() {
    let console = ScriptedConsole::new().employee("  ").serial("SN-0001");
    let mut station = station(console, FakeTrace::accepting(), passing_runner());

    assert_eq!(station.run_cycle().unwrap(), CycleOutcome::Aborted);
    assert!(station.trace().calls.is_empty());
    assert!(station.session().employee().is_none());
}

/// Tests that the operator is kept between cycles until the idle timeout.
#[test]
fn operator_reprompted_after_idle_timeout() {
    let clock = ManualClock::new();
    let console = ScriptedConsole::new()
        .employee("E1")
        .employee("E2")
        .serial("SN-0001")
        .serial("SN-0002")
        .serial("SN-0003");
    let mut station =
        station_with_clock(console, FakeTrace::accepting(), passing_runner(), clock.clone());

    station.run_cycle().unwrap();
    clock.advance(Duration::minutes(29));
    station.run_cycle().unwrap();
    assert_eq!(station.console().employee_prompts.get(), 1);

    clock.advance(Duration::minutes(31));
    station.run_cycle().unwrap();
    assert_eq!(station.console().employee_prompts.get(), 2);
    let employees: Vec<&str> =
        station.trace().results.iter().map(|(_, _, employee)| employee.as_str()).collect();
    assert_eq!(employees, vec!["E1", "E1", "E2"]);
}

/// Tests that a rejected result insertion surfaces as a trace error after logging.
#[test]
fn insert_rejection_is_an_error_after_history() {
    let console = ScriptedConsole::new().employee("E123").serial("SN-0001");
    let mut trace = FakeTrace::accepting();
    trace.insert_error = Some("Error: serial no insertado".to_string());
    let mut station = station(console, trace, passing_runner());

    let err = station.run_cycle().unwrap_err();
    assert!(matches!(err, StationError::Trace(TraceError::InsertRejected(_))));
    assert_eq!(station.history().records.len(), 1);
}

/// Tests that history failures abort the cycle before results are sent.
#[test]
fn history_failure_aborts_before_upload() {
    let console = ScriptedConsole::new().employee("E123").serial("SN-0001");
    let settings = StationSettings::new(PartNumber::new("PN-100"));
    let sequencer =
        Sequencer::new(sequence(&["system_start"]), ScriptedRunner::new().pass("system_start"), [])
            .unwrap();
    let history = MemoryHistory { records: Vec::new(), fail_with: Some("disk full".to_string()) };
    let mut station = Station::new(
        settings,
        console,
        FakeTrace::accepting(),
        sequencer,
        history,
        ManualClock::new(),
    );

    let err = station.run_cycle().unwrap_err();
    assert!(matches!(err, StationError::History(_)));
    assert!(!station.trace().calls.contains(&"send_result".to_string()));
}
