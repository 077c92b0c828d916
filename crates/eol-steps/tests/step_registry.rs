// crates/eol-steps/tests/step_registry.rs
// ============================================================================
// Module: Step Registry Tests
// Description: Registry construction from config and step dispatch.
// Purpose: Ensure configured sequences resolve to implementations.
// ============================================================================

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

use eol_core::MissingStepError;
use eol_core::SequenceReport;
use eol_core::Sequencer;
use eol_core::StepContext;
use eol_core::StepId;
use eol_core::StepRunner;
use eol_core::StepStatus;
use eol_core::TestSequence;
use eol_core::TestLimit;
use eol_steps::CommandOutput;
use eol_steps::StepRegistry;
use eol_steps::SystemStartStep;

use crate::common::ConfirmConsole;
use crate::common::ScriptedRunner;
use crate::common::example_config;
use crate::common::serial;

/// Tests that the example config's whole sequence has implementations.
#[test]
fn example_config_sequence_is_fully_registered() {
    let config = example_config();
    let registry =
        StepRegistry::from_config_with_runner(&config, ScriptedRunner::always("")).unwrap();
    let sequence = config.test_sequence().unwrap();
    assert_eq!(registry.validate_steps(&sequence), Ok(()));
    assert!(registry.contains(&StepId::AppCheck("wifi".to_string())));
}

/// Tests that unregistered steps are reported by name.
#[test]
fn missing_steps_are_named() {
    let registry = StepRegistry::new().with_step(StepId::SystemStart, SystemStartStep::new("x.png"));
    let sequence = TestSequence::new(vec![
        StepId::SystemStart,
        StepId::NetworkScan,
        StepId::AppCheck("wifi".to_string()),
    ])
    .unwrap();
    assert_eq!(
        registry.validate_steps(&sequence),
        Err(MissingStepError { steps: vec!["network_scan".to_string(), "wifi".to_string()] })
    );
}

/// Tests that dispatching an unknown step is an error, not a panic.
#[test]
fn unknown_step_dispatch_is_error() {
    let serial = serial();
    let console = ConfirmConsole::answering(true);
    let registry = StepRegistry::new();
    let result = registry.run_step(&StepId::AdbConnect, &mut StepContext::new(&serial, &console));
    assert!(result.is_err());
}

/// Tests a full sequence against scripted ping and adb output.
#[test]
fn example_sequence_runs_end_to_end() {
    let runner = ScriptedRunner::new(|program, args| {
        let line = args.join(" ");
        if program == "ping" {
            return Ok(if line.ends_with("192.168.17.120") {
                CommandOutput::ok("Average = 1ms")
            } else {
                CommandOutput::failed(1, "")
            });
        }
        let stdout = if line.starts_with("connect") {
            "connected to 192.168.17.120:5555"
        } else if line.contains("dumpsys wifi") {
            "Wi-Fi is enabled\nrssi: -52"
        } else if line.contains("iphonesubinfo") {
            "Parcel(356938035643809)"
        } else if line.contains("install") {
            "Success"
        } else if line.contains("getprop") {
            "VDU-A1"
        } else {
            ""
        };
        Ok(CommandOutput::ok(stdout))
    });
    let config = example_config();
    let registry = StepRegistry::from_config_with_runner(&config, runner).unwrap();
    let sequencer =
        Sequencer::new(config.test_sequence().unwrap(), registry, Vec::<TestLimit>::new()).unwrap();
    let serial = serial();
    let console = ConfirmConsole::answering(true);
    let report: SequenceReport = sequencer.run(&mut StepContext::new(&serial, &console));
    assert!(report.passed(), "{report:?}");
    assert_eq!(report.results.len(), 7);
    let wifi = report.result_for("wifi").unwrap();
    assert_eq!(wifi.status, StepStatus::Pass);
    assert_eq!(wifi.value.as_deref(), Some("-52"));
    assert_eq!(
        report.result_for("lte_modem_configuration").unwrap().value.as_deref(),
        Some("356938035643809")
    );
}
