// crates/eol-cli/tests/terminal_console.rs
// ============================================================================
// Module: Terminal Console Tests
// Description: Prompt reading, confirmation answers, and notice rendering.
// Purpose: Ensure scanner input and operator answers are read as intended.
// Dependencies: eol-cli, eol-core, eol-steps
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

use std::io::Cursor;
use std::path::Path;

use eol_cli::console::TerminalConsole;
use eol_cli::console::notice_line;
use eol_cli::console::render_notice;
use eol_cli::i18n::MessageArg;
use eol_cli::i18n::translate;
use eol_cli::t;
use eol_core::Notice;
use eol_core::OperatorConsole;
use eol_core::Verdict;
use eol_steps::POWER_ON_PROMPT;

fn console(input: &str) -> TerminalConsole<Cursor<String>, Vec<u8>> {
    TerminalConsole::new(Cursor::new(input.to_string()), Vec::new())
}

/// Tests that scanned codes are trimmed, including CRLF line ends.
#[test]
fn prompts_trim_scanned_codes() {
    let console = console("  E100 \r\nSN0000000042\r\n");
    assert_eq!(console.prompt_employee().unwrap().unwrap().as_str(), "E100");
    assert_eq!(console.prompt_serial().unwrap().unwrap().as_str(), "SN0000000042");
}

/// Tests that an empty line or end of input cancels a prompt.
#[test]
fn empty_line_and_eof_cancel() {
    let console = console("\n");
    assert!(console.prompt_serial().unwrap().is_none());
    assert!(console.prompt_serial().unwrap().is_none());
}

/// Tests that yes answers are accepted in English and Spanish.
#[test]
fn confirm_accepts_yes_variants() {
    let console = console("y\nSI\nS\nno\n\n");
    let image = Path::new("images/power_on.png");
    assert!(console.confirm_image(POWER_ON_PROMPT, image).unwrap());
    assert!(console.confirm_image(POWER_ON_PROMPT, image).unwrap());
    assert!(console.confirm_image(POWER_ON_PROMPT, image).unwrap());
    assert!(!console.confirm_image(POWER_ON_PROMPT, image).unwrap());
    assert!(!console.confirm_image(POWER_ON_PROMPT, image).unwrap());
    let output = String::from_utf8(console.into_output()).unwrap();
    assert!(output.contains("images/power_on.png"));
    assert!(output.contains("Does the device show this screen? [y/n]: "));
}

/// Tests that notices render with their details.
#[test]
fn notices_render_details() {
    let rejected = Notice::SerialRejected { serial: "SN1".into(), expected: 12, actual: 3 };
    assert_eq!(render_notice(&rejected), "Serial SN1 has 3 characters; 12 are required.");
    let failed = Notice::Verdict { serial: "SN1".into(), verdict: Verdict::Fail };
    assert!(render_notice(&failed).starts_with("FAIL: SN1"));
    let step = Notice::StepFailed { step: "wifi".to_string(), detail: None };
    assert_eq!(render_notice(&step), "Test wifi failed: -");
}

/// Tests that notify writes one line per notice and marks problems.
#[test]
fn notify_writes_lines() {
    let console = console("");
    console.notify(&Notice::BackCheckRejected { message: "Serial already tested".to_string() });
    console.notify(&Notice::Verdict { serial: "SN1".into(), verdict: Verdict::Pass });
    let output = String::from_utf8(console.into_output()).unwrap();
    assert_eq!(output, "[ERROR] Traceability rejected the device: Serial already tested\nPASS: SN1\n");
}

/// Tests that only failing notices carry the error marker.
#[test]
fn notice_line_marks_failures_only() {
    let failed = Notice::Verdict { serial: "SN1".into(), verdict: Verdict::Fail };
    assert!(notice_line(&failed).starts_with("[ERROR] FAIL: SN1"));
    let passed = Notice::Verdict { serial: "SN1".into(), verdict: Verdict::Pass };
    assert_eq!(notice_line(&passed), "PASS: SN1");
}

/// Tests that the t! macro substitutes named arguments.
#[test]
fn t_macro_formats_message() {
    assert_eq!(t!("main.version", version = "0.1.0"), "eol-station 0.1.0");
    let args = vec![MessageArg::new("serial", "SN9")];
    assert_eq!(translate("notice.verdict.pass", args), "PASS: SN9");
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}
