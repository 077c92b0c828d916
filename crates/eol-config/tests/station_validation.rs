//! Cross-section validation tests for eol-config.
// crates/eol-config/tests/station_validation.rs
// =============================================================================
// Module: Station Validation Tests
// Description: Sequence resolution, traceability, network, and check rules.
// Purpose: Ensure invalid station setups fail at load time.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use eol_config::StationConfig;
use eol_config::StepList;
use eol_core::StepId;

mod common;

use common::TestResult;
use common::assert_invalid;
use common::load_with;
use common::minimal_config;

const HEADER: &str = r#"
[station]
name = "EOL-01"
process = "EOL"
part_number = "PN-1"
"#;

fn with_sequence(sequence: &str, rest: &str) -> String {
    format!("{HEADER}\n[sequence]\n{sequence}\n{rest}")
}

// ============================================================================
// SECTION: Sequence
// ============================================================================

/// Tests that a comma-separated sequence string resolves in order.
#[test]
fn sequence_accepts_comma_separated_string() -> TestResult {
    let text = with_sequence(
        r#"steps = "system_start, network_scan, wifi""#,
        "[checks.wifi]\nargs = [\"shell\", \"true\"]\n",
    );
    let config = StationConfig::from_toml_str(&text).map_err(|err| err.to_string())?;
    assert!(matches!(config.sequence.steps, StepList::Csv(_)));
    let sequence = config.test_sequence().map_err(|err| err.to_string())?;
    assert_eq!(
        sequence.steps(),
        &[StepId::SystemStart, StepId::NetworkScan, StepId::AppCheck("wifi".to_string())]
    );
    Ok(())
}

/// Tests that an undeclared step name fails at load time.
#[test]
fn sequence_rejects_unknown_step() -> TestResult {
    let text = with_sequence(r#"steps = ["system_start", "vdu_config"]"#, "");
    assert_invalid(StationConfig::from_toml_str(&text), "unknown test step: vdu_config")
}

/// Tests that duplicate steps fail at load time.
#[test]
fn sequence_rejects_duplicates() -> TestResult {
    let text = with_sequence(r#"steps = ["system_start", "system_start"]"#, "");
    assert_invalid(StationConfig::from_toml_str(&text), "duplicate test step")
}

/// Tests that an empty sequence fails at load time.
#[test]
fn sequence_rejects_empty_list() -> TestResult {
    let text = with_sequence("steps = []", "");
    assert_invalid(StationConfig::from_toml_str(&text), "test sequence is empty")
}

// ============================================================================
// SECTION: Traceability
// ============================================================================

/// Tests that enabling traceability requires a base URL.
#[test]
fn enabled_traceability_requires_base_url() -> TestResult {
    assert_invalid(load_with("[traceability]\nenabled = true\n"), "requires traceability.base_url")
}

/// Tests that http URLs need the explicit opt-in.
#[test]
fn http_base_url_requires_allow_http() -> TestResult {
    assert_invalid(
        load_with("[traceability]\nenabled = true\nbase_url = \"http://trace.local/ws\"\n"),
        "set traceability.allow_http",
    )?;
    load_with(
        "[traceability]\nenabled = true\nallow_http = true\nbase_url = \"http://trace.local/ws\"\n",
    )
    .map_err(|err| err.to_string())?;
    Ok(())
}

/// Tests that out-of-range traceability timeouts are rejected.
#[test]
fn traceability_timeout_bounds() -> TestResult {
    assert_invalid(load_with("[traceability]\ntimeout_ms = 10\n"), "traceability.timeout_ms")
}

// ============================================================================
// SECTION: Network
// ============================================================================

/// Tests that the scan range must stay inside one /24.
#[test]
fn network_range_must_share_subnet() -> TestResult {
    assert_invalid(
        load_with("[network]\nfirst = \"192.168.17.101\"\nlast = \"192.168.18.10\"\n"),
        "one /24 subnet",
    )
}

/// Tests that an inverted range is rejected.
#[test]
fn network_range_must_be_ordered() -> TestResult {
    assert_invalid(
        load_with("[network]\nfirst = \"192.168.17.200\"\nlast = \"192.168.17.100\"\n"),
        "must not be greater",
    )
}

/// Tests worker count bounds.
#[test]
fn network_worker_bounds() -> TestResult {
    assert_invalid(load_with("[network]\nworkers = 0\n"), "network.workers")?;
    assert_invalid(load_with("[network]\nworkers = 65\n"), "network.workers")?;
    let mut config = minimal_config();
    config.network.workers = 64;
    config.validate().map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Tests that checks may not reuse built-in step names.
#[test]
fn check_name_cannot_shadow_builtin() -> TestResult {
    assert_invalid(
        load_with("[checks.network_scan]\nargs = [\"shell\", \"true\"]\n"),
        "collides with a built-in step",
    )
}

/// Tests that checks need arguments.
#[test]
fn check_requires_args() -> TestResult {
    assert_invalid(load_with("[checks.wifi]\nargs = []\n"), "checks.wifi.args must be non-empty")
}

/// Tests that capture patterns must compile.
#[test]
fn check_capture_must_compile() -> TestResult {
    assert_invalid(
        load_with("[checks.wifi]\nargs = [\"shell\"]\ncapture = \"(unclosed\"\n"),
        "invalid capture regex",
    )
}

/// Tests that alternates must name a configured alternate type.
#[test]
fn check_alternate_must_be_declared() -> TestResult {
    assert_invalid(
        load_with("[checks.imei]\nargs = [\"shell\"]\ncapture = '(\\d+)'\nalternate = \"imei\"\n"),
        "not in traceability.alternate_types",
    )?;
    load_with(
        "[traceability.alternate_types]\nimei = 4\n\n[checks.imei]\nargs = [\"shell\"]\ncapture = '(\\d+)'\nalternate = \"imei\"\n",
    )
    .map_err(|err| err.to_string())?;
    Ok(())
}

/// Tests that unknown log levels are rejected.
#[test]
fn logging_level_must_be_known() -> TestResult {
    assert_invalid(load_with("[logging]\nlevel = \"verbose\"\n"), "logging.level")
}

/// Tests that log rotation bounds are checked.
#[test]
fn logging_rotation_bounds_are_checked() -> TestResult {
    assert_invalid(load_with("[logging]\nmax_file_bytes = 10\n"), "logging.max_file_bytes")?;
    assert_invalid(load_with("[logging]\nbackups = 1000\n"), "logging.backups")
}
