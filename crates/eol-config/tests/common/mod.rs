// crates/eol-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for eol-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use eol_config::ConfigError;
use eol_config::StationConfig;

pub type TestResult = Result<(), String>;

/// Smallest configuration that validates.
pub const MINIMAL: &str = r#"
[station]
name = "EOL-01"
process = "EOL"
part_number = "PN-1"

[sequence]
steps = ["system_start"]
"#;

/// Parses TOML without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<StationConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns the minimal config with defaults applied.
pub fn minimal_config() -> StationConfig {
    config_from_toml(MINIMAL).expect("minimal config parses")
}

/// Appends TOML to the minimal config and runs full parsing and validation.
pub fn load_with(extra: &str) -> Result<StationConfig, ConfigError> {
    StationConfig::from_toml_str(&format!("{MINIMAL}\n{extra}"))
}

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
