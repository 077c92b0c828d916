// crates/eol-steps/src/steps/app_check.rs
// ============================================================================
// Module: Application Check Step
// Description: Configurable adb command with output expectations.
// Purpose: Express device checks in configuration instead of code.
// Dependencies: eol-config, eol-core, regex, tracing
// ============================================================================

//! ## Overview
//! An application check runs one adb command against the device. It passes
//! when adb succeeds and stdout contains the expected text, if any. A
//! capture pattern turns the first group (or the whole match) into the
//! step value; no match fails the step.

use std::sync::Arc;

use eol_config::CheckConfig;
use eol_config::ConfigError;
use eol_core::StepContext;
use eol_core::StepError;
use eol_core::StepOutcome;
use eol_core::TestStep;
use regex::Regex;
use tracing::debug;

use crate::adb::Adb;
use crate::process::CommandRunner;

/// Named adb check from the `[checks]` config table.
pub struct AppCheckStep<R> {
    /// Step name.
    name: String,
    /// Shared adb client.
    adb: Arc<Adb<R>>,
    /// adb arguments.
    args: Vec<String>,
    /// Required stdout substring.
    expect: Option<String>,
    /// Value capture pattern.
    capture: Option<Regex>,
}

impl<R: CommandRunner> AppCheckStep<R> {
    /// Builds the step from its config entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the capture pattern does not compile.
    pub fn from_config(
        name: impl Into<String>,
        adb: Arc<Adb<R>>,
        config: &CheckConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.into(),
            adb,
            args: config.args.clone(),
            expect: config.expect.clone(),
            capture: config.capture_regex()?,
        })
    }

    /// Judges adb stdout against the expectations.
    fn judge(&self, stdout: &str) -> StepOutcome {
        if let Some(expect) = &self.expect
            && !stdout.contains(expect.as_str())
        {
            return StepOutcome::fail(format!("{}: output does not contain {expect:?}", self.name));
        }
        let Some(capture) = &self.capture else {
            return StepOutcome::pass();
        };
        let value = capture
            .captures(stdout)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|found| found.as_str().trim().to_string());
        match value {
            Some(value) => StepOutcome::pass_with(value),
            None => StepOutcome::fail(format!("{}: no value matched {}", self.name, capture.as_str())),
        }
    }
}

impl<R: CommandRunner> TestStep for AppCheckStep<R> {
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        let stdout = match ctx.dut_address {
            Some(address) => self.adb.run_on(address, self.args.as_slice())?,
            None => self.adb.run(self.args.as_slice())?,
        };
        debug!(step = %self.name, serial = %ctx.serial, stdout = %stdout.trim(), "check output");
        Ok(self.judge(&stdout))
    }
}
