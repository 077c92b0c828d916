// crates/eol-steps/src/steps/adb_connect.rs
// ============================================================================
// Module: ADB Connect Step
// Description: Opens the adb session to the located device.
// Purpose: Prepare the device for application checks.
// Dependencies: eol-core
// ============================================================================

use std::sync::Arc;

use eol_core::StepContext;
use eol_core::StepError;
use eol_core::StepOutcome;
use eol_core::TestStep;

use crate::adb::Adb;
use crate::process::CommandRunner;

/// Starts the adb server and connects to the device address.
pub struct AdbConnectStep<R> {
    /// Shared adb client.
    adb: Arc<Adb<R>>,
}

impl<R: CommandRunner> AdbConnectStep<R> {
    /// Creates the step.
    #[must_use]
    pub const fn new(adb: Arc<Adb<R>>) -> Self {
        Self { adb }
    }
}

impl<R: CommandRunner> TestStep for AdbConnectStep<R> {
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        let address = ctx.dut_address.ok_or(StepError::NoDeviceAddress)?;
        self.adb.start_server()?;
        self.adb.connect(address)?;
        Ok(StepOutcome::pass_with(self.adb.target(address)))
    }
}
