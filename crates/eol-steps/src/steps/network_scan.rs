// crates/eol-steps/src/steps/network_scan.rs
// ============================================================================
// Module: Network Scan Step
// Description: Locates the device under test on the fixture network.
// Purpose: Record the device address for the adb steps.
// Dependencies: eol-core, tracing
// ============================================================================

use eol_core::StepContext;
use eol_core::StepError;
use eol_core::StepOutcome;
use eol_core::TestStep;
use tracing::info;
use tracing::warn;

use crate::netscan::HostProber;
use crate::netscan::SubnetScanner;

/// Sweeps the fixture range and keeps the lowest responding address.
///
/// The address becomes the step value and the context's `dut_address`.
pub struct NetworkScanStep<P> {
    /// Subnet scanner.
    scanner: SubnetScanner<P>,
}

impl<P: HostProber + Sync> NetworkScanStep<P> {
    /// Creates the step.
    #[must_use]
    pub const fn new(scanner: SubnetScanner<P>) -> Self {
        Self { scanner }
    }
}

impl<P: HostProber + Sync> TestStep for NetworkScanStep<P> {
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        let report = self.scanner.scan();
        if report.responders.len() > 1 {
            warn!(responders = report.responders.len(), "more than one host answered the scan");
        }
        let Some(address) = report.first() else {
            return Ok(StepOutcome::fail(format!(
                "no device answered among {} addresses",
                report.probed
            )));
        };
        info!(serial = %ctx.serial, address = %address, "device located");
        ctx.dut_address = Some(address);
        Ok(StepOutcome::pass_with(address.to_string()))
    }
}
