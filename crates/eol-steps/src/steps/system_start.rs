// crates/eol-steps/src/steps/system_start.rs
// ============================================================================
// Module: System Start Step
// Description: Operator confirmation of the power-on screen.
// Purpose: Fail fast on devices that do not boot.
// Dependencies: eol-core, tracing
// ============================================================================

use std::path::PathBuf;

use eol_core::StepContext;
use eol_core::StepError;
use eol_core::StepOutcome;
use eol_core::TestStep;
use tracing::info;

/// Question shown next to the power-on reference image.
pub const POWER_ON_PROMPT: &str = "Does the device show this screen?";

/// Asks the operator to compare the device screen with a reference image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStartStep {
    /// Reference image of the power-on screen.
    image: PathBuf,
}

impl SystemStartStep {
    /// Creates the step for a reference image.
    #[must_use]
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self { image: image.into() }
    }
}

impl TestStep for SystemStartStep {
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        if ctx.console.confirm_image(POWER_ON_PROMPT, &self.image)? {
            Ok(StepOutcome::pass())
        } else {
            info!(serial = %ctx.serial, "device did not power on");
            Ok(StepOutcome::fail("device did not show the power-on screen"))
        }
    }
}
