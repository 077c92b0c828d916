// crates/eol-steps/src/registry.rs
// ============================================================================
// Module: Step Registry
// Description: Closed mapping from step identifiers to implementations.
// Purpose: Resolve every configured step once, before any device is tested.
// Dependencies: eol-config, eol-core, tracing
// ============================================================================

//! ## Overview
//! The registry maps each [`StepId`] to a boxed [`TestStep`]. It is built
//! once from the station config: the built-in steps plus one
//! [`AppCheckStep`] per `[checks]` entry. The sequencer asks the registry to
//! validate the configured sequence at construction, so an unknown step
//! never reaches the production line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use eol_config::ConfigError;
use eol_config::StationConfig;
use eol_core::MissingStepError;
use eol_core::StepContext;
use eol_core::StepError;
use eol_core::StepId;
use eol_core::StepOutcome;
use eol_core::StepRunner;
use eol_core::TestSequence;
use eol_core::TestStep;
use tracing::debug;

use crate::adb::Adb;
use crate::netscan::PingProber;
use crate::netscan::SubnetScanner;
use crate::process::CommandRunner;
use crate::process::ProcessRunner;
use crate::steps::AdbConnectStep;
use crate::steps::AppCheckStep;
use crate::steps::NetworkScanStep;
use crate::steps::SystemStartStep;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Step implementations keyed by identifier.
#[derive(Default)]
pub struct StepRegistry {
    /// Registered steps.
    steps: BTreeMap<StepId, Box<dyn TestStep>>,
}

impl StepRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the station's steps, running real ping and adb processes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a check cannot be built.
    pub fn from_config(config: &StationConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_runner(config, ProcessRunner)
    }

    /// Builds the station's steps over an explicit command runner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a check cannot be built.
    pub fn from_config_with_runner<R>(config: &StationConfig, runner: R) -> Result<Self, ConfigError>
    where
        R: CommandRunner + Clone + Sync + 'static,
    {
        let adb = Arc::new(Adb::with_runner(runner.clone(), &config.adb));
        let prober = PingProber::with_runner(runner, config.network.ping_timeout());
        let scanner =
            SubnetScanner::new(config.network.first, config.network.last, config.network.workers, prober);

        let mut registry = Self::new();
        registry.register(StepId::SystemStart, SystemStartStep::new(config.prompts.power_on_image.clone()));
        registry.register(StepId::NetworkScan, NetworkScanStep::new(scanner));
        registry.register(StepId::AdbConnect, AdbConnectStep::new(Arc::clone(&adb)));
        for (name, check) in &config.checks {
            let step = AppCheckStep::from_config(name.as_str(), Arc::clone(&adb), check)?;
            registry.register(StepId::AppCheck(name.clone()), step);
        }
        debug!(steps = registry.len(), "step registry built");
        Ok(registry)
    }

    /// Registers a step, replacing any previous implementation.
    pub fn register(&mut self, id: StepId, step: impl TestStep + 'static) {
        self.steps.insert(id, Box::new(step));
    }

    /// Returns the registry with one more step.
    #[must_use]
    pub fn with_step(mut self, id: StepId, step: impl TestStep + 'static) -> Self {
        self.register(id, step);
        self
    }

    /// Returns true when `id` has an implementation.
    #[must_use]
    pub fn contains(&self, id: &StepId) -> bool {
        self.steps.contains_key(id)
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true when no step is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl StepRunner for StepRegistry {
    fn run_step(
        &self,
        step: &StepId,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutcome, StepError> {
        let implementation = self
            .steps
            .get(step)
            .ok_or_else(|| StepError::Failed(format!("no implementation for {step}")))?;
        implementation.run(ctx)
    }

    fn validate_steps(&self, sequence: &TestSequence) -> Result<(), MissingStepError> {
        let steps: Vec<String> = sequence
            .steps()
            .iter()
            .filter(|step| !self.steps.contains_key(*step))
            .map(|step| step.name().to_string())
            .collect();
        if steps.is_empty() { Ok(()) } else { Err(MissingStepError { steps }) }
    }
}
