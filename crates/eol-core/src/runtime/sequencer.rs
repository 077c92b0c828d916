// crates/eol-core/src/runtime/sequencer.rs
// ============================================================================
// Module: EOL Station Sequencer
// Description: Ordered step execution with stop-on-first-failure.
// Purpose: Turn the configured sequence into a per-device report.
// Dependencies: crate::{core, interfaces}, thiserror, tracing
// ============================================================================

//! ## Overview
//! The sequencer runs each step of a [`TestSequence`] through a
//! [`StepRunner`]. A failing status or a step error ends the run; the step
//! is recorded as the failure and nothing after it executes. When the
//! limits file has an entry for a step that recorded a value, the value is
//! judged against it and an out-of-limit value fails the step.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::LimitVerdict;
use crate::core::SequenceReport;
use crate::core::StepId;
use crate::core::StepOutcome;
use crate::core::StepResult;
use crate::core::StepStatus;
use crate::core::TestLimit;
use crate::core::TestSequence;
use crate::core::evaluate_limit;
use crate::interfaces::MissingStepError;
use crate::interfaces::StepContext;
use crate::interfaces::StepRunner;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Sequencer construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// A configured step has no implementation.
    #[error(transparent)]
    MissingStep(#[from] MissingStepError),
}

// ============================================================================
// SECTION: Sequencer
// ============================================================================

/// Runs a resolved test sequence.
///
/// # Invariants
/// - Every step in `sequence` has an implementation in `runner`.
pub struct Sequencer<R> {
    /// Steps in execution order.
    sequence: TestSequence,
    /// Step implementations.
    runner: R,
    /// Limits keyed by test name.
    limits: BTreeMap<String, TestLimit>,
}

impl<R: StepRunner> Sequencer<R> {
    /// Creates a sequencer after checking every step is implemented.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::MissingStep`] when the runner lacks a step.
    pub fn new(
        sequence: TestSequence,
        runner: R,
        limits: impl IntoIterator<Item = TestLimit>,
    ) -> Result<Self, SequenceError> {
        runner.validate_steps(&sequence)?;
        let limits = limits.into_iter().map(|limit| (limit.name.clone(), limit)).collect();
        Ok(Self { sequence, runner, limits })
    }

    /// Returns the configured sequence.
    #[must_use]
    pub const fn sequence(&self) -> &TestSequence {
        &self.sequence
    }

    /// Runs every step in order, stopping at the first failure.
    pub fn run(&self, ctx: &mut StepContext<'_>) -> SequenceReport {
        let mut report = SequenceReport::default();
        for step in self.sequence.steps() {
            debug!(step = %step, serial = %ctx.serial, "step started");
            let outcome = match self.runner.run_step(step, ctx) {
                Ok(outcome) => self.apply_limit(step, outcome),
                Err(err) => {
                    warn!(step = %step, error = %err, "step error");
                    StepOutcome::fail(err.to_string())
                }
            };
            let status = outcome.status;
            info!(step = %step, status = status.as_str(), "step finished");
            report.results.push(StepResult::from_outcome(step.clone(), outcome));
            if status == StepStatus::Fail {
                report.failure = Some(step.clone());
                info!(step = %step, "sequence stopped on failure");
                break;
            }
        }
        report
    }

    /// Judges a passing step's value against its limit, if one exists.
    fn apply_limit(&self, step: &StepId, outcome: StepOutcome) -> StepOutcome {
        if outcome.status == StepStatus::Fail {
            return outcome;
        }
        let Some(limit) = self.limits.get(step.name()) else {
            return outcome;
        };
        let Some(value) = outcome.value.as_deref() else {
            return outcome;
        };
        match evaluate_limit(limit, Some(value)) {
            LimitVerdict::Pass => outcome,
            LimitVerdict::Fail(reason) => {
                warn!(step = %step, value, reason = %reason, "value outside limits");
                StepOutcome { status: StepStatus::Fail, value: outcome.value, detail: Some(reason) }
            }
        }
    }
}
