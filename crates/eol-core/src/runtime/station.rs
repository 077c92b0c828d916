// crates/eol-core/src/runtime/station.rs
// ============================================================================
// Module: EOL Station Cycle
// Description: One full device cycle from operator check to result upload.
// Purpose: Orchestrate console, traceability, sequencer, and history.
// Dependencies: crate::{core, interfaces, runtime}, thiserror, tracing
// ============================================================================

//! ## Overview
//! A cycle tests exactly one device:
//! operator check, serial prompt, serial and part-number validation,
//! backcheck, the test sequence, end time, history append, alternate serial
//! upload, result upload, and the final verdict message. Rejections before
//! the sequence end the cycle with a [`CycleOutcome`] and nothing is logged.
//! Transport and I/O failures surface as [`StationError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;
use time::Duration;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::core::BackCheck;
use crate::core::CycleOutcome;
use crate::core::PartNumber;
use crate::core::PartNumberCheck;
use crate::core::RunRecord;
use crate::core::SerialCheck;
use crate::interfaces::Clock;
use crate::interfaces::ConsoleError;
use crate::interfaces::HistoryError;
use crate::interfaces::HistorySink;
use crate::interfaces::Notice;
use crate::interfaces::OperatorConsole;
use crate::interfaces::StepContext;
use crate::interfaces::StepRunner;
use crate::interfaces::TraceError;
use crate::interfaces::Traceability;
use crate::runtime::Sequencer;
use crate::runtime::session::DEFAULT_OPERATOR_TIMEOUT;
use crate::runtime::session::OperatorSession;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Station-level settings for the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSettings {
    /// Part number the station tests.
    pub part_number: PartNumber,
    /// Alternate serial key per step name.
    pub alternate_keys: BTreeMap<String, String>,
    /// Operator idle timeout.
    pub operator_timeout: Duration,
}

impl StationSettings {
    /// Creates settings with no alternates and the default operator timeout.
    #[must_use]
    pub const fn new(part_number: PartNumber) -> Self {
        Self {
            part_number,
            alternate_keys: BTreeMap::new(),
            operator_timeout: DEFAULT_OPERATOR_TIMEOUT,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Station cycle errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StationError {
    /// The operator console failed.
    #[error(transparent)]
    Console(#[from] ConsoleError),
    /// Traceability failed.
    #[error(transparent)]
    Trace(#[from] TraceError),
    /// History logging failed.
    #[error(transparent)]
    History(#[from] HistoryError),
}

// ============================================================================
// SECTION: Station
// ============================================================================

/// End-of-line station wiring every collaborator of the cycle.
pub struct Station<C, T, R, H, K> {
    /// Station settings.
    settings: StationSettings,
    /// Operator console.
    console: C,
    /// Traceability client.
    trace: T,
    /// Test sequencer.
    sequencer: Sequencer<R>,
    /// History sink.
    history: H,
    /// Wall clock.
    clock: K,
    /// Logged-in operator.
    session: OperatorSession,
}

impl<C, T, R, H, K> Station<C, T, R, H, K>
where
    C: OperatorConsole,
    T: Traceability,
    R: StepRunner,
    H: HistorySink,
    K: Clock,
{
    /// Creates a station.
    #[must_use]
    pub fn new(
        settings: StationSettings,
        console: C,
        trace: T,
        sequencer: Sequencer<R>,
        history: H,
        clock: K,
    ) -> Self {
        let session = OperatorSession::new(settings.operator_timeout);
        Self { settings, console, trace, sequencer, history, clock, session }
    }

    /// Returns the operator console.
    #[must_use]
    pub const fn console(&self) -> &C {
        &self.console
    }

    /// Returns the traceability client.
    #[must_use]
    pub const fn trace(&self) -> &T {
        &self.trace
    }

    /// Returns the history sink.
    #[must_use]
    pub const fn history(&self) -> &H {
        &self.history
    }

    /// Returns the operator session.
    #[must_use]
    pub const fn session(&self) -> &OperatorSession {
        &self.session
    }

    /// Tests one device.
    ///
    /// # Errors
    ///
    /// Returns [`StationError`] when the console, traceability, or history fails.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, StationError> {
        let Some(employee) = self.session.ensure_operator(&self.console, self.clock.now())? else {
            info!("no operator; cycle aborted");
            return Ok(CycleOutcome::Aborted);
        };
        let Some(serial) = self.console.prompt_serial()?.filter(|serial| !serial.is_empty())
        else {
            info!("serial prompt cancelled; cycle aborted");
            return Ok(CycleOutcome::Aborted);
        };
        info!(serial = %serial, employee = %employee, "cycle started");

        if let SerialCheck::Rejected { expected, actual } = self.trace.validate_serial(&serial)? {
            warn!(serial = %serial, expected, actual, "serial rejected");
            self.console.notify(&Notice::SerialRejected { serial, expected, actual });
            return Ok(CycleOutcome::SerialRejected);
        }

        if let PartNumberCheck::Mismatch { reported } =
            self.trace.validate_part_number(&serial)?
        {
            warn!(serial = %serial, reported = %reported, "part number mismatch");
            self.console.notify(&Notice::PartNumberMismatch {
                expected: self.settings.part_number.to_string(),
                reported: reported.to_string(),
            });
            return Ok(CycleOutcome::PartNumberMismatch { reported });
        }

        let start_time = match self.trace.start_test()? {
            BackCheck::Cleared { start_time } => start_time,
            BackCheck::Rejected { message } => {
                warn!(serial = %serial, message = %message, "backcheck rejected");
                self.console.notify(&Notice::BackCheckRejected { message: message.clone() });
                return Ok(CycleOutcome::BackCheckRejected { message });
            }
        };

        let mut ctx = StepContext::new(&serial, &self.console);
        let report = self.sequencer.run(&mut ctx);
        let end_time = self.trace.end_time()?;
        let verdict = report.verdict();

        let record = RunRecord {
            logged_at: self.clock.now(),
            part_number: self.settings.part_number.clone(),
            start_time,
            end_time,
            trace_enabled: self.trace.is_enabled(),
            verdict,
            serial: serial.clone(),
            report,
        };
        self.history.append(&record).inspect_err(|err| {
            error!(serial = %serial, error = %err, "history append failed");
        })?;

        for alternate in record.report.alternates(&self.settings.alternate_keys) {
            info!(serial = %serial, key = %alternate.key, "sending alternate serial");
            self.trace.send_alternate(&alternate)?;
        }
        self.trace.send_result(verdict, record.report.fail_string(), &employee)?;

        if let Some(failure) = &record.report.failure {
            let detail = record.report.result_for(failure.name()).and_then(|r| r.detail.clone());
            self.console.notify(&Notice::StepFailed { step: failure.name().to_string(), detail });
        }
        self.console.notify(&Notice::Verdict { serial: serial.clone(), verdict });
        info!(serial = %serial, verdict = verdict.as_str(), "cycle finished");
        Ok(CycleOutcome::Completed(Box::new(record)))
    }
}
