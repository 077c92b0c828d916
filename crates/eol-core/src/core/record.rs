// crates/eol-core/src/core/record.rs
// ============================================================================
// Module: EOL Station Run Records
// Description: Step results, sequence reports, verdicts, and cycle outcomes.
// Purpose: Capture everything a test cycle produced in one place.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A step produces a [`StepOutcome`]. The sequencer turns outcomes into
//! [`StepResult`] entries of a [`SequenceReport`], and the station wraps the
//! report with identifiers and timestamps into a [`RunRecord`] for history
//! and traceability. Traceability answers are modelled as small enums so the
//! station cycle can branch on them without inspecting reply strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::core::identifiers::PartNumber;
use crate::core::identifiers::SerialNumber;
use crate::core::sequence::StepId;
use crate::core::timestamp::TraceTimestamp;

// ============================================================================
// SECTION: Step Results
// ============================================================================

/// Pass/fail status of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step passed.
    Pass,
    /// Step failed.
    Fail,
}

impl StepStatus {
    /// Returns the history rendering of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }

    /// Returns true for [`StepStatus::Pass`].
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Output of a single step implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Pass or fail.
    pub status: StepStatus,
    /// Measured or captured value, when the step records one.
    pub value: Option<String>,
    /// Human-readable detail, usually the failure reason.
    pub detail: Option<String>,
}

impl StepOutcome {
    /// A passing outcome with no value.
    #[must_use]
    pub const fn pass() -> Self {
        Self { status: StepStatus::Pass, value: None, detail: None }
    }

    /// A passing outcome carrying a recorded value.
    #[must_use]
    pub fn pass_with(value: impl Into<String>) -> Self {
        Self { status: StepStatus::Pass, value: Some(value.into()), detail: None }
    }

    /// A failing outcome with a reason.
    #[must_use]
    pub fn fail(detail: impl Into<String>) -> Self {
        Self { status: StepStatus::Fail, value: None, detail: Some(detail.into()) }
    }

    /// Attaches a recorded value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Recorded result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    /// Step that ran.
    pub step: StepId,
    /// Final status after limit evaluation.
    pub status: StepStatus,
    /// Recorded value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Failure reason or error text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepResult {
    /// Builds a result from a step outcome.
    #[must_use]
    pub fn from_outcome(step: StepId, outcome: StepOutcome) -> Self {
        Self { step, status: outcome.status, value: outcome.value, detail: outcome.detail }
    }

    /// Returns the history cell for this result: the value, else the status.
    #[must_use]
    pub fn cell(&self) -> &str {
        self.value.as_deref().unwrap_or_else(|| self.status.as_str())
    }
}

/// Ordered results of one sequence run.
///
/// # Invariants
/// - `failure` is set iff the last result has [`StepStatus::Fail`].
/// - No result follows a failing result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceReport {
    /// Results in execution order.
    pub results: Vec<StepResult>,
    /// Step that ended the sequence, when it failed.
    pub failure: Option<StepId>,
}

impl SequenceReport {
    /// Returns true when every executed step passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns the failing step name, or an empty string on pass.
    #[must_use]
    pub fn fail_string(&self) -> &str {
        self.failure.as_ref().map_or("", StepId::name)
    }

    /// Returns the result recorded for the named step, if it ran.
    #[must_use]
    pub fn result_for(&self, name: &str) -> Option<&StepResult> {
        self.results.iter().find(|result| result.step.name() == name)
    }

    /// Returns the overall verdict.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        if self.passed() { Verdict::Pass } else { Verdict::Fail }
    }

    /// Collects alternate serials from passed steps that recorded a value.
    ///
    /// `keys` maps a step name to its traceability alternate key.
    #[must_use]
    pub fn alternates(&self, keys: &BTreeMap<String, String>) -> Vec<AlternateSerial> {
        self.results
            .iter()
            .filter(|result| result.status.is_pass())
            .filter_map(|result| {
                let key = keys.get(result.step.name())?;
                let value = result.value.as_ref()?;
                Some(AlternateSerial { key: key.clone(), value: value.clone() })
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Overall verdict of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// All steps passed.
    Pass,
    /// A step failed.
    Fail,
}

impl Verdict {
    /// Returns the numeric result code sent to traceability.
    #[must_use]
    pub const fn as_code(self) -> u8 {
        match self {
            Self::Pass => 1,
            Self::Fail => 0,
        }
    }

    /// Returns the history rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

// ============================================================================
// SECTION: Traceability Answers
// ============================================================================

/// Result of the local serial check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialCheck {
    /// Serial has the expected shape.
    Accepted,
    /// Serial length differs from the configured length.
    Rejected {
        /// Configured serial length.
        expected: usize,
        /// Length of the scanned serial.
        actual: usize,
    },
}

/// Result of comparing the serial's registered part number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartNumberCheck {
    /// Traceability reports the configured part number.
    Matched,
    /// Traceability reports a different part number.
    Mismatch {
        /// Part number reported for the serial.
        reported: PartNumber,
    },
}

/// Result of the start-of-test backcheck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackCheck {
    /// The serial may be tested at this station.
    Cleared {
        /// Start time captured before the backcheck.
        start_time: TraceTimestamp,
    },
    /// The serial is blocked at this station.
    Rejected {
        /// First sentence of the traceability message.
        message: String,
    },
}

/// Secondary identifier captured during the test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateSerial {
    /// Alternate key configured on the step (for example `imei`).
    pub key: String,
    /// Captured value.
    pub value: String,
}

// ============================================================================
// SECTION: Run Record
// ============================================================================

/// Row appended to history for one tested device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// Local clock reading when the record was built.
    pub logged_at: OffsetDateTime,
    /// Configured part number.
    pub part_number: PartNumber,
    /// Start time captured at backcheck.
    pub start_time: TraceTimestamp,
    /// End time captured after the sequence.
    pub end_time: TraceTimestamp,
    /// Whether traceability was enabled for the run.
    pub trace_enabled: bool,
    /// Overall verdict.
    pub verdict: Verdict,
    /// Device serial.
    pub serial: SerialNumber,
    /// Sequence results.
    pub report: SequenceReport,
}

/// Outcome of one station cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The device was tested and logged.
    Completed(Box<RunRecord>),
    /// The serial failed the local shape check.
    SerialRejected,
    /// Traceability reports a different part number.
    PartNumberMismatch {
        /// Part number reported for the serial.
        reported: PartNumber,
    },
    /// Traceability blocked the serial at this station.
    BackCheckRejected {
        /// Traceability message.
        message: String,
    },
    /// The operator cancelled a prompt.
    Aborted,
}

impl CycleOutcome {
    /// Returns the run record when the cycle completed.
    #[must_use]
    pub fn record(&self) -> Option<&RunRecord> {
        match self {
            Self::Completed(record) => Some(record.as_ref()),
            _ => None,
        }
    }
}
