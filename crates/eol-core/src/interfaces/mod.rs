// crates/eol-core/src/interfaces/mod.rs
// ============================================================================
// Module: EOL Station Interfaces
// Description: Backend-agnostic interfaces for steps, operator I/O, traceability, and history.
// Purpose: Define the contract surfaces used by the station runtime.
// Dependencies: crate::core, thiserror, time
// ============================================================================

//! ## Overview
//! Interfaces define how the station reaches hardware, the operator, the
//! traceability system, and the history log without embedding transport
//! details. The runtime in [`crate::runtime`] is generic over these traits so
//! every cycle can be exercised with in-memory doubles.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::Ipv4Addr;
use std::path::Path;

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::AlternateSerial;
use crate::core::BackCheck;
use crate::core::EmployeeId;
use crate::core::PartNumberCheck;
use crate::core::RunRecord;
use crate::core::SerialCheck;
use crate::core::SerialNumber;
use crate::core::StepId;
use crate::core::StepOutcome;
use crate::core::TestSequence;
use crate::core::TraceTimestamp;
use crate::core::Verdict;

// ============================================================================
// SECTION: Operator Console
// ============================================================================

/// Operator console errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading or writing the console failed.
    #[error("console io error: {0}")]
    Io(String),
    /// The console input was closed.
    #[error("console input closed")]
    Closed,
}

/// Messages the station shows to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Serial has the wrong length.
    SerialRejected {
        /// Scanned serial.
        serial: SerialNumber,
        /// Configured length.
        expected: usize,
        /// Scanned length.
        actual: usize,
    },
    /// Serial is registered under another part number.
    PartNumberMismatch {
        /// Configured part number.
        expected: String,
        /// Part number reported by traceability.
        reported: String,
    },
    /// Traceability blocked the serial.
    BackCheckRejected {
        /// Traceability message.
        message: String,
    },
    /// A step failed.
    StepFailed {
        /// Failing step name.
        step: String,
        /// Failure detail, when known.
        detail: Option<String>,
    },
    /// Final verdict for the device.
    Verdict {
        /// Device serial.
        serial: SerialNumber,
        /// Overall verdict.
        verdict: Verdict,
    },
}

impl Notice {
    /// Returns true when the notice reports a problem.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::Verdict { verdict: Verdict::Pass, .. })
    }
}

/// Operator-facing prompts.
pub trait OperatorConsole {
    /// Asks for the employee number. `None` means the operator cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] when the console cannot be read.
    fn prompt_employee(&self) -> Result<Option<EmployeeId>, ConsoleError>;

    /// Asks for the device serial. `None` means the operator cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] when the console cannot be read.
    fn prompt_serial(&self) -> Result<Option<SerialNumber>, ConsoleError>;

    /// Shows a reference image and asks a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] when the console cannot be read.
    fn confirm_image(&self, message: &str, image: &Path) -> Result<bool, ConsoleError>;

    /// Shows a notice to the operator.
    fn notify(&self, notice: &Notice);
}

// ============================================================================
// SECTION: Test Steps
// ============================================================================

/// Per-device context handed to every step.
///
/// # Invariants
/// - `dut_address` is set by the network scan step and read by later steps.
pub struct StepContext<'a> {
    /// Serial of the device under test.
    pub serial: &'a SerialNumber,
    /// Operator console for interactive steps.
    pub console: &'a dyn OperatorConsole,
    /// Address of the device on the fixture network, once located.
    pub dut_address: Option<Ipv4Addr>,
}

impl<'a> StepContext<'a> {
    /// Creates a context with no device address yet.
    #[must_use]
    pub const fn new(serial: &'a SerialNumber, console: &'a dyn OperatorConsole) -> Self {
        Self { serial, console, dut_address: None }
    }
}

/// Step execution errors.
///
/// The sequencer records these as failures of the step that raised them.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StepError {
    /// An external command could not be run or timed out.
    #[error("command error: {0}")]
    Command(String),
    /// A step needed the device address before it was located.
    #[error("device address unknown; run network_scan first")]
    NoDeviceAddress,
    /// The operator console failed.
    #[error(transparent)]
    Console(#[from] ConsoleError),
    /// Step reported an error.
    #[error("step error: {0}")]
    Failed(String),
}

/// One executable test step.
pub trait TestStep {
    /// Runs the step against the current device.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] when the step cannot complete.
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError>;
}

/// Error listing steps with no implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no implementation for test steps: {}", steps.join(", "))]
pub struct MissingStepError {
    /// Step names lacking an implementation.
    pub steps: Vec<String>,
}

/// Dispatches step identifiers to implementations.
pub trait StepRunner {
    /// Runs the implementation registered for `step`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] when the step fails to run or is not registered.
    fn run_step(&self, step: &StepId, ctx: &mut StepContext<'_>)
    -> Result<StepOutcome, StepError>;

    /// Verifies every step in the sequence has an implementation.
    ///
    /// # Errors
    ///
    /// Returns [`MissingStepError`] naming the unregistered steps.
    fn validate_steps(&self, sequence: &TestSequence) -> Result<(), MissingStepError>;
}

// ============================================================================
// SECTION: Traceability
// ============================================================================

/// Traceability errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The service answered with an empty or generic error reply.
    #[error("traceability connection error: {0}")]
    Connection(String),
    /// The backcheck call reported a service error.
    #[error("traceability backcheck error: {0}")]
    BackCheck(String),
    /// A reply did not have the expected shape.
    #[error("malformed traceability reply: {0}")]
    MalformedReply(String),
    /// The result insertion was not acknowledged.
    #[error("traceability rejected result: {0}")]
    InsertRejected(String),
    /// The alternate serial insertion was not acknowledged.
    #[error("traceability rejected alternate serial: {0}")]
    AlternateRejected(String),
    /// No alternate type is configured for the key.
    #[error("unknown alternate serial key: {0}")]
    UnknownAlternate(String),
    /// A call needed the active serial before one was validated.
    #[error("no active serial; validate a part number first")]
    NoActiveSerial,
    /// The transport failed.
    #[error("traceability transport error: {0}")]
    Transport(String),
}

/// Traceability system used by the station cycle.
pub trait Traceability {
    /// Returns true when remote calls are made.
    fn is_enabled(&self) -> bool;

    /// Checks the serial shape.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the check cannot be performed.
    fn validate_serial(&mut self, serial: &SerialNumber) -> Result<SerialCheck, TraceError>;

    /// Compares the serial's registered part number to the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the service is unreachable or replies badly.
    fn validate_part_number(&mut self, serial: &SerialNumber)
    -> Result<PartNumberCheck, TraceError>;

    /// Captures the start time and runs the station backcheck.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the backcheck cannot be performed.
    fn start_test(&mut self) -> Result<BackCheck, TraceError>;

    /// Captures the end time.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the remote clock cannot be read.
    fn end_time(&mut self) -> Result<TraceTimestamp, TraceError>;

    /// Inserts the process result for the active serial.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the insertion is not acknowledged.
    fn send_result(
        &mut self,
        verdict: Verdict,
        fail_string: &str,
        employee: &EmployeeId,
    ) -> Result<(), TraceError>;

    /// Links an alternate serial to the active serial.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the insertion is not acknowledged.
    fn send_alternate(&mut self, alternate: &AlternateSerial) -> Result<(), TraceError>;
}

// ============================================================================
// SECTION: History
// ============================================================================

/// History sink errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// File I/O failed.
    #[error("history io error: {0}")]
    Io(String),
    /// The limits file is malformed.
    #[error("limits file line {line}: {message}")]
    Limits {
        /// One-based line number.
        line: usize,
        /// Problem description.
        message: String,
    },
}

/// Destination for run records.
pub trait HistorySink {
    /// Appends one run record.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the record cannot be written.
    fn append(&mut self, record: &RunRecord) -> Result<(), HistoryError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Wall-clock source.
pub trait Clock {
    /// Returns the current local time.
    fn now(&self) -> OffsetDateTime;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}
