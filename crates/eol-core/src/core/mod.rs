// crates/eol-core/src/core/mod.rs
// ============================================================================
// Module: EOL Station Core Types
// Description: Canonical identifiers, step definitions, limits, and run records.
// Purpose: Provide stable, serializable types shared by every station crate.
// Dependencies: bigdecimal, serde, time
// ============================================================================

//! ## Overview
//! Core types describe what a station run is made of: the DUT identifiers,
//! the resolved test sequence, per-step results, test limits, and the record
//! appended to history. They carry no I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod limits;
pub mod record;
pub mod sequence;
pub mod timestamp;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::EmployeeId;
pub use identifiers::PartNumber;
pub use identifiers::ProcessName;
pub use identifiers::SerialNumber;
pub use identifiers::StationName;
pub use limits::LimitOperator;
pub use limits::LimitVerdict;
pub use limits::ParseLimitOperatorError;
pub use limits::TestLimit;
pub use limits::evaluate_limit;
pub use record::AlternateSerial;
pub use record::BackCheck;
pub use record::CycleOutcome;
pub use record::PartNumberCheck;
pub use record::RunRecord;
pub use record::SequenceReport;
pub use record::SerialCheck;
pub use record::StepOutcome;
pub use record::StepResult;
pub use record::StepStatus;
pub use record::Verdict;
pub use sequence::BUILTIN_STEP_NAMES;
pub use sequence::StepId;
pub use sequence::StepIdError;
pub use sequence::TestSequence;
pub use timestamp::TraceTimestamp;
pub use timestamp::format_log_date;
pub use timestamp::format_station_time;
