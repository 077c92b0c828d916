// crates/eol-core/src/lib.rs
// ============================================================================
// Module: EOL Station Core Library
// Description: Public API surface for the EOL station core.
// Purpose: Expose core types, interfaces, and the sequencing runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! EOL station core defines the device-under-test records, the closed set of
//! test steps, and the runtime that drives one test cycle: operator check,
//! serial validation, traceability backcheck, the configured test sequence,
//! history logging, and result reporting. Hardware, traceability transport,
//! and operator I/O are reached only through the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Clock;
pub use interfaces::ConsoleError;
pub use interfaces::HistoryError;
pub use interfaces::HistorySink;
pub use interfaces::MissingStepError;
pub use interfaces::Notice;
pub use interfaces::OperatorConsole;
pub use interfaces::StepContext;
pub use interfaces::StepError;
pub use interfaces::StepRunner;
pub use interfaces::SystemClock;
pub use interfaces::TestStep;
pub use interfaces::TraceError;
pub use interfaces::Traceability;
pub use runtime::DEFAULT_OPERATOR_TIMEOUT;
pub use runtime::OperatorSession;
pub use runtime::SequenceError;
pub use runtime::Sequencer;
pub use runtime::Station;
pub use runtime::StationError;
pub use runtime::StationSettings;
