// crates/eol-core/src/runtime/mod.rs
// ============================================================================
// Module: EOL Station Runtime
// Description: Sequencer, operator session, and the station test cycle.
// Purpose: Drive one device through validation, testing, logging, and reporting.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! Runtime modules implement the station cycle. The [`Sequencer`] runs the
//! configured steps and stops on the first failure; the [`Station`] wraps it
//! with operator checks, traceability calls, and history logging. Every
//! front end (terminal, tests) calls into the same cycle.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod sequencer;
pub mod session;
pub mod station;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use sequencer::SequenceError;
pub use sequencer::Sequencer;
pub use session::DEFAULT_OPERATOR_TIMEOUT;
pub use session::OperatorSession;
pub use station::Station;
pub use station::StationError;
pub use station::StationSettings;
