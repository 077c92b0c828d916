// crates/eol-cli/src/lib.rs
// ============================================================================
// Module: EOL Station CLI Library
// Description: Localization and terminal console shared by the station binary.
// Purpose: Expose CLI helpers to the binary and to integration tests.
// Dependencies: eol-core, eol-steps, tracing
// ============================================================================

//! ## Overview
//! The `eol-station` binary wires configuration, traceability, steps, and
//! history into a station loop. This library holds the pieces it shares
//! with tests: the message catalog, the terminal operator console, and the
//! rotating log file.

pub mod console;
pub mod i18n;
pub mod log_file;
