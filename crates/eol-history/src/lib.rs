// crates/eol-history/src/lib.rs
// ============================================================================
// Module: EOL Station History
// Description: Limits file parsing and CSV run history.
// Purpose: Record every tested device locally, one file per day.
// Dependencies: eol-config, eol-core, time, tracing
// ============================================================================

//! ## Overview
//! The limits file names the per-test columns of the history and supplies
//! the bounds the sequencer evaluates. [`CsvHistory`] implements
//! [`eol_core::HistorySink`] by appending rows to `{dir}/{YYYY-MM-DD}.csv`.

pub mod csv;
pub mod history;
pub mod limits;

pub use history::CsvHistory;
pub use history::FIXED_COLUMNS;
pub use history::LIMIT_ROW_LABELS;
pub use limits::load_limits;
pub use limits::log_only_limits;
pub use limits::parse_limits;
pub use limits::station_limits;
