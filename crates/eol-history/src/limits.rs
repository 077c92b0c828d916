// crates/eol-history/src/limits.rs
// ============================================================================
// Module: Limits File
// Description: Parser for the per-test limits file.
// Purpose: Name the history columns and supply limits to the sequencer.
// Dependencies: eol-core
// ============================================================================

//! ## Overview
//! One entry per line: `name,low,high,expected,unit,operator`. Blank lines
//! and lines starting with `#` are skipped. Entries keep their file order,
//! which is also the order of the history columns. Without a limits file
//! the station logs every sequence step with the `LOG` operator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use eol_core::HistoryError;
use eol_core::LimitOperator;
use eol_core::TestLimit;
use eol_core::TestSequence;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Columns per limits entry.
pub const LIMIT_COLUMNS: usize = 6;
/// Maximum limits file size in bytes.
pub const MAX_LIMITS_FILE_SIZE: u64 = 1024 * 1024;
/// UTF-8 byte order mark some Windows editors prepend.
const BYTE_ORDER_MARK: char = '\u{feff}';

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses limits file text.
///
/// # Errors
///
/// Returns [`HistoryError::Limits`] with the 1-based line number for a wrong
/// column count, a blank or duplicate name, or an unknown operator.
pub fn parse_limits(text: &str) -> Result<Vec<TestLimit>, HistoryError> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut limits = Vec::new();
    let mut names = BTreeSet::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [name, low, high, expected, unit, operator] = fields.as_slice() else {
            return Err(HistoryError::Limits {
                line,
                message: format!("expected {LIMIT_COLUMNS} columns, found {}", fields.len()),
            });
        };
        if name.is_empty() {
            return Err(HistoryError::Limits { line, message: "test name is empty".to_string() });
        }
        if !names.insert((*name).to_string()) {
            return Err(HistoryError::Limits { line, message: format!("duplicate test name {name}") });
        }
        let operator = operator
            .parse::<LimitOperator>()
            .map_err(|err| HistoryError::Limits { line, message: err.to_string() })?;
        limits.push(TestLimit {
            name: (*name).to_string(),
            low: (*low).to_string(),
            high: (*high).to_string(),
            expected: (*expected).to_string(),
            unit: (*unit).to_string(),
            operator,
        });
    }
    Ok(limits)
}

/// Reads and parses a limits file.
///
/// # Errors
///
/// Returns [`HistoryError::Io`] when the file cannot be read or is too large,
/// and [`HistoryError::Limits`] for malformed entries.
pub fn load_limits(path: &Path) -> Result<Vec<TestLimit>, HistoryError> {
    let size = fs::metadata(path)
        .map_err(|err| HistoryError::Io(format!("{}: {err}", path.display())))?
        .len();
    if size > MAX_LIMITS_FILE_SIZE {
        return Err(HistoryError::Io(format!("{}: limits file exceeds size limit", path.display())));
    }
    let text = fs::read_to_string(path)
        .map_err(|err| HistoryError::Io(format!("{}: {err}", path.display())))?;
    parse_limits(&text)
}

/// Log-only limits naming every step of the sequence.
#[must_use]
pub fn log_only_limits(sequence: &TestSequence) -> Vec<TestLimit> {
    sequence
        .steps()
        .iter()
        .map(|step| TestLimit {
            name: step.name().to_string(),
            low: String::new(),
            high: String::new(),
            expected: String::new(),
            unit: String::new(),
            operator: LimitOperator::Log,
        })
        .collect()
}

/// Loads the station limits: the limits file when configured, else
/// log-only entries for the sequence.
///
/// # Errors
///
/// Returns [`HistoryError`] when the configured file cannot be loaded.
pub fn station_limits(
    limits_file: Option<&Path>,
    sequence: &TestSequence,
) -> Result<Vec<TestLimit>, HistoryError> {
    limits_file.map_or_else(|| Ok(log_only_limits(sequence)), load_limits)
}
