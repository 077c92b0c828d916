// crates/eol-history/src/history.rs
// ============================================================================
// Module: CSV History
// Description: Date-named CSV files with one row per tested device.
// Purpose: Keep a local production record independent of traceability.
// Dependencies: eol-config, eol-core, tracing
// ============================================================================

//! ## Overview
//! Each record goes to `{dir}/{YYYY-MM-DD}.csv` for its log date. A new or
//! empty file first receives six header rows built from the limits: test
//! names, low and high limits, expected values, units, and operators. Each
//! data row carries the fixed run columns and then one cell per limit.
//!
//! Security posture: the history directory is operator-configured; file
//! names are derived only from the record date.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use eol_config::StationConfig;
use eol_core::HistoryError;
use eol_core::HistorySink;
use eol_core::RunRecord;
use eol_core::TestLimit;
use eol_core::TestSequence;
use eol_core::format_log_date;
use eol_core::format_station_time;
use time::OffsetDateTime;
use tracing::debug;
use tracing::warn;

use crate::csv::format_row;
use crate::csv::parse_row;
use crate::limits::station_limits;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed columns leading every row.
pub const FIXED_COLUMNS: [&str; 7] =
    ["Timestamp", "PartNumber", "StartTime", "EndTime", "TraceEnabled", "Result", "Serial"];
/// Labels of the header rows after the test name row.
pub const LIMIT_ROW_LABELS: [&str; 5] = ["LowLimit", "HighLimit", "Expected", "Unit", "Operator"];

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Appends run records to date-named CSV files.
///
/// # Invariants
/// - Column order after the fixed columns follows `limits`.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    /// Directory holding the CSV files.
    dir: PathBuf,
    /// Limits naming the per-test columns.
    limits: Vec<TestLimit>,
}

impl CsvHistory {
    /// Creates a writer for `dir` with the given column limits.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, limits: Vec<TestLimit>) -> Self {
        Self { dir: dir.into(), limits }
    }

    /// Creates the writer described by a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the configured limits file cannot be loaded.
    pub fn from_config(config: &StationConfig, sequence: &TestSequence) -> Result<Self, HistoryError> {
        let limits = station_limits(config.sequence.limits_file.as_deref(), sequence)?;
        Ok(Self::new(config.history.dir.clone(), limits))
    }

    /// Returns the column limits.
    #[must_use]
    pub fn limits(&self) -> &[TestLimit] {
        &self.limits
    }

    /// Returns the file a record logged at `logged_at` goes to.
    #[must_use]
    pub fn path_for(&self, logged_at: OffsetDateTime) -> PathBuf {
        self.dir.join(format!("{}.csv", format_log_date(logged_at)))
    }

    /// Builds the six header rows.
    #[must_use]
    pub fn header_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(LIMIT_ROW_LABELS.len() + 1);
        let mut names: Vec<String> = FIXED_COLUMNS.iter().map(ToString::to_string).collect();
        names.extend(self.limits.iter().map(|limit| limit.name.clone()));
        rows.push(names);
        for (index, label) in LIMIT_ROW_LABELS.iter().enumerate() {
            let mut row = vec![String::new(); FIXED_COLUMNS.len() - 1];
            row.push((*label).to_string());
            row.extend(self.limits.iter().map(|limit| match index {
                0 => limit.low.clone(),
                1 => limit.high.clone(),
                2 => limit.expected.clone(),
                3 => limit.unit.clone(),
                _ => limit.operator.as_str().to_string(),
            }));
            rows.push(row);
        }
        rows
    }

    /// Builds the data row for a record.
    #[must_use]
    pub fn data_row(&self, record: &RunRecord) -> Vec<String> {
        let mut row = vec![
            format_station_time(record.logged_at),
            record.part_number.to_string(),
            record.start_time.to_string(),
            record.end_time.to_string(),
            if record.trace_enabled { "ON" } else { "OFF" }.to_string(),
            record.verdict.as_str().to_string(),
            record.serial.to_string(),
        ];
        row.extend(self.limits.iter().map(|limit| {
            record.report.result_for(&limit.name).map(|result| result.cell().to_string()).unwrap_or_default()
        }));
        row
    }

    /// Header text for a new file.
    fn header_text(&self) -> String {
        self.header_rows().iter().map(|row| format_row(row)).collect()
    }

    /// Returns true when the existing file at `path` was started with a
    /// different first header row.
    ///
    /// Only the first line is read; a missing or empty file has no drift.
    #[must_use]
    pub fn has_header_drift(&self, path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut first = String::new();
        if BufReader::new(file).read_line(&mut first).map_or(true, |read| read == 0) {
            return false;
        }
        let expected = self.header_rows().swap_remove(0);
        parse_row(first.trim_end_matches(['\r', '\n'])) != expected
    }
}

impl HistorySink for CsvHistory {
    fn append(&mut self, record: &RunRecord) -> Result<(), HistoryError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| HistoryError::Io(format!("{}: {err}", self.dir.display())))?;
        let path = self.path_for(record.logged_at);
        let is_new = fs::metadata(&path).map_or(true, |meta| meta.len() == 0);
        if !is_new && self.has_header_drift(&path) {
            warn!(path = %path.display(), "history header differs from current limits");
        }
        let mut text = if is_new { self.header_text() } else { String::new() };
        text.push_str(&format_row(&self.data_row(record)));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| HistoryError::Io(format!("{}: {err}", path.display())))?;
        file.write_all(text.as_bytes())
            .map_err(|err| HistoryError::Io(format!("{}: {err}", path.display())))?;
        debug!(path = %path.display(), serial = %record.serial, "history row appended");
        Ok(())
    }
}
