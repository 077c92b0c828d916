// crates/eol-core/src/core/timestamp.rs
// ============================================================================
// Module: EOL Station Time Model
// Description: Station timestamp forms used by traceability and history.
// Purpose: Keep one canonical rendering of wall-clock values across records.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The traceability system exchanges start and end times as strings. When the
//! system is enabled those strings come from its own clock and are stored
//! verbatim; when it is disabled the station renders its local clock in the
//! same `YYYY-MM-DD HH:MM:SS` form. Runtime code never reads the wall clock
//! directly; it goes through [`crate::interfaces::Clock`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Trace Timestamp
// ============================================================================

/// Timestamp string exchanged with the traceability system.
///
/// # Invariants
/// - Values from the remote clock are kept verbatim (trimmed only).
/// - Locally generated values use [`format_station_time`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceTimestamp(String);

impl TraceTimestamp {
    /// Wraps a timestamp string returned by the traceability system.
    #[must_use]
    pub fn from_remote(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_string())
    }

    /// Renders a local clock reading.
    #[must_use]
    pub fn from_local(value: OffsetDateTime) -> Self {
        Self(format_station_time(value))
    }

    /// Returns the timestamp as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Formats a clock reading as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_station_time(value: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        value.year(),
        u8::from(value.month()),
        value.day(),
        value.hour(),
        value.minute(),
        value.second()
    )
}

/// Formats the date part of a clock reading as `YYYY-MM-DD`.
#[must_use]
pub fn format_log_date(value: OffsetDateTime) -> String {
    format!("{:04}-{:02}-{:02}", value.year(), u8::from(value.month()), value.day())
}
