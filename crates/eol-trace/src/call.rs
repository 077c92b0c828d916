// crates/eol-trace/src/call.rs
// ============================================================================
// Module: Traceability Calls
// Description: Raw traceability operations and the connector seam.
// Purpose: Describe each remote call once so every transport shares names.
// Dependencies: eol-core, serde_json
// ============================================================================

//! ## Overview
//! The traceability service exposes five operations. [`TraceCall`] names
//! each one together with its arguments, and [`TraceConnector`] sends a call
//! and returns the raw reply text. Reply interpretation lives in the client,
//! so a connector only moves strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use eol_core::TraceError;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Operation Names
// ============================================================================

/// Part number lookup for a serial.
pub const OP_PART_NUMBER_REF: &str = "CIMP_PartNumberRef";
/// Station backcheck for a serial.
pub const OP_BACK_CHECK: &str = "BackCheck_Serial";
/// Process result insertion.
pub const OP_INSERT_PROCESS_DATA: &str = "InsertProcessDataWithFails";
/// Alternate serial insertion.
pub const OP_INSERT_ALTERNATE: &str = "Insert_SN_Alternate";
/// Remote clock reading.
pub const OP_GET_DATE_TIME: &str = "CIMP_GetDateTimeStr";

/// Lookup mode passed to the part number lookup.
pub const PART_NUMBER_LOOKUP_MODE: u8 = 1;

// ============================================================================
// SECTION: Calls
// ============================================================================

/// One traceability operation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceCall<'a> {
    /// Looks up the part number registered for a serial.
    PartNumberRef {
        /// Serial number.
        serial: &'a str,
    },
    /// Asks whether the serial may be tested at the station.
    BackCheck {
        /// Serial number.
        serial: &'a str,
        /// Station name.
        station: &'a str,
    },
    /// Inserts the process result.
    InsertProcessData {
        /// Serial number.
        serial: &'a str,
        /// Station name.
        station: &'a str,
        /// Process name.
        process: &'a str,
        /// Test start time.
        start_time: &'a str,
        /// Test end time.
        end_time: &'a str,
        /// Result code, 1 for pass and 0 for fail.
        result: u8,
        /// Name of the failing step, empty on pass.
        fail_string: &'a str,
        /// Operator employee number.
        employee: &'a str,
    },
    /// Links an alternate serial to the serial.
    InsertAlternate {
        /// Serial number.
        serial: &'a str,
        /// Alternate serial value.
        alternate: &'a str,
        /// Numeric alternate type.
        kind: u32,
        /// Station name.
        station: &'a str,
    },
    /// Reads the remote clock.
    GetDateTime,
}

impl TraceCall<'_> {
    /// Returns the remote operation name.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::PartNumberRef { .. } => OP_PART_NUMBER_REF,
            Self::BackCheck { .. } => OP_BACK_CHECK,
            Self::InsertProcessData { .. } => OP_INSERT_PROCESS_DATA,
            Self::InsertAlternate { .. } => OP_INSERT_ALTERNATE,
            Self::GetDateTime => OP_GET_DATE_TIME,
        }
    }

    /// Returns the named arguments as a JSON object.
    #[must_use]
    pub fn arguments(&self) -> Value {
        match self {
            Self::PartNumberRef { serial } => json!({
                "serial": serial,
                "mode": PART_NUMBER_LOOKUP_MODE,
            }),
            Self::BackCheck { serial, station } => json!({
                "serial": serial,
                "station": station,
            }),
            Self::InsertProcessData {
                serial,
                station,
                process,
                start_time,
                end_time,
                result,
                fail_string,
                employee,
            } => json!({
                "serial": serial,
                "station": station,
                "process": process,
                "start_time": start_time,
                "end_time": end_time,
                "result": result,
                "fail_string": fail_string,
                "employee": employee,
            }),
            Self::InsertAlternate { serial, alternate, kind, station } => json!({
                "serial": serial,
                "alternate": alternate,
                "alternate_type": kind,
                "station": station,
            }),
            Self::GetDateTime => Value::Object(Map::new()),
        }
    }
}

// ============================================================================
// SECTION: Connector
// ============================================================================

/// Transport for traceability calls.
///
/// # Invariants
/// - Returns the reply text as received; callers trim and interpret it.
/// - Transport failures map to [`TraceError::Transport`].
pub trait TraceConnector {
    /// Sends one call and returns the raw reply.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the call cannot be delivered.
    fn call(&self, call: &TraceCall<'_>) -> Result<String, TraceError>;
}

impl<T: TraceConnector + ?Sized> TraceConnector for Box<T> {
    fn call(&self, call: &TraceCall<'_>) -> Result<String, TraceError> {
        (**self).call(call)
    }
}
