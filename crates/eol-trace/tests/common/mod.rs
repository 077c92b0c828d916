// crates/eol-trace/tests/common/mod.rs
// ============================================================================
// Module: Traceability Test Helpers
// Description: Scripted connector and fixed clock for client tests.
// Purpose: Drive the traceability client without a network service.
// Dependencies: eol-core, eol-trace, serde_json, time
// ============================================================================

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use eol_core::Clock;
use eol_core::TraceError;
use eol_trace::TraceCall;
use eol_trace::TraceConnector;
use eol_trace::TraceSettings;
use serde_json::Value;
use time::Date;
use time::Month;
use time::OffsetDateTime;

/// Calls recorded by [`ScriptedConnector`] as `(operation, arguments)`.
pub type CallLog = Arc<Mutex<Vec<(String, Value)>>>;

/// Connector answering from per-operation reply queues.
///
/// The last reply of a queue repeats once the queue drains.
#[derive(Default)]
pub struct ScriptedConnector {
    replies: Mutex<BTreeMap<String, VecDeque<String>>>,
    pub calls: CallLog,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for an operation.
    pub fn reply(self, operation: &str, reply: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(reply.to_string());
        self
    }

    /// Connector for a healthy service with a serial cleared for testing.
    pub fn healthy(part_number: &str) -> Self {
        Self::new()
            .reply("CIMP_PartNumberRef", part_number)
            .reply("CIMP_GetDateTimeStr", "2026-05-04 08:00:00")
            .reply("CIMP_GetDateTimeStr", "2026-05-04 08:03:10")
            .reply("BackCheck_Serial", "1|Serial OK.")
            .reply("InsertProcessDataWithFails", "OK | Insertado Correctamente")
            .reply("Insert_SN_Alternate", "OK")
    }

    pub fn operations(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().iter().map(|(operation, _)| operation.clone()).collect()
    }
}

impl TraceConnector for ScriptedConnector {
    fn call(&self, call: &TraceCall<'_>) -> Result<String, TraceError> {
        let operation = call.operation();
        self.calls.lock().unwrap().push((operation.to_string(), call.arguments()));
        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(operation)
            .ok_or_else(|| TraceError::Transport(format!("no reply scripted for {operation}")))?;
        let reply = if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() };
        reply.ok_or_else(|| TraceError::Transport(format!("no reply scripted for {operation}")))
    }
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub OffsetDateTime);

impl Default for FixedClock {
    fn default() -> Self {
        let date = Date::from_calendar_date(2026, Month::May, 4).unwrap();
        Self(date.with_hms(9, 15, 30).unwrap().assume_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Settings for a station testing part `PN-100` with 12-character serials.
pub fn settings() -> TraceSettings {
    TraceSettings {
        station: "EOL1".into(),
        process: "EOL".into(),
        part_number: "PN-100".into(),
        serial_length: 12,
        alternate_types: BTreeMap::from([("imei".to_string(), 1)]),
    }
}
