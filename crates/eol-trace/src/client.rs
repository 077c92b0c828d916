// crates/eol-trace/src/client.rs
// ============================================================================
// Module: Traceability Client
// Description: Station-side traceability session for one device at a time.
// Purpose: Validate serials, run the backcheck, and upload results.
// Dependencies: eol-config, eol-core, tracing
// ============================================================================

//! ## Overview
//! [`TraceClient`] keeps the active serial and the start and end times of
//! the device under test, and implements [`Traceability`] on top of a
//! [`TraceConnector`]. In [`TraceMode::Disabled`] no remote call is made:
//! every check passes, the serial length is not enforced, and times come
//! from the local clock. Each part number lookup starts a new device and
//! clears the previous times.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use eol_config::StationConfig;
use eol_core::AlternateSerial;
use eol_core::BackCheck;
use eol_core::Clock;
use eol_core::EmployeeId;
use eol_core::PartNumber;
use eol_core::PartNumberCheck;
use eol_core::ProcessName;
use eol_core::SerialCheck;
use eol_core::SerialNumber;
use eol_core::StationName;
use eol_core::SystemClock;
use eol_core::TraceError;
use eol_core::TraceTimestamp;
use eol_core::Traceability;
use eol_core::Verdict;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::call::TraceCall;
use crate::call::TraceConnector;
use crate::http::HttpConnectorConfig;
use crate::http::HttpTraceConnector;
use crate::reply::BackCheckReply;
use crate::reply::is_alternate_ack;
use crate::reply::is_insert_ack;
use crate::reply::parse_back_check;
use crate::reply::parse_part_number;
use crate::reply::parse_remote_time;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Station identity used in traceability calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSettings {
    /// Station name.
    pub station: StationName,
    /// Process name.
    pub process: ProcessName,
    /// Part number the station tests.
    pub part_number: PartNumber,
    /// Required serial length in characters.
    pub serial_length: usize,
    /// Numeric alternate type per alternate key.
    pub alternate_types: BTreeMap<String, u32>,
}

impl TraceSettings {
    /// Extracts the traceability settings from a validated config.
    #[must_use]
    pub fn from_config(config: &StationConfig) -> Self {
        Self {
            station: config.station.name.clone(),
            process: config.station.process.clone(),
            part_number: config.station.part_number.clone(),
            serial_length: config.station.serial_length,
            alternate_types: config.traceability.alternate_types.clone(),
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Whether the client talks to the traceability service.
pub enum TraceMode {
    /// Remote calls go through the connector.
    Enabled(Box<dyn TraceConnector + Send>),
    /// No remote calls; every check passes.
    Disabled,
}

impl TraceMode {
    /// Returns true for [`TraceMode::Enabled`].
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

/// Traceability session for the device under test.
///
/// # Invariants
/// - `start_time` and `end_time` belong to `active_serial` and are cleared
///   when a new part number lookup begins.
pub struct TraceClient<K = SystemClock> {
    /// Remote or disabled mode.
    mode: TraceMode,
    /// Station identity.
    settings: TraceSettings,
    /// Local clock used in disabled mode.
    clock: K,
    /// Serial of the device under test.
    active_serial: Option<SerialNumber>,
    /// Captured start time.
    start_time: Option<TraceTimestamp>,
    /// Captured end time.
    end_time: Option<TraceTimestamp>,
}

impl TraceClient<SystemClock> {
    /// Creates a client using the system clock.
    #[must_use]
    pub const fn new(settings: TraceSettings, mode: TraceMode) -> Self {
        Self::with_clock(settings, mode, SystemClock)
    }

    /// Builds the client described by a validated config, connecting over
    /// HTTP when traceability is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Transport`] when the HTTP connector cannot be built.
    pub fn from_config(config: &StationConfig) -> Result<Self, TraceError> {
        let settings = TraceSettings::from_config(config);
        if !config.traceability.enabled {
            info!("traceability disabled");
            return Ok(Self::new(settings, TraceMode::Disabled));
        }
        let connector = HttpTraceConnector::new(&HttpConnectorConfig::from_config(
            &config.traceability,
        )?)?;
        info!(station = %settings.station, "traceability enabled");
        Ok(Self::new(settings, TraceMode::Enabled(Box::new(connector))))
    }
}

impl<K: Clock> TraceClient<K> {
    /// Creates a client with an explicit local clock.
    #[must_use]
    pub const fn with_clock(settings: TraceSettings, mode: TraceMode, clock: K) -> Self {
        Self { mode, settings, clock, active_serial: None, start_time: None, end_time: None }
    }

    /// Returns the station identity.
    #[must_use]
    pub const fn settings(&self) -> &TraceSettings {
        &self.settings
    }

    /// Returns the serial of the device under test.
    #[must_use]
    pub const fn active_serial(&self) -> Option<&SerialNumber> {
        self.active_serial.as_ref()
    }

    /// Returns the captured start time.
    #[must_use]
    pub const fn start_time(&self) -> Option<&TraceTimestamp> {
        self.start_time.as_ref()
    }

    /// Reads the current time from the remote clock, or the local clock
    /// when disabled.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] when the remote clock cannot be read.
    pub fn now(&self) -> Result<TraceTimestamp, TraceError> {
        match &self.mode {
            TraceMode::Enabled(connector) => {
                parse_remote_time(&connector.call(&TraceCall::GetDateTime)?)
            }
            TraceMode::Disabled => Ok(TraceTimestamp::from_local(self.clock.now())),
        }
    }

    /// Returns the connector when enabled.
    fn connector(&self) -> Option<&(dyn TraceConnector + Send)> {
        match &self.mode {
            TraceMode::Enabled(connector) => Some(connector.as_ref()),
            TraceMode::Disabled => None,
        }
    }

    /// Returns the active serial or [`TraceError::NoActiveSerial`].
    fn require_serial(&self) -> Result<&SerialNumber, TraceError> {
        self.active_serial.as_ref().ok_or(TraceError::NoActiveSerial)
    }
}

impl<K: Clock> Traceability for TraceClient<K> {
    fn is_enabled(&self) -> bool {
        self.mode.is_enabled()
    }

    fn validate_serial(&mut self, serial: &SerialNumber) -> Result<SerialCheck, TraceError> {
        if !self.mode.is_enabled() {
            return Ok(SerialCheck::Accepted);
        }
        let actual = serial.char_len();
        if actual == self.settings.serial_length {
            Ok(SerialCheck::Accepted)
        } else {
            Ok(SerialCheck::Rejected { expected: self.settings.serial_length, actual })
        }
    }

    fn validate_part_number(
        &mut self,
        serial: &SerialNumber,
    ) -> Result<PartNumberCheck, TraceError> {
        self.active_serial = Some(serial.clone());
        self.start_time = None;
        self.end_time = None;
        let Some(connector) = self.connector() else {
            return Ok(PartNumberCheck::Matched);
        };
        let reply = connector.call(&TraceCall::PartNumberRef { serial: serial.as_str() })?;
        let reported = parse_part_number(&reply)?;
        debug!(serial = %serial, reported = %reported, "part number lookup");
        if reported == self.settings.part_number {
            Ok(PartNumberCheck::Matched)
        } else {
            Ok(PartNumberCheck::Mismatch { reported })
        }
    }

    fn start_test(&mut self) -> Result<BackCheck, TraceError> {
        if self.mode.is_enabled() {
            self.require_serial()?;
        }
        let start_time = self.now()?;
        self.start_time = Some(start_time.clone());
        let Some(connector) = self.connector() else {
            return Ok(BackCheck::Cleared { start_time });
        };
        let serial = self.require_serial()?;
        let reply = connector.call(&TraceCall::BackCheck {
            serial: serial.as_str(),
            station: self.settings.station.as_str(),
        })?;
        match parse_back_check(&reply)? {
            BackCheckReply::Cleared => {
                info!(serial = %serial, start_time = %start_time, "backcheck cleared");
                Ok(BackCheck::Cleared { start_time })
            }
            BackCheckReply::Rejected(message) => Ok(BackCheck::Rejected { message }),
        }
    }

    fn end_time(&mut self) -> Result<TraceTimestamp, TraceError> {
        let end_time = self.now()?;
        self.end_time = Some(end_time.clone());
        Ok(end_time)
    }

    fn send_result(
        &mut self,
        verdict: Verdict,
        fail_string: &str,
        employee: &EmployeeId,
    ) -> Result<(), TraceError> {
        if !self.mode.is_enabled() {
            debug!(verdict = verdict.as_str(), "traceability disabled; result not sent");
            return Ok(());
        }
        let end_time = if let Some(end_time) = self.end_time.clone() {
            end_time
        } else {
            self.end_time()?
        };
        // A result without a backcheck reports the end time as its start.
        let start_time = self.start_time.clone().unwrap_or_else(|| end_time.clone());
        let serial = self.require_serial()?;
        let Some(connector) = self.connector() else {
            return Ok(());
        };
        let reply = connector.call(&TraceCall::InsertProcessData {
            serial: serial.as_str(),
            station: self.settings.station.as_str(),
            process: self.settings.process.as_str(),
            start_time: start_time.as_str(),
            end_time: end_time.as_str(),
            result: verdict.as_code(),
            fail_string,
            employee: employee.as_str(),
        })?;
        if is_insert_ack(&reply) {
            info!(serial = %serial, verdict = verdict.as_str(), "result inserted");
            Ok(())
        } else {
            warn!(serial = %serial, reply = %reply.trim(), "result insertion rejected");
            Err(TraceError::InsertRejected(reply.trim().to_string()))
        }
    }

    fn send_alternate(&mut self, alternate: &AlternateSerial) -> Result<(), TraceError> {
        let Some(connector) = self.connector() else {
            return Ok(());
        };
        let kind = *self
            .settings
            .alternate_types
            .get(&alternate.key)
            .ok_or_else(|| TraceError::UnknownAlternate(alternate.key.clone()))?;
        let serial = self.require_serial()?;
        let reply = connector.call(&TraceCall::InsertAlternate {
            serial: serial.as_str(),
            alternate: &alternate.value,
            kind,
            station: self.settings.station.as_str(),
        })?;
        if is_alternate_ack(&reply) {
            Ok(())
        } else {
            Err(TraceError::AlternateRejected(format!("{}: {}", alternate.key, reply.trim())))
        }
    }
}
