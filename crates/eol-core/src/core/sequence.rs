// crates/eol-core/src/core/sequence.rs
// ============================================================================
// Module: EOL Station Test Sequence
// Description: Closed step identifiers and the ordered test sequence.
// Purpose: Resolve configured step names once, at configuration-load time.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A station runs an ordered list of steps. Step names come from
//! configuration and are resolved here into [`StepId`] values: the built-in
//! steps plus application checks declared by name in the configuration. Any
//! name that is neither is rejected, so a typo in the sequence is a load
//! error rather than a silently skipped test.
//!
//! ## Invariants
//! - A [`TestSequence`] is non-empty and contains no duplicate step.
//! - Application check names never shadow a built-in step name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Configuration name of the power-on confirmation step.
const SYSTEM_START: &str = "system_start";
/// Configuration name of the subnet scan step.
const NETWORK_SCAN: &str = "network_scan";
/// Configuration name of the ADB connection step.
const ADB_CONNECT: &str = "adb_connect";

/// Names reserved by built-in steps, in canonical order.
pub const BUILTIN_STEP_NAMES: &[&str] = &[SYSTEM_START, NETWORK_SCAN, ADB_CONNECT];

// ============================================================================
// SECTION: Step Identifier
// ============================================================================

/// Identifier of a single test step.
///
/// # Invariants
/// - [`StepId::AppCheck`] names are trimmed and never equal a built-in name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    /// Operator confirms the device shows its power-on screen.
    SystemStart,
    /// Subnet scan that locates the device on the fixture network.
    NetworkScan,
    /// ADB connection to the device located by the scan.
    AdbConnect,
    /// Named application check declared in configuration.
    AppCheck(String),
}

impl StepId {
    /// Returns the configuration name of the step.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::SystemStart => SYSTEM_START,
            Self::NetworkScan => NETWORK_SCAN,
            Self::AdbConnect => ADB_CONNECT,
            Self::AppCheck(name) => name.as_str(),
        }
    }

    /// Returns the built-in step with the given name, if any.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            SYSTEM_START => Some(Self::SystemStart),
            NETWORK_SCAN => Some(Self::NetworkScan),
            ADB_CONNECT => Some(Self::AdbConnect),
            _ => None,
        }
    }

    /// Returns true when `name` is reserved by a built-in step.
    #[must_use]
    pub fn is_builtin_name(name: &str) -> bool {
        BUILTIN_STEP_NAMES.contains(&name)
    }

    /// Resolves a configured step name against built-ins and declared checks.
    ///
    /// # Errors
    ///
    /// Returns [`StepIdError`] when the name is empty or unknown.
    pub fn parse(name: &str, checks: &BTreeSet<String>) -> Result<Self, StepIdError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StepIdError::EmptyName);
        }
        if let Some(step) = Self::builtin(name) {
            return Ok(step);
        }
        if checks.contains(name) {
            return Ok(Self::AppCheck(name.to_string()));
        }
        Err(StepIdError::Unknown(name.to_string()))
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for StepId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Errors raised while resolving a test sequence.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepIdError {
    /// A sequence entry was blank.
    #[error("test sequence contains an empty step name")]
    EmptyName,
    /// A sequence entry matched no built-in step or declared check.
    #[error("unknown test step: {0}")]
    Unknown(String),
    /// A step appeared more than once.
    #[error("duplicate test step: {0}")]
    Duplicate(String),
    /// The sequence had no steps.
    #[error("test sequence is empty")]
    EmptySequence,
}

// ============================================================================
// SECTION: Test Sequence
// ============================================================================

/// Ordered, resolved list of steps to run for each device.
///
/// # Invariants
/// - Non-empty and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TestSequence(Vec<StepId>);

impl TestSequence {
    /// Builds a sequence from already-resolved steps.
    ///
    /// # Errors
    ///
    /// Returns [`StepIdError`] when the list is empty or has duplicates.
    pub fn new(steps: Vec<StepId>) -> Result<Self, StepIdError> {
        if steps.is_empty() {
            return Err(StepIdError::EmptySequence);
        }
        let mut seen = BTreeSet::new();
        for step in &steps {
            if !seen.insert(step) {
                return Err(StepIdError::Duplicate(step.name().to_string()));
            }
        }
        Ok(Self(steps))
    }

    /// Resolves configured step names in order.
    ///
    /// # Errors
    ///
    /// Returns [`StepIdError`] for unknown, blank, or duplicate names.
    pub fn resolve<S: AsRef<str>>(
        names: &[S],
        checks: &BTreeSet<String>,
    ) -> Result<Self, StepIdError> {
        let steps = names
            .iter()
            .map(|name| StepId::parse(name.as_ref(), checks))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(steps)
    }

    /// Resolves a comma-separated list such as `system_start, wifi`.
    ///
    /// # Errors
    ///
    /// Returns [`StepIdError`] for unknown, blank, or duplicate names.
    pub fn resolve_list(list: &str, checks: &BTreeSet<String>) -> Result<Self, StepIdError> {
        let names: Vec<&str> = list.split(',').collect();
        Self::resolve(&names, checks)
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepId] {
        &self.0
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when the sequence contains `step`.
    #[must_use]
    pub fn contains(&self, step: &StepId) -> bool {
        self.0.contains(step)
    }
}
