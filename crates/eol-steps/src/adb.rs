// crates/eol-steps/src/adb.rs
// ============================================================================
// Module: ADB Wrapper
// Description: Android Debug Bridge commands used by the station.
// Purpose: Manage the adb server and run device-scoped commands over TCP.
// Dependencies: eol-config, eol-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! The device under test exposes adb over TCP on the fixture network.
//! [`Adb`] starts and stops the local adb server, connects to
//! `address:port`, and runs commands scoped to that device with `-s`.
//! Every invocation goes through a [`CommandRunner`] with the configured
//! timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::Ipv4Addr;
use std::time::Duration;

use eol_config::AdbConfig;
use eol_core::StepError;
use thiserror::Error;
use tracing::debug;
use tracing::info;

use crate::process::CommandError;
use crate::process::CommandOutput;
use crate::process::CommandRunner;
use crate::process::ProcessRunner;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Marker printed by `adb connect` on success (also in "already connected to").
const CONNECTED_MARKER: &str = "connected to";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// ADB errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdbError {
    /// The adb process could not be run.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// adb exited with a failure status.
    #[error("adb {args} failed: {output}")]
    Failed {
        /// Arguments passed to adb.
        args: String,
        /// Combined output text.
        output: String,
    },
    /// `adb connect` did not report a connection.
    #[error("adb could not connect to {target}: {output}")]
    ConnectRefused {
        /// `address:port` target.
        target: String,
        /// adb output.
        output: String,
    },
}

impl From<AdbError> for StepError {
    fn from(err: AdbError) -> Self {
        match err {
            AdbError::Command(err) => Self::Command(err.to_string()),
            other => Self::Failed(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Adb
// ============================================================================

/// adb client bound to one program path, device port, and timeout.
#[derive(Debug, Clone)]
pub struct Adb<R = ProcessRunner> {
    /// Command runner.
    runner: R,
    /// adb executable.
    program: String,
    /// Device TCP port.
    port: u16,
    /// Per-command timeout.
    timeout: Duration,
}

impl Adb<ProcessRunner> {
    /// Creates an adb client that spawns real processes.
    #[must_use]
    pub fn from_config(config: &AdbConfig) -> Self {
        Self::with_runner(ProcessRunner, config)
    }
}

impl<R: CommandRunner> Adb<R> {
    /// Creates an adb client with an explicit command runner.
    #[must_use]
    pub fn with_runner(runner: R, config: &AdbConfig) -> Self {
        Self { runner, program: config.program.clone(), port: config.port, timeout: config.timeout() }
    }

    /// Returns the device TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the `address:port` serial adb uses for a TCP device.
    #[must_use]
    pub fn target(&self, address: Ipv4Addr) -> String {
        format!("{address}:{}", self.port)
    }

    /// Starts the local adb server.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError`] when adb fails.
    pub fn start_server(&self) -> Result<(), AdbError> {
        self.run(&["start-server"]).map(|_| info!("adb server started"))
    }

    /// Kills the local adb server.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError`] when adb fails.
    pub fn kill_server(&self) -> Result<(), AdbError> {
        self.run(&["kill-server"]).map(|_| info!("adb server killed"))
    }

    /// Connects to the device at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError::ConnectRefused`] when adb does not report a connection.
    pub fn connect(&self, address: Ipv4Addr) -> Result<(), AdbError> {
        let target = self.target(address);
        let stdout = self.run(&["connect", target.as_str()])?;
        if stdout.contains(CONNECTED_MARKER) && !stdout.contains("failed") {
            info!(target = %target, "adb connected");
            Ok(())
        } else {
            Err(AdbError::ConnectRefused { target, output: stdout.trim().to_string() })
        }
    }

    /// Runs an adb command and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError`] when adb cannot run or exits with failure.
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String, AdbError> {
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        let output = self.runner.run(&self.program, &args, self.timeout)?;
        check_output(&args, output)
    }

    /// Runs an adb command scoped to the device at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError`] when adb cannot run or exits with failure.
    pub fn run_on<S: AsRef<str>>(&self, address: Ipv4Addr, args: &[S]) -> Result<String, AdbError> {
        let mut scoped = vec!["-s".to_string(), self.target(address)];
        scoped.extend(args.iter().map(|arg| arg.as_ref().to_string()));
        self.run(scoped.as_slice())
    }
}

/// Maps a finished command into stdout or a failure.
fn check_output(args: &[String], output: CommandOutput) -> Result<String, AdbError> {
    debug!(args = %args.join(" "), code = ?output.code, "adb finished");
    if output.success {
        return Ok(output.stdout);
    }
    let text = if output.stderr.trim().is_empty() { output.stdout } else { output.stderr };
    Err(AdbError::Failed { args: args.join(" "), output: text.trim().to_string() })
}
