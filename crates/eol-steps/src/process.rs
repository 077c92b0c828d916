// crates/eol-steps/src/process.rs
// ============================================================================
// Module: Subprocess Runner
// Description: Bounded external command execution with output capture.
// Purpose: Run ping and adb without letting a hung tool stall the station.
// Dependencies: crossbeam-channel, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ProcessRunner`] spawns a command with piped output, polls `try_wait`
//! until the deadline, and kills the child when it overruns. Output pipes
//! are drained on helper threads so a chatty child cannot block on a full
//! pipe. [`CommandRunner`] is the seam test doubles implement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Read;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;
use crossbeam_channel::bounded;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Interval between exit status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// Extra time granted to drain pipes after the child exits.
const PIPE_GRACE: Duration = Duration::from_millis(500);
/// Maximum bytes kept from each output stream.
pub const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// True when the command exited with status zero.
    pub success: bool,
    /// Exit code, when the platform reports one.
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { success: true, code: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    /// Failed output with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self { success: false, code: Some(code), stdout: String::new(), stderr: stderr.into() }
    }
}

/// Command execution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("failed to start {program}: {message}")]
    Spawn {
        /// Program name.
        program: String,
        /// OS error text.
        message: String,
    },
    /// The program ran past its deadline and was killed.
    #[error("{program} timed out after {timeout_ms} ms")]
    Timeout {
        /// Program name.
        program: String,
        /// Timeout that elapsed.
        timeout_ms: u128,
    },
    /// Waiting on the program failed.
    #[error("{program} io error: {message}")]
    Io {
        /// Program name.
        program: String,
        /// OS error text.
        message: String,
    },
}

/// Runs external commands.
pub trait CommandRunner {
    /// Runs `program` with `args`, waiting at most `timeout`.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the command cannot start or overruns.
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError>;
}

// ============================================================================
// SECTION: Process Runner
// ============================================================================

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

/// Kills the child on drop unless it already exited.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(Some(_)) = self.0.try_wait() {
            return;
        }
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        debug!(program, ?args, "spawning command");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| CommandError::Spawn {
                program: program.to_string(),
                message: err.to_string(),
            })?;
        let stdout = child.stdout.take().map(drain_pipe);
        let stderr = child.stderr.take().map(drain_pipe);
        let mut guard = ChildGuard(child);

        let deadline = Instant::now() + timeout;
        let status = loop {
            match guard.0.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(err) => {
                    return Err(CommandError::Io {
                        program: program.to_string(),
                        message: err.to_string(),
                    });
                }
            }
            if Instant::now() >= deadline {
                warn!(program, timeout_ms = timeout.as_millis(), "command timed out; killing");
                return Err(CommandError::Timeout {
                    program: program.to_string(),
                    timeout_ms: timeout.as_millis(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let drain_deadline = Instant::now() + PIPE_GRACE;
        let output = CommandOutput {
            success: status.success(),
            code: status.code(),
            stdout: collect_pipe(stdout.as_ref(), drain_deadline),
            stderr: collect_pipe(stderr.as_ref(), drain_deadline),
        };
        debug!(program, code = ?output.code, "command finished");
        Ok(output)
    }
}

/// Reads a pipe to its end on a helper thread.
///
/// Bytes past [`MAX_OUTPUT_BYTES`] are discarded but still read, so the
/// child never blocks on a full pipe.
fn drain_pipe<R: Read + Send + 'static>(pipe: R) -> Receiver<String> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let mut buf = Vec::new();
        let mut limited = pipe.take(MAX_OUTPUT_BYTES);
        let _ = limited.read_to_end(&mut buf);
        let _ = io::copy(&mut limited.into_inner(), &mut io::sink());
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Waits for a drained pipe, giving up at the deadline.
///
/// A daemon spawned by the command may inherit the pipe and keep it open;
/// such output is abandoned rather than waited on.
fn collect_pipe(pipe: Option<&Receiver<String>>, deadline: Instant) -> String {
    pipe.and_then(|rx| rx.recv_deadline(deadline).ok()).unwrap_or_default()
}
