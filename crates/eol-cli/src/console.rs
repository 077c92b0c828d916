// crates/eol-cli/src/console.rs
// ============================================================================
// Module: Terminal Operator Console
// Description: Line-based operator prompts on a terminal.
// Purpose: Let operators drive the station from a keyboard and scanner.
// Dependencies: eol-core, eol-steps, tracing
// ============================================================================

//! ## Overview
//! Barcode scanners type the code followed by Enter, so every prompt reads
//! one line. An empty line or end of input cancels the prompt. The console
//! cannot render images; it prints the reference image path instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use eol_core::ConsoleError;
use eol_core::EmployeeId;
use eol_core::Notice;
use eol_core::OperatorConsole;
use eol_core::SerialNumber;
use eol_core::Verdict;
use eol_steps::POWER_ON_PROMPT;
use tracing::warn;

use crate::t;

/// Answers accepted as "yes" in English and Spanish.
const YES_ANSWERS: &[&str] = &["y", "yes", "s", "si", "sí"];

// ============================================================================
// SECTION: Console
// ============================================================================

/// [`OperatorConsole`] over line-oriented input and output streams.
pub struct TerminalConsole<R, W> {
    /// Operator input.
    input: Mutex<R>,
    /// Operator output.
    output: Mutex<W>,
}

impl TerminalConsole<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Creates a console on the process stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    /// Creates a console over explicit streams.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input: Mutex::new(input), output: Mutex::new(output) }
    }

    /// Consumes the console and returns the output stream.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Writes text without a newline and flushes.
    fn write(&self, text: &str) -> Result<(), ConsoleError> {
        let mut output = self.output.lock().map_err(|_| ConsoleError::Closed)?;
        output
            .write_all(text.as_bytes())
            .and_then(|()| output.flush())
            .map_err(|err| ConsoleError::Io(err.to_string()))
    }

    /// Prints `prompt` and reads one trimmed line; `None` on empty or EOF.
    fn ask(&self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        self.write(prompt)?;
        let mut input = self.input.lock().map_err(|_| ConsoleError::Closed)?;
        let mut line = String::new();
        let read =
            input.read_line(&mut line).map_err(|err| ConsoleError::Io(err.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }
}

impl<R: BufRead, W: Write> OperatorConsole for TerminalConsole<R, W> {
    fn prompt_employee(&self) -> Result<Option<EmployeeId>, ConsoleError> {
        Ok(self.ask(&t!("console.employee"))?.map(EmployeeId::new))
    }

    fn prompt_serial(&self) -> Result<Option<SerialNumber>, ConsoleError> {
        Ok(self.ask(&t!("console.serial"))?.map(SerialNumber::new))
    }

    fn confirm_image(&self, message: &str, image: &Path) -> Result<bool, ConsoleError> {
        let message = if message == POWER_ON_PROMPT { t!("console.power_on") } else { message.to_string() };
        self.write(&format!("{}\n", t!("console.image", path = image.display())))?;
        let Some(answer) = self.ask(&t!("console.confirm", message = message))? else {
            return Ok(false);
        };
        Ok(YES_ANSWERS.contains(&answer.to_lowercase().as_str()))
    }

    fn notify(&self, notice: &Notice) {
        if let Err(err) = self.write(&format!("{}\n", notice_line(notice))) {
            warn!(error = %err, "failed to show operator notice");
        }
    }
}

/// Renders a notice as one console line, marking problems by severity.
#[must_use]
pub fn notice_line(notice: &Notice) -> String {
    let text = render_notice(notice);
    if notice.is_error() { t!("notice.error_line", message = text) } else { text }
}

/// Renders a notice in the current locale.
#[must_use]
pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::SerialRejected { serial, expected, actual } => {
            t!("notice.serial_rejected", serial = serial, expected = expected, actual = actual)
        }
        Notice::PartNumberMismatch { expected, reported } => {
            t!("notice.part_number_mismatch", expected = expected, reported = reported)
        }
        Notice::BackCheckRejected { message } => t!("notice.back_check_rejected", message = message),
        Notice::StepFailed { step, detail } => {
            t!("notice.step_failed", step = step, detail = detail.as_deref().unwrap_or("-"))
        }
        Notice::Verdict { serial, verdict: Verdict::Pass } => t!("notice.verdict.pass", serial = serial),
        Notice::Verdict { serial, verdict: Verdict::Fail } => t!("notice.verdict.fail", serial = serial),
    }
}
