// crates/eol-core/src/runtime/session.rs
// ============================================================================
// Module: EOL Station Operator Session
// Description: Tracks the logged-in operator and its idle timeout.
// Purpose: Re-prompt for the employee number after a period of inactivity.
// Dependencies: crate::{core, interfaces}, time, tracing
// ============================================================================

//! ## Overview
//! Each result sent to traceability carries the employee number of the
//! operator. The session keeps that number between devices and asks again
//! when nobody is logged in or the station sat idle longer than the timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Duration;
use time::OffsetDateTime;
use tracing::info;

use crate::core::EmployeeId;
use crate::interfaces::ConsoleError;
use crate::interfaces::OperatorConsole;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Idle time after which the operator must scan their badge again.
pub const DEFAULT_OPERATOR_TIMEOUT: Duration = Duration::minutes(30);

// ============================================================================
// SECTION: Operator Session
// ============================================================================

/// Logged-in operator state.
///
/// # Invariants
/// - `last_activity` is refreshed on every [`OperatorSession::ensure_operator`] call.
#[derive(Debug, Clone)]
pub struct OperatorSession {
    /// Current operator, if any.
    employee: Option<EmployeeId>,
    /// Time of the last check.
    last_activity: Option<OffsetDateTime>,
    /// Idle timeout.
    timeout: Duration,
}

impl OperatorSession {
    /// Creates a session with nobody logged in.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { employee: None, last_activity: None, timeout }
    }

    /// Returns the current operator without prompting.
    #[must_use]
    pub const fn employee(&self) -> Option<&EmployeeId> {
        self.employee.as_ref()
    }

    /// Returns the operator, prompting when absent or idle too long.
    ///
    /// An empty or cancelled entry logs the operator out and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] when the console cannot be read.
    pub fn ensure_operator(
        &mut self,
        console: &dyn OperatorConsole,
        now: OffsetDateTime,
    ) -> Result<Option<EmployeeId>, ConsoleError> {
        let expired = self.last_activity.is_none_or(|last| now - last > self.timeout);
        self.last_activity = Some(now);
        if self.employee.is_some() && !expired {
            return Ok(self.employee.clone());
        }
        self.employee = console.prompt_employee()?.filter(|id| !id.is_empty());
        if let Some(employee) = &self.employee {
            info!(employee = %employee, "operator logged in");
        }
        Ok(self.employee.clone())
    }
}

impl Default for OperatorSession {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATOR_TIMEOUT)
    }
}
