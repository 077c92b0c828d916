// crates/eol-trace/src/reply.rs
// ============================================================================
// Module: Traceability Replies
// Description: Interpretation of raw traceability reply strings.
// Purpose: Keep reply conventions in one place, separate from transport.
// Dependencies: eol-core
// ============================================================================

//! ## Overview
//! Replies are plain text. The service signals an internal failure with a
//! fixed generic message, backchecks answer `status|message`, and insertions
//! acknowledge with one of a few known phrases.

// ============================================================================
// SECTION: Imports
// ============================================================================

use eol_core::PartNumber;
use eol_core::TraceError;
use eol_core::TraceTimestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reply the service sends when an operation failed internally.
pub const GENERIC_ERROR_REPLY: &str = "One or more errors occurred.";

/// Backcheck status that clears the serial for testing.
pub const BACK_CHECK_CLEARED: &str = "1";

/// Phrases that acknowledge a process result insertion.
pub const INSERT_ACKS: [&str; 2] = ["Ok El serial fue insertado", "OK | Insertado Correctamente"];

/// Reply that acknowledges an alternate serial insertion.
pub const ALTERNATE_ACK: &str = "OK";

// ============================================================================
// SECTION: Parsers
// ============================================================================

/// Parsed backcheck answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackCheckReply {
    /// Serial may be tested.
    Cleared,
    /// Serial is blocked, with the first sentence of the service message.
    Rejected(String),
}

/// Returns true for replies that carry no information.
fn is_error_reply(reply: &str) -> bool {
    reply.is_empty() || reply == GENERIC_ERROR_REPLY
}

/// Parses the part number lookup reply.
///
/// # Errors
///
/// Returns [`TraceError::Connection`] for empty or generic error replies.
pub fn parse_part_number(reply: &str) -> Result<PartNumber, TraceError> {
    let reply = reply.trim();
    if is_error_reply(reply) {
        return Err(TraceError::Connection(format!("part number lookup replied {reply:?}")));
    }
    Ok(PartNumber::new(reply))
}

/// Parses a `status|message` backcheck reply.
///
/// # Errors
///
/// Returns [`TraceError::BackCheck`] for the generic error message and
/// [`TraceError::MalformedReply`] when the separator is missing.
pub fn parse_back_check(reply: &str) -> Result<BackCheckReply, TraceError> {
    let reply = reply.trim();
    let Some((status, message)) = reply.split_once('|') else {
        return Err(TraceError::MalformedReply(format!("backcheck reply {reply:?}")));
    };
    let message = message.trim();
    if message == GENERIC_ERROR_REPLY {
        return Err(TraceError::BackCheck(message.to_string()));
    }
    if status.trim() == BACK_CHECK_CLEARED {
        return Ok(BackCheckReply::Cleared);
    }
    let first_sentence = message.split('.').next().unwrap_or_default().trim();
    Ok(BackCheckReply::Rejected(first_sentence.to_string()))
}

/// Parses the remote clock reply.
///
/// # Errors
///
/// Returns [`TraceError::Connection`] for empty or generic error replies.
pub fn parse_remote_time(reply: &str) -> Result<TraceTimestamp, TraceError> {
    let reply = reply.trim();
    if is_error_reply(reply) {
        return Err(TraceError::Connection(format!("remote clock replied {reply:?}")));
    }
    Ok(TraceTimestamp::from_remote(reply))
}

/// Returns true when the reply acknowledges a result insertion.
#[must_use]
pub fn is_insert_ack(reply: &str) -> bool {
    INSERT_ACKS.iter().any(|ack| reply.contains(ack))
}

/// Returns true when the reply acknowledges an alternate insertion.
#[must_use]
pub fn is_alternate_ack(reply: &str) -> bool {
    reply.trim() == ALTERNATE_ACK
}
