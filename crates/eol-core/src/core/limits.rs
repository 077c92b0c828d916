// crates/eol-core/src/core/limits.rs
// ============================================================================
// Module: EOL Station Test Limits
// Description: Limit definitions and decimal-aware limit evaluation.
// Purpose: Judge recorded step values against the limits file.
// Dependencies: bigdecimal, serde, thiserror
// ============================================================================

//! ## Overview
//! The limits file declares, per test name, the low and high bounds, the
//! expected value, the unit, and a comparison operator. The same entries
//! name the history columns. Numeric comparisons parse both sides as
//! [`BigDecimal`] so `"3.30"` and `"3.3"` compare equal and no precision is
//! lost to floating point. Missing or non-numeric values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest numeric text accepted for comparison.
const MAX_DECIMAL_LEN: usize = 64;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Comparison applied to a recorded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitOperator {
    /// Record only; never fails.
    #[serde(rename = "LOG")]
    Log,
    /// Equal to `expected` (decimal when both parse, else exact text).
    #[serde(rename = "EQ")]
    Eq,
    /// Not equal to `expected`.
    #[serde(rename = "NE")]
    Ne,
    /// Greater than or equal to `low`.
    #[serde(rename = "GE")]
    Ge,
    /// Less than or equal to `high`.
    #[serde(rename = "LE")]
    Le,
    /// Inclusive range `low..=high`.
    #[serde(rename = "GELE")]
    GeLe,
    /// Exclusive range `low..high`, both ends open.
    #[serde(rename = "GTLT")]
    GtLt,
}

impl LimitOperator {
    /// Returns the limits-file spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Ge => "GE",
            Self::Le => "LE",
            Self::GeLe => "GELE",
            Self::GtLt => "GTLT",
        }
    }
}

impl fmt::Display for LimitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized operator spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown limit operator: {0}")]
pub struct ParseLimitOperatorError(pub String);

impl FromStr for LimitOperator {
    type Err = ParseLimitOperatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOG" | "" => Ok(Self::Log),
            "EQ" => Ok(Self::Eq),
            "NE" => Ok(Self::Ne),
            "GE" => Ok(Self::Ge),
            "LE" => Ok(Self::Le),
            "GELE" => Ok(Self::GeLe),
            "GTLT" => Ok(Self::GtLt),
            other => Err(ParseLimitOperatorError(other.to_string())),
        }
    }
}

/// One entry of the limits file.
///
/// # Invariants
/// - `name` is non-empty and matches a step name when the limit applies.
/// - Bound fields keep their file text; they are parsed only on evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestLimit {
    /// Test (step) name.
    pub name: String,
    /// Low bound text, empty when unused.
    pub low: String,
    /// High bound text, empty when unused.
    pub high: String,
    /// Expected value text, empty when unused.
    pub expected: String,
    /// Unit label for the history header.
    pub unit: String,
    /// Comparison to apply.
    pub operator: LimitOperator,
}

/// Result of a limit evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitVerdict {
    /// Value within limits.
    Pass,
    /// Value outside limits, with a reason.
    Fail(String),
}

impl LimitVerdict {
    /// Returns true for [`LimitVerdict::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates a recorded value against a limit.
#[must_use]
pub fn evaluate_limit(limit: &TestLimit, value: Option<&str>) -> LimitVerdict {
    if limit.operator == LimitOperator::Log {
        return LimitVerdict::Pass;
    }
    let Some(value) = value.map(str::trim) else {
        return LimitVerdict::Fail(format!("{}: no value recorded", limit.name));
    };
    match limit.operator {
        LimitOperator::Log => LimitVerdict::Pass,
        LimitOperator::Eq => judge(limit, value, values_equal(value, &limit.expected)),
        LimitOperator::Ne => judge(limit, value, !values_equal(value, &limit.expected)),
        LimitOperator::Ge => compare_bound(limit, value, &limit.low, |ord| ord.is_ge()),
        LimitOperator::Le => compare_bound(limit, value, &limit.high, |ord| ord.is_le()),
        LimitOperator::GeLe => compare_range(limit, value, |ord| ord.is_ge(), |ord| ord.is_le()),
        LimitOperator::GtLt => compare_range(limit, value, |ord| ord.is_gt(), |ord| ord.is_lt()),
    }
}

/// Maps a boolean check into a verdict with a uniform failure reason.
fn judge(limit: &TestLimit, value: &str, ok: bool) -> LimitVerdict {
    if ok {
        LimitVerdict::Pass
    } else {
        LimitVerdict::Fail(format!(
            "{}: value {value} fails {} (low={}, high={}, expected={})",
            limit.name, limit.operator, limit.low, limit.high, limit.expected
        ))
    }
}

/// Compares a value against one bound.
fn compare_bound(
    limit: &TestLimit,
    value: &str,
    bound: &str,
    accept: fn(Ordering) -> bool,
) -> LimitVerdict {
    match decimal_cmp(value, bound) {
        Some(ordering) => judge(limit, value, accept(ordering)),
        None => non_numeric(limit, value),
    }
}

/// Compares a value against both bounds.
fn compare_range(
    limit: &TestLimit,
    value: &str,
    accept_low: fn(Ordering) -> bool,
    accept_high: fn(Ordering) -> bool,
) -> LimitVerdict {
    match (decimal_cmp(value, &limit.low), decimal_cmp(value, &limit.high)) {
        (Some(low), Some(high)) => judge(limit, value, accept_low(low) && accept_high(high)),
        _ => non_numeric(limit, value),
    }
}

/// Failure for values or bounds that do not parse as decimals.
fn non_numeric(limit: &TestLimit, value: &str) -> LimitVerdict {
    LimitVerdict::Fail(format!("{}: value {value} is not comparable to the limit", limit.name))
}

/// Equality that is decimal-aware when both sides parse.
fn values_equal(value: &str, expected: &str) -> bool {
    let expected = expected.trim();
    match (parse_decimal(value), parse_decimal(expected)) {
        (Some(left), Some(right)) => left == right,
        _ => value == expected,
    }
}

/// Orders two decimal strings.
fn decimal_cmp(left: &str, right: &str) -> Option<Ordering> {
    let left = parse_decimal(left)?;
    let right = parse_decimal(right)?;
    Some(left.cmp(&right))
}

/// Parses a trimmed plain decimal string (no exponent notation).
fn parse_decimal(value: &str) -> Option<BigDecimal> {
    let value = value.trim();
    if value.is_empty() || value.len() > MAX_DECIMAL_LEN {
        return None;
    }
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if !digits.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return None;
    }
    BigDecimal::from_str(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(operator: LimitOperator, low: &str, high: &str, expected: &str) -> TestLimit {
        TestLimit {
            name: "supply_voltage".to_string(),
            low: low.to_string(),
            high: high.to_string(),
            expected: expected.to_string(),
            unit: "V".to_string(),
            operator,
        }
    }

    #[test]
    fn inclusive_range_accepts_bounds() {
        let range = limit(LimitOperator::GeLe, "3.2", "3.4", "");
        assert!(evaluate_limit(&range, Some("3.20")).is_pass());
        assert!(evaluate_limit(&range, Some("3.4")).is_pass());
        assert!(!evaluate_limit(&range, Some("3.41")).is_pass());
    }

    #[test]
    fn exclusive_range_rejects_bounds() {
        let range = limit(LimitOperator::GtLt, "3.2", "3.4", "");
        assert!(!evaluate_limit(&range, Some("3.2")).is_pass());
        assert!(evaluate_limit(&range, Some("3.3")).is_pass());
    }

    #[test]
    fn equality_is_decimal_aware_with_text_fallback() {
        assert!(evaluate_limit(&limit(LimitOperator::Eq, "", "", "1.50"), Some("1.5")).is_pass());
        assert!(evaluate_limit(&limit(LimitOperator::Eq, "", "", "OK"), Some(" OK ")).is_pass());
        assert!(evaluate_limit(&limit(LimitOperator::Ne, "", "", "0"), Some("0.0")) != LimitVerdict::Pass);
    }

    #[test]
    fn missing_or_non_numeric_values_fail_closed() {
        let ge = limit(LimitOperator::Ge, "-70", "", "");
        assert!(!evaluate_limit(&ge, None).is_pass());
        assert!(!evaluate_limit(&ge, Some("weak")).is_pass());
        assert!(evaluate_limit(&ge, Some("-65")).is_pass());
    }

    #[test]
    fn log_operator_never_fails() {
        assert!(evaluate_limit(&limit(LimitOperator::Log, "", "", ""), None).is_pass());
    }

    #[test]
    fn operator_parsing_is_case_insensitive() {
        assert_eq!("gele".parse::<LimitOperator>(), Ok(LimitOperator::GeLe));
        assert_eq!(
            "BETWEEN".parse::<LimitOperator>(),
            Err(ParseLimitOperatorError("BETWEEN".to_string()))
        );
    }
}
