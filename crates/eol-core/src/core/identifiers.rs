// crates/eol-core/src/core/identifiers.rs
// ============================================================================
// Module: EOL Station Identifiers
// Description: Opaque identifiers for devices, operators, and station roles.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque strings on the wire. They are trimmed at
//! construction so values scanned by a barcode reader (which usually append
//! a line terminator) compare equal to configured values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Macro
// ============================================================================

/// Declares a trimmed, opaque string identifier type.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, trimming surrounding whitespace.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.len() == id.len() {
                    Self(id)
                } else {
                    Self(trimmed.to_string())
                }
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true when the identifier is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

string_identifier!(
    /// Serial number printed on the device under test.
    ///
    /// # Invariants
    /// - Surrounding whitespace is removed; no other normalization is applied.
    SerialNumber
);

impl SerialNumber {
    /// Returns the serial length in characters (not bytes).
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

string_identifier!(
    /// Part number the station is configured to test.
    ///
    /// # Invariants
    /// - Surrounding whitespace is removed; comparison is exact.
    PartNumber
);

string_identifier!(
    /// Employee number of the operator running the station.
    EmployeeId
);

string_identifier!(
    /// Station name registered in the traceability system.
    StationName
);

string_identifier!(
    /// Process name registered in the traceability system.
    ProcessName
);
