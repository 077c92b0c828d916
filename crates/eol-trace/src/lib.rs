// crates/eol-trace/src/lib.rs
// ============================================================================
// Module: EOL Station Traceability
// Description: Traceability client, reply parsing, and HTTP transport.
// Purpose: Talk to the plant traceability service for each tested device.
// Dependencies: eol-config, eol-core, reqwest, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! The traceability service validates that a serial belongs to the
//! station's part number, clears it for testing, and stores the result.
//! [`TraceClient`] implements [`eol_core::Traceability`] over any
//! [`TraceConnector`]; [`HttpTraceConnector`] is the shipped transport.

pub mod call;
pub mod client;
pub mod http;
pub mod reply;

pub use call::TraceCall;
pub use call::TraceConnector;
pub use client::TraceClient;
pub use client::TraceMode;
pub use client::TraceSettings;
pub use http::HttpConnectorConfig;
pub use http::HttpTraceConnector;
pub use reply::GENERIC_ERROR_REPLY;
