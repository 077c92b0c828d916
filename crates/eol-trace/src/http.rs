// crates/eol-trace/src/http.rs
// ============================================================================
// Module: HTTP Traceability Connector
// Description: Blocking HTTP transport for traceability calls.
// Purpose: Post each operation to the service gateway with strict limits.
// Dependencies: eol-config, eol-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! Each call is a `POST {base_url}/{Operation}` carrying the arguments as a
//! JSON object. The reply body is plain text; a body that is a single JSON
//! string is unwrapped. Redirects are not followed, cleartext `http` needs
//! `allow_http`, and bodies over `max_response_bytes` fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use eol_config::TraceabilityConfig;
use eol_core::TraceError;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use crate::call::TraceCall;
use crate::call::TraceConnector;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("eol-station/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP connector.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - `max_response_bytes` is a hard upper bound on reply bodies.
/// - `timeout` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConnectorConfig {
    /// Service base URL.
    pub base_url: String,
    /// Allow cleartext HTTP.
    pub allow_http: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum reply size in bytes.
    pub max_response_bytes: usize,
}

impl HttpConnectorConfig {
    /// Builds connector settings from the traceability config section.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Transport`] when no base URL is configured.
    pub fn from_config(config: &TraceabilityConfig) -> Result<Self, TraceError> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| TraceError::Transport("traceability base_url not set".to_string()))?;
        Ok(Self {
            base_url,
            allow_http: config.allow_http,
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes,
        })
    }
}

// ============================================================================
// SECTION: Connector
// ============================================================================

/// Traceability connector over blocking HTTP.
///
/// # Invariants
/// - `base_url` passed scheme validation at construction.
/// - Redirects are not followed.
pub struct HttpTraceConnector {
    /// Base URL with a trailing slash.
    base_url: Url,
    /// Reply size limit.
    max_response_bytes: usize,
    /// HTTP client.
    client: Client,
}

impl HttpTraceConnector {
    /// Creates a connector.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Transport`] for invalid URLs or client build failures.
    pub fn new(config: &HttpConnectorConfig) -> Result<Self, TraceError> {
        let base_url = parse_base_url(&config.base_url, config.allow_http)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|_| TraceError::Transport("http client build failed".to_string()))?;
        Ok(Self { base_url, max_response_bytes: config.max_response_bytes, client })
    }

    /// Returns the endpoint URL for an operation.
    fn endpoint(&self, operation: &str) -> Result<Url, TraceError> {
        self.base_url
            .join(operation)
            .map_err(|_| TraceError::Transport(format!("invalid endpoint for {operation}")))
    }
}

impl TraceConnector for HttpTraceConnector {
    fn call(&self, call: &TraceCall<'_>) -> Result<String, TraceError> {
        let operation = call.operation();
        let url = self.endpoint(operation)?;
        let body = serde_json::to_vec(&call.arguments())
            .map_err(|err| TraceError::Transport(format!("{operation}: {err}")))?;
        let mut response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| TraceError::Transport(format!("{operation}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TraceError::Transport(format!("{operation}: http status {status}")));
        }
        let bytes = read_response_limited(&mut response, self.max_response_bytes)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| TraceError::MalformedReply(format!("{operation}: reply is not utf-8")))?;
        let reply = unwrap_json_string(&text);
        debug!(operation, reply = %reply, "traceability reply");
        Ok(reply)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses the base URL and enforces the scheme policy.
fn parse_base_url(base_url: &str, allow_http: bool) -> Result<Url, TraceError> {
    let mut url = Url::parse(base_url)
        .map_err(|_| TraceError::Transport(format!("invalid base url: {base_url}")))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        scheme => {
            return Err(TraceError::Transport(format!("unsupported url scheme: {scheme}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(TraceError::Transport("url credentials are not allowed".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Returns the reply text, unwrapping a body that is one JSON string.
fn unwrap_json_string(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('"')
        && let Ok(inner) = serde_json::from_str::<String>(trimmed)
    {
        return inner;
    }
    trimmed.to_string()
}

/// Reads a reply body without exceeding the size limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, TraceError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| TraceError::Transport("reply size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(TraceError::Transport("reply exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|_| TraceError::Transport("failed to read reply".to_string()))?;
    if buf.len() > max_bytes {
        return Err(TraceError::Transport("reply exceeds size limit".to_string()));
    }
    Ok(buf)
}
