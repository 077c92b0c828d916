// crates/eol-config/src/config.rs
// ============================================================================
// Module: EOL Station Configuration
// Description: Configuration loading and validation for the EOL station.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: eol-core, regex, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded once from a TOML file with strict size and path
//! limits, validated, and then passed by reference to every collaborator.
//! The configured test sequence is resolved against the built-in steps and
//! the declared `[checks.*]` tables during validation, so an unknown step
//! name is a load error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use eol_core::PartNumber;
use eol_core::ProcessName;
use eol_core::StationName;
use eol_core::StationSettings;
use eol_core::StepId;
use eol_core::TestSequence;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "eol-station.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "EOL_STATION_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default serial number length in characters.
pub(crate) const DEFAULT_SERIAL_LENGTH: usize = 30;
/// Maximum serial number length in characters.
pub(crate) const MAX_SERIAL_LENGTH: usize = 128;
/// Default operator idle timeout in minutes.
pub(crate) const DEFAULT_OPERATOR_TIMEOUT_MINUTES: u32 = 30;
/// Maximum operator idle timeout in minutes.
pub(crate) const MAX_OPERATOR_TIMEOUT_MINUTES: u32 = 24 * 60;
/// Default traceability request timeout in milliseconds.
pub(crate) const DEFAULT_TRACE_TIMEOUT_MS: u64 = 10_000;
/// Minimum traceability request timeout in milliseconds.
pub(crate) const MIN_TRACE_TIMEOUT_MS: u64 = 500;
/// Maximum traceability request timeout in milliseconds.
pub(crate) const MAX_TRACE_TIMEOUT_MS: u64 = 60_000;
/// Default maximum traceability reply size in bytes.
pub(crate) const DEFAULT_TRACE_MAX_RESPONSE_BYTES: usize = 64 * 1024;
/// Maximum allowed traceability reply size in bytes.
pub(crate) const MAX_TRACE_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Default first scan address.
pub(crate) const DEFAULT_SCAN_FIRST: Ipv4Addr = Ipv4Addr::new(192, 168, 17, 101);
/// Default last scan address.
pub(crate) const DEFAULT_SCAN_LAST: Ipv4Addr = Ipv4Addr::new(192, 168, 17, 249);
/// Default scan worker count.
pub(crate) const DEFAULT_SCAN_WORKERS: usize = 20;
/// Maximum scan worker count.
pub(crate) const MAX_SCAN_WORKERS: usize = 64;
/// Default per-address ping timeout in milliseconds.
pub(crate) const DEFAULT_PING_TIMEOUT_MS: u64 = 1_000;
/// Minimum per-address ping timeout in milliseconds.
pub(crate) const MIN_PING_TIMEOUT_MS: u64 = 100;
/// Maximum per-address ping timeout in milliseconds.
pub(crate) const MAX_PING_TIMEOUT_MS: u64 = 10_000;
/// Default ADB TCP port.
pub(crate) const DEFAULT_ADB_PORT: u16 = 5555;
/// Default ADB command timeout in milliseconds.
pub(crate) const DEFAULT_ADB_TIMEOUT_MS: u64 = 10_000;
/// Minimum ADB command timeout in milliseconds.
pub(crate) const MIN_ADB_TIMEOUT_MS: u64 = 500;
/// Maximum ADB command timeout in milliseconds.
pub(crate) const MAX_ADB_TIMEOUT_MS: u64 = 300_000;
/// Maximum number of application checks.
pub(crate) const MAX_CHECKS: usize = 64;
/// Maximum arguments per application check.
pub(crate) const MAX_CHECK_ARGS: usize = 64;
/// Maximum length of a check or step name.
pub(crate) const MAX_NAME_LENGTH: usize = 64;
/// Accepted log levels.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
/// Default log rotation size (25 MiB).
const DEFAULT_LOG_MAX_BYTES: u64 = 25 * 1024 * 1024;
/// Default number of rotated log files.
const DEFAULT_LOG_BACKUPS: u32 = 10;
/// Smallest accepted rotation size.
const MIN_LOG_FILE_BYTES: u64 = 1024;
/// Largest accepted backup count.
const MAX_LOG_BACKUPS: u32 = 100;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// EOL station configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    /// Station identity and operator settings.
    pub station: StationSection,
    /// Traceability service settings.
    #[serde(default)]
    pub traceability: TraceabilityConfig,
    /// Test sequence settings.
    pub sequence: SequenceConfig,
    /// Operator prompt settings.
    #[serde(default)]
    pub prompts: PromptsConfig,
    /// Subnet scan settings.
    #[serde(default)]
    pub network: NetworkConfig,
    /// ADB settings.
    #[serde(default)]
    pub adb: AdbConfig,
    /// Application checks keyed by step name.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
    /// History log settings.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Diagnostic logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StationConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.station.validate()?;
        self.traceability.validate()?;
        self.prompts.validate()?;
        self.network.validate()?;
        self.adb.validate()?;
        self.history.validate()?;
        self.logging.validate()?;
        self.sequence.validate()?;
        if self.checks.len() > MAX_CHECKS {
            return Err(ConfigError::Invalid("too many checks".to_string()));
        }
        for (name, check) in &self.checks {
            validate_check_name(name)?;
            check.validate(name, &self.traceability)?;
        }
        self.test_sequence()?;
        Ok(())
    }

    /// Resolves the configured step names into a test sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unknown, blank, or duplicate steps.
    pub fn test_sequence(&self) -> Result<TestSequence, ConfigError> {
        let checks: BTreeSet<String> = self.checks.keys().cloned().collect();
        let resolved = match &self.sequence.steps {
            StepList::Names(names) => TestSequence::resolve(names.as_slice(), &checks),
            StepList::Csv(list) => TestSequence::resolve_list(list, &checks),
        };
        resolved.map_err(|err| ConfigError::Invalid(format!("sequence.steps: {err}")))
    }

    /// Returns the station cycle settings derived from this configuration.
    #[must_use]
    pub fn station_settings(&self) -> StationSettings {
        let mut settings = StationSettings::new(self.station.part_number.clone());
        settings.operator_timeout =
            time::Duration::minutes(i64::from(self.station.operator_timeout_minutes));
        settings.alternate_keys = self
            .checks
            .iter()
            .filter_map(|(name, check)| Some((name.clone(), check.alternate.clone()?)))
            .collect();
        settings
    }
}

/// Station identity settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationSection {
    /// Station name registered in traceability.
    pub name: StationName,
    /// Process name registered in traceability.
    pub process: ProcessName,
    /// Part number tested at this station.
    pub part_number: PartNumber,
    /// Required serial length in characters.
    #[serde(default = "default_serial_length")]
    pub serial_length: usize,
    /// Operator idle timeout in minutes.
    #[serde(default = "default_operator_timeout_minutes")]
    pub operator_timeout_minutes: u32,
}

impl StationSection {
    /// Validates station settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("station.name must be non-empty".to_string()));
        }
        if self.process.is_empty() {
            return Err(ConfigError::Invalid("station.process must be non-empty".to_string()));
        }
        if self.part_number.is_empty() {
            return Err(ConfigError::Invalid("station.part_number must be non-empty".to_string()));
        }
        if self.serial_length == 0 || self.serial_length > MAX_SERIAL_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "station.serial_length must be between 1 and {MAX_SERIAL_LENGTH}"
            )));
        }
        if self.operator_timeout_minutes == 0
            || self.operator_timeout_minutes > MAX_OPERATOR_TIMEOUT_MINUTES
        {
            return Err(ConfigError::Invalid(format!(
                "station.operator_timeout_minutes must be between 1 and \
                 {MAX_OPERATOR_TIMEOUT_MINUTES}"
            )));
        }
        Ok(())
    }
}

/// Traceability service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TraceabilityConfig {
    /// Whether remote calls are made.
    #[serde(default)]
    pub enabled: bool,
    /// Service base URL; each operation is posted to `{base_url}/{Operation}`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Allow plain `http` URLs.
    #[serde(default)]
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    #[serde(default = "default_trace_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum reply size in bytes.
    #[serde(default = "default_trace_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Numeric traceability alternate type per alternate key.
    #[serde(default)]
    pub alternate_types: BTreeMap<String, u32>,
}

impl Default for TraceabilityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            allow_http: false,
            timeout_ms: DEFAULT_TRACE_TIMEOUT_MS,
            max_response_bytes: DEFAULT_TRACE_MAX_RESPONSE_BYTES,
            alternate_types: BTreeMap::new(),
        }
    }
}

impl TraceabilityConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates traceability settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TRACE_TIMEOUT_MS ..= MAX_TRACE_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "traceability.timeout_ms must be between {MIN_TRACE_TIMEOUT_MS} and \
                 {MAX_TRACE_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_TRACE_MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "traceability.max_response_bytes must be between 1 and \
                 {MAX_TRACE_MAX_RESPONSE_BYTES}"
            )));
        }
        if self.alternate_types.keys().any(|key| key.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "traceability.alternate_types keys must be non-empty".to_string(),
            ));
        }
        match (&self.base_url, self.enabled) {
            (None, true) => Err(ConfigError::Invalid(
                "traceability.enabled requires traceability.base_url".to_string(),
            )),
            (Some(base_url), _) => validate_base_url(base_url, self.allow_http),
            (None, false) => Ok(()),
        }
    }
}

/// Step list written either as an array or a comma-separated string.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StepList {
    /// `steps = ["system_start", "wifi"]`.
    Names(Vec<String>),
    /// `steps = "system_start, wifi"`.
    Csv(String),
}

/// Test sequence settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SequenceConfig {
    /// Ordered step names.
    pub steps: StepList,
    /// Limits file naming the history columns.
    #[serde(default)]
    pub limits_file: Option<PathBuf>,
}

impl SequenceConfig {
    /// Validates sequence settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.limits_file {
            validate_path_string("sequence.limits_file", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Operator prompt settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptsConfig {
    /// Reference image shown by `system_start`.
    #[serde(default = "default_power_on_image")]
    pub power_on_image: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self { power_on_image: default_power_on_image() }
    }
}

impl PromptsConfig {
    /// Validates prompt settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("prompts.power_on_image", &self.power_on_image.to_string_lossy())
    }
}

/// Subnet scan settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// First address to probe.
    #[serde(default = "default_scan_first")]
    pub first: Ipv4Addr,
    /// Last address to probe (inclusive).
    #[serde(default = "default_scan_last")]
    pub last: Ipv4Addr,
    /// Worker thread count.
    #[serde(default = "default_scan_workers")]
    pub workers: usize,
    /// Per-address ping timeout in milliseconds.
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            first: DEFAULT_SCAN_FIRST,
            last: DEFAULT_SCAN_LAST,
            workers: DEFAULT_SCAN_WORKERS,
            ping_timeout_ms: DEFAULT_PING_TIMEOUT_MS,
        }
    }
}

impl NetworkConfig {
    /// Returns the per-address ping timeout.
    #[must_use]
    pub const fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    /// Validates scan settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let first = self.first.octets();
        let last = self.last.octets();
        if first[.. 3] != last[.. 3] {
            return Err(ConfigError::Invalid(
                "network.first and network.last must share one /24 subnet".to_string(),
            ));
        }
        if first[3] > last[3] {
            return Err(ConfigError::Invalid(
                "network.first must not be greater than network.last".to_string(),
            ));
        }
        if self.workers == 0 || self.workers > MAX_SCAN_WORKERS {
            return Err(ConfigError::Invalid(format!(
                "network.workers must be between 1 and {MAX_SCAN_WORKERS}"
            )));
        }
        if !(MIN_PING_TIMEOUT_MS ..= MAX_PING_TIMEOUT_MS).contains(&self.ping_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "network.ping_timeout_ms must be between {MIN_PING_TIMEOUT_MS} and \
                 {MAX_PING_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// ADB settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdbConfig {
    /// ADB executable name or path.
    #[serde(default = "default_adb_program")]
    pub program: String,
    /// Device TCP port.
    #[serde(default = "default_adb_port")]
    pub port: u16,
    /// Command timeout in milliseconds.
    #[serde(default = "default_adb_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            program: default_adb_program(),
            port: DEFAULT_ADB_PORT,
            timeout_ms: DEFAULT_ADB_TIMEOUT_MS,
        }
    }
}

impl AdbConfig {
    /// Returns the command timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates ADB settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("adb.program", &self.program)?;
        if self.port == 0 {
            return Err(ConfigError::Invalid("adb.port must be non-zero".to_string()));
        }
        if !(MIN_ADB_TIMEOUT_MS ..= MAX_ADB_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "adb.timeout_ms must be between {MIN_ADB_TIMEOUT_MS} and {MAX_ADB_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Application check run through ADB.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckConfig {
    /// ADB arguments, for example `["shell", "getprop", "ro.serialno"]`.
    pub args: Vec<String>,
    /// Substring stdout must contain for the check to pass.
    #[serde(default)]
    pub expect: Option<String>,
    /// Regex whose first group (or whole match) becomes the step value.
    #[serde(default)]
    pub capture: Option<String>,
    /// Alternate serial key for the captured value.
    #[serde(default)]
    pub alternate: Option<String>,
}

impl CheckConfig {
    /// Compiles the capture pattern, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the pattern does not compile.
    pub fn capture_regex(&self) -> Result<Option<Regex>, ConfigError> {
        self.capture
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|err| ConfigError::Invalid(format!("invalid capture regex: {err}")))
    }

    /// Validates a check.
    fn validate(&self, name: &str, trace: &TraceabilityConfig) -> Result<(), ConfigError> {
        if self.args.is_empty() {
            return Err(ConfigError::Invalid(format!("checks.{name}.args must be non-empty")));
        }
        if self.args.len() > MAX_CHECK_ARGS {
            return Err(ConfigError::Invalid(format!("checks.{name}.args has too many entries")));
        }
        if self.args.iter().any(|arg| arg.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "checks.{name}.args entries must be non-empty"
            )));
        }
        self.capture_regex().map_err(|err| match err {
            ConfigError::Invalid(message) => ConfigError::Invalid(format!("checks.{name}: {message}")),
            other => other,
        })?;
        if let Some(alternate) = &self.alternate {
            if self.capture.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "checks.{name}.alternate requires checks.{name}.capture"
                )));
            }
            if !trace.alternate_types.contains_key(alternate) {
                return Err(ConfigError::Invalid(format!(
                    "checks.{name}.alternate key {alternate} is not in \
                     traceability.alternate_types"
                )));
            }
        }
        Ok(())
    }
}

/// History log settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Directory holding the date-named CSV files.
    #[serde(default = "default_history_dir")]
    pub dir: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { dir: default_history_dir() }
    }
}

impl HistoryConfig {
    /// Validates history settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("history.dir", &self.dir.to_string_lossy())
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for the append-mode log file; stderr only when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Size in bytes at which the log file rotates.
    #[serde(default = "default_log_max_bytes")]
    pub max_file_bytes: u64,
    /// Rotated log files kept as `.1` through `.N`.
    #[serde(default = "default_log_backups")]
    pub backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            max_file_bytes: default_log_max_bytes(),
            backups: default_log_backups(),
        }
    }
}

impl LoggingConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if let Some(dir) = &self.dir {
            validate_path_string("logging.dir", &dir.to_string_lossy())?;
        }
        if self.max_file_bytes < MIN_LOG_FILE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "logging.max_file_bytes must be at least {MIN_LOG_FILE_BYTES}"
            )));
        }
        if self.backups > MAX_LOG_BACKUPS {
            return Err(ConfigError::Invalid(format!(
                "logging.backups must be at most {MAX_LOG_BACKUPS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default serial length.
const fn default_serial_length() -> usize {
    DEFAULT_SERIAL_LENGTH
}

/// Default operator timeout.
const fn default_operator_timeout_minutes() -> u32 {
    DEFAULT_OPERATOR_TIMEOUT_MINUTES
}

/// Default traceability timeout.
const fn default_trace_timeout_ms() -> u64 {
    DEFAULT_TRACE_TIMEOUT_MS
}

/// Default traceability reply limit.
const fn default_trace_max_response_bytes() -> usize {
    DEFAULT_TRACE_MAX_RESPONSE_BYTES
}

/// Default power-on reference image.
fn default_power_on_image() -> PathBuf {
    PathBuf::from("images/power_on.png")
}

/// Default first scan address.
const fn default_scan_first() -> Ipv4Addr {
    DEFAULT_SCAN_FIRST
}

/// Default last scan address.
const fn default_scan_last() -> Ipv4Addr {
    DEFAULT_SCAN_LAST
}

/// Default scan worker count.
const fn default_scan_workers() -> usize {
    DEFAULT_SCAN_WORKERS
}

/// Default ping timeout.
const fn default_ping_timeout_ms() -> u64 {
    DEFAULT_PING_TIMEOUT_MS
}

/// Default ADB program.
fn default_adb_program() -> String {
    "adb".to_string()
}

/// Default ADB port.
const fn default_adb_port() -> u16 {
    DEFAULT_ADB_PORT
}

/// Default ADB timeout.
const fn default_adb_timeout_ms() -> u64 {
    DEFAULT_ADB_TIMEOUT_MS
}

/// Default history directory.
fn default_history_dir() -> PathBuf {
    PathBuf::from("history")
}

/// Default log level.
fn default_log_level() -> String {
    "info".to_string()
}

/// Default log rotation size.
const fn default_log_max_bytes() -> u64 {
    DEFAULT_LOG_MAX_BYTES
}

/// Default rotated log count.
const fn default_log_backups() -> u32 {
    DEFAULT_LOG_BACKUPS
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the traceability base URL.
fn validate_base_url(value: &str, allow_http: bool) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("traceability.base_url: {err}")))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        "http" => {
            return Err(ConfigError::Invalid(
                "traceability.base_url uses http; set traceability.allow_http".to_string(),
            ));
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "traceability.base_url scheme {other} is not supported"
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("traceability.base_url must have a host".to_string()));
    }
    Ok(())
}

/// Validates an application check name.
fn validate_check_name(name: &str) -> Result<(), ConfigError> {
    if name.trim() != name || name.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "check name {name:?} must be non-empty without surrounding whitespace"
        )));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("check name {name} is too long")));
    }
    if name.contains(',') {
        return Err(ConfigError::Invalid(format!("check name {name} must not contain commas")));
    }
    if StepId::is_builtin_name(name) {
        return Err(ConfigError::Invalid(format!(
            "check name {name} collides with a built-in step"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    #[test]
    fn check_names_reject_builtins_and_commas() {
        assert!(validate_check_name("network_scan").is_err());
        assert!(validate_check_name("a,b").is_err());
        assert!(validate_check_name(" wifi").is_err());
        assert!(validate_check_name("wifi").is_ok());
    }

    #[test]
    fn base_url_requires_opt_in_for_http() {
        assert!(validate_base_url("http://trace.local/ws", false).is_err());
        assert!(validate_base_url("http://trace.local/ws", true).is_ok());
        assert!(validate_base_url("https://trace.local/ws", false).is_ok());
        assert!(validate_base_url("ftp://trace.local/ws", true).is_err());
    }

    #[test]
    fn path_string_limits_are_enforced() {
        assert!(validate_path_string("history.dir", "   ").is_err());
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let err = validate_path_string("history.dir", &long).unwrap_err();
        assert!(err.to_string().contains("path component too long"));
    }
}
