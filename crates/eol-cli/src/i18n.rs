// crates/eol-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the station CLI.
// Purpose: Keep operator-facing text in one place for English and Spanish.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Operator prompts, notices, and CLI output are looked up in a small
//! catalog by key. All runtime output should be routed through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Es];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"serial"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self { key, value: value.into() }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "eol-station {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid: station {station}, {steps} steps."),
    ("logging.init_failed", "Failed to open log file {path}: {error}"),
    ("station.build_failed", "Failed to prepare the station: {error}"),
    ("station.limits_failed", "Failed to load limits: {error}"),
    ("station.cycle_failed", "Test cycle failed: {error}"),
    ("station.stopped", "Station stopped."),
    ("scan.header", "Scanning {first} to {last}..."),
    ("scan.responder", "{address} answered ({rtt})"),
    ("scan.rtt_unknown", "no rtt"),
    ("scan.summary", "{responders} of {probed} addresses answered."),
    ("console.employee", "Employee number (empty to quit): "),
    ("console.serial", "Device serial (empty to quit): "),
    ("console.power_on", "Does the device show this screen?"),
    ("console.image", "Reference image: {path}"),
    ("console.confirm", "{message} [y/n]: "),
    (
        "notice.serial_rejected",
        "Serial {serial} has {actual} characters; {expected} are required.",
    ),
    (
        "notice.part_number_mismatch",
        "Part number mismatch: station tests {expected}, serial belongs to {reported}.",
    ),
    ("notice.back_check_rejected", "Traceability rejected the device: {message}"),
    ("notice.step_failed", "Test {step} failed: {detail}"),
    ("notice.verdict.pass", "PASS: {serial}"),
    ("notice.verdict.fail", "FAIL: {serial}. Deliver the device to analysis."),
    ("notice.error_line", "[ERROR] {message}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'es'."),
];

/// Spanish catalog entries.
const CATALOG_ES: &[(&str, &str)] = &[
    ("main.version", "eol-station {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "salida"),
    ("output.write_failed", "No se pudo escribir en {stream}: {error}"),
    ("config.load_failed", "No se pudo cargar la configuración: {error}"),
    ("config.validate.ok", "Configuración válida: estación {station}, {steps} pruebas."),
    ("logging.init_failed", "No se pudo abrir el archivo de registro {path}: {error}"),
    ("station.build_failed", "No se pudo preparar la estación: {error}"),
    ("station.limits_failed", "No se pudieron cargar los límites: {error}"),
    ("station.cycle_failed", "Falló el ciclo de prueba: {error}"),
    ("station.stopped", "Estación detenida."),
    ("scan.header", "Buscando de {first} a {last}..."),
    ("scan.responder", "{address} respondió ({rtt})"),
    ("scan.rtt_unknown", "sin rtt"),
    ("scan.summary", "{responders} de {probed} direcciones respondieron."),
    ("console.employee", "Número de empleado (vacío para salir): "),
    ("console.serial", "Serie de la unidad (vacío para salir): "),
    ("console.power_on", "¿Se muestra esta pantalla?"),
    ("console.image", "Imagen de referencia: {path}"),
    ("console.confirm", "{message} [s/n]: "),
    (
        "notice.serial_rejected",
        "La serie {serial} tiene {actual} caracteres; se requieren {expected}.",
    ),
    (
        "notice.part_number_mismatch",
        "Número de parte incorrecto: la estación prueba {expected}, la serie pertenece a \
         {reported}.",
    ),
    ("notice.back_check_rejected", "Trazabilidad rechazó la unidad: {message}"),
    ("notice.step_failed", "Falló la prueba {step}: {detail}"),
    ("notice.verdict.pass", "PASA: {serial}"),
    ("notice.verdict.fail", "FALLA: {serial}. Entregar la unidad a análisis."),
    ("notice.error_line", "[ERROR] {message}"),
    ("i18n.lang.invalid_env", "Valor no válido para {env}: {value}. Se esperaba 'en' o 'es'."),
];

/// Returns the raw catalog entries for a locale.
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Es => CATALOG_ES,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_ES_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Es => CATALOG_ES_MAP.get_or_init(|| CATALOG_ES.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` in an explicit locale.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

#[cfg(test)]
#[path = "tests/i18n.rs"]
mod tests;
