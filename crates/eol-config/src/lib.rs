// crates/eol-config/src/lib.rs
// ============================================================================
// Module: EOL Station Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for eol-station.toml semantics.
// Dependencies: eol-core, serde, toml
// ============================================================================

//! ## Overview
//! `eol-config` defines the configuration model for an EOL station. It
//! provides strict, fail-closed validation and resolves the configured test
//! sequence at load time.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
