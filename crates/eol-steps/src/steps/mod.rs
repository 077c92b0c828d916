// crates/eol-steps/src/steps/mod.rs
// ============================================================================
// Module: Built-in Test Steps
// Description: Step implementations dispatched by the registry.
// Purpose: Group the power-on check, device discovery, and adb checks.
// Dependencies: eol-core
// ============================================================================

//! ## Overview
//! Each step implements [`eol_core::TestStep`]. Discovery runs first and
//! stores the device address in the step context; adb steps read it.

mod adb_connect;
mod app_check;
mod network_scan;
mod system_start;

pub use adb_connect::AdbConnectStep;
pub use app_check::AppCheckStep;
pub use network_scan::NetworkScanStep;
pub use system_start::POWER_ON_PROMPT;
pub use system_start::SystemStartStep;
