// crates/eol-steps/src/lib.rs
// ============================================================================
// Module: EOL Station Steps
// Description: Built-in test steps, the step registry, and device tooling.
// Purpose: Execute the configured test sequence against a real device.
// Dependencies: crossbeam-channel, eol-config, eol-core, regex, tracing
// ============================================================================

//! ## Overview
//! [`StepRegistry`] implements [`eol_core::StepRunner`] for the sequencer.
//! Steps reach the device through [`SubnetScanner`] and [`Adb`], both of
//! which run external tools via [`CommandRunner`].

pub mod adb;
pub mod netscan;
pub mod process;
pub mod registry;
pub mod steps;

pub use adb::Adb;
pub use adb::AdbError;
pub use netscan::HostProber;
pub use netscan::PingProber;
pub use netscan::Probe;
pub use netscan::Responder;
pub use netscan::ScanError;
pub use netscan::ScanReport;
pub use netscan::SubnetScanner;
pub use process::CommandError;
pub use process::CommandOutput;
pub use process::CommandRunner;
pub use process::ProcessRunner;
pub use registry::StepRegistry;
pub use steps::AdbConnectStep;
pub use steps::AppCheckStep;
pub use steps::NetworkScanStep;
pub use steps::POWER_ON_PROMPT;
pub use steps::SystemStartStep;
