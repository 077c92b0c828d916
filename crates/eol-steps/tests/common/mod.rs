// crates/eol-steps/tests/common/mod.rs
// ============================================================================
// Module: EOL Steps Test Doubles
// Description: Scripted command runner, prober, and console.
// Purpose: Exercise steps and the scanner without ping, adb, or a device.
// ============================================================================

#![allow(dead_code, reason = "Each test binary uses a subset of the doubles.")]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use eol_config::AdbConfig;
use eol_config::StationConfig;
use eol_config::config_toml_example;
use eol_core::ConsoleError;
use eol_core::EmployeeId;
use eol_core::Notice;
use eol_core::OperatorConsole;
use eol_core::SerialNumber;
use eol_steps::Adb;
use eol_steps::CommandError;
use eol_steps::CommandOutput;
use eol_steps::CommandRunner;
use eol_steps::HostProber;
use eol_steps::Probe;
use eol_steps::ScanError;

// ============================================================================
// SECTION: Command Runner
// ============================================================================

/// Reply function for [`ScriptedRunner`].
type Reply = dyn Fn(&str, &[String]) -> Result<CommandOutput, CommandError> + Send + Sync;

/// Runner that answers through a closure and logs every invocation.
#[derive(Clone)]
pub struct ScriptedRunner {
    reply: Arc<Reply>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl ScriptedRunner {
    pub fn new(
        reply: impl Fn(&str, &[String]) -> Result<CommandOutput, CommandError> + Send + Sync + 'static,
    ) -> Self {
        Self { reply: Arc::new(reply), calls: Arc::default() }
    }

    /// Runner where every command succeeds with the same stdout.
    pub fn always(stdout: &'static str) -> Self {
        Self::new(move |_, _| Ok(CommandOutput::ok(stdout)))
    }

    /// Arguments of every call, joined with spaces.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, args)| args.join(" ")).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        _timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push((program.to_string(), args.to_vec()));
        (self.reply)(program, args)
    }
}

/// adb client over a scripted runner with default settings.
pub fn adb(runner: ScriptedRunner) -> Arc<Adb<ScriptedRunner>> {
    Arc::new(Adb::with_runner(runner, &AdbConfig::default()))
}

// ============================================================================
// SECTION: Prober
// ============================================================================

/// Prober with a fixed set of live and failing addresses.
#[derive(Default)]
pub struct SetProber {
    pub alive: BTreeSet<Ipv4Addr>,
    pub failing: BTreeSet<Ipv4Addr>,
    pub probed: Mutex<Vec<Ipv4Addr>>,
}

impl SetProber {
    pub fn alive(hosts: &[u8]) -> Self {
        Self {
            alive: hosts.iter().map(|host| Ipv4Addr::new(192, 168, 17, *host)).collect(),
            ..Self::default()
        }
    }
}

impl HostProber for SetProber {
    fn probe(&self, address: Ipv4Addr) -> Result<Probe, ScanError> {
        self.probed.lock().unwrap().push(address);
        if self.failing.contains(&address) {
            return Err(ScanError::Command(CommandError::Spawn {
                program: "ping".to_string(),
                message: "not found".to_string(),
            }));
        }
        if self.alive.contains(&address) {
            Ok(Probe::Alive(Some(Duration::from_millis(1))))
        } else {
            Ok(Probe::Silent)
        }
    }
}

// ============================================================================
// SECTION: Console
// ============================================================================

/// Console answering image confirmations with a fixed answer.
///
/// `None` behaves like a closed console.
pub struct ConfirmConsole {
    pub answer: Option<bool>,
    pub images: RefCell<Vec<PathBuf>>,
}

impl ConfirmConsole {
    pub fn closed() -> Self {
        Self { answer: None, images: RefCell::default() }
    }

    pub fn answering(answer: bool) -> Self {
        Self { answer: Some(answer), images: RefCell::default() }
    }
}

impl OperatorConsole for ConfirmConsole {
    fn prompt_employee(&self) -> Result<Option<EmployeeId>, ConsoleError> {
        Ok(None)
    }

    fn prompt_serial(&self) -> Result<Option<SerialNumber>, ConsoleError> {
        Ok(None)
    }

    fn confirm_image(&self, _message: &str, image: &Path) -> Result<bool, ConsoleError> {
        self.images.borrow_mut().push(image.to_path_buf());
        self.answer.ok_or(ConsoleError::Closed)
    }

    fn notify(&self, _notice: &Notice) {}
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

pub fn serial() -> SerialNumber {
    SerialNumber::new("SN0000000000000000000000000001")
}

pub fn device() -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 17, 120)
}

/// The documented example config.
pub fn example_config() -> StationConfig {
    StationConfig::from_toml_str(&config_toml_example()).unwrap()
}
