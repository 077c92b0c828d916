// crates/eol-steps/src/netscan.rs
// ============================================================================
// Module: Subnet Scanner
// Description: Concurrent ping sweep over the fixture address range.
// Purpose: Find the device under test on the fixture network.
// Dependencies: crossbeam-channel, eol-config, regex, thiserror, tracing
// ============================================================================

//! ## Overview
//! The device takes an address from the fixture access point's pool, so the
//! station sweeps the configured range. Candidates are queued on a shared
//! channel and a fixed pool of scoped worker threads probes them; responders
//! travel back on a second channel. The sweep returns only after every
//! worker has finished, with responders sorted by address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::Ipv4Addr;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use eol_config::NetworkConfig;
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::process::CommandError;
use crate::process::CommandRunner;
use crate::process::ProcessRunner;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Probe errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The probe command could not be run.
    #[error(transparent)]
    Command(#[from] CommandError),
}

// ============================================================================
// SECTION: Probing
// ============================================================================

/// Outcome of probing one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The host answered, with the round-trip time when reported.
    Alive(Option<Duration>),
    /// No answer.
    Silent,
}

/// Checks whether one address is reachable.
pub trait HostProber {
    /// Probes `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the probe itself fails.
    fn probe(&self, address: Ipv4Addr) -> Result<Probe, ScanError>;
}

/// Prober running the platform `ping` once per address.
#[derive(Debug, Clone)]
pub struct PingProber<R = ProcessRunner> {
    /// Command runner.
    runner: R,
    /// Reply wait per ping.
    timeout: Duration,
}

impl PingProber<ProcessRunner> {
    /// Creates a prober that runs the system ping.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self::with_runner(ProcessRunner, timeout)
    }
}

impl<R> PingProber<R> {
    /// Creates a prober with an explicit command runner.
    #[must_use]
    pub const fn with_runner(runner: R, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

/// Process deadline added on top of the ping reply wait.
const PING_PROCESS_SLACK: Duration = Duration::from_secs(2);

impl<R: CommandRunner> HostProber for PingProber<R> {
    fn probe(&self, address: Ipv4Addr) -> Result<Probe, ScanError> {
        let args = ping_args(address, self.timeout);
        let output = self.runner.run("ping", &args, self.timeout + PING_PROCESS_SLACK)?;
        let rtt = parse_ping_rtt(&output.stdout);
        if output.success && (rtt.is_some() || is_echo_reply(&output.stdout)) {
            Ok(Probe::Alive(rtt))
        } else {
            Ok(Probe::Silent)
        }
    }
}

/// Builds single-echo ping arguments for the host platform.
#[must_use]
pub fn ping_args(address: Ipv4Addr, timeout: Duration) -> Vec<String> {
    if cfg!(windows) {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().to_string(),
            address.to_string(),
        ]
    } else {
        let seconds = timeout.as_millis().div_ceil(1000).max(1);
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            seconds.to_string(),
            address.to_string(),
        ]
    }
}

/// Windows summary line, for example `Average = 1ms`.
static WINDOWS_AVERAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)Average\s*=\s*(\d+)\s*ms").ok());
/// Unix summary line, for example `rtt min/avg/max/mdev = 0.1/0.2/0.3/0.0 ms`.
static UNIX_AVERAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"=\s*[\d.]+/([\d.]+)/[\d.]+").ok());

/// Echo reply line, for example `Reply from 10.0.0.1: bytes=32 time<1ms TTL=64`.
static ECHO_REPLY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\bttl=\d+").ok());

/// Returns true when ping output carries a real echo reply.
///
/// Windows ping exits zero when a gateway answers "Destination host
/// unreachable", so the exit status alone does not prove the host is up.
#[must_use]
pub fn is_echo_reply(stdout: &str) -> bool {
    ECHO_REPLY.as_ref().is_some_and(|pattern| pattern.is_match(stdout))
}

/// Extracts the average round-trip time from ping output.
#[must_use]
pub fn parse_ping_rtt(stdout: &str) -> Option<Duration> {
    capture(WINDOWS_AVERAGE.as_ref(), stdout)
        .or_else(|| capture(UNIX_AVERAGE.as_ref(), stdout))
        .and_then(parse_millis)
}

/// Parses decimal milliseconds, keeping microsecond precision.
fn parse_millis(text: &str) -> Option<Duration> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let whole = whole.parse::<u64>().ok()?;
    let micros = format!("{:0<3}", fraction.get(.. 3).unwrap_or(fraction));
    let micros = micros.parse::<u64>().ok()?;
    Some(Duration::from_millis(whole) + Duration::from_micros(micros))
}

/// Returns the first capture group of `pattern` in `text`.
fn capture<'t>(pattern: Option<&Regex>, text: &'t str) -> Option<&'t str> {
    pattern?.captures(text)?.get(1).map(|group| group.as_str())
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

/// Address that answered the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Responder {
    /// Responding address.
    pub address: Ipv4Addr,
    /// Average round-trip time, when reported.
    pub rtt: Option<Duration>,
}

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Responders sorted by address.
    pub responders: Vec<Responder>,
    /// Number of addresses probed.
    pub probed: usize,
}

impl ScanReport {
    /// Returns the lowest responding address.
    #[must_use]
    pub fn first(&self) -> Option<Ipv4Addr> {
        self.responders.first().map(|responder| responder.address)
    }
}

/// Concurrent sweep over `first..=last`.
///
/// # Invariants
/// - `first` and `last` share the first three octets and `first <= last`.
/// - `workers >= 1`.
#[derive(Debug, Clone)]
pub struct SubnetScanner<P> {
    /// First candidate.
    first: Ipv4Addr,
    /// Last candidate, inclusive.
    last: Ipv4Addr,
    /// Worker thread count.
    workers: usize,
    /// Address prober.
    prober: P,
}

impl SubnetScanner<PingProber> {
    /// Creates a ping scanner from validated network settings.
    #[must_use]
    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.first, config.last, config.workers, PingProber::new(config.ping_timeout()))
    }
}

impl<P: HostProber + Sync> SubnetScanner<P> {
    /// Creates a scanner.
    #[must_use]
    pub fn new(first: Ipv4Addr, last: Ipv4Addr, workers: usize, prober: P) -> Self {
        Self { first, last, workers: workers.max(1), prober }
    }

    /// Returns the prober.
    #[must_use]
    pub const fn prober(&self) -> &P {
        &self.prober
    }

    /// Returns every candidate address in order.
    #[must_use]
    pub fn candidates(&self) -> Vec<Ipv4Addr> {
        let [a, b, c, low] = self.first.octets();
        let high = self.last.octets()[3];
        (low ..= high).map(|host| Ipv4Addr::new(a, b, c, host)).collect()
    }

    /// Probes every candidate and returns the responders.
    #[must_use]
    pub fn scan(&self) -> ScanReport {
        let candidates = self.candidates();
        let probed = candidates.len();
        let workers = self.workers.min(probed).max(1);
        info!(first = %self.first, last = %self.last, workers, "subnet scan started");

        let (work_tx, work_rx) = unbounded::<Ipv4Addr>();
        let (found_tx, found_rx) = unbounded::<Responder>();
        for address in candidates {
            let _ = work_tx.send(address);
        }
        drop(work_tx);

        thread::scope(|scope| {
            for _ in 0 .. workers {
                let work_rx = work_rx.clone();
                let found_tx = found_tx.clone();
                let prober = &self.prober;
                scope.spawn(move || {
                    while let Ok(address) = work_rx.recv() {
                        match prober.probe(address) {
                            Ok(Probe::Alive(rtt)) => {
                                debug!(address = %address, ?rtt, "host answered");
                                let _ = found_tx.send(Responder { address, rtt });
                            }
                            Ok(Probe::Silent) => {}
                            Err(err) => warn!(address = %address, error = %err, "probe failed"),
                        }
                    }
                });
            }
        });
        drop(found_tx);

        let mut responders: Vec<Responder> = found_rx.iter().collect();
        responders.sort_by_key(|responder| responder.address);
        info!(responders = responders.len(), probed, "subnet scan finished");
        ScanReport { responders, probed }
    }
}
