// crates/eol-cli/src/main.rs
// ============================================================================
// Module: EOL Station CLI Entry Point
// Description: Command dispatcher for the station loop and maintenance tasks.
// Purpose: Provide a localized CLI for running and checking a test station.
// Dependencies: clap, eol-config, eol-core, eol-history, eol-steps, eol-trace, tracing
// ============================================================================

//! ## Overview
//! `eol-station run` loads the station configuration, wires traceability,
//! the step registry, the limits, and the CSV history into a
//! [`Station`], and tests devices until the operator quits. `scan` runs the
//! subnet sweep alone, which helps when commissioning a fixture. All
//! user-facing strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use eol_cli::console::TerminalConsole;
use eol_cli::i18n::Locale;
use eol_cli::i18n::set_locale;
use eol_cli::log_file::RotatingLogFile;
use eol_cli::t;
use eol_config::LoggingConfig;
use eol_config::StationConfig;
use eol_config::config_toml_example;
use eol_core::CycleOutcome;
use eol_core::Sequencer;
use eol_core::Station;
use eol_core::StationError;
use eol_core::SystemClock;
use eol_history::CsvHistory;
use eol_steps::Adb;
use eol_steps::StepRegistry;
use eol_steps::SubnetScanner;
use eol_trace::TraceClient;
use thiserror::Error;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "EOL_STATION_LANG";
/// File name of the diagnostic log inside `[logging].dir`.
const LOG_FILE_NAME: &str = "eol-station.log";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "eol-station", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `EOL_STATION_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the station loop.
    Run(RunCommand),
    /// Sweep the fixture network and list responding addresses.
    Scan(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a station configuration file.
    Validate(ConfigArgs),
    /// Print a documented example configuration.
    Example,
}

/// Config file selection shared by commands.
#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Optional config file path (defaults to eol-station.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the station loop.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Test a single device and exit.
    #[arg(long)]
    once: bool,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum LangArg {
    /// English.
    En,
    /// Spanish.
    Es,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Es => Self::Es,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self { message }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    set_locale(resolve_locale(cli.lang, env_lang.as_deref())?);

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(&command),
        Commands::Scan(command) => command_scan(&command),
        Commands::Config { command } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Loads and validates the station configuration.
fn load_config(args: &ConfigArgs) -> CliResult<StationConfig> {
    StationConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the station loop.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    init_tracing(&config.logging)?;
    info!(station = %config.station.name, part_number = %config.station.part_number, "station starting");

    let sequence = config
        .test_sequence()
        .map_err(|err| CliError::new(t!("station.build_failed", error = err)))?;
    let history = CsvHistory::from_config(&config, &sequence)
        .map_err(|err| CliError::new(t!("station.limits_failed", error = err)))?;
    let registry = StepRegistry::from_config(&config)
        .map_err(|err| CliError::new(t!("station.build_failed", error = err)))?;
    let sequencer = Sequencer::new(sequence, registry, history.limits().to_vec())
        .map_err(|err| CliError::new(t!("station.build_failed", error = err)))?;
    let trace = TraceClient::from_config(&config)
        .map_err(|err| CliError::new(t!("station.build_failed", error = err)))?;

    let mut station = Station::new(
        config.station_settings(),
        TerminalConsole::stdio(),
        trace,
        sequencer,
        history,
        SystemClock,
    );
    let result = station_loop(&mut station, command.once);

    if let Err(err) = Adb::from_config(&config.adb).kill_server() {
        warn!(error = %err, "adb server shutdown failed");
    }
    result?;
    write_stdout_line(&t!("station.stopped"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Tests devices until the operator quits, or once with `once`.
///
/// Traceability and history failures end the current device only; a
/// console failure stops the loop.
fn station_loop<C, T, R, H, K>(station: &mut Station<C, T, R, H, K>, once: bool) -> CliResult<()>
where
    C: eol_core::OperatorConsole,
    T: eol_core::Traceability,
    R: eol_core::StepRunner,
    H: eol_core::HistorySink,
    K: eol_core::Clock,
{
    loop {
        match station.run_cycle() {
            Ok(CycleOutcome::Aborted) => return Ok(()),
            Ok(outcome) => {
                if let Some(record) = outcome.record() {
                    info!(serial = %record.serial, verdict = record.verdict.as_str(), "device done");
                }
            }
            Err(StationError::Console(err)) => {
                error!(error = %err, "operator console failed");
                return Err(CliError::new(t!("station.cycle_failed", error = err)));
            }
            Err(err) => {
                error!(error = %err, "cycle failed");
                let message = t!("station.cycle_failed", error = err);
                if once {
                    return Err(CliError::new(message));
                }
                let _ = write_stderr_line(&message);
            }
        }
        if once {
            return Ok(());
        }
    }
}

// ============================================================================
// SECTION: Scan Command
// ============================================================================

/// Executes the subnet sweep.
fn command_scan(command: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(command)?;
    init_tracing(&config.logging)?;
    let network = &config.network;
    write_stdout_line(&t!("scan.header", first = network.first, last = network.last))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    let report = SubnetScanner::from_config(network).scan();
    for responder in &report.responders {
        let rtt = responder
            .rtt
            .map_or_else(|| t!("scan.rtt_unknown"), |rtt| format!("{} ms", rtt.as_millis()));
        write_stdout_line(&t!("scan.responder", address = responder.address, rtt = rtt))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    write_stdout_line(&t!(
        "scan.summary",
        responders = report.responders.len(),
        probed = report.probed
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => command_config_validate(&args),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    let steps = config
        .test_sequence()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?
        .len();
    write_stdout_line(&t!("config.validate.ok", station = config.station.name, steps = steps))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Installs the tracing subscriber: stderr plus an optional rotating log file.
fn init_tracing(logging: &LoggingConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let file = match &logging.dir {
        Some(dir) => Some(open_log_file(dir, logging).map_err(|err| {
            CliError::new(t!(
                "logging.init_failed",
                path = dir.join(LOG_FILE_NAME).display(),
                error = err
            ))
        })?),
        None => None,
    };
    let file_layer =
        file.map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        warn!("tracing subscriber already installed");
    }
    Ok(())
}

/// Opens the rotating log file inside `dir`.
fn open_log_file(dir: &Path, logging: &LoggingConfig) -> std::io::Result<RotatingLogFile> {
    RotatingLogFile::open(dir, LOG_FILE_NAME, logging.max_file_bytes, logging.backups)
}

// ============================================================================
// SECTION: Locale
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
