//! Tracing setup for Eddy
//!
//! The console shows what the operator asked for. The run log keeps every
//! upstream call made by the Eddy crates (provider key, action, outcome)
//! together with request spans from the HTTP layer, so a slow or failing
//! provider can be traced back after the fact without drowning in
//! connection-pool chatter from hyper and reqwest.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Name of the per-run log file inside the logs directory.
pub const RUN_LOG_FILE: &str = "eddy-last-run.log";

const EDDY_TARGETS: &[&str] = &["eddy_core", "eddy_search", "eddy_web", "eddy"];

/// Filter for the run log: Eddy crates at TRACE, HTTP request spans at
/// DEBUG, transport internals at INFO.
pub fn run_log_filter() -> EnvFilter {
    let mut directives = vec!["info".to_string(), "tower_http=debug".to_string()];
    directives.extend(EDDY_TARGETS.iter().map(|target| format!("{target}=trace")));
    EnvFilter::new(directives.join(","))
}

/// Path of the run log for `logs_dir` (default `./logs`).
pub fn run_log_path(logs_dir: Option<&Path>) -> PathBuf {
    logs_dir.unwrap_or_else(|| Path::new("logs")).join(RUN_LOG_FILE)
}

/// Installs the global subscriber: console at `console_level` (or
/// `RUST_LOG` when set) plus the run log, truncated on every start.
///
/// # Errors
///
/// - `Box<dyn std::error::Error>` - If logs directory cannot be created or log file cannot be opened for writing
pub fn init_tracing(
    console_level: Level,
    logs_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_file_path = run_log_path(logs_dir);
    if let Some(parent) = log_file_path.parent() {
        create_dir_all(parent)?;
    }
    let log_file = File::create(&log_file_path)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_filter(console_filter);

    // Span close events carry the elapsed time of each API request.
    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(log_file)
        .with_filter(run_log_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        console = %console_level,
        run_log = %log_file_path.display(),
        "Tracing initialized"
    );

    Ok(())
}

/// CLI log levels for user control
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Informational, warning, and error messages
    Info,
    /// Debug, informational, warning, and error messages
    Debug,
    /// All messages including detailed tracing
    Trace,
}

impl CliLogLevel {
    /// Converts CLI log level to tracing Level enum.
    ///
    /// # Examples
    /// ```
    /// use eddy_core::tracing_setup::CliLogLevel;
    ///
    /// let level = CliLogLevel::Info.as_tracing_level();
    /// assert_eq!(level, tracing::Level::INFO);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::str::FromStr for CliLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(CliLogLevel::Error),
            "warn" => Ok(CliLogLevel::Warn),
            "info" => Ok(CliLogLevel::Info),
            "debug" => Ok(CliLogLevel::Debug),
            "trace" => Ok(CliLogLevel::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliLogLevel::Error => write!(f, "error"),
            CliLogLevel::Warn => write!(f, "warn"),
            CliLogLevel::Info => write!(f, "info"),
            CliLogLevel::Debug => write!(f, "debug"),
            CliLogLevel::Trace => write!(f, "trace"),
        }
    }
}
