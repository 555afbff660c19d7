use crate::error::VoiceAgentError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "voice-agent.log";

/// HTTP client internals that are too chatty at debug level
const QUIET_TARGETS: [&str; 4] = ["hyper=warn", "h2=warn", "rustls=warn", "reqwest=info"];

/// Filter directive for a configured level.
///
/// `RUST_LOG` replaces this entirely when set.
fn default_directive(level: Level) -> String {
    let mut directive = level.to_string().to_lowercase();
    for target in QUIET_TARGETS {
        directive.push(',');
        directive.push_str(target);
    }
    directive
}

fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), VoiceAgentError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        VoiceAgentError::config(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    let path = log_dir.join(LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            VoiceAgentError::config(format!("Failed to open log file {}: {}", path.display(), e))
        })?;

    Ok((file, path))
}

/// Initialize logging to the console and `log_dir/voice-agent.log`.
///
/// The console stays compact. The file additionally records thread ids and
/// closes of per-request spans, which carry the request latency.
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), VoiceAgentError> {
    let (log_file, log_file_path) = open_log_file(log_dir)?;
    let level = parse_log_level(log_level);

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_filter(build_filter(level.unwrap_or(Level::INFO)));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(build_filter(level.unwrap_or(Level::INFO)));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| VoiceAgentError::config(format!("Failed to initialize logging: {}", e)))?;

    if level.is_none() {
        tracing::warn!("Unknown LOG_LEVEL '{}', using info", log_level);
    }
    tracing::info!("Logging to {}", log_file_path.display());

    Ok(())
}

/// Console-only logging, for the probe subcommand
pub fn setup_console_logging(log_level: &str) -> Result<(), VoiceAgentError> {
    let level = parse_log_level(log_level);

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(build_filter(level.unwrap_or(Level::INFO)))
        .try_init()
        .map_err(|e| VoiceAgentError::config(format!("Failed to initialize logging: {}", e)))?;

    if level.is_none() {
        tracing::warn!("Unknown log level '{}', using info", log_level);
    }

    Ok(())
}

/// Parse a level name; `None` when it is not one of the five tracing levels
pub fn parse_log_level(level: &str) -> Option<Level> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}
