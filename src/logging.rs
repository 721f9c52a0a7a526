//! Tracing setup for the drive server.
//!
//! Events go to stdout, and to a log file as well when `[logging] file` is
//! set. `RUST_LOG` directives are honoured on top of the configured level, so
//! e.g. `RUST_LOG=tower_http=debug` shows per-request traces.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Map a configured level name to a tracing level. Unknown names mean `info`.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(parse_level(level).into())
}

/// Create (or truncate) the log file, along with any missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(File::create(path)?)
}

/// Install the global subscriber described by `[logging]`.
///
/// Fails only when the log file cannot be created; the caller can then fall
/// back to [`init_console_only`].
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(path) = config.file.as_deref() else {
        init_console_only(&config.level);
        return Ok(());
    };

    let log_file = Arc::new(open_log_file(Path::new(path))?);

    // No ANSI colours, since the same lines land in the file
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout.and(log_file))
        .with_ansi(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(level_filter(&config.level))
        .init();

    Ok(())
}

/// Install a colourised stdout-only subscriber.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(level_filter(level))
        .init();
}
