//! Logging configuration for show-table.
//!
//! Logs go to stderr by default, or to a file when the operator asks for one.
//! `RUST_LOG` always wins over the level derived from the report's debug flag.

use std::fs::{self, File};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Returns the filter used when `RUST_LOG` is not set.
fn default_filter(debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter(debug))
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes logging to the given file.
///
/// Falls back to stderr if the file cannot be created, so a bad path never
/// silences the server.
pub fn init_file_logging(log_path: &Path, debug: bool) {
    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            init_stderr_logging(debug);
            return;
        }
    }

    let log_file = match File::options().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {e}");
            init_stderr_logging(debug);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(default_filter(debug))
        .with_writer(log_file)
        .with_ansi(false) // No ANSI colors in file output
        .init();
}
