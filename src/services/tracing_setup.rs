//! Logging setup
//!
//! Diagnostics go to `--log-file` when given, otherwise to stderr. stdout is
//! reserved for rendered lines. Verbosity comes from `CATLINE_LOG`, then
//! `RUST_LOG`, and defaults to warnings only.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "CATLINE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber
///
/// A subscriber that is already installed (e.g. by a test) is left alone.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if installed.is_ok() {
        tracing::debug!("Logging initialized");
    }
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
