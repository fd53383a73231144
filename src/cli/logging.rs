//! Logging initialization

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count, `None` when logging stays off
fn verbosity_directive(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Initialize logging from `-v` flags, `RUST_LOG` and `--log-file`
///
/// Silent by default so stdout carries only the tree. `RUST_LOG` takes
/// precedence over `-v`. Logs go to stderr, or to `log_file` without ANSI.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match verbosity_directive(verbosity) {
            Some(directive) => EnvFilter::new(directive),
            // A log file without -v still gets something useful
            None if log_file.is_some() => EnvFilter::new("debug"),
            None => return Ok(()),
        },
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_writer(file)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
