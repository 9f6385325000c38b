//! Logging init.
//!
//! Everything the filter lets through goes to `~/.local/state/brewgen/brewgen.log`;
//! warnings and errors are echoed to stderr as well, so a skipped platform or a
//! failed download is visible without opening the log. Stdout carries the
//! rendered formula, so logs never go there.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "info,brewgen=debug,brewgen_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Path of the log file under the XDG state directory.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("brewgen")?;
    Ok(xdg_dirs.get_state_home().join("brewgen").join("brewgen.log"))
}

/// File layer filtered by `RUST_LOG` (or the default filter), plus a
/// warnings-only stderr layer. Returns the log file path.
///
/// Fails if the log file cannot be opened; the caller can fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(env_filter());
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("install subscriber")?;

    tracing::info!("brewgen logging initialized at {}", path.display());
    Ok(path)
}

/// Logs to stderr only, filtered like the file log. Used when the file can't be opened.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .try_init();
}
