//! Logging init: file under XDG state dir, or graceful fallback to stderr.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,rtrack=debug,rtrack_core=debug";

/// `$XDG_STATE_HOME/rtrack/rtrack.log`. The prefixed state home already ends
/// in `rtrack`.
fn log_file_in(xdg_dirs: &xdg::BaseDirectories) -> PathBuf {
    xdg_dirs.get_state_home().join("rtrack.log")
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))
}

/// Initialize structured logging to `~/.local/state/rtrack/rtrack.log`.
/// Returns Err if the log file cannot be opened so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rtrack")?;
    let path = log_file_in(&xdg_dirs);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    install(Mutex::new(file))?;
    tracing::info!("rtrack logging initialized at {}", path.display());
    Ok(())
}

/// Logging to stderr only. Used when [`init_logging`] fails.
pub fn init_logging_stderr() {
    let _ = install(std::io::stderr);
}
