use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{format_err, Context, Error};
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// The terminal belongs to the UI, so events go to a file
pub fn default_log_path() -> Option<PathBuf> {
    dirs_next::data_dir().map(|dir| dir.join("foliodash").join("foliodash.log"))
}

/// Filter comes from `RUST_LOG`, falling back to `info`
pub fn init_logging(path: &Path) -> Result<(), Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Could not create log directory {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| format_err!("Could not initialize logging: {}", e))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging initialized");

    Ok(())
}
