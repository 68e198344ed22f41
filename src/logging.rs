use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TASKTAB_LOG";

/// Data directory for the log and panic files.
pub fn data_dir() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "tasktab", "tasktab")?;
    let dir = proj.data_dir();
    if !dir.exists() {
        let _ = fs::create_dir_all(dir);
    }
    Some(dir.to_path_buf())
}

/// Sends tracing output to `tasktab.log`; stdout belongs to the terminal UI.
pub fn init_tracing() -> Result<Option<PathBuf>> {
    let Some(dir) = data_dir() else {
        return Ok(None);
    };
    let path = dir.join("tasktab.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("invalid {} filter: {e}", LOG_ENV))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(Some(path))
}
