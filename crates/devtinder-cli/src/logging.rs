//! File-backed `tracing` setup. The terminal belongs to the UI, so nothing is
//! written to stdout or stderr once the TUI is up.

use std::fs;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "devtinder=info";

pub fn init() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("devtinder");
    fs::create_dir_all(&dir)?;
    let path = dir.join("devtinder.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .json()
            .try_init()
            .map_err(|err| err.to_string())?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init()
            .map_err(|err| err.to_string())?;
    }
    Ok(path)
}
