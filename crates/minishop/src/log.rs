//! File logging for minishop, enabled with `--verbose`.
use anyhow::Context;
use minishop_core::get_data_dir;
use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::OffsetTime;

const LOG_FILE: &str = "minishop.log";
const MAX_LOG_BYTES: u64 = 100 * 1024;
const LOG_FILTER: &str = "minishop=debug,minishop_core=debug,rustyline=info";

/// Routes `tracing` output to `<data_dir>/minishop.log`.
///
/// # Errors
///
/// Fails when the data directory or log file cannot be prepared, or a
/// subscriber is already installed.
pub fn setup_logging() -> anyhow::Result<()> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let log_file = open_log_file(&data_dir.join(LOG_FILE), MAX_LOG_BYTES)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(LOG_FILTER)
        .with_writer(Mutex::new(LineWriter::new(log_file)))
        .with_ansi(false)
        .with_timer(OffsetTime::local_rfc_3339()?)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

/// Opens `path` for appending. A file already past `max_bytes` is first moved
/// to `<path>.old`, replacing the previous backup.
fn open_log_file(path: &Path, max_bytes: u64) -> io::Result<File> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => fs::rename(path, backup_path(path))?,
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".old");
    PathBuf::from(name)
}
