//! File-backed `tracing` output.
//!
//! The terminal belongs to the chat UI, so diagnostics never go to stdout or
//! stderr. They are written to a file only when asked for, either with
//! `--debug-log <path>` or by setting `EDUBOTS_LOG` to a filter directive.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "EDUBOTS_LOG";
const DEFAULT_FILTER: &str = "edubots=info";

/// Pick the diagnostics file, if any. An explicit path always wins; otherwise
/// the env var opts in to the default location.
pub fn resolve_log_path(
    explicit: Option<PathBuf>,
    env_filter_set: bool,
    default_path: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit.or_else(|| if env_filter_set { default_path } else { None })
}

/// Install the global subscriber. Returns the file in use, or `None` when
/// diagnostics stay off.
pub fn init_tracing(
    explicit: Option<PathBuf>,
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let env_filter_set = std::env::var_os(LOG_FILTER_ENV).is_some();
    let Some(path) = resolve_log_path(explicit, env_filter_set, default_path) else {
        return Ok(None);
    };

    let file = open_log_file(&path)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;

    Ok(Some(path))
}

fn open_log_file(path: &Path) -> Result<fs::File, Box<dyn Error>> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
