//! Console + file logging for one run.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Result, ScraperError};

const DEFAULT_FILTER: &str = "info,job_scraper=debug,workday_client=info";

/// Install the global subscriber: stdout plus `{log_dir}/scraper_{timestamp}.log`.
///
/// `RUST_LOG` overrides the default filter. Returns the log file path.
pub fn init(log_dir: &Path, timestamp: &str) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!("scraper_{timestamp}.log"));
    let file = File::create(&path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| ScraperError::Logging(e.to_string()))?;

    Ok(path)
}
