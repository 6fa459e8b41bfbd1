//! Typed errors for the scraper library.

use thiserror::Error;
use workday_client::WorkdayError;

/// Errors that abort a scrape run.
///
/// Per-request transport failures are absorbed inside the pipeline and
/// never surface here. Only faults the run cannot continue past do.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Client fault that is not a transient transport failure
    #[error("job board client error: {0}")]
    Client(#[from] WorkdayError),

    /// Filesystem error (output/log folders, history file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export failed
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet export failed
    #[error("spreadsheet export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialised
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, ScraperError>;
