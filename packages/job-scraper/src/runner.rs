//! One complete run: pipeline, export, history, exit status.

use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::clock::RunClock;
use crate::export::{export_dataset, ExportOptions};
use crate::history::{RunHistory, RunHistoryEntry, RunStatus};
use crate::pipeline::{NoDataReason, Pipeline, PipelineConfig, RunOutcome};
use crate::source::JobSource;

/// Everything a run hands to its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub records: usize,
    pub columns: usize,
    pub exported: Vec<PathBuf>,
    pub no_data: Option<NoDataReason>,
    pub error: Option<String>,
}

impl RunSummary {
    fn success(records: usize, columns: usize, exported: Vec<PathBuf>) -> Self {
        Self {
            status: RunStatus::Success,
            records,
            columns,
            exported,
            no_data: None,
            error: None,
        }
    }

    fn no_data(reason: NoDataReason) -> Self {
        Self {
            status: RunStatus::NoData,
            records: 0,
            columns: 0,
            exported: Vec::new(),
            no_data: Some(reason),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            records: 0,
            columns: 0,
            exported: Vec::new(),
            no_data: None,
            error: Some(message.into()),
        }
    }

    /// Process exit code: zero only for a successful export.
    pub fn exit_code(&self) -> u8 {
        match self.status {
            RunStatus::Success => 0,
            RunStatus::NoData | RunStatus::Error => 1,
        }
    }
}

/// Run the pipeline, export a non-empty dataset, and record the outcome in
/// the run history under `history`.
pub async fn run_once<S: JobSource + ?Sized>(
    source: &S,
    pipeline_config: PipelineConfig,
    export: &ExportOptions,
    history: &RunHistory,
    clock: &RunClock,
) -> RunSummary {
    let date = clock.date_only();
    let mut pipeline = Pipeline::new(source, pipeline_config);

    let summary = match pipeline.run(&date).await {
        Ok(RunOutcome::Ready(dataset)) => match export_dataset(&dataset, export, &date) {
            Ok(exported) => {
                info!(
                    records = dataset.row_count(),
                    columns = dataset.column_count(),
                    files = exported.len(),
                    "Scraping completed successfully"
                );
                RunSummary::success(dataset.row_count(), dataset.column_count(), exported)
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                RunSummary::failed(e.to_string())
            }
        },
        Ok(RunOutcome::NoData(reason)) => {
            warn!(%reason, "No data scraped. Verify session cookies are still valid");
            RunSummary::no_data(reason)
        }
        Err(e) => {
            error!(error = %e, phase = ?pipeline.phase(), "Fatal pipeline error");
            RunSummary::failed(e.to_string())
        }
    };

    record(history, clock, &summary);
    summary
}

/// Append `summary` to the run history. Failures are logged, not returned,
/// so they never change the run's own status.
pub fn record(history: &RunHistory, clock: &RunClock, summary: &RunSummary) {
    let entry = RunHistoryEntry::new(clock, summary.status, summary.records, summary.error.clone());
    if let Err(e) = history.append(entry) {
        error!(path = %history.path().display(), error = %e, "Failed to save run history");
    }
}
