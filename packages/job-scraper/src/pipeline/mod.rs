//! The fetch-and-merge pipeline.
//!
//! One run moves through
//! `Init → CollectingListings → Deduping → FetchingDetails → Merging`
//! and ends in `DatasetReady`, `Empty` or `Errored`. Every request is
//! awaited before the next one is issued.

pub mod dedupe;
pub mod details;
pub mod listings;
pub mod merge;

use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::dataset::ScrapeDataset;
use crate::error::Result;
use crate::source::JobSource;

pub use dedupe::{dedupe, dedupe_rows, FINGERPRINT_KEY};
pub use details::{fetch_all_details, identifiers, DETAIL_TAG_KEY};
pub use listings::{collect_listings, ListingConfig};
pub use merge::build_dataset;

/// Static run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub page_size: u32,
    pub max_total: u32,
    /// Politeness delay between consecutive requests.
    pub request_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let listing = ListingConfig::default();
        Self {
            page_size: listing.page_size,
            max_total: listing.max_total,
            request_delay: listing.request_delay,
        }
    }
}

impl PipelineConfig {
    fn listing(&self) -> ListingConfig {
        ListingConfig {
            page_size: self.page_size,
            max_total: self.max_total,
            request_delay: self.request_delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    CollectingListings,
    Deduping,
    FetchingDetails,
    Merging,
    DatasetReady,
    Empty,
    Errored,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::DatasetReady | RunPhase::Empty | RunPhase::Errored)
    }
}

/// Why a run produced nothing to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    /// The search returned no postings at all.
    NoListings,
    /// Postings were found but every detail fetch failed or came back empty.
    NoDetails,
    /// Details were fetched but none joined onto a posting.
    NoJoinedRows,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::NoListings => write!(f, "no job postings collected"),
            NoDataReason::NoDetails => write!(f, "no job details collected"),
            NoDataReason::NoJoinedRows => write!(f, "no details matched a posting"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Ready(ScrapeDataset),
    NoData(NoDataReason),
}

/// One scrape run over a [`JobSource`].
pub struct Pipeline<'a, S: JobSource + ?Sized> {
    source: &'a S,
    config: PipelineConfig,
    phase: RunPhase,
}

impl<'a, S: JobSource + ?Sized> Pipeline<'a, S> {
    pub fn new(source: &'a S, config: PipelineConfig) -> Self {
        Self {
            source,
            config,
            phase: RunPhase::Init,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn enter(&mut self, next: RunPhase) {
        debug!(from = ?self.phase, to = ?next, "Pipeline phase change");
        self.phase = next;
    }

    /// Execute all phases. `scraped_date` is stamped on every row.
    ///
    /// Zero usable records from any phase ends the run as
    /// [`RunOutcome::NoData`]. Errors are only returned for faults that are
    /// not per-request transport failures.
    pub async fn run(&mut self, scraped_date: &str) -> Result<RunOutcome> {
        match self.run_phases(scraped_date).await {
            Ok(outcome) => {
                let terminal = match outcome {
                    RunOutcome::Ready(_) => RunPhase::DatasetReady,
                    RunOutcome::NoData(_) => RunPhase::Empty,
                };
                self.enter(terminal);
                Ok(outcome)
            }
            Err(e) => {
                self.enter(RunPhase::Errored);
                Err(e)
            }
        }
    }

    async fn run_phases(&mut self, scraped_date: &str) -> Result<RunOutcome> {
        self.enter(RunPhase::CollectingListings);
        info!(source = self.source.name(), "Phase 1: collecting job listings");
        let postings = collect_listings(self.source, &self.config.listing()).await?;
        if postings.is_empty() {
            warn!("No job postings collected. Check if session cookies are still valid");
            return Ok(RunOutcome::NoData(NoDataReason::NoListings));
        }
        info!(count = postings.len(), "Total listings collected");

        self.enter(RunPhase::Deduping);
        let summaries = dedupe(&postings);
        info!(unique = summaries.len(), "After deduplication");

        self.enter(RunPhase::FetchingDetails);
        info!("Phase 2: fetching job details");
        let paths = identifiers(&summaries);
        let details = fetch_all_details(self.source, &paths, self.config.request_delay).await?;
        if details.is_empty() {
            warn!("No job details collected");
            return Ok(RunOutcome::NoData(NoDataReason::NoDetails));
        }
        info!(fetched = details.len(), requested = paths.len(), "Job details collected");

        self.enter(RunPhase::Merging);
        info!("Phase 3: merging and cleaning data");
        let dataset = build_dataset(&summaries, &details, scraped_date);
        if dataset.is_empty() {
            warn!("Merged dataset is empty");
            return Ok(RunOutcome::NoData(NoDataReason::NoJoinedRows));
        }

        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Final dataset ready"
        );
        Ok(RunOutcome::Ready(dataset))
    }
}
