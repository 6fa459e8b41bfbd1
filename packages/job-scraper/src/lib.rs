//! Careers-site scraper.
//!
//! Collects every posting from one employer's Workday careers site, fetches
//! each posting's detail record, and merges both into a flat table ready for
//! export.
//!
//! # Usage
//!
//! ```rust,ignore
//! use job_scraper::{Pipeline, PipelineConfig, RunOutcome, RunClock};
//!
//! let clock = RunClock::now();
//! let mut pipeline = Pipeline::new(&client, PipelineConfig::default());
//! match pipeline.run(&clock.date_only()).await? {
//!     RunOutcome::Ready(dataset) => println!("{} jobs", dataset.row_count()),
//!     RunOutcome::NoData(reason) => eprintln!("nothing scraped: {reason}"),
//! }
//! ```
//!
//! # Modules
//!
//! - [`pipeline`] - listing pagination, dedup, detail fetch, merge
//! - [`source`] - the `JobSource` trait the pipeline pulls from
//! - [`record`] / [`html`] - flattening and markup stripping
//! - [`dataset`] - the final table and its column mapping
//! - [`export`] / [`history`] / [`runner`] - what happens after a run
//! - [`testing`] - scripted job source for tests

pub mod clock;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod history;
pub mod html;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod runner;
pub mod source;
pub mod testing;

pub use clock::RunClock;
pub use config::ScraperConfig;
pub use dataset::{JobRecord, ScrapeDataset, COLUMN_MAPPING, SCRAPED_DATE};
pub use error::{Result, ScraperError};
pub use export::{export_dataset, ExportOptions};
pub use history::{RunHistory, RunHistoryEntry, RunStatus};
pub use pipeline::{NoDataReason, Pipeline, PipelineConfig, RunOutcome, RunPhase};
pub use record::{flatten, FlatRow};
pub use runner::{run_once, RunSummary};
pub use source::JobSource;
