//! Phase 1: paginated listing collection.

use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::source::JobSource;

/// Paging parameters for [`collect_listings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub page_size: u32,
    /// Safety cap: no page is requested at an offset at or beyond this.
    pub max_total: u32,
    pub request_delay: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_total: 1000,
            request_delay: Duration::from_secs(1),
        }
    }
}

/// Request pages at offsets `0, page_size, 2*page_size, ...` until a page
/// has no postings or the offset reaches `max_total`.
///
/// A page that fails after the transport's retries is treated exactly like
/// an empty page and ends collection, so a persistent outage mid-run
/// truncates the result instead of failing it. Only non-degradable client
/// faults are returned as errors.
pub async fn collect_listings<S: JobSource + ?Sized>(
    source: &S,
    config: &ListingConfig,
) -> Result<Vec<Value>> {
    let step = config.page_size.max(1);
    let mut all_postings = Vec::new();
    let mut offset = 0u32;

    while offset < config.max_total {
        let postings = match source.search_page(offset, step).await {
            Ok(body) => extract_postings(body),
            Err(e) if e.is_malformed_response() => {
                error!(offset, error = %e, "Failed to parse job list response");
                Vec::new()
            }
            Err(e) if e.is_degradable() => {
                warn!(offset, error = %e, "Job list page failed, treating as end of results");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        if postings.is_empty() {
            info!(offset, source = source.name(), "No more jobs found, stopping");
            break;
        }

        let added = postings.len();
        all_postings.extend(postings);
        info!(offset, added, total = all_postings.len(), "Collected listing page");

        offset = offset.saturating_add(step);
        tokio::time::sleep(config.request_delay).await;
    }

    Ok(all_postings)
}

/// `jobPostings` array of a search body. Missing or non-array means empty.
fn extract_postings(mut body: Value) -> Vec<Value> {
    match body.get_mut("jobPostings").map(Value::take) {
        Some(Value::Array(postings)) => postings,
        _ => Vec::new(),
    }
}
