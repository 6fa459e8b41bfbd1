//! Phase 3: per-posting detail retrieval.

use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::record::{str_field, FlatRow};
use crate::source::JobSource;

/// Summary key holding the path used to fetch a detail.
pub const PATH_KEY: &str = "externalPath";

/// Key a fetched detail is tagged with so it can be joined back.
pub const DETAIL_TAG_KEY: &str = "_externalPath";

/// Distinct paths to fetch, in summary order. Summaries without a path are
/// skipped; a path shared by several summaries is fetched once.
pub fn identifiers(summaries: &[FlatRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    summaries
        .iter()
        .filter_map(|row| {
            let path = str_field(row, PATH_KEY);
            if path.is_none() {
                warn!("Summary without {PATH_KEY}, skipping detail fetch");
            }
            path
        })
        .filter(|path| {
            let first = seen.insert(*path);
            if !first {
                debug!(external_path = %path, "Path already queued, skipping duplicate");
            }
            first
        })
        .map(str::to_string)
        .collect()
}

/// Fetch one detail per identifier, tagging each with [`DETAIL_TAG_KEY`].
///
/// Failed fetches and empty bodies are skipped without a row; the transport
/// has already retried them. The delay follows every request.
pub async fn fetch_all_details<S: JobSource + ?Sized>(
    source: &S,
    identifiers: &[String],
    request_delay: Duration,
) -> Result<Vec<Value>> {
    let mut details = Vec::with_capacity(identifiers.len());

    for (i, path) in identifiers.iter().enumerate() {
        match source.job_detail(path).await {
            Ok(Value::Object(mut detail)) if !detail.is_empty() => {
                detail.insert(DETAIL_TAG_KEY.to_string(), Value::String(path.clone()));
                details.push(Value::Object(detail));
            }
            Ok(_) => debug!(external_path = %path, "Empty job detail, skipping"),
            Err(e) if e.is_malformed_response() => {
                error!(external_path = %path, error = %e, "Failed to parse job detail response");
            }
            Err(e) if e.is_degradable() => {
                debug!(external_path = %path, error = %e, "Job detail unavailable, skipping");
            }
            Err(e) => return Err(e.into()),
        }

        if (i + 1) % 25 == 0 {
            info!(done = i + 1, total = identifiers.len(), fetched = details.len(), "Fetching job details");
        }
        tokio::time::sleep(request_delay).await;
    }

    Ok(details)
}
