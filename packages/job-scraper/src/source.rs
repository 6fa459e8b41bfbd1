//! The seam between the pipeline and the job board transport.

use async_trait::async_trait;
use serde_json::Value;
use workday_client::WorkdayClient;

/// A careers site that can list postings page by page and return details.
///
/// Both calls return the parsed JSON body. Implementations apply their own
/// retry policy; the pipeline never retries on top of it.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// One page of the unfiltered search, `{"jobPostings": [...]}`.
    async fn search_page(&self, offset: u32, limit: u32) -> workday_client::Result<Value>;

    /// Full record for one posting.
    async fn job_detail(&self, external_path: &str) -> workday_client::Result<Value>;

    /// Name used in log lines.
    fn name(&self) -> &str;
}

#[async_trait]
impl JobSource for WorkdayClient {
    async fn search_page(&self, offset: u32, limit: u32) -> workday_client::Result<Value> {
        self.search_jobs(offset, limit).await
    }

    async fn job_detail(&self, external_path: &str) -> workday_client::Result<Value> {
        WorkdayClient::job_detail(self, external_path).await
    }

    fn name(&self) -> &str {
        self.site().tenant()
    }
}
