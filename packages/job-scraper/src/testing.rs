//! Scripted job source and fixtures for tests.
//!
//! # Example
//!
//! ```rust
//! use job_scraper::testing::{posting, MockJobSource};
//!
//! let source = MockJobSource::new()
//!     .with_page(0, vec![posting("/job/1", &["R-1"])])
//!     .with_failed_detail("/job/1");
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use workday_client::WorkdayError;

use crate::source::JobSource;

#[derive(Debug, Clone)]
enum Scripted {
    Body(Value),
    Exhausted,
    Malformed,
}

impl Scripted {
    fn respond(&self, url: String) -> workday_client::Result<Value> {
        match self {
            Scripted::Body(body) => Ok(body.clone()),
            Scripted::Exhausted => Err(WorkdayError::RetriesExhausted {
                url,
                attempts: 3,
                last_error: "HTTP 503".into(),
            }),
            Scripted::Malformed => Err(WorkdayError::Parse {
                url,
                source: serde_json::from_str::<Value>("<html>").unwrap_err(),
            }),
        }
    }
}

/// In-memory [`JobSource`] with canned responses and call tracking.
///
/// Unscripted search offsets answer with an empty page. Unscripted detail
/// paths answer with an empty object.
#[derive(Default)]
pub struct MockJobSource {
    pages: Arc<RwLock<HashMap<u32, Scripted>>>,
    details: Arc<RwLock<HashMap<String, Scripted>>>,
    search_calls: Arc<RwLock<Vec<u32>>>,
    detail_calls: Arc<RwLock<Vec<String>>>,
}

impl Clone for MockJobSource {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            details: Arc::clone(&self.details),
            search_calls: Arc::clone(&self.search_calls),
            detail_calls: Arc::clone(&self.detail_calls),
        }
    }
}

impl MockJobSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the postings returned for `offset`.
    pub fn with_page(self, offset: u32, postings: Vec<Value>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(offset, Scripted::Body(json!({ "jobPostings": postings })));
        self
    }

    /// Script consecutive pages starting at offset 0.
    pub fn with_pages(mut self, page_size: u32, pages: Vec<Vec<Value>>) -> Self {
        for (i, postings) in pages.into_iter().enumerate() {
            self = self.with_page(i as u32 * page_size, postings);
        }
        self
    }

    /// Script an arbitrary search body for `offset`.
    pub fn with_page_body(self, offset: u32, body: Value) -> Self {
        self.pages.write().unwrap().insert(offset, Scripted::Body(body));
        self
    }

    /// The search at `offset` fails after exhausting retries.
    pub fn with_failed_page(self, offset: u32) -> Self {
        self.pages.write().unwrap().insert(offset, Scripted::Exhausted);
        self
    }

    pub fn with_detail(self, external_path: &str, detail: Value) -> Self {
        self.details
            .write()
            .unwrap()
            .insert(external_path.to_string(), Scripted::Body(detail));
        self
    }

    /// The detail fetch for `external_path` fails after exhausting retries.
    pub fn with_failed_detail(self, external_path: &str) -> Self {
        self.details
            .write()
            .unwrap()
            .insert(external_path.to_string(), Scripted::Exhausted);
        self
    }

    /// The detail fetch for `external_path` returns a body that is not JSON.
    pub fn with_malformed_detail(self, external_path: &str) -> Self {
        self.details
            .write()
            .unwrap()
            .insert(external_path.to_string(), Scripted::Malformed);
        self
    }

    /// Offsets requested so far, in order.
    pub fn search_calls(&self) -> Vec<u32> {
        self.search_calls.read().unwrap().clone()
    }

    /// Detail paths requested so far, in order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.read().unwrap().clone()
    }
}

#[async_trait]
impl JobSource for MockJobSource {
    async fn search_page(&self, offset: u32, _limit: u32) -> workday_client::Result<Value> {
        self.search_calls.write().unwrap().push(offset);

        let scripted = self.pages.read().unwrap().get(&offset).cloned();
        match scripted {
            Some(s) => s.respond(format!("mock://jobs?offset={offset}")),
            None => Ok(json!({ "jobPostings": [] })),
        }
    }

    async fn job_detail(&self, external_path: &str) -> workday_client::Result<Value> {
        self.detail_calls
            .write()
            .unwrap()
            .push(external_path.to_string());

        let scripted = self.details.read().unwrap().get(external_path).cloned();
        match scripted {
            Some(s) => s.respond(format!("mock://detail{external_path}")),
            None => Ok(json!({})),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A search-result posting with the given path and `bulletFields` fingerprint.
pub fn posting(external_path: &str, bullet_fields: &[&str]) -> Value {
    json!({
        "title": format!("Posting {external_path}"),
        "externalPath": external_path,
        "locationsText": "New York, NY",
        "postedOn": "Posted Today",
        "bulletFields": bullet_fields,
    })
}

/// A detail response shaped like the CXS `jobPostingInfo` payload.
pub fn job_detail(req_id: &str, title: &str) -> Value {
    json!({
        "jobPostingInfo": {
            "id": format!("id-{req_id}"),
            "title": title,
            "jobDescription": format!("<p><b>{title}</b></p><p>Join the team.</p>"),
            "location": "New York, NY",
            "startDate": "2024-01-01",
            "jobReqId": req_id,
            "remoteType": "Hybrid",
            "externalUrl": format!("https://careers.example.com/job/{req_id}"),
        },
        "hiringOrganization": { "name": "Example Co" }
    })
}
