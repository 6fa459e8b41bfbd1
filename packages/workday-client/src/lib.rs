//! Minimal Workday CXS careers API client.
//!
//! Talks to the two public endpoints behind a `*.myworkdayjobs.com` careers
//! site: the paginated job search (POST) and the per-job detail (GET). Every
//! request goes through a bounded retry loop with linear backoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use workday_client::{JobBoardSite, SessionCredentials, WorkdayClient, ClientOptions};
//!
//! let site = JobBoardSite::new("https://acme.wd5.myworkdayjobs.com", "acme", "Acme-Careers")?;
//! let creds = SessionCredentials::from_cookie_string("PLAY_SESSION=...; wd-browser-id=...");
//! let client = WorkdayClient::new(site, creds, ClientOptions::default())?;
//!
//! let page = client.search_jobs(0, 20).await?;
//! let detail = client.job_detail("/job/New-York/Analyst_R-100").await?;
//! ```

pub mod error;
pub mod retry;
pub mod types;

pub use error::{Result, WorkdayError};
pub use retry::RetryPolicy;
pub use types::{JobBoardSite, Method, SearchRequest, SessionCredentials};

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Transport settings fixed for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Workday careers API client.
///
/// Owns one `reqwest::Client` (connection pool plus session headers) that is
/// built once and never mutated afterwards.
#[derive(Clone)]
pub struct WorkdayClient {
    http: reqwest::Client,
    site: JobBoardSite,
    retry: RetryPolicy,
}

impl WorkdayClient {
    pub fn new(
        site: JobBoardSite,
        credentials: SessionCredentials,
        options: ClientOptions,
    ) -> Result<Self> {
        let headers = session_headers(&credentials)?;

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            site,
            retry: options.retry,
        })
    }

    pub fn site(&self) -> &JobBoardSite {
        &self.site
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Issue a request with retry and parse the body as JSON.
    ///
    /// Network errors and non-2xx statuses are retried. A body that is not
    /// JSON fails immediately with [`WorkdayError::Parse`].
    pub async fn request(&self, method: Method, url: &str, payload: Option<&Value>) -> Result<Value> {
        let body = self
            .retry
            .run(url, || self.send_once(method, url, payload))
            .await?;

        serde_json::from_str(&body).map_err(|source| WorkdayError::Parse {
            url: url.to_string(),
            source,
        })
    }

    async fn send_once(&self, method: Method, url: &str, payload: Option<&Value>) -> Result<String> {
        let mut request = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WorkdayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.text().await?)
    }

    /// Fetch one page of job postings starting at `offset`.
    pub async fn search_jobs(&self, offset: u32, limit: u32) -> Result<Value> {
        let payload =
            serde_json::to_value(SearchRequest::page(offset, limit)).map_err(WorkdayError::Encode)?;
        let url = self.site.jobs_url();

        debug!(offset, limit, "Searching job postings");
        self.request(Method::Post, &url, Some(&payload)).await
    }

    /// Fetch the full record for one posting by its `externalPath`.
    pub async fn job_detail(&self, external_path: &str) -> Result<Value> {
        let url = self.site.detail_url(external_path);

        debug!(external_path, "Fetching job detail");
        self.request(Method::Get, &url, None).await
    }
}

fn session_headers(credentials: &SessionCredentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(cookie) = credentials.cookie_header() {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| WorkdayError::Config(format!("invalid cookie value: {e}")))?;
        headers.insert(header::COOKIE, value);
    }

    for (name, value) in credentials.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| WorkdayError::Config(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| WorkdayError::Config(format!("invalid header value for {name}: {e}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Local HTTP/1.1 server that answers every request with one canned
    /// response and keeps the raw requests it received.
    struct StubServer {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubServer {
        async fn start(status: u16, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = Arc::clone(&requests);

            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    let raw = read_request(&mut socket).await;
                    seen.lock().unwrap().push(raw);
                    let response = format!(
                        "HTTP/1.1 {status} Stub\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            Self { base_url, requests }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn client(&self, attempts: u32) -> WorkdayClient {
            let site = JobBoardSite::new(&self.base_url, "acme", "careers").unwrap();
            let options = ClientOptions::default()
                .with_timeout(Duration::from_secs(5))
                .with_retry(RetryPolicy::new(attempts).with_backoff_unit(Duration::ZERO));
            WorkdayClient::new(site, SessionCredentials::new(), options).unwrap()
        }
    }

    /// Read one request: headers plus a `content-length` body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        line.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_session_headers_include_cookies() {
        let creds = SessionCredentials::new()
            .with_cookie("PLAY_SESSION", "abc")
            .with_cookie("timezoneOffset", "-330")
            .with_header("x-calypso-csrf-token", "token-1");

        let headers = session_headers(&creds).unwrap();
        assert_eq!(headers[header::ACCEPT], "application/json");
        assert_eq!(headers[header::COOKIE], "PLAY_SESSION=abc; timezoneOffset=-330");
        assert_eq!(headers["x-calypso-csrf-token"], "token-1");
    }

    #[test]
    fn test_session_headers_reject_bad_header_name() {
        let creds = SessionCredentials::new().with_header("bad header", "x");
        assert!(matches!(session_headers(&creds), Err(WorkdayError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_retries() {
        let site = JobBoardSite::new("http://127.0.0.1:9", "acme", "careers").unwrap();
        let options = ClientOptions::default()
            .with_timeout(Duration::from_secs(2))
            .with_retry(RetryPolicy::new(2).with_backoff_unit(Duration::ZERO));
        let client = WorkdayClient::new(site, SessionCredentials::new(), options).unwrap();

        let err = client.job_detail("/job/1").await.unwrap_err();
        match err {
            WorkdayError::RetriesExhausted { url, attempts, .. } => {
                assert_eq!(url, "http://127.0.0.1:9/wday/cxs/acme/careers/job/1");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_retried_until_exhausted() {
        let server = StubServer::start(503, "unavailable").await;
        let client = server.client(3);
        assert_eq!(client.retry_policy().max_attempts, 3);
        assert_eq!(client.site().base_url(), server.base_url);

        let err = client.job_detail("/job/1").await.unwrap_err();

        match err {
            WorkdayError::RetriesExhausted { attempts, last_error, .. } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"), "last error was {last_error}");
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(server.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_non_json_body_fails_without_retry() {
        let server = StubServer::start(200, "<html>session expired</html>").await;
        let client = server.client(3);

        let err = client.job_detail("/job/1").await.unwrap_err();

        assert!(matches!(err, WorkdayError::Parse { .. }), "got {err:?}");
        assert!(err.is_malformed_response());
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_search_posts_page_body() {
        let server = StubServer::start(200, r#"{"total":0,"jobPostings":[]}"#).await;
        let client = server.client(3);

        let body = client.search_jobs(40, 20).await.unwrap();
        assert_eq!(body["total"], 0);

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let raw = &requests[0];
        assert!(raw.starts_with("POST /wday/cxs/acme/careers/jobs HTTP/1.1"), "{raw}");

        let (_, sent) = raw.split_once("\r\n\r\n").unwrap();
        let sent: Value = serde_json::from_str(sent).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({ "appliedFacets": {}, "limit": 20, "offset": 40, "searchText": "" })
        );
    }

    #[tokio::test]
    async fn test_detail_is_a_get_on_the_path() {
        let server = StubServer::start(200, r#"{"jobPostingInfo":{"jobReqId":"R-1"}}"#).await;
        let client = server.client(1);

        let body = client.job_detail("/job/NY/Analyst_R-1").await.unwrap();

        assert_eq!(body["jobPostingInfo"]["jobReqId"], "R-1");
        assert!(server.requests()[0].starts_with("GET /wday/cxs/acme/careers/job/NY/Analyst_R-1 HTTP/1.1"));
    }
}
