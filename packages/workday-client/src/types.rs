use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, WorkdayError};

/// Body for the CXS job search endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub applied_facets: Map<String, Value>,
    pub limit: u32,
    pub offset: u32,
    pub search_text: String,
}

impl SearchRequest {
    /// Unfiltered search for one page of results.
    pub fn page(offset: u32, limit: u32) -> Self {
        Self {
            applied_facets: Map::new(),
            limit,
            offset,
            search_text: String::new(),
        }
    }
}

/// HTTP method used by [`crate::WorkdayClient::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Location of one employer's careers site on a Workday host.
///
/// Search URL: `{base_url}/wday/cxs/{tenant}/{site}/jobs`
/// Detail URL: `{base_url}/wday/cxs/{tenant}/{site}{external_path}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobBoardSite {
    base_url: String,
    tenant: String,
    site: String,
}

impl JobBoardSite {
    pub fn new(
        base_url: impl Into<String>,
        tenant: impl Into<String>,
        site: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(WorkdayError::Config(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        let tenant = tenant.into();
        let site = site.into();
        if tenant.is_empty() || site.is_empty() {
            return Err(WorkdayError::Config(
                "tenant and site must not be empty".into(),
            ));
        }

        Ok(Self {
            base_url,
            tenant,
            site,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    fn site_root(&self) -> String {
        format!("{}/wday/cxs/{}/{}", self.base_url, self.tenant, self.site)
    }

    pub fn jobs_url(&self) -> String {
        format!("{}/jobs", self.site_root())
    }

    /// `external_path` comes straight from a listing (e.g. `/job/NY/Analyst_R123`).
    pub fn detail_url(&self, external_path: &str) -> String {
        if external_path.starts_with('/') {
            format!("{}{}", self.site_root(), external_path)
        } else {
            format!("{}/{}", self.site_root(), external_path)
        }
    }
}

/// Externally supplied session material (browser cookies and extra headers).
///
/// The client never refreshes these. Expired cookies show up as empty
/// search results, not as a distinct error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    cookies: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `name=value; name2=value2` cookie string as copied from a browser.
    pub fn from_cookie_string(raw: &str) -> Self {
        let cookies = raw
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();

        Self {
            cookies,
            headers: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.headers.is_empty()
    }

    /// Value for a `Cookie` request header, if any cookies are set.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_wire_shape() {
        let body = serde_json::to_value(SearchRequest::page(40, 20)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "appliedFacets": {},
                "limit": 20,
                "offset": 40,
                "searchText": "",
            })
        );
    }

    #[test]
    fn test_site_urls() {
        let site = JobBoardSite::new(
            "https://acme.wd5.myworkdayjobs.com/",
            "acme",
            "Acme-Careers",
        )
        .unwrap();

        assert_eq!(
            site.jobs_url(),
            "https://acme.wd5.myworkdayjobs.com/wday/cxs/acme/Acme-Careers/jobs"
        );
        assert_eq!(
            site.detail_url("/job/New-York/Analyst_R-100"),
            "https://acme.wd5.myworkdayjobs.com/wday/cxs/acme/Acme-Careers/job/New-York/Analyst_R-100"
        );
        assert_eq!(
            site.detail_url("job/x"),
            "https://acme.wd5.myworkdayjobs.com/wday/cxs/acme/Acme-Careers/job/x"
        );
    }

    #[test]
    fn test_site_rejects_bad_input() {
        assert!(JobBoardSite::new("ftp://acme", "acme", "site").is_err());
        assert!(JobBoardSite::new("https://acme", "", "site").is_err());
    }

    #[test]
    fn test_cookie_string_parsing() {
        let creds = SessionCredentials::from_cookie_string(
            "PLAY_SESSION=abc=def; wd-browser-id=123 ;  ; timezoneOffset=-330",
        );

        assert_eq!(
            creds.cookies(),
            &[
                ("PLAY_SESSION".to_string(), "abc=def".to_string()),
                ("wd-browser-id".to_string(), "123".to_string()),
                ("timezoneOffset".to_string(), "-330".to_string()),
            ]
        );
        assert_eq!(
            creds.cookie_header().as_deref(),
            Some("PLAY_SESSION=abc=def; wd-browser-id=123; timezoneOffset=-330")
        );
    }

    #[test]
    fn test_empty_credentials() {
        let creds = SessionCredentials::from_cookie_string("");
        assert!(creds.is_empty());
        assert_eq!(creds.cookie_header(), None);
    }
}
