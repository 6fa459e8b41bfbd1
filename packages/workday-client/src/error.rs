//! Error types for the Workday client.

use thiserror::Error;

/// Result type for Workday client operations.
pub type Result<T> = std::result::Result<T, WorkdayError>;

/// Workday client errors.
#[derive(Debug, Error)]
pub enum WorkdayError {
    /// Network error (connection refused, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Every attempt allowed by the retry policy failed
    #[error("giving up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    /// Response body was not valid JSON
    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request payload could not be encoded
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Invalid client settings (bad header name/value, unusable base URL)
    #[error("configuration error: {0}")]
    Config(String),
}

impl WorkdayError {
    /// Whether another attempt at the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, WorkdayError::Network(_) | WorkdayError::Status { .. })
    }

    /// Whether a caller may treat this failure as "no data for this request"
    /// rather than aborting the run.
    ///
    /// Encoding and configuration errors are programming or environment
    /// faults and are never degradable.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            WorkdayError::Network(_)
                | WorkdayError::Status { .. }
                | WorkdayError::RetriesExhausted { .. }
                | WorkdayError::Parse { .. }
        )
    }

    /// Whether the response arrived but could not be understood.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, WorkdayError::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_status_is_transient_and_degradable() {
        let err = WorkdayError::Status {
            status: 503,
            url: "https://example.com/jobs".into(),
        };
        assert!(err.is_transient());
        assert!(err.is_degradable());
        assert_eq!(err.to_string(), "HTTP 503 from https://example.com/jobs");
    }

    #[test]
    fn test_parse_is_degradable_but_not_retried() {
        let err = WorkdayError::Parse {
            url: "https://example.com/job/1".into(),
            source: parse_error(),
        };
        assert!(!err.is_transient());
        assert!(err.is_degradable());
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = WorkdayError::Config("bad header".into());
        assert!(!err.is_transient());
        assert!(!err.is_degradable());

        let err = WorkdayError::Encode(parse_error());
        assert!(!err.is_degradable());
    }
}
