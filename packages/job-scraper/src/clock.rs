//! Run timestamps in India Standard Time (UTC+05:30).

use chrono::{DateTime, FixedOffset, Utc};

/// Offset every run timestamp and Scraped Date is expressed in.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("UTC+05:30 is a valid offset")
}

/// The instant a run started, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClock {
    started: DateTime<FixedOffset>,
}

impl RunClock {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            started: instant.with_timezone(&ist()),
        }
    }

    pub fn started(&self) -> DateTime<FixedOffset> {
        self.started
    }

    /// `2024-01-02_08-00-00`, used in file names and history entries.
    pub fn timestamp(&self) -> String {
        self.started.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    /// `2024-01-02`, the Scraped Date of every row.
    pub fn date_only(&self) -> String {
        self.started.format("%Y-%m-%d").to_string()
    }

    /// `2024-01-02 08:00:00` for the run banner.
    pub fn display(&self) -> String {
        self.started.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
