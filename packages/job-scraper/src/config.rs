use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use workday_client::{ClientOptions, JobBoardSite, RetryPolicy, SessionCredentials};

use crate::export::ExportOptions;
use crate::pipeline::PipelineConfig;

const DEFAULT_BASE_URL: &str = "https://guardianlife.wd5.myworkdayjobs.com";
const DEFAULT_TENANT: &str = "guardianlife";
const DEFAULT_SITE: &str = "Guardian-Life-Careers";
const DEFAULT_FILE_PREFIX: &str = "GuardianLife_Jobs";

/// Scraper configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub site: JobBoardSite,
    pub credentials: SessionCredentials,
    pub page_size: u32,
    pub max_jobs: u32,
    pub request_delay: Duration,
    pub max_retries: u32,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub file_prefix: String,
    pub save_excel: bool,
    pub save_csv: bool,
    pub save_json: bool,
}

impl ScraperConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let site = JobBoardSite::new(
            lookup("WORKDAY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            lookup("WORKDAY_TENANT").unwrap_or_else(|| DEFAULT_TENANT.to_string()),
            lookup("WORKDAY_SITE").unwrap_or_else(|| DEFAULT_SITE.to_string()),
        )
        .context("Invalid Workday site settings")?;

        let credentials = lookup("SCRAPER_COOKIES")
            .map(|raw| SessionCredentials::from_cookie_string(&raw))
            .unwrap_or_default();

        let config = Self {
            site,
            credentials,
            page_size: parse_or(&lookup, "SCRAPER_PAGE_SIZE", 20)?,
            max_jobs: parse_or(&lookup, "SCRAPER_MAX_JOBS", 1000)?,
            request_delay: Duration::from_millis(parse_or(&lookup, "SCRAPER_REQUEST_DELAY_MS", 1000)?),
            max_retries: parse_or(&lookup, "SCRAPER_MAX_RETRIES", 3)?,
            output_dir: lookup("SCRAPER_OUTPUT_DIR")
                .unwrap_or_else(|| "output".to_string())
                .into(),
            log_dir: lookup("SCRAPER_LOG_DIR")
                .unwrap_or_else(|| "logs".to_string())
                .into(),
            file_prefix: lookup("SCRAPER_FILE_PREFIX")
                .unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_string()),
            save_excel: true,
            save_csv: true,
            save_json: true,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page size must be greater than zero");
        }
        if self.max_retries == 0 {
            bail!("retry count must be at least 1");
        }
        Ok(())
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            page_size: self.page_size,
            max_total: self.max_jobs,
            request_delay: self.request_delay,
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default().with_retry(RetryPolicy::new(self.max_retries))
    }

    pub fn export(&self) -> ExportOptions {
        ExportOptions {
            output_dir: self.output_dir.clone(),
            file_prefix: self.file_prefix.clone(),
            save_excel: self.save_excel,
            save_csv: self.save_csv,
            save_json: self.save_json,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        None => Ok(default),
    }
}
