//! Scheduled careers scraper entry point.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use job_scraper::{
    logging, run_once, RunClock, RunHistory, RunStatus, RunSummary, ScraperConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use workday_client::WorkdayClient;

#[derive(Parser)]
#[command(name = "job-scraper")]
#[command(about = "Scrape a Workday careers site into xlsx, CSV and JSON")]
struct Cli {
    /// Safety cap on the number of postings requested
    #[arg(long)]
    max_jobs: Option<u32>,

    /// Postings per search page
    #[arg(long)]
    page_size: Option<u32>,

    /// Delay between requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Attempts per request before giving up
    #[arg(long)]
    retries: Option<u32>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Skip the spreadsheet export
    #[arg(long)]
    no_excel: bool,

    /// Skip the CSV export
    #[arg(long)]
    no_csv: bool,

    /// Skip the JSON export
    #[arg(long)]
    no_json: bool,
}

impl Cli {
    fn apply(self, config: &mut ScraperConfig) {
        if let Some(v) = self.max_jobs {
            config.max_jobs = v;
        }
        if let Some(v) = self.page_size {
            config.page_size = v;
        }
        if let Some(v) = self.delay_ms {
            config.request_delay = Duration::from_millis(v);
        }
        if let Some(v) = self.retries {
            config.max_retries = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.log_dir {
            config.log_dir = v;
        }
        config.save_excel &= !self.no_excel;
        config.save_csv &= !self.no_csv;
        config.save_json &= !self.no_json;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ScraperConfig::from_env().context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    let clock = RunClock::now();
    let log_path = logging::init(&config.log_dir, &clock.timestamp())
        .context("Failed to initialise logging")?;

    tracing::info!("{}", "=".repeat(70));
    tracing::info!(site = config.site.site(), "Careers scraper run");
    tracing::info!(run_time_ist = %clock.display(), log = %log_path.display(), "Run started");
    tracing::info!("{}", "=".repeat(70));

    let history = RunHistory::in_dir(&config.log_dir);

    let summary = match WorkdayClient::new(
        config.site.clone(),
        config.credentials.clone(),
        config.client_options(),
    ) {
        Ok(client) => {
            run_once(&client, config.pipeline(), &config.export(), &history, &clock).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP session");
            let summary = RunSummary::failed(e.to_string());
            job_scraper::runner::record(&history, &clock, &summary);
            summary
        }
    };

    print_summary(&summary);
    Ok(ExitCode::from(summary.exit_code()))
}

fn print_summary(summary: &RunSummary) {
    let rule = "=".repeat(70);
    println!();
    match summary.status {
        RunStatus::Success => {
            println!("{}", rule.bright_green());
            println!(
                "{}",
                format!("SUCCESS - {} jobs scraped", summary.records)
                    .bright_green()
                    .bold()
            );
            println!("{}", rule.bright_green());
            for path in &summary.exported {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                println!("   {}", name);
            }
            println!("{}", rule.bright_green());
        }
        RunStatus::NoData => {
            let reason = summary
                .no_data
                .map(|r| r.to_string())
                .unwrap_or_else(|| "no data".to_string());
            println!(
                "{}",
                format!("No jobs found ({reason}) - session cookies may have expired.")
                    .bright_yellow()
            );
        }
        RunStatus::Error => {
            println!(
                "{}",
                format!("Error: {}", summary.error.as_deref().unwrap_or("unknown")).bright_red()
            );
        }
    }
    println!();
}
