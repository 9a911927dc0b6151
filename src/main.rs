//! navsmoke CLI
//!
//! Runs the anchor-navigation suite against a site and writes the HTML
//! report. Exit status: 0 all checks passed, 1 a check failed, 2 the
//! harness itself broke (launch, CDP, I/O).

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::Level;

use navsmoke::browser::{BrowserSession, PageDriver};
use navsmoke::config::{Config, DEFAULT_REPORT_PATH};
use navsmoke::error::NavsmokeError;
use navsmoke::nav::run_navigation_suite;
use navsmoke::report::html::{ReportEntry, ReportWriter};
use navsmoke::report::LogBundle;

#[derive(Parser)]
#[command(name = "navsmoke")]
#[command(about = "Anchor-navigation smoke checks for marketing sites")]
#[command(version)]
struct Cli {
    /// Base URL of the site under test
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Output path for the HTML report
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Do not open the report when the run finishes
    #[arg(long)]
    no_open: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .init();

    let config = effective_config(&cli);

    let code = run(&config).await;
    std::process::exit(code);
}

/// Resolve the run configuration from the environment with CLI overrides
/// on top. A blank `--base-url` (or blank `BASE_URL` passed through clap)
/// falls back to the environment default rather than a blank base URL.
fn effective_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();

    if let Some(url) = cli
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        config = config.with_base_url(url);
    }

    config.headless = !cli.headed;
    config.report_path = cli.report.clone();
    if cli.no_open {
        config.open_report = false;
    }
    config
}

async fn run(config: &Config) -> i32 {
    ReportWriter::clear_results_dir(&config.results_dir);

    let bundle = LogBundle::new();

    let session = match BrowserSession::launch(config).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return 2;
        }
    };

    let page = match session.new_page(&bundle).await {
        Ok(page) => page,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            let _ = session.close().await;
            return 2;
        }
    };

    let outcome = tokio::select! {
        result = run_navigation_suite(&page, &config.base_url) => result,
        _ = tokio::signal::ctrl_c() => {
            Err(NavsmokeError::Browser("interrupted".to_string()))
        }
    };

    // The report is flushed on every exit path; nothing below may mask the
    // suite outcome.
    let final_url = match &outcome {
        Ok(suite) => suite.final_url.clone(),
        Err(_) => page.current_url().await.unwrap_or_default(),
    };

    let entry = ReportEntry {
        name: "anchor navigation".to_string(),
        passed: outcome.is_ok(),
        url: final_url.clone(),
        detail: match &outcome {
            Ok(suite) => format!("{} link(s) verified", suite.verified.len()),
            Err(e) => e.to_string(),
        },
    };

    let writer = ReportWriter::new(&config.report_path);
    let logs = bundle.snapshot().await;
    match writer.write(&entry, &logs) {
        Ok(()) => {
            tracing::info!("report written to {}", writer.path().display());
            writer.auto_open(config.open_report).await;
        }
        Err(e) => tracing::warn!("could not write report: {}", e),
    }

    if let Err(e) = session.close().await {
        tracing::debug!("browser shutdown: {}", e);
    }

    match outcome {
        Ok(suite) => {
            println!(
                "{} {} link(s) verified on {}",
                "PASS".green().bold(),
                suite.verified.len(),
                config.base_url
            );
            0
        }
        Err(e) if e.is_assertion() => {
            eprintln!("{} {}", "FAIL".red().bold(), e);
            1
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    }
}
