//! Run configuration
//!
//! Everything is driven by environment variables with CLI overrides on top:
//! `BASE_URL` picks the site under test, `OPEN_REPORT=0` disables the
//! report auto-open.

use std::env;
use std::path::PathBuf;

/// Default site under test when `BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://effective-mobile.ru/";

/// Where the HTML report lands unless overridden.
pub const DEFAULT_REPORT_PATH: &str = "report/navsmoke.html";

/// Directory a trace/report collaborator writes into; wiped at session start.
pub const DEFAULT_RESULTS_DIR: &str = "test-results";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the site under test, never with a trailing slash.
    pub base_url: String,
    /// Auto-open the HTML report when the run finishes.
    pub open_report: bool,
    /// Run the browser headless.
    pub headless: bool,
    /// Output path for the HTML report.
    pub report_path: PathBuf,
    /// Stale results directory cleared at session start.
    pub results_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: strip_trailing_slash(DEFAULT_BASE_URL),
            open_report: true,
            headless: true,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
        }
    }
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        let base_url = env::var("BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| strip_trailing_slash(&v))
            .unwrap_or_else(|| strip_trailing_slash(DEFAULT_BASE_URL));

        // Only the literal "0" disables the auto-open; unset means enabled.
        let open_report = env::var("OPEN_REPORT").map(|v| v != "0").unwrap_or(true);

        Self {
            base_url,
            open_report,
            ..Self::default()
        }
    }

    /// Replace the base URL, normalizing away any trailing slashes.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = strip_trailing_slash(base_url);
        self
    }
}

fn strip_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
