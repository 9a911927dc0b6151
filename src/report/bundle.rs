//! Per-run log accumulation.
//!
//! A `LogBundle` is created per run and handed to the capture tasks as
//! cloned handles; no process-wide state. Network lines are `"status url"`
//! and get summarized by status-code class for the report.

use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

type SharedLines = Arc<Mutex<Vec<String>>>;

/// Shared accumulators for one run's console and network output.
#[derive(Debug, Default, Clone)]
pub struct LogBundle {
    console: SharedLines,
    network: SharedLines,
}

impl LogBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the console/page-error capture task appends to.
    pub fn console_handle(&self) -> SharedLines {
        Arc::clone(&self.console)
    }

    /// Handle the network capture task appends to.
    pub fn network_handle(&self) -> SharedLines {
        Arc::clone(&self.network)
    }

    /// An ordered view of everything captured so far.
    pub async fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            console: self.console.lock().await.clone(),
            network: self.network.lock().await.clone(),
        }
    }
}

/// Captured lines, frozen for reporting.
#[derive(Debug, Clone, Default)]
pub struct LogSnapshot {
    pub console: Vec<String>,
    pub network: Vec<String>,
}

impl LogSnapshot {
    pub fn network_summary(&self) -> NetworkSummary {
        NetworkSummary::from_lines(&self.network)
    }

    /// The combined text block attached to the report: final URL, console
    /// section, network section, then the one-line summary.
    pub fn combined_text(&self, final_url: &str) -> String {
        let mut lines = vec![format!("URL: {}", final_url)];

        if !self.console.is_empty() {
            lines.push("[Console]".to_string());
            lines.extend(self.console.iter().cloned());
        }
        if !self.network.is_empty() {
            lines.push("[Network]".to_string());
            lines.extend(self.network.iter().cloned());
            lines.push(String::new());
            lines.push(self.network_summary().to_string());
        }

        lines.join("\n")
    }
}

/// Network responses bucketed by status-code class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkSummary {
    pub total: usize,
    pub success: usize,
    pub client_errors: usize,
    pub server_errors: usize,
    pub other: usize,
}

impl NetworkSummary {
    /// Derive a summary from `"status url"` lines. Unparsable lines count
    /// as `other`.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut summary = Self {
            total: lines.len(),
            ..Self::default()
        };

        for line in lines {
            let status = line
                .as_ref()
                .split_whitespace()
                .next()
                .and_then(|s| s.parse::<u32>().ok());
            match status {
                Some(200..=399) => summary.success += 1,
                Some(400..=499) => summary.client_errors += 1,
                Some(500..=599) => summary.server_errors += 1,
                _ => summary.other += 1,
            }
        }

        summary
    }
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={}, success={}, client_errors={}, server_errors={}, other={}",
            self.total, self.success, self.client_errors, self.server_errors, self.other
        )
    }
}
