//! HTML report rendering.
//!
//! Everything here is instrumentation: the results-dir wipe and the
//! auto-open are best-effort and must never fail the run. Only actually
//! writing the report file surfaces an error, and the binary downgrades
//! even that to a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::error::Result;
use crate::report::bundle::LogSnapshot;

/// Outcome row for the report table.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub name: String,
    pub passed: bool,
    pub url: String,
    pub detail: String,
}

pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove a stale results directory left by a previous run. Failures
    /// are swallowed.
    pub fn clear_results_dir(dir: &Path) {
        if dir.exists() {
            if let Err(e) = fs::remove_dir_all(dir) {
                tracing::debug!("could not clear {}: {}", dir.display(), e);
            }
        }
    }

    /// Write the report, creating parent directories as needed.
    pub fn write(&self, entry: &ReportEntry, logs: &LogSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let html = render(entry, logs);
        fs::write(&self.path, html)?;
        Ok(())
    }

    /// Open the report in the default browser unless disabled. Best-effort.
    pub async fn auto_open(&self, enabled: bool) {
        if !enabled {
            return;
        }
        // Give the filesystem a beat before handing the path to the opener.
        tokio::time::sleep(Duration::from_millis(200)).await;

        let Ok(path) = self.path.canonicalize() else {
            tracing::debug!("report {} not found, skipping open", self.path.display());
            return;
        };
        if let Err(e) = spawn_opener(&path) {
            tracing::debug!("could not open report: {}", e);
        }
    }
}

fn spawn_opener(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = Command::new("open");
        c.arg(path);
        c
    };
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    cmd.spawn().map(|_| ())
}

fn render(entry: &ReportEntry, logs: &LogSnapshot) -> String {
    let status = if entry.passed { "passed" } else { "failed" };
    let combined = logs.combined_text(&entry.url);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>navsmoke report</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }}
.passed {{ color: #2e7d32; }}
.failed {{ color: #c62828; }}
pre {{ background: #f5f5f5; padding: 1em; overflow-x: auto; }}
</style>
</head>
<body>
<h1>navsmoke report</h1>
<table>
<tr><th>Test</th><th>URL</th><th>Result</th></tr>
<tr><td>{name}</td><td>{url}</td><td class="{status}">{status}</td></tr>
</table>
<h2>Details</h2>
<p>{detail}</p>
<h2>Logs</h2>
<pre>{logs}</pre>
</body>
</html>
"#,
        name = escape(&entry.name),
        url = escape(&entry.url),
        status = status,
        detail = escape(&entry.detail),
        logs = escape(&combined),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
