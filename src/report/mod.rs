//! Run observability: per-run log accumulation and the HTML report.

pub mod bundle;
pub mod html;

pub use bundle::{LogBundle, LogSnapshot, NetworkSummary};
pub use html::ReportWriter;
