//! navsmoke — anchor-navigation smoke checks over CDP.
//!
//! Opens a site's home page, collects its in-page anchor links, clicks
//! each one and verifies the URL fragment updates and the target section
//! exists. Console and network traffic are captured along the way and
//! land in an HTML report.
//!
//! The navigation protocol runs against the [`browser::PageDriver`] trait,
//! so it can be exercised without a browser; [`browser::CdpPage`] is the
//! real implementation.

pub mod browser;
pub mod config;
pub mod error;
pub mod nav;
pub mod report;

pub use config::Config;
pub use error::{NavsmokeError, Result};
pub use nav::{run_navigation_suite, SuiteOutcome};
