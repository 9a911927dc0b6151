//! Suite orchestration: open the home page, collect the links, verify
//! each one in order. The first failed link aborts the remaining checks.

use crate::browser::driver::PageDriver;
use crate::error::{NavsmokeError, Result};
use crate::nav::collect::collect_unique_nav_links;
use crate::nav::verify::{click_nav_and_expect, SectionHandle};

/// What a completed run verified, for the report.
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    /// `(fragment, resolved section)` pairs in verification order.
    pub verified: Vec<(String, SectionHandle)>,
    /// URL of the page when the run finished.
    pub final_url: String,
}

/// Run the whole navigation check against `base_url` (no trailing slash).
pub async fn run_navigation_suite(
    driver: &dyn PageDriver,
    base_url: &str,
) -> Result<SuiteOutcome> {
    driver.goto(base_url).await?;

    let candidates = collect_unique_nav_links(driver).await?;
    if candidates.is_empty() {
        return Err(NavsmokeError::Assertion(
            "No anchor links found on the page".to_string(),
        ));
    }
    tracing::info!("collected {} anchor link(s)", candidates.len());

    let mut verified = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        tracing::info!("checking {}", candidate.fragment);
        let section = click_nav_and_expect(driver, candidate).await?;
        verified.push((candidate.fragment.clone(), section));
    }

    let final_url = driver.current_url().await?;
    Ok(SuiteOutcome {
        verified,
        final_url,
    })
}
