//! Click-and-verify: one candidate link, one click, one section check.

use std::time::Duration;

use crate::browser::driver::PageDriver;
use crate::browser::viewport::in_viewport;
use crate::error::{NavsmokeError, Result};
use crate::nav::collect::AnchorCandidate;

/// Upper bound on waiting for the URL to pick up the fragment.
const URL_WAIT_TIMEOUT: Duration = Duration::from_millis(2000);
/// Poll interval while waiting for the URL change.
const URL_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Grace wait after the poll deadline, tolerating slow client-side routing.
const GRACE_WAIT: Duration = Duration::from_millis(300);

/// The section a verified link resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionHandle {
    /// A concrete in-page target, matched by id / anchor name / data
    /// anchor attribute.
    Section { name: String },
    /// The page's primary content landmark, for non-fragment expectations.
    MainContent,
}

/// Click `candidate` and verify the URL picks up its fragment and the
/// target section exists. Returns the resolved section, scrolled into
/// view. Any failed assertion aborts with a diagnostic; there is no retry.
pub async fn click_nav_and_expect(
    driver: &dyn PageDriver,
    candidate: &AnchorCandidate,
) -> Result<SectionHandle> {
    // Bring the link on screen first; a no-op scroll is fine.
    let rect = driver.anchor_box(candidate.index).await?;
    let viewport = driver.viewport_size().await?;
    if !in_viewport(rect.as_ref(), &viewport) {
        driver.scroll_anchor_into_view(candidate.index).await?;
    }

    driver.click_anchor(candidate.index).await?;

    wait_for_url_fragment(driver, &candidate.fragment).await?;

    let url = driver.current_url().await?;
    if !url.contains(&candidate.fragment) {
        return Err(NavsmokeError::Assertion(format!(
            "URL does not contain expected '{}': {}",
            candidate.fragment, url
        )));
    }

    resolve_section(driver, &candidate.fragment).await
}

/// Poll the URL until it contains `fragment`, up to the deadline; on a
/// miss, sleep the fixed grace period and fall through. The caller does
/// the authoritative re-check.
async fn wait_for_url_fragment(driver: &dyn PageDriver, fragment: &str) -> Result<()> {
    let deadline = tokio::time::Instant::now() + URL_WAIT_TIMEOUT;
    loop {
        if driver.current_url().await?.contains(fragment) {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::debug!("URL wait for '{}' hit the deadline, grace wait", fragment);
            tokio::time::sleep(GRACE_WAIT).await;
            return Ok(());
        }
        tokio::time::sleep(URL_POLL_INTERVAL).await;
    }
}

async fn resolve_section(driver: &dyn PageDriver, fragment: &str) -> Result<SectionHandle> {
    if let Some(name) = fragment.strip_prefix('#') {
        let matches = driver.count_section_matches(name).await?;
        if matches == 0 {
            return Err(NavsmokeError::Assertion(format!(
                "No section found for {}",
                fragment
            )));
        }
        driver.scroll_section_into_view(name).await?;
        return Ok(SectionHandle::Section {
            name: name.to_string(),
        });
    }

    // Path-style expectation: settle for the primary content landmark.
    if !driver.main_content_visible().await? {
        return Err(NavsmokeError::Assertion(
            "Expected visible page content".to_string(),
        ));
    }
    Ok(SectionHandle::MainContent)
}
