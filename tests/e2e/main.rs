//! Real-browser e2e cases. Ignored by default; run them with
//! `cargo test --test e2e -- --ignored` on a machine with Chrome and
//! network access. `BASE_URL` picks the site under test.

use navsmoke::browser::{BrowserSession, PageDriver};
use navsmoke::config::Config;
use navsmoke::nav::{collect_unique_nav_links, run_navigation_suite};
use navsmoke::report::LogBundle;

#[tokio::test]
#[ignore] // Requires Chrome and network access
async fn home_page_anchors_navigate_and_resolve() {
    let config = Config::from_env();
    let bundle = LogBundle::new();

    let session = BrowserSession::launch(&config).await.expect("launch browser");
    let page = session.new_page(&bundle).await.expect("open page");

    let outcome = run_navigation_suite(&page, &config.base_url)
        .await
        .expect("navigation suite should pass");

    assert!(!outcome.verified.is_empty());
    assert!(outcome.final_url.starts_with(&config.base_url));

    // The run should have produced some network traffic worth reporting.
    let logs = bundle.snapshot().await;
    assert!(logs.network_summary().total > 0);

    session.close().await.expect("close browser");
}

#[tokio::test]
#[ignore] // Requires Chrome and network access
async fn collector_drops_reserved_and_scheme_links() {
    let config = Config::from_env();
    let bundle = LogBundle::new();

    let session = BrowserSession::launch(&config).await.expect("launch browser");
    let page = session.new_page(&bundle).await.expect("open page");
    page.goto(&config.base_url).await.expect("open home page");

    let candidates = collect_unique_nav_links(&page).await.expect("collect links");

    let mut seen = std::collections::HashSet::new();
    for candidate in &candidates {
        assert!(candidate.fragment.starts_with('#'));
        assert_ne!(candidate.fragment, "#top");
        assert!(!candidate.href.starts_with("mailto:"));
        assert!(seen.insert(candidate.fragment.clone()), "duplicate fragment collected");
    }

    session.close().await.expect("close browser");
}
