//! Navigation protocol tests against a scripted fake page.
//!
//! The fake simulates hash routing: clicking a wired anchor rewrites the
//! URL fragment, sections either exist or don't. No browser involved.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use navsmoke::browser::{BoundingBox, PageDriver, RawAnchor, ViewportSize};
use navsmoke::error::{NavsmokeError, Result};
use navsmoke::nav::{
    click_nav_and_expect, collect_unique_nav_links, run_navigation_suite, AnchorCandidate,
    SectionHandle,
};

const BASE: &str = "https://site.test";

struct FakePage {
    url: Mutex<String>,
    anchors: Vec<RawAnchor>,
    /// Fragment applied to the URL when the anchor at this index is clicked.
    click_effects: HashMap<usize, String>,
    /// Section names resolvable on the page (without the `#`).
    sections: HashSet<String>,
    /// Anchors placed off-screen, forcing a scroll before the click.
    offscreen: HashSet<usize>,
    /// Whether the `main`/first-heading landmark is visible.
    main_visible: bool,
    clicked: Mutex<Vec<usize>>,
    scrolled: Mutex<Vec<usize>>,
}

impl FakePage {
    fn new(hrefs: &[&str]) -> Self {
        Self {
            url: Mutex::new(String::new()),
            anchors: hrefs
                .iter()
                .map(|href| RawAnchor {
                    href: href.to_string(),
                    visible: true,
                })
                .collect(),
            click_effects: HashMap::new(),
            sections: HashSet::new(),
            offscreen: HashSet::new(),
            main_visible: true,
            clicked: Mutex::new(Vec::new()),
            scrolled: Mutex::new(Vec::new()),
        }
    }

    fn wire_click(mut self, index: usize, fragment: &str) -> Self {
        self.click_effects.insert(index, fragment.to_string());
        self
    }

    fn with_section(mut self, name: &str) -> Self {
        self.sections.insert(name.to_string());
        self
    }

    fn with_offscreen(mut self, index: usize) -> Self {
        self.offscreen.insert(index);
        self
    }

    fn with_hidden_main(mut self) -> Self {
        self.main_visible = false;
        self
    }

    fn clicked(&self) -> Vec<usize> {
        self.clicked.lock().unwrap().clone()
    }

    fn scrolled(&self) -> Vec<usize> {
        self.scrolled.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn anchor_snapshot(&self) -> Result<Vec<RawAnchor>> {
        Ok(self.anchors.clone())
    }

    async fn click_anchor(&self, index: usize) -> Result<()> {
        self.clicked.lock().unwrap().push(index);
        if let Some(fragment) = self.click_effects.get(&index) {
            let mut url = self.url.lock().unwrap();
            let base = url.split('#').next().unwrap_or(BASE).to_string();
            *url = format!("{}{}", base, fragment);
        }
        Ok(())
    }

    async fn scroll_anchor_into_view(&self, index: usize) -> Result<()> {
        self.scrolled.lock().unwrap().push(index);
        Ok(())
    }

    async fn anchor_box(&self, index: usize) -> Result<Option<BoundingBox>> {
        if self.offscreen.contains(&index) {
            return Ok(Some(BoundingBox {
                top: 3000.0,
                bottom: 3040.0,
                left: 0.0,
                right: 200.0,
            }));
        }
        Ok(Some(BoundingBox {
            top: 10.0,
            bottom: 40.0,
            left: 0.0,
            right: 200.0,
        }))
    }

    async fn viewport_size(&self) -> Result<ViewportSize> {
        Ok(ViewportSize {
            width: 1280.0,
            height: 720.0,
        })
    }

    async fn count_section_matches(&self, name: &str) -> Result<u64> {
        Ok(u64::from(self.sections.contains(name)))
    }

    async fn scroll_section_into_view(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn main_content_visible(&self) -> Result<bool> {
        Ok(self.main_visible)
    }
}

fn assertion_message(result: std::result::Result<impl std::fmt::Debug, NavsmokeError>) -> String {
    match result {
        Err(NavsmokeError::Assertion(msg)) => msg,
        other => panic!("expected an assertion failure, got {:?}", other),
    }
}

#[tokio::test]
async fn suite_fails_when_no_anchors_qualify() {
    // Links exist, but none of them are anchor navigation.
    let page = FakePage::new(&["/pricing", "mailto:hr@site.test", "#top"]);
    let message = assertion_message(run_navigation_suite(&page, BASE).await);
    assert!(
        message.contains("No anchor links"),
        "diagnostic should name the absence of anchors: {}",
        message
    );
}

#[tokio::test]
async fn mixed_page_verifies_only_the_valid_anchor() {
    let page = FakePage::new(&["#about", "#top", "mailto:test@x.com"])
        .wire_click(0, "#about")
        .with_section("about");

    let candidates = collect_unique_nav_links(&page).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].fragment, "#about");

    let outcome = run_navigation_suite(&page, BASE).await.unwrap();
    assert_eq!(
        outcome.verified,
        vec![(
            "#about".to_string(),
            SectionHandle::Section {
                name: "about".to_string()
            }
        )]
    );
    assert_eq!(outcome.final_url, format!("{}#about", BASE));
    assert_eq!(page.clicked(), vec![0]);
}

#[tokio::test(start_paused = true)]
async fn prompt_url_update_returns_section_without_grace_wait() {
    let page = FakePage::new(&["#services"])
        .wire_click(0, "#services")
        .with_section("services");
    page.goto(BASE).await.unwrap();

    let candidates = collect_unique_nav_links(&page).await.unwrap();
    let before = tokio::time::Instant::now();
    let section = click_nav_and_expect(&page, &candidates[0]).await.unwrap();
    let elapsed = before.elapsed();

    assert_eq!(
        section,
        SectionHandle::Section {
            name: "services".to_string()
        }
    );
    // The URL was updated by the click itself; neither the 2s deadline nor
    // the 300ms grace wait should have been consumed.
    assert!(elapsed < Duration::from_millis(300), "took {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn unresponsive_click_fails_with_actual_url() {
    // Click wired to nothing: the URL never picks up the fragment.
    let page = FakePage::new(&["#ghost"]);
    page.goto(BASE).await.unwrap();

    let candidates = collect_unique_nav_links(&page).await.unwrap();
    let message = assertion_message(click_nav_and_expect(&page, &candidates[0]).await);
    assert!(message.contains("#ghost"), "{}", message);
    assert!(message.contains(BASE), "diagnostic should include the actual URL: {}", message);
}

#[tokio::test]
async fn missing_section_fails_naming_the_fragment() {
    // Navigation works, but no element carries the target id.
    let page = FakePage::new(&["#team"]).wire_click(0, "#team");
    page.goto(BASE).await.unwrap();

    let candidates = collect_unique_nav_links(&page).await.unwrap();
    let message = assertion_message(click_nav_and_expect(&page, &candidates[0]).await);
    assert!(
        message.contains("#team"),
        "diagnostic should name the missing fragment: {}",
        message
    );
}

#[tokio::test]
async fn offscreen_anchor_is_scrolled_before_the_click() {
    let page = FakePage::new(&["#footer"])
        .wire_click(0, "#footer")
        .with_section("footer")
        .with_offscreen(0);
    page.goto(BASE).await.unwrap();

    let candidates = collect_unique_nav_links(&page).await.unwrap();
    click_nav_and_expect(&page, &candidates[0]).await.unwrap();

    assert_eq!(page.scrolled(), vec![0]);
    assert_eq!(page.clicked(), vec![0]);
}

#[tokio::test]
async fn visible_anchor_is_not_scrolled() {
    let page = FakePage::new(&["#hero"]).wire_click(0, "#hero").with_section("hero");
    page.goto(BASE).await.unwrap();

    let candidates = collect_unique_nav_links(&page).await.unwrap();
    click_nav_and_expect(&page, &candidates[0]).await.unwrap();

    assert!(page.scrolled().is_empty());
}

#[tokio::test]
async fn first_failure_aborts_remaining_links() {
    // #a verifies, #b has no section, #c would verify but must not run.
    let page = FakePage::new(&["#a", "#b", "#c"])
        .wire_click(0, "#a")
        .wire_click(1, "#b")
        .wire_click(2, "#c")
        .with_section("a")
        .with_section("c");

    let message = assertion_message(run_navigation_suite(&page, BASE).await);
    assert!(message.contains("#b"), "{}", message);
    assert_eq!(page.clicked(), vec![0, 1], "the third link must not be clicked");
}

#[tokio::test]
async fn path_expectation_resolves_to_main_content() {
    // A non-fragment expectation settles for the primary content landmark
    // instead of a section lookup.
    let page = FakePage::new(&["/about"]).wire_click(0, "/about");
    page.goto(BASE).await.unwrap();

    let candidate = AnchorCandidate {
        index: 0,
        href: "/about".to_string(),
        fragment: "/about".to_string(),
    };
    let section = click_nav_and_expect(&page, &candidate).await.unwrap();
    assert_eq!(section, SectionHandle::MainContent);
}

#[tokio::test]
async fn path_expectation_fails_when_main_content_is_hidden() {
    let page = FakePage::new(&["/about"])
        .wire_click(0, "/about")
        .with_hidden_main();
    page.goto(BASE).await.unwrap();

    let candidate = AnchorCandidate {
        index: 0,
        href: "/about".to_string(),
        fragment: "/about".to_string(),
    };
    let message = assertion_message(click_nav_and_expect(&page, &candidate).await);
    assert!(
        message.contains("visible page content"),
        "diagnostic should name the invisible content: {}",
        message
    );
}

#[tokio::test]
async fn duplicate_fragments_are_verified_once() {
    let page = FakePage::new(&["/#contacts", "#contacts", "/#contacts"])
        .wire_click(0, "#contacts")
        .with_section("contacts");

    let outcome = run_navigation_suite(&page, BASE).await.unwrap();
    assert_eq!(outcome.verified.len(), 1);
    assert_eq!(page.clicked(), vec![0], "only the first occurrence is clicked");
}
