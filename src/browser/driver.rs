//! Abstraction over the live page, so the navigation protocol can run
//! against a fake in tests.
//!
//! One implementation ships with the crate: `CdpPage` (chromiumoxide).
//! Anchors are addressed by their position in the `a[href]` snapshot, in
//! document order; the snapshot goes stale if the DOM mutates after it is
//! taken (accepted risk, the protocol clicks shortly after collecting).

use async_trait::async_trait;
use serde::Deserialize;

use crate::browser::viewport::{BoundingBox, ViewportSize};
use crate::error::Result;

/// One anchor as seen on the page before any filtering.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnchor {
    /// Raw `href` attribute value, may be empty.
    pub href: String,
    /// Visibility per the rendering engine: attached, non-zero size, not
    /// `display:none`/`visibility:hidden`.
    pub visible: bool,
}

/// Capabilities the navigation protocol needs from a page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL and wait until the document has parsed
    /// (DOMContentLoaded-level; subresources may still be loading).
    async fn goto(&self, url: &str) -> Result<()>;

    /// Current URL as the page itself sees it (`window.location.href`).
    /// Fragment-only navigations must be reflected here immediately.
    async fn current_url(&self) -> Result<String>;

    /// All `a[href]` elements in document order.
    async fn anchor_snapshot(&self) -> Result<Vec<RawAnchor>>;

    /// Primary (left) click on the anchor at `index` in the snapshot.
    async fn click_anchor(&self, index: usize) -> Result<()>;

    /// Scroll the anchor at `index` into view. Best-effort: a scroll that
    /// has no effect is not an error.
    async fn scroll_anchor_into_view(&self, index: usize) -> Result<()>;

    /// Bounding box of the anchor at `index`, measured after a short settle
    /// delay. `None` when the element is missing or detached.
    async fn anchor_box(&self, index: usize) -> Result<Option<BoundingBox>>;

    /// Inner dimensions of the window.
    async fn viewport_size(&self) -> Result<ViewportSize>;

    /// Number of elements matching the section target `name`: an `id`, an
    /// anchor `name`, or a `data-anchor`/`data-menu-anchor` attribute.
    async fn count_section_matches(&self, name: &str) -> Result<u64>;

    /// Scroll the first section match for `name` into view.
    async fn scroll_section_into_view(&self, name: &str) -> Result<()>;

    /// Whether the primary content landmark (`main`, or the first `h1`)
    /// is visible.
    async fn main_content_visible(&self) -> Result<bool>;
}
