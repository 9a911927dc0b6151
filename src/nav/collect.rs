//! Navigation link collection.
//!
//! Scans every anchor on the page, keeps fragment-only, visible,
//! non-popup links and deduplicates them by target fragment, first
//! occurrence in document order winning.

use crate::browser::driver::{PageDriver, RawAnchor};
use crate::error::Result;
use std::collections::HashSet;

/// Fragments that point nowhere on this site and are skipped outright.
/// Site-specific and kept literal on purpose.
const RESERVED_FRAGMENTS: [&str; 5] = ["/", "/#", "/#top", "#", "#top"];

/// A qualifying anchor: `fragment` is non-empty and `#`-prefixed, `index`
/// addresses the anchor inside the driver's snapshot. Stale once the DOM
/// mutates; candidates are meant to be clicked right after collection.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorCandidate {
    pub index: usize,
    pub href: String,
    pub fragment: String,
}

/// Collect unique anchor-navigation links from the live page, in document
/// order of first occurrence. An empty result is valid here; callers that
/// require links must reject it themselves.
pub async fn collect_unique_nav_links(driver: &dyn PageDriver) -> Result<Vec<AnchorCandidate>> {
    let snapshot = driver.anchor_snapshot().await?;
    Ok(filter_candidates(&snapshot))
}

/// Apply the selection predicate and dedup to a raw anchor snapshot.
pub fn filter_candidates(anchors: &[RawAnchor]) -> Vec<AnchorCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for (index, anchor) in anchors.iter().enumerate() {
        let Some(fragment) = qualifying_fragment(&anchor.href, anchor.visible) else {
            continue;
        };
        if !seen.insert(fragment.clone()) {
            continue;
        }
        candidates.push(AnchorCandidate {
            index,
            href: anchor.href.clone(),
            fragment,
        });
    }

    candidates
}

/// The selection predicate: returns the `#`-prefixed fragment when the
/// anchor qualifies for verification.
fn qualifying_fragment(href: &str, visible: bool) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    if href.starts_with("mailto:") || href.starts_with("tel:") || href.starts_with("javascript:") {
        return None;
    }
    if href.contains("popup:") {
        return None;
    }
    if !visible {
        return None;
    }

    let raw = href.split_once('#').map(|(_, frag)| frag)?;
    if raw.is_empty() {
        return None;
    }

    let fragment = format!("#{}", raw);
    if fragment.contains("popup:") {
        return None;
    }
    if RESERVED_FRAGMENTS.contains(&fragment.as_str()) {
        return None;
    }

    Some(fragment)
}
