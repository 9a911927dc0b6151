//! Viewport geometry: does an element's box overlap the visible window?
//!
//! The measurement side (bounding rect, window size, the settle delay that
//! lets layout and scroll animations finish) lives in the driver; the
//! overlap decision itself is plain geometry and lives here.

use serde::Deserialize;

/// Element bounding rectangle in viewport coordinates, as reported by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Inner window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// True iff the box overlaps the visible rectangle on both axes.
/// A detached element (`None`) is never in the viewport.
pub fn in_viewport(rect: Option<&BoundingBox>, viewport: &ViewportSize) -> bool {
    let Some(rect) = rect else {
        return false;
    };
    let vertically = rect.top < viewport.height && rect.bottom > 0.0;
    let horizontally = rect.left < viewport.width && rect.right > 0.0;
    vertically && horizontally
}
