//! Browser control: the page-driver seam and its CDP implementation.

pub mod driver;
pub mod session;
pub mod viewport;

pub use driver::{PageDriver, RawAnchor};
pub use session::{BrowserSession, CdpPage};
pub use viewport::{in_viewport, BoundingBox, ViewportSize};
