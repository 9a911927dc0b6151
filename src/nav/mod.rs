//! The navigation-verification protocol: collect anchor links, click each
//! one, confirm the URL fragment and the target section.

pub mod collect;
pub mod suite;
pub mod verify;

pub use collect::{collect_unique_nav_links, AnchorCandidate};
pub use suite::{run_navigation_suite, SuiteOutcome};
pub use verify::{click_nav_and_expect, SectionHandle};
