//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `LinkState`: Classification of a checked link (reachable, broken, ...)
//! - `LinkRecord`: The immutable outcome of checking one unique URL
//! - `VisitedSet`: URLs already scheduled, shared by every in-flight check

mod link_state;
mod record;
mod visited;

// Re-export main types
pub use link_state::LinkState;
pub use record::LinkRecord;
pub use visited::VisitedSet;
