//! Traversal engine over content-addressed references.
//!
//! [`Engine`] orchestrates the pieces from `cidhaul-core` and
//! `cidhaul-fetch`: it checks the [`Store`] before touching the
//! network, fetches absent identifiers through the gateway fetcher,
//! classifies and persists what comes back, records completion in the
//! [`ProgressSet`], and walks freshly stored JSON/HTML documents for
//! further identifiers until no new ones turn up. Top-level items fan
//! out across a bounded worker pool; nested expansion never does.

mod engine;
mod progress;
mod store;

pub use engine::{Engine, EngineError, RunSummary, WorkItem};
pub use progress::ProgressSet;
pub use store::Store;
