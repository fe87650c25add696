//! uidex-ranker: Ranked query engine over the published catalog.
//!
//! Read-only: a search works against whichever catalog generation is active
//! when it starts and never blocks writers.

pub mod search;

pub use search::{QueryEngine, SearchError, SearchSettings};
