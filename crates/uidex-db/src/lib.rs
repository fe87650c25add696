//! uidex Database Layer
//!
//! Document-style stores for the component catalog and the moderation queue.
//!
//! # Features
//!
//! - Catalog held as an immutable, versioned snapshot; writers build the next
//!   generation and swap it in atomically, so readers never see a half-applied refresh
//! - Query by case-insensitive substring over selected fields, sorted by popularity
//! - Optional JSON-file persistence per store (write to temp file, then rename)
//!
//! # Example
//!
//! ```rust,no_run
//! use uidex_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("./data").await?;
//!     let stats = db.stats().await?;
//!     println!("{} entries in generation {}", stats.catalog_entries, stats.generation);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod database;
pub mod error;
pub mod persist;
pub mod schema;
pub mod submissions;

pub use catalog::{CatalogSnapshot, CatalogStore, MemoryCatalog};
pub use database::{Database, DatabaseStats};
pub use error::{DbError, Result};
pub use schema::{
    CatalogEntry, CatalogQuery, EntryOrigin, Framework, MatchField, NewSubmission,
    Submission, SubmissionStatus,
};
pub use submissions::{MemorySubmissions, SubmissionStore};
