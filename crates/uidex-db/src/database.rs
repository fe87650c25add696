//! Database handle bundling the catalog and submission stores.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::{CatalogStore, MemoryCatalog};
use crate::error::Result;
use crate::schema::SubmissionStatus;
use crate::submissions::{MemorySubmissions, SubmissionStore};

pub const CATALOG_FILE: &str = "catalog.json";
pub const SUBMISSIONS_FILE: &str = "submissions.json";

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    catalog: Arc<MemoryCatalog>,
    submissions: Arc<MemorySubmissions>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub generation: u64,
    pub catalog_entries: usize,
    pub pending_submissions: usize,
}

impl Database {
    /// Volatile database; nothing touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            catalog: Arc::new(MemoryCatalog::new()),
            submissions: Arc::new(MemorySubmissions::new()),
        }
    }

    /// Open or create a database in the directory `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        Ok(Self {
            catalog: Arc::new(MemoryCatalog::open(dir.join(CATALOG_FILE)).await?),
            submissions: Arc::new(MemorySubmissions::open(dir.join(SUBMISSIONS_FILE)).await?),
        })
    }

    pub fn catalog(&self) -> Arc<dyn CatalogStore> {
        self.catalog.clone()
    }

    pub fn submissions(&self) -> Arc<dyn SubmissionStore> {
        self.submissions.clone()
    }

    pub async fn stats(&self) -> Result<DatabaseStats> {
        let snapshot = self.catalog.snapshot().await?;
        let pending = self.submissions.find_by_status(SubmissionStatus::Pending).await?;
        Ok(DatabaseStats {
            generation: snapshot.generation,
            catalog_entries: snapshot.entries.len(),
            pending_submissions: pending.len(),
        })
    }
}
