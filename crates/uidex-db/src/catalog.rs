//! Catalog store.
//!
//! The catalog is a sequence of immutable generations. Every write builds the
//! next `CatalogSnapshot` off to the side and swaps the active pointer, so a
//! reader holding a snapshot always sees one complete generation.

use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::persist::{read_json, write_json_atomic};
use crate::schema::{CatalogEntry, CatalogQuery};

/// One complete, consistent generation of the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub generation: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    fn successor(&self, entries: Vec<CatalogEntry>) -> Self {
        Self {
            generation: self.generation + 1,
            published_at: Some(Utc::now()),
            entries,
        }
    }
}

/// Document-store contract the pipeline and query engine depend on.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Discard every entry and publish `entries` as the next generation.
    /// Returns the new generation id.
    async fn replace_all(&self, entries: Vec<CatalogEntry>) -> Result<u64> {
        self.replace_keeping(entries, &|_: &CatalogEntry| false).await
    }

    /// Like `replace_all`, but carry over current entries for which `keep`
    /// returns true, unless the incoming batch already has their `doc_url`.
    /// Selection and swap happen under one writer lock.
    async fn replace_keeping(
        &self,
        entries: Vec<CatalogEntry>,
        keep: &(dyn for<'k> Fn(&'k CatalogEntry) -> bool + Send + Sync),
    ) -> Result<u64>;

    /// Add one entry as the next generation.
    async fn insert(&self, entry: CatalogEntry) -> Result<()>;

    /// Remove one entry. `Ok(false)` when the id is unknown.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogEntry>>;

    /// Entries matching `query`, popularity descending, capped at `query.limit`.
    async fn find(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>>;

    /// The currently active generation.
    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>>;
}

/// In-memory catalog with an optional JSON snapshot file.
pub struct MemoryCatalog {
    active: ArcSwap<CatalogSnapshot>,
    /// Serializes writers; readers never take it.
    writer: Mutex<()>,
    persist_path: Option<PathBuf>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            active: ArcSwap::from_pointee(CatalogSnapshot::default()),
            writer: Mutex::new(()),
            persist_path: None,
        }
    }

    /// Open a catalog persisted at `path`, loading the last published generation if present.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot: CatalogSnapshot = read_json(&path).await?.unwrap_or_default();
        info!(
            path = %path.display(),
            generation = snapshot.generation,
            entries = snapshot.entries.len(),
            "Catalog loaded"
        );
        Ok(Self {
            active: ArcSwap::from_pointee(snapshot),
            writer: Mutex::new(()),
            persist_path: Some(path),
        })
    }

    /// Persist first, then swap: a failed write leaves the previous generation active.
    async fn commit(&self, next: CatalogSnapshot) -> Result<u64> {
        if let Some(path) = &self.persist_path {
            write_json_atomic(path, &next).await?;
        }
        let generation = next.generation;
        self.active.store(Arc::new(next));
        debug!(generation, "Catalog generation swapped");
        Ok(generation)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn replace_keeping(
        &self,
        mut entries: Vec<CatalogEntry>,
        keep: &(dyn for<'k> Fn(&'k CatalogEntry) -> bool + Send + Sync),
    ) -> Result<u64> {
        let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.doc_url.clone()) {
                return Err(DbError::Duplicate(format!("docUrl {} appears twice in batch", entry.doc_url)));
            }
        }

        let _guard = self.writer.lock().await;
        let current = self.active.load_full();
        let carried: Vec<CatalogEntry> = current
            .entries
            .iter()
            .filter(|e| keep(e) && !seen.contains(&e.doc_url))
            .cloned()
            .collect();
        if !carried.is_empty() {
            debug!(carried = carried.len(), "Carrying entries into next generation");
            entries.extend(carried);
        }
        self.commit(current.successor(entries)).await
    }

    async fn insert(&self, entry: CatalogEntry) -> Result<()> {
        let _guard = self.writer.lock().await;
        let current = self.active.load_full();
        if current.entries.iter().any(|e| e.id == entry.id) {
            return Err(DbError::Duplicate(format!("catalog entry {}", entry.id)));
        }
        let mut entries = current.entries.clone();
        entries.push(entry);
        self.commit(current.successor(entries)).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.writer.lock().await;
        let current = self.active.load_full();
        if !current.entries.iter().any(|e| e.id == id) {
            return Ok(false);
        }
        let entries = current.entries.iter().filter(|e| e.id != id).cloned().collect();
        self.commit(current.successor(entries)).await?;
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogEntry>> {
        Ok(self.active.load().entries.iter().find(|e| e.id == id).cloned())
    }

    async fn find(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>> {
        let needle = query.pattern.to_lowercase();
        let snapshot = self.active.load();
        let mut hits: Vec<&CatalogEntry> = snapshot
            .entries
            .iter()
            .filter(|e| e.matches(&needle, &query.fields))
            .collect();
        // Name/library only make the order stable for equal scores.
        hits.sort_by(|a, b| {
            b.popularity_score
                .cmp(&a.popularity_score)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.library.cmp(&b.library))
        });
        Ok(hits.into_iter().take(query.limit).cloned().collect())
    }

    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>> {
        Ok(self.active.load_full())
    }
}
