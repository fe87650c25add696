//! Catalog publishing.
//!
//! Two modes: a full replace of the catalog by a harvest batch, and
//! single-entry upserts for approved submissions. A failed full replace
//! leaves the previous generation active.

use std::sync::Arc;
use tracing::info;
use uidex_db::{CatalogEntry, CatalogStore, DbError, EntryOrigin};
use uuid::Uuid;

#[derive(Clone)]
pub struct Publisher {
    catalog: Arc<dyn CatalogStore>,
}

impl Publisher {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogStore> {
        &self.catalog
    }

    /// Replace the whole catalog with `batch`. Returns the new generation.
    ///
    /// With `preserve_moderated`, entries that came in through moderation
    /// survive unless the batch has an entry for the same `doc_url`.
    pub async fn replace(&self, batch: Vec<CatalogEntry>, preserve_moderated: bool) -> Result<u64, DbError> {
        let count = batch.len();
        let generation = if preserve_moderated {
            self.catalog
                .replace_keeping(batch, &|e: &CatalogEntry| e.origin == EntryOrigin::Moderation)
                .await?
        } else {
            self.catalog.replace_all(batch).await?
        };
        info!(generation, entries = count, preserve_moderated, "Catalog replaced");
        Ok(generation)
    }

    /// Add one entry to the live catalog.
    pub async fn upsert(&self, entry: CatalogEntry) -> Result<(), DbError> {
        let (id, name) = (entry.id, entry.name.clone());
        self.catalog.insert(entry).await?;
        info!(%id, %name, "Catalog entry published");
        Ok(())
    }

    /// Remove an entry published by `upsert`. Used to undo a half-finished approval.
    pub async fn retract(&self, id: Uuid) -> Result<bool, DbError> {
        self.catalog.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uidex_db::{Framework, MemoryCatalog};

    fn entry(name: &str, origin: EntryOrigin) -> CatalogEntry {
        CatalogEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            library: "Radix UI".to_string(),
            framework: Framework::React,
            doc_url: format!("https://radix.test/{}", name.to_lowercase()),
            keywords: Default::default(),
            popularity_score: 80,
            origin,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_replace_wipes_moderated_by_default() {
        let publisher = Publisher::new(Arc::new(MemoryCatalog::new()));
        publisher.upsert(entry("Carousel", EntryOrigin::Moderation)).await.unwrap();
        publisher.replace(vec![entry("Dialog", EntryOrigin::Harvest)], false).await.unwrap();

        let snap = publisher.catalog().snapshot().await.unwrap();
        assert_eq!(snap.entries.len(), 1);
        assert_eq!(snap.entries[0].name, "Dialog");
    }

    #[tokio::test]
    async fn test_replace_can_preserve_moderated() {
        let publisher = Publisher::new(Arc::new(MemoryCatalog::new()));
        publisher.upsert(entry("Carousel", EntryOrigin::Moderation)).await.unwrap();
        publisher.upsert(entry("Popover", EntryOrigin::Harvest)).await.unwrap();
        publisher.replace(vec![entry("Dialog", EntryOrigin::Harvest)], true).await.unwrap();

        let snap = publisher.catalog().snapshot().await.unwrap();
        let mut names: Vec<&str> = snap.entries.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Carousel", "Dialog"]);
    }

    #[tokio::test]
    async fn test_retract() {
        let publisher = Publisher::new(Arc::new(MemoryCatalog::new()));
        let e = entry("Carousel", EntryOrigin::Moderation);
        let id = e.id;
        publisher.upsert(e).await.unwrap();
        assert!(publisher.retract(id).await.unwrap());
        assert!(publisher.catalog().find_by_id(id).await.unwrap().is_none());
    }
}
