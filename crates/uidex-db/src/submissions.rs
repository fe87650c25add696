//! Submission store (moderation queue backing).

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::persist::{read_json, write_json_atomic};
use crate::schema::{NewSubmission, Submission, SubmissionStatus};

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store a new submission in `pending` state.
    async fn create(&self, new: NewSubmission) -> Result<Submission>;

    /// Submissions in `status`, newest first.
    async fn find_by_status(&self, status: SubmissionStatus) -> Result<Vec<Submission>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>>;

    /// `Ok(false)` when the id is unknown.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// In-memory submission store with an optional JSON snapshot file.
#[derive(Default)]
pub struct MemorySubmissions {
    inner: RwLock<HashMap<Uuid, Submission>>,
    persist_path: Option<PathBuf>,
}

impl MemorySubmissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows: Vec<Submission> = read_json(&path).await?.unwrap_or_default();
        info!(path = %path.display(), pending = rows.len(), "Submission queue loaded");
        Ok(Self {
            inner: RwLock::new(rows.into_iter().map(|s| (s.id, s)).collect()),
            persist_path: Some(path),
        })
    }

    async fn persist(&self, rows: &HashMap<Uuid, Submission>) -> Result<()> {
        if let Some(path) = &self.persist_path {
            let mut list: Vec<&Submission> = rows.values().collect();
            list.sort_by_key(|s| s.created_at);
            write_json_atomic(path, &list).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissions {
    async fn create(&self, new: NewSubmission) -> Result<Submission> {
        let submission = Submission {
            id: Uuid::new_v4(),
            name: new.name,
            library: new.library,
            framework: new.framework,
            doc_url: new.doc_url,
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
        };

        let mut rows = self.inner.write().await;
        let mut next = rows.clone();
        next.insert(submission.id, submission.clone());
        self.persist(&next).await?;
        *rows = next;
        Ok(submission)
    }

    async fn find_by_status(&self, status: SubmissionStatus) -> Result<Vec<Submission>> {
        let rows = self.inner.read().await;
        let mut found: Vec<Submission> = rows.values().filter(|s| s.status == status).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.inner.write().await;
        if !rows.contains_key(&id) {
            return Ok(false);
        }
        let mut next = rows.clone();
        next.remove(&id);
        self.persist(&next).await?;
        *rows = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Framework;

    fn new(name: &str) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            library: "Swiper.js".to_string(),
            framework: Framework::React,
            doc_url: "https://swiper.example/docs".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending() {
        let store = MemorySubmissions::new();
        let s = store.create(new("Carousel")).await.unwrap();
        assert_eq!(s.status, SubmissionStatus::Pending);
        assert_eq!(store.find_by_id(s.id).await.unwrap(), Some(s));
    }

    #[tokio::test]
    async fn test_find_by_status_newest_first() {
        let store = MemorySubmissions::new();
        let first = store.create(new("Carousel")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(new("Slider")).await.unwrap();

        let pending = store.find_by_status(SubmissionStatus::Pending).await.unwrap();
        assert_eq!(pending.iter().map(|s| s.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert!(store.find_by_status(SubmissionStatus::Approved).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_missing() {
        let store = MemorySubmissions::new();
        let s = store.create(new("Carousel")).await.unwrap();
        assert!(store.delete(s.id).await.unwrap());
        assert!(!store.delete(s.id).await.unwrap());
    }
}
