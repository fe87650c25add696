//! Moderation queue: user submissions waiting for an admin decision.
//!
//! Approve is two writes against two stores (insert the catalog entry,
//! delete the submission). If the second write fails the first is undone,
//! so an approval either fully happens or leaves both stores as they were.
//! Decisions are serialized so a submission cannot be approved twice.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uidex_common::text::{collapse_whitespace, strip_fragment};
use uidex_db::{CatalogEntry, Framework, NewSubmission, Submission, SubmissionStatus, SubmissionStore};
use uuid::Uuid;

use crate::error::ModerationError;
use crate::normalise::Normaliser;
use crate::publisher::Publisher;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationSettings {
    /// Framework recorded when a submission does not name one.
    #[serde(default = "default_framework")]
    pub default_framework: String,
    /// Popularity score given to approved submissions.
    #[serde(default = "default_seed_score")]
    pub seed_score: i64,
}

fn default_framework()  -> String { "React".to_string() }
fn default_seed_score() -> i64 { 50 }

impl Default for ModerationSettings {
    fn default() -> Self {
        Self { default_framework: default_framework(), seed_score: default_seed_score() }
    }
}

/// What a user submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub doc_url: String,
}

pub struct ModerationQueue {
    submissions: Arc<dyn SubmissionStore>,
    publisher: Publisher,
    normaliser: Normaliser,
    settings: ModerationSettings,
    decisions: Mutex<()>,
}

impl ModerationQueue {
    pub fn new(
        submissions: Arc<dyn SubmissionStore>,
        publisher: Publisher,
        normaliser: Normaliser,
        settings: ModerationSettings,
    ) -> Self {
        Self { submissions, publisher, normaliser, settings, decisions: Mutex::new(()) }
    }

    /// Validate and store a submission as pending.
    pub async fn enqueue(&self, input: SubmissionInput) -> Result<Uuid, ModerationError> {
        let name = collapse_whitespace(&input.name);
        let library = collapse_whitespace(&input.library);
        let doc_url = input.doc_url.trim().to_string();

        let mut missing = Vec::new();
        if name.is_empty() {
            missing.push("name");
        }
        if library.is_empty() {
            missing.push("library");
        }
        if strip_fragment(&doc_url).is_empty() {
            missing.push("docUrl");
        }
        if !missing.is_empty() {
            return Err(ModerationError::Validation(format!("missing required fields: {}", missing.join(", "))));
        }

        let framework = input
            .framework
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(Framework::from)
            .unwrap_or_else(|| Framework::from(self.settings.default_framework.as_str()));

        let submission = self
            .submissions
            .create(NewSubmission { name, library, framework, doc_url })
            .await?;
        info!(id = %submission.id, name = %submission.name, library = %submission.library, "Submission queued");
        Ok(submission.id)
    }

    /// Pending submissions, newest first.
    pub async fn list_pending(&self) -> Result<Vec<Submission>, ModerationError> {
        Ok(self.submissions.find_by_status(SubmissionStatus::Pending).await?)
    }

    /// Publish a pending submission into the live catalog and remove it from the queue.
    pub async fn approve(&self, id: Uuid) -> Result<CatalogEntry, ModerationError> {
        let _decision = self.decisions.lock().await;

        let submission = self
            .submissions
            .find_by_id(id)
            .await?
            .filter(|s| s.status == SubmissionStatus::Pending)
            .ok_or(ModerationError::NotFound(id))?;

        let entry = self
            .normaliser
            .from_submission(&submission, self.settings.seed_score)
            .map_err(|reason| ModerationError::Validation(reason.to_string()))?;

        self.publisher
            .upsert(entry.clone())
            .await
            .map_err(|e| ModerationError::Publish(e.to_string()))?;

        let removed = self.submissions.delete(id).await;
        match removed {
            Ok(true) => {
                info!(%id, entry_id = %entry.id, name = %entry.name, "Submission approved");
                Ok(entry)
            }
            Ok(false) => {
                warn!(%id, "Submission vanished during approval, retracting entry");
                self.compensate(&entry).await;
                Err(ModerationError::NotFound(id))
            }
            Err(e) => {
                error!(%id, "Failed to remove approved submission, retracting entry: {e}");
                self.compensate(&entry).await;
                Err(ModerationError::Publish(e.to_string()))
            }
        }
    }

    /// Discard a pending submission.
    pub async fn reject(&self, id: Uuid) -> Result<(), ModerationError> {
        let _decision = self.decisions.lock().await;
        if !self.submissions.delete(id).await? {
            return Err(ModerationError::NotFound(id));
        }
        info!(%id, "Submission rejected");
        Ok(())
    }

    async fn compensate(&self, entry: &CatalogEntry) {
        if let Err(e) = self.publisher.retract(entry.id).await {
            error!(entry_id = %entry.id, "Could not retract catalog entry: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uidex_db::{EntryOrigin, MemoryCatalog, MemorySubmissions};

    fn queue() -> (ModerationQueue, Publisher) {
        let publisher = Publisher::new(Arc::new(MemoryCatalog::new()));
        let q = ModerationQueue::new(
            Arc::new(MemorySubmissions::new()),
            publisher.clone(),
            Normaliser::default(),
            ModerationSettings::default(),
        );
        (q, publisher)
    }

    fn input(name: &str) -> SubmissionInput {
        SubmissionInput {
            name: name.to_string(),
            library: "Swiper".to_string(),
            framework: None,
            doc_url: "https://swiperjs.test/react#usage".to_string(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_validates_required_fields() {
        let (q, _) = queue();
        let err = q.enqueue(SubmissionInput { name: "Carousel".into(), ..Default::default() }).await.unwrap_err();
        match err {
            ModerationError::Validation(msg) => {
                assert!(msg.contains("library"));
                assert!(msg.contains("docUrl"));
                assert!(!msg.contains("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(q.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enqueue_defaults_framework() {
        let (q, _) = queue();
        q.enqueue(input("Carousel")).await.unwrap();
        let pending = q.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].framework, Framework::React);
    }

    #[tokio::test]
    async fn test_approve_publishes_and_removes() {
        let (q, publisher) = queue();
        let id = q.enqueue(input("Carousel")).await.unwrap();
        let entry = q.approve(id).await.unwrap();

        assert_eq!(entry.popularity_score, 50);
        assert_eq!(entry.origin, EntryOrigin::Moderation);
        assert_eq!(entry.doc_url, "https://swiperjs.test/react");
        assert!(q.list_pending().await.unwrap().is_empty());
        assert!(publisher.catalog().find_by_id(entry.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_decision_is_not_found() {
        let (q, _) = queue();
        let id = q.enqueue(input("Carousel")).await.unwrap();
        q.approve(id).await.unwrap();
        assert!(matches!(q.approve(id).await, Err(ModerationError::NotFound(_))));
        assert!(matches!(q.reject(id).await, Err(ModerationError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reject_leaves_catalog_untouched() {
        let (q, publisher) = queue();
        let id = q.enqueue(input("Carousel")).await.unwrap();
        q.reject(id).await.unwrap();
        assert!(q.list_pending().await.unwrap().is_empty());
        assert!(publisher.catalog().snapshot().await.unwrap().entries.is_empty());
    }
}
