//! Moderation flow across both stores.

mod common;

use common::FlakySubmissions;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use uidex_db::{CatalogStore, MemoryCatalog};
use uidex_ingestion::{ModerationError, ModerationQueue, ModerationSettings, Normaliser, Publisher, SubmissionInput};

fn input() -> SubmissionInput {
    SubmissionInput {
        name: "Carousel".into(),
        library: "Swiper".into(),
        framework: Some("vue".into()),
        doc_url: "https://swiperjs.test/vue".into(),
    }
}

fn queue(submissions: Arc<FlakySubmissions>, catalog: Arc<MemoryCatalog>) -> ModerationQueue {
    ModerationQueue::new(submissions, Publisher::new(catalog), Normaliser::default(), ModerationSettings::default())
}

#[tokio::test]
async fn test_failed_delete_retracts_catalog_entry() {
    let submissions = Arc::new(FlakySubmissions::default());
    let catalog = Arc::new(MemoryCatalog::new());
    let q = queue(submissions.clone(), catalog.clone());

    let id = q.enqueue(input()).await.unwrap();
    submissions.fail_delete.store(true, Ordering::SeqCst);

    let err = q.approve(id).await.unwrap_err();
    assert!(matches!(err, ModerationError::Publish(_)));

    // Neither half of the approval is visible.
    assert!(catalog.snapshot().await.unwrap().entries.is_empty());
    let pending = q.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);

    // Retrying once the store recovers succeeds.
    submissions.fail_delete.store(false, Ordering::SeqCst);
    let entry = q.approve(id).await.unwrap();
    assert_eq!(catalog.snapshot().await.unwrap().entries, vec![entry]);
}

#[tokio::test]
async fn test_concurrent_approvals_publish_once() {
    let submissions = Arc::new(FlakySubmissions::default());
    let catalog = Arc::new(MemoryCatalog::new());
    let q = Arc::new(queue(submissions, catalog.clone()));
    let id = q.enqueue(input()).await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let q = q.clone();
            tokio::spawn(async move { q.approve(id).await })
        })
        .collect();

    let mut approved = 0;
    let mut not_found = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => approved += 1,
            Err(ModerationError::NotFound(_)) => not_found += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(approved, 1);
    assert_eq!(not_found, 3);
    assert_eq!(catalog.snapshot().await.unwrap().entries.len(), 1);
}

#[tokio::test]
async fn test_approved_entry_is_searchable_with_harvest_keywords() {
    let catalog = Arc::new(MemoryCatalog::new());
    let q = queue(Arc::new(FlakySubmissions::default()), catalog.clone());
    let id = q.enqueue(input()).await.unwrap();
    let entry = q.approve(id).await.unwrap();

    let expected = Normaliser::default().keywords_for("Carousel", "Swiper");
    assert_eq!(entry.keywords, expected);
    assert_eq!(entry.framework, uidex_db::Framework::Vue);
}

#[tokio::test]
async fn test_carousel_submission_end_to_end() {
    let catalog = Arc::new(MemoryCatalog::new());
    let q = queue(Arc::new(FlakySubmissions::default()), catalog.clone());
    let id = q
        .enqueue(SubmissionInput {
            name: "Carousel".into(),
            library: "Swiper.js".into(),
            framework: Some("React".into()),
            doc_url: "https://swiper.example/docs#top".into(),
        })
        .await
        .unwrap();

    q.approve(id).await.unwrap();
    assert!(q.list_pending().await.unwrap().iter().all(|s| s.id != id));

    let snap = catalog.snapshot().await.unwrap();
    assert_eq!(snap.entries.len(), 1);
    let entry = &snap.entries[0];
    assert_eq!(entry.name, "Carousel");
    assert_eq!(entry.library, "Swiper.js");
    assert_eq!(entry.doc_url, "https://swiper.example/docs");
    assert!(entry.keywords.contains("carousel"));
    assert!(entry.keywords.contains("swiper.js"));
    assert_eq!(entry.popularity_score, 50);
}
