//! Shared fakes for the ingestion integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uidex_common::{DocumentFetcher, UidexError};
use uidex_db::{
    CatalogEntry, CatalogQuery, CatalogSnapshot, CatalogStore, DbError, MemoryCatalog,
    MemorySubmissions, NewSubmission, Submission, SubmissionStatus, SubmissionStore,
};
use uuid::Uuid;

/// Serves canned bodies; unknown URLs answer 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    hits: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|u| u.as_str() == url).count()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, UidexError> {
        self.hits.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| UidexError::HttpStatus { url: url.to_string(), status: 404 })
    }
}

pub fn urlset(urls: &[&str]) -> String {
    let body: String = urls.iter().map(|u| format!("<url><loc>{u}</loc></url>")).collect();
    format!(r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{body}</urlset>"#)
}

pub fn sitemap_index(children: &[&str]) -> String {
    let body: String = children.iter().map(|u| format!("<sitemap><loc>{u}</loc></sitemap>")).collect();
    format!(r#"<?xml version="1.0"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{body}</sitemapindex>"#)
}

/// Catalog whose full replace can be made to fail.
#[derive(Default)]
pub struct FlakyCatalog {
    pub inner: MemoryCatalog,
    pub fail_replace: AtomicBool,
}

#[async_trait]
impl CatalogStore for FlakyCatalog {
    async fn replace_keeping(
        &self,
        entries: Vec<CatalogEntry>,
        keep: &(dyn for<'k> Fn(&'k CatalogEntry) -> bool + Send + Sync),
    ) -> Result<u64, DbError> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("disk full".into()));
        }
        self.inner.replace_keeping(entries, keep).await
    }

    async fn insert(&self, entry: CatalogEntry) -> Result<(), DbError> {
        self.inner.insert(entry).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogEntry>, DbError> {
        self.inner.find_by_id(id).await
    }

    async fn find(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, DbError> {
        self.inner.find(query).await
    }

    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, DbError> {
        self.inner.snapshot().await
    }
}

/// Submission store whose delete can be made to fail.
#[derive(Default)]
pub struct FlakySubmissions {
    pub inner: MemorySubmissions,
    pub fail_delete: AtomicBool,
    pub deletes: AtomicUsize,
}

#[async_trait]
impl SubmissionStore for FlakySubmissions {
    async fn create(&self, new: NewSubmission) -> Result<Submission, DbError> {
        self.inner.create(new).await
    }

    async fn find_by_status(&self, status: SubmissionStatus) -> Result<Vec<Submission>, DbError> {
        self.inner.find_by_status(status).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, DbError> {
        self.inner.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("submission store offline".into()));
        }
        self.inner.delete(id).await
    }
}
