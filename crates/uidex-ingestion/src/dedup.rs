//! Deduplication of a normalised harvest batch.
//!
//! `doc_url` is the identity key. When several candidates point at the same
//! page (a component listed under two headings, or found by both a selector
//! and a sitemap rule) the shortest name wins, except that the extraction
//! placeholder loses to any real name. Ties on length fall back to
//! lexicographic name, then library, so the result does not depend on the
//! order in which concurrently harvested rules finished.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use uidex_db::CatalogEntry;

use crate::normalise::PLACEHOLDER_NAME;

/// Result of deduplicating a batch.
#[derive(Debug)]
pub struct DedupOutcome {
    /// One entry per distinct `doc_url`, sorted by `doc_url`.
    pub entries: Vec<CatalogEntry>,
    /// Number of entries dropped as duplicates.
    pub collapsed: usize,
}

/// Keep exactly one entry per `doc_url`.
pub fn dedup_by_doc_url(batch: Vec<CatalogEntry>) -> DedupOutcome {
    let total = batch.len();
    let mut winners: BTreeMap<String, CatalogEntry> = BTreeMap::new();

    for entry in batch {
        match winners.get(&entry.doc_url) {
            Some(current) if prefer(current, &entry) != Ordering::Greater => {}
            _ => {
                winners.insert(entry.doc_url.clone(), entry);
            }
        }
    }

    let entries: Vec<CatalogEntry> = winners.into_values().collect();
    DedupOutcome { collapsed: total - entries.len(), entries }
}

/// `Less` when `a` should win over `b`.
fn prefer(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    let placeholder = |e: &CatalogEntry| e.name == PLACEHOLDER_NAME;
    placeholder(a)
        .cmp(&placeholder(b))
        .then_with(|| a.name.chars().count().cmp(&b.name.chars().count()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.library.cmp(&b.library))
}
