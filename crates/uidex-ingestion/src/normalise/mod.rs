//! Candidate normalisation.
//!
//! Both intake paths (harvest and moderation) end here, so a component name
//! gets the same cleaning and the same keyword set whichever way it arrived.
//! Leak heuristics only apply to harvested text; a human-approved name is
//! trusted as typed.

pub mod steps;

use chrono::Utc;
use tracing::debug;
use uidex_common::text::{collapse_whitespace, strip_fragment};
use uidex_db::{CatalogEntry, EntryOrigin, Submission};
use uuid::Uuid;

use crate::models::{RawCandidate, Rejection};
use steps::NamePipeline;

/// Name used when a rule's extractor cannot produce one.
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// Which intake path a candidate came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intake {
    Harvest,
    Moderation,
}

#[derive(Debug, Clone)]
pub struct Normaliser {
    /// Harvested names longer than this (in chars) are treated as leaked prose.
    pub max_name_len: usize,
    /// Generic keyword attached to every entry.
    pub domain_keyword: String,
}

impl Default for Normaliser {
    fn default() -> Self {
        Self { max_name_len: 30, domain_keyword: "ui component".to_string() }
    }
}

impl Normaliser {
    pub fn new(max_name_len: usize) -> Self {
        Self { max_name_len, ..Self::default() }
    }

    /// Clean a raw candidate into a catalog entry, or say why it was dropped.
    pub fn normalise(
        &self,
        raw: RawCandidate,
        clean: &NamePipeline,
        intake: Intake,
    ) -> Result<CatalogEntry, Rejection> {
        let mut name = collapse_whitespace(&raw.name);
        if !clean.is_empty() {
            name = match clean.apply(&name) {
                Ok(cleaned) => collapse_whitespace(&cleaned),
                Err(mismatch) => {
                    debug!(raw = %raw.name, step = mismatch.step, "Name cleaning mismatch, using placeholder");
                    PLACEHOLDER_NAME.to_string()
                }
            };
        }

        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if intake == Intake::Harvest {
            if name.starts_with('.') {
                return Err(Rejection::LeakedClassName);
            }
            if name.contains('{') || name.contains('}') {
                return Err(Rejection::LeakedMarkup);
            }
            let len = name.chars().count();
            if len > self.max_name_len {
                return Err(Rejection::TooLong(len));
            }
        }

        let doc_url = strip_fragment(raw.doc_url.trim());
        if doc_url.is_empty() {
            return Err(Rejection::EmptyUrl);
        }

        let library = collapse_whitespace(&raw.library);
        let keywords = self.keywords_for(&name, &library);
        Ok(CatalogEntry {
            id: Uuid::new_v4(),
            name,
            library,
            framework: raw.framework,
            doc_url,
            keywords,
            popularity_score: raw.popularity_score,
            origin: raw.origin,
            created_at: Utc::now(),
        })
    }

    /// Normalise an approved submission at the moderation seed score.
    pub fn from_submission(&self, submission: &Submission, score: i64) -> Result<CatalogEntry, Rejection> {
        let raw = RawCandidate {
            name: submission.name.clone(),
            library: submission.library.clone(),
            framework: submission.framework.clone(),
            doc_url: submission.doc_url.clone(),
            popularity_score: score,
            origin: EntryOrigin::Moderation,
        };
        self.normalise(raw, &NamePipeline::default(), Intake::Moderation)
    }

    /// Lowercased name, lowercased library, and the domain keyword.
    pub fn keywords_for(&self, name: &str, library: &str) -> std::collections::BTreeSet<String> {
        [name.to_lowercase(), library.to_lowercase(), self.domain_keyword.clone()]
            .into_iter()
            .filter(|k| !k.is_empty())
            .collect()
    }
}
