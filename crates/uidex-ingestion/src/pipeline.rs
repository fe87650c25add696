//! End-to-end harvest run.
//!
//! One run:
//!   1. Harvest every rule concurrently (bounded), each in isolation
//!   2. Normalise candidates, dropping leaked markup and prose
//!   3. Concatenate and deduplicate by docUrl
//!   4. Publish the batch as a full replace (skipped when the batch is empty)
//!
//! A failing rule never aborts the run; it is reported by library name and
//! the other rules' output is still published. Runs are serialized.

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uidex_common::DocumentFetcher;
use uidex_db::CatalogEntry;
use uuid::Uuid;

use crate::dedup::dedup_by_doc_url;
use crate::error::HarvestError;
use crate::normalise::steps::NamePipeline;
use crate::normalise::{Intake, Normaliser};
use crate::publisher::Publisher;
use crate::rules::{ExtractionRule, DEFAULT_STOPLIST};
use crate::sources::{harvest_rule, SitemapLimits};

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestSettings {
    /// Rules harvested at the same time.
    #[serde(default = "default_max_concurrent_sources")]
    pub max_concurrent_sources: usize,
    /// Keep moderation-approved entries across a full replace.
    #[serde(default)]
    pub preserve_moderated: bool,
    #[serde(default = "default_selector_score")]
    pub selector_score: i64,
    #[serde(default = "default_sitemap_score")]
    pub sitemap_score: i64,
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    #[serde(default = "default_stoplist")]
    pub stoplist: Vec<String>,
    #[serde(default)]
    pub sitemap: SitemapLimits,
}

fn default_max_concurrent_sources() -> usize { 4 }
fn default_selector_score()         -> i64 { 90 }
fn default_sitemap_score()          -> i64 { 80 }
fn default_max_name_len()           -> usize { 30 }
fn default_min_text_len()           -> usize { 2 }
fn default_stoplist() -> Vec<String> {
    DEFAULT_STOPLIST.iter().map(|s| s.to_string()).collect()
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            max_concurrent_sources: default_max_concurrent_sources(),
            preserve_moderated: false,
            selector_score: default_selector_score(),
            sitemap_score: default_sitemap_score(),
            max_name_len: default_max_name_len(),
            min_text_len: default_min_text_len(),
            stoplist: default_stoplist(),
            sitemap: SitemapLimits::default(),
        }
    }
}

impl HarvestSettings {
    /// The rule's own score if set, else the strategy default.
    pub fn score_for(&self, rule: &ExtractionRule) -> i64 {
        rule.popularity().unwrap_or(match rule {
            ExtractionRule::Selector(_) => self.selector_score,
            ExtractionRule::Sitemap(_)  => self.sitemap_score,
        })
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Outcome of one rule within a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub library: String,
    pub kind: &'static str,
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReport {
    pub run_id: Uuid,
    /// Entries in the published batch (0 when publishing was skipped).
    pub published: usize,
    /// Library names of rules that failed.
    pub sources_failed: Vec<String>,
    pub sources: Vec<SourceReport>,
    pub candidates_found: usize,
    pub rejected: usize,
    pub duplicates_collapsed: usize,
    /// New catalog generation, `None` when nothing was published.
    pub generation: Option<u64>,
    pub duration_ms: u64,
}

// ── Runner ────────────────────────────────────────────────────────────────────

pub struct HarvestRunner {
    fetcher: Arc<dyn DocumentFetcher>,
    publisher: Publisher,
    normaliser: Normaliser,
    settings: HarvestSettings,
    /// Held for the whole of a run or seed publish.
    run_lock: Mutex<()>,
}

impl HarvestRunner {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, publisher: Publisher, settings: HarvestSettings) -> Self {
        Self {
            fetcher,
            publisher,
            normaliser: Normaliser::new(settings.max_name_len),
            settings,
            run_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    pub fn normaliser(&self) -> &Normaliser {
        &self.normaliser
    }

    /// Harvest `rules` and publish the result as the next catalog generation.
    ///
    /// Per-rule failures are in the report. `Err` means the publish itself
    /// failed, in which case the previous catalog is still active.
    #[instrument(skip(self, rules), fields(rules = rules.len()))]
    pub async fn run(&self, rules: &[ExtractionRule]) -> Result<HarvestReport, HarvestError> {
        let _guard = self.run_lock.lock().await;
        let run_id = Uuid::new_v4();
        let t0 = Instant::now();
        info!(run_id = %run_id, "Starting harvest run");

        let mut tasks: Vec<BoxFuture<'_, (SourceReport, Vec<CatalogEntry>)>> = Vec::with_capacity(rules.len());
        for rule in rules {
            tasks.push(self.harvest_source(rule).boxed());
        }
        let outcomes: Vec<(SourceReport, Vec<CatalogEntry>)> = stream::iter(tasks)
            .buffered(self.settings.max_concurrent_sources.max(1))
            .collect()
            .await;

        let mut report = HarvestReport {
            run_id,
            published: 0,
            sources_failed: Vec::new(),
            sources: Vec::with_capacity(outcomes.len()),
            candidates_found: 0,
            rejected: 0,
            duplicates_collapsed: 0,
            generation: None,
            duration_ms: 0,
        };

        let mut batch = Vec::new();
        for (source, entries) in outcomes {
            report.candidates_found += source.candidates;
            report.rejected += source.rejected;
            if source.error.is_some() {
                report.sources_failed.push(source.library.clone());
            }
            report.sources.push(source);
            batch.extend(entries);
        }

        let deduped = dedup_by_doc_url(batch);
        report.duplicates_collapsed = deduped.collapsed;

        if deduped.entries.is_empty() {
            warn!(run_id = %run_id, "Harvest produced no entries, keeping current catalog");
        } else {
            report.published = deduped.entries.len();
            match self.publisher.replace(deduped.entries, self.settings.preserve_moderated).await {
                Ok(generation) => report.generation = Some(generation),
                Err(e) => {
                    error!(run_id = %run_id, "Publish failed, previous catalog kept: {e}");
                    return Err(HarvestError::Publish(e));
                }
            }
        }

        report.duration_ms = t0.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            published = report.published,
            failed = report.sources_failed.len(),
            candidates = report.candidates_found,
            rejected = report.rejected,
            duplicates = report.duplicates_collapsed,
            duration_ms = report.duration_ms,
            "Harvest run complete"
        );
        Ok(report)
    }

    /// Publish a pre-built batch (the seed matrix) as a full replace,
    /// serialized with harvest runs.
    pub async fn publish_seed(&self, entries: Vec<CatalogEntry>) -> Result<u64, HarvestError> {
        let _guard = self.run_lock.lock().await;
        let deduped = dedup_by_doc_url(entries);
        let generation = self.publisher.replace(deduped.entries, self.settings.preserve_moderated).await?;
        Ok(generation)
    }

    async fn harvest_source(&self, rule: &ExtractionRule) -> (SourceReport, Vec<CatalogEntry>) {
        let mut report = SourceReport {
            library: rule.library().to_string(),
            kind: rule.kind(),
            candidates: 0,
            accepted: 0,
            rejected: 0,
            error: None,
        };

        let prepared = rule
            .validate()
            .and_then(|_| NamePipeline::compile(rule.library(), rule.clean_steps()));
        let clean = match prepared {
            Ok(clean) => clean,
            Err(e) => {
                warn!(library = %report.library, "Rule skipped: {e}");
                report.error = Some(e.to_string());
                return (report, Vec::new());
            }
        };

        let raws = match harvest_rule(self.fetcher.as_ref(), rule, &self.settings).await {
            Ok(raws) => raws,
            Err(e) => {
                warn!(library = %report.library, url = rule.entry_url(), "Source failed: {e}");
                report.error = Some(e.to_string());
                return (report, Vec::new());
            }
        };

        report.candidates = raws.len();
        let mut entries = Vec::with_capacity(raws.len());
        for raw in raws {
            let name = raw.name.clone();
            match self.normaliser.normalise(raw, &clean, Intake::Harvest) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    debug!(library = %report.library, %name, %reason, "Candidate rejected");
                    report.rejected += 1;
                }
            }
        }
        report.accepted = entries.len();
        info!(
            library = %report.library,
            kind = report.kind,
            candidates = report.candidates,
            accepted = report.accepted,
            "Source harvested"
        );
        (report, entries)
    }
}
