//! Sitemap strategy: walk a sitemap (and any nested sitemap indexes) and
//! derive component names from page URLs.
//!
//! The walk is bounded: every document is fetched at most once per run,
//! recursion stops at `max_depth`, a rule may fetch at most
//! `max_documents` sitemap files, and at most `fan_out` fetches are in
//! flight for the whole walk whatever its depth. A broken child sitemap is
//! logged and skipped; only a broken root fails the rule.

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};
use uidex_common::text::canonical_doc_url;
use uidex_common::DocumentFetcher;
use uidex_db::EntryOrigin;

use crate::error::HarvestError;
use crate::models::RawCandidate;
use crate::normalise::steps::NamePipeline;
use crate::normalise::PLACEHOLDER_NAME;
use crate::rules::SitemapRule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapLimits {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
    /// Sitemap fetches in flight at once, across every nesting level.
    #[serde(default = "default_fan_out")]
    pub fan_out: usize,
}

fn default_max_depth()     -> usize { 4 }
fn default_max_documents() -> usize { 200 }
fn default_fan_out()       -> usize { 4 }

impl Default for SitemapLimits {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_documents: default_max_documents(),
            fan_out: default_fan_out(),
        }
    }
}

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of further sitemaps.
    Index(Vec<String>),
    /// `<urlset>`: page locations.
    UrlSet(Vec<String>),
}

/// Parse a sitemap or sitemap index. Namespace prefixes are ignored.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<bool> = None; // Some(true) = index
    let mut locs = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sitemapindex" if root.is_none() => root = Some(true),
                b"urlset" if root.is_none()       => root = Some(false),
                b"loc" => {
                    in_loc = true;
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"sitemapindex" if root.is_none() => root = Some(true),
                b"urlset" if root.is_none()       => root = Some(false),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_loc => {
                let text = e.unescape().map_err(|err| err.to_string())?;
                current.push_str(&text);
            }
            Ok(Event::CData(ref e)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(e));
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let loc = current.trim();
                if !loc.is_empty() {
                    locs.push(loc.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("xml error at byte {}: {e}", reader.buffer_position())),
            _ => {}
        }
        buf.clear();
    }

    match root {
        Some(true)  => Ok(SitemapDocument::Index(locs)),
        Some(false) => Ok(SitemapDocument::UrlSet(locs)),
        None        => Err("no <urlset> or <sitemapindex> root".to_string()),
    }
}

#[derive(Default)]
struct WalkState {
    visited: HashSet<String>,
    fetched: usize,
}

/// One bounded sitemap traversal. Not reused across rules.
pub struct SitemapWalker<'a> {
    fetcher: &'a dyn DocumentFetcher,
    limits: &'a SitemapLimits,
    state: Mutex<WalkState>,
    skipped: AtomicUsize,
    permits: Semaphore,
}

impl<'a> SitemapWalker<'a> {
    pub fn new(fetcher: &'a dyn DocumentFetcher, limits: &'a SitemapLimits) -> Self {
        Self {
            fetcher,
            limits,
            state: Mutex::new(WalkState::default()),
            skipped: AtomicUsize::new(0),
            permits: Semaphore::new(limits.fan_out.max(1)),
        }
    }

    /// Every page URL reachable from `root`, in document order.
    pub async fn collect_urls(&self, root: &str) -> Result<Vec<String>, HarvestError> {
        self.walk(root.to_string(), 0).await
    }

    /// Child sitemaps that failed and were skipped.
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Sitemap documents fetched so far.
    pub fn fetched(&self) -> usize {
        self.state.lock().map(|s| s.fetched).unwrap_or_default()
    }

    fn claim(&self, url: &str, depth: usize) -> Result<(), HarvestError> {
        if depth > self.limits.max_depth {
            return Err(HarvestError::malformed(url, format!("sitemap nesting deeper than {}", self.limits.max_depth)));
        }
        let mut state = self
            .state
            .lock()
            .map_err(|_| HarvestError::malformed(url, "sitemap walk state poisoned"))?;
        if !state.visited.insert(url.to_string()) {
            return Err(HarvestError::malformed(url, "sitemap already visited (cycle)"));
        }
        if state.fetched >= self.limits.max_documents {
            return Err(HarvestError::malformed(url, format!("more than {} sitemap documents", self.limits.max_documents)));
        }
        state.fetched += 1;
        Ok(())
    }

    fn walk(&self, url: String, depth: usize) -> BoxFuture<'_, Result<Vec<String>, HarvestError>> {
        async move {
            self.claim(&url, depth)?;

            let body = {
                let _permit = self
                    .permits
                    .acquire()
                    .await
                    .map_err(|_| HarvestError::malformed(&url, "sitemap walk closed"))?;
                self.fetcher
                    .fetch_text(&url)
                    .await
                    .map_err(|e| HarvestError::unavailable(&url, e))?
            };
            let document = parse_sitemap(&body).map_err(|reason| HarvestError::malformed(&url, reason))?;

            match document {
                SitemapDocument::UrlSet(pages) => Ok(pages),
                SitemapDocument::Index(children) => {
                    debug!(%url, children = children.len(), depth, "Descending into sitemap index");
                    let results: Vec<_> = stream::iter(children)
                        .map(|child| self.walk(child, depth + 1))
                        .buffered(self.limits.fan_out.max(1))
                        .collect()
                        .await;

                    let mut pages = Vec::new();
                    for result in results {
                        match result {
                            Ok(found) => pages.extend(found),
                            Err(e) => {
                                warn!(parent = %url, "Skipping child sitemap: {e}");
                                self.skipped.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                    Ok(pages)
                }
            }
        }
        .boxed()
    }
}

/// Harvest one sitemap rule: walk, filter page URLs, derive names.
#[instrument(skip(fetcher, rule, extract, limits), fields(library = %rule.library))]
pub async fn harvest(
    fetcher: &dyn DocumentFetcher,
    rule: &SitemapRule,
    extract: &NamePipeline,
    limits: &SitemapLimits,
    score: i64,
) -> Result<Vec<RawCandidate>, HarvestError> {
    let walker = SitemapWalker::new(fetcher, limits);
    let pages = walker.collect_urls(&rule.sitemap_url).await?;

    let mut candidates = Vec::new();
    let mut mismatches = 0usize;
    for page in pages.iter().filter(|p| rule.filter.accepts(p)) {
        let Some(doc_url) = canonical_doc_url(page) else {
            debug!(loc = %page, "Skipping non-http sitemap location");
            continue;
        };
        let name = match extract.apply(&doc_url) {
            Ok(name) => name,
            Err(_) => {
                mismatches += 1;
                PLACEHOLDER_NAME.to_string()
            }
        };
        candidates.push(RawCandidate {
            name,
            library: rule.library.clone(),
            framework: rule.framework.clone(),
            doc_url,
            popularity_score: score,
            origin: EntryOrigin::Harvest,
        });
    }

    debug!(
        pages = pages.len(),
        found = candidates.len(),
        mismatches,
        documents = walker.fetched(),
        skipped = walker.skipped(),
        "Sitemap harvest complete"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{NameStep, UrlFilter};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;
    use uidex_common::UidexError;
    use uidex_db::Framework;

    /// Four-way sitemap tree, three index levels deep, that records how many
    /// fetches overlap.
    #[derive(Default)]
    struct SlowTree {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl DocumentFetcher for SlowTree {
        async fn fetch_text(&self, url: &str) -> Result<String, UidexError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let key = url.trim_start_matches("https://x.test/s").trim_end_matches(".xml");
            let body = if key.len() < 3 {
                let children: String = (0..4)
                    .map(|i| format!("<sitemap><loc>https://x.test/s{key}{i}.xml</loc></sitemap>"))
                    .collect();
                format!("<sitemapindex>{children}</sitemapindex>")
            } else {
                format!("<urlset><url><loc>https://x.test/docs/components/c{key}</loc></url></urlset>")
            };
            Ok(body)
        }
    }

    struct Pages(HashMap<String, String>);

    #[async_trait]
    impl DocumentFetcher for Pages {
        async fn fetch_text(&self, url: &str) -> Result<String, UidexError> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| UidexError::HttpStatus { url: url.to_string(), status: 404 })
        }
    }

    #[tokio::test]
    async fn test_fan_out_bounds_whole_walk() {
        let tree = SlowTree::default();
        let limits = SitemapLimits { fan_out: 4, ..SitemapLimits::default() };
        let walker = SitemapWalker::new(&tree, &limits);

        let urls = walker.collect_urls("https://x.test/s.xml").await.unwrap();
        assert_eq!(urls.len(), 64);
        assert_eq!(walker.fetched(), 85);
        assert_eq!(walker.skipped(), 0);

        let peak = tree.peak.load(Ordering::SeqCst);
        assert!(peak <= 4, "peak in-flight fetches was {peak}");
        assert!(peak > 1, "walk never fetched concurrently");
    }

    #[tokio::test]
    async fn test_page_urls_are_canonical_and_absolute() {
        let root = "https://x.test/sitemap.xml";
        let body = r#"<urlset>
              <url><loc>https://x.test/docs/components/date-picker#api</loc></url>
              <url><loc>/docs/components/relative</loc></url>
              <url><loc>ftp://x.test/docs/components/archive</loc></url>
            </urlset>"#;
        let fetcher = Pages(HashMap::from([(root.to_string(), body.to_string())]));
        let rule = SitemapRule {
            library: "X UI".into(),
            sitemap_url: root.into(),
            framework: Framework::React,
            filter: UrlFilter { include: vec!["/components/".into()], exclude: vec![] },
            extract: vec![NameStep::After { marker: "/components/".into() }, NameStep::SlugToTitle],
            clean: vec![],
            popularity: None,
        };
        let extract = NamePipeline::compile(&rule.library, &rule.extract).unwrap();

        let found = harvest(&fetcher, &rule, &extract, &SitemapLimits::default(), 80).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].doc_url, "https://x.test/docs/components/date-picker");
        assert_eq!(found[0].name, "Date Picker");
    }

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://mantine.dev/core/button/</loc></url>
              <url><loc> https://mantine.dev/core/select/ </loc><lastmod>2024-01-01</lastmod></url>
              <url><loc><![CDATA[https://mantine.dev/core/tabs/]]></loc></url>
            </urlset>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapDocument::UrlSet(vec![
                "https://mantine.dev/core/button/".into(),
                "https://mantine.dev/core/select/".into(),
                "https://mantine.dev/core/tabs/".into(),
            ])
        );
    }

    #[test]
    fn test_parse_index_with_prefix_and_entities() {
        let xml = r#"<sm:sitemapindex xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
              <sm:sitemap><sm:loc>https://x.test/a.xml?x=1&amp;y=2</sm:loc></sm:sitemap>
            </sm:sitemapindex>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapDocument::Index(vec!["https://x.test/a.xml?x=1&y=2".into()])
        );
    }

    #[test]
    fn test_parse_rejects_non_sitemap() {
        assert!(parse_sitemap("<html><body>Not found</body></html>").is_err());
        assert!(parse_sitemap("").is_err());
        assert!(parse_sitemap("<urlset><url><loc>x</url>").is_err());
    }

    #[test]
    fn test_empty_urlset_is_valid() {
        assert_eq!(parse_sitemap("<urlset/>").unwrap(), SitemapDocument::UrlSet(vec![]));
    }
}
