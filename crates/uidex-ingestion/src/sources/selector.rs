//! Selector strategy: scrape component links off a library's index page.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use uidex_common::text::{collapse_whitespace, resolve_doc_url};
use uidex_common::DocumentFetcher;
use uidex_db::EntryOrigin;

use crate::error::HarvestError;
use crate::models::RawCandidate;
use crate::rules::SelectorRule;

/// Element filtering knobs shared by every selector rule.
#[derive(Debug, Clone)]
pub struct SelectorOptions<'a> {
    /// Anchors whose text contains any of these are navigation, not components.
    pub stoplist: &'a [String],
    /// Shorter texts (in chars) are icons or stray glyphs.
    pub min_text_len: usize,
}

#[instrument(skip(fetcher, rule, options), fields(library = %rule.library))]
pub async fn harvest(
    fetcher: &dyn DocumentFetcher,
    rule: &SelectorRule,
    options: &SelectorOptions<'_>,
    score: i64,
) -> Result<Vec<RawCandidate>, HarvestError> {
    let body = fetcher
        .fetch_text(&rule.index_url)
        .await
        .map_err(|e| HarvestError::unavailable(&rule.index_url, e))?;
    let candidates = extract_candidates(&body, rule, options, score)?;
    debug!(found = candidates.len(), "Selector harvest complete");
    Ok(candidates)
}

/// Pull candidates out of an index page body.
///
/// Prefers an element's own text nodes so badges and counters in child
/// elements do not leak into the name; falls back to the full text.
pub fn extract_candidates(
    body: &str,
    rule: &SelectorRule,
    options: &SelectorOptions<'_>,
    score: i64,
) -> Result<Vec<RawCandidate>, HarvestError> {
    let selector = Selector::parse(&rule.selector)
        .map_err(|e| HarvestError::invalid_rule(&rule.library, format!("selector {:?}: {e}", rule.selector)))?;
    let document = Html::parse_document(body);

    let mut candidates = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let text = element_text(&element);
        if text.chars().count() < options.min_text_len {
            continue;
        }
        if options.stoplist.iter().any(|stop| text.contains(stop.as_str())) {
            continue;
        }
        let Some(doc_url) = resolve_doc_url(&rule.base_domain, href) else {
            debug!(href, "Skipping unresolvable href");
            continue;
        };

        candidates.push(RawCandidate {
            name: text,
            library: rule.library.clone(),
            framework: rule.framework.clone(),
            doc_url,
            popularity_score: score,
            origin: EntryOrigin::Harvest,
        });
    }
    Ok(candidates)
}

fn element_text(element: &ElementRef<'_>) -> String {
    let own: String = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect();
    let own = collapse_whitespace(&own);
    if !own.is_empty() {
        return own;
    }
    collapse_whitespace(&element.text().collect::<String>())
}
