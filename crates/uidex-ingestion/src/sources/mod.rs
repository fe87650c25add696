//! Harvest strategies.
//!
//! Both strategies share one contract: given a rule and a fetcher, return
//! raw candidates or a `HarvestError` for the whole rule.

pub mod selector;
pub mod sitemap;

pub use selector::SelectorOptions;
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapLimits, SitemapWalker};

use uidex_common::DocumentFetcher;

use crate::error::HarvestError;
use crate::models::RawCandidate;
use crate::normalise::steps::NamePipeline;
use crate::pipeline::HarvestSettings;
use crate::rules::ExtractionRule;

/// Run one extraction rule to completion.
pub async fn harvest_rule(
    fetcher: &dyn DocumentFetcher,
    rule: &ExtractionRule,
    settings: &HarvestSettings,
) -> Result<Vec<RawCandidate>, HarvestError> {
    let score = settings.score_for(rule);
    match rule {
        ExtractionRule::Selector(r) => {
            let options = SelectorOptions {
                stoplist: &settings.stoplist,
                min_text_len: settings.min_text_len,
            };
            selector::harvest(fetcher, r, &options, score).await
        }
        ExtractionRule::Sitemap(r) => {
            let extract = NamePipeline::compile(&r.library, &r.extract)?;
            sitemap::harvest(fetcher, r, &extract, &settings.sitemap, score).await
        }
    }
}
