//! Extraction rules as data.
//!
//! A rule says where a library's component list lives and how to turn what
//! is found there into names. Rules are plain serde values so they can live
//! in `uidex.toml` as well as in `targets::default_rules()`.

use serde::{Deserialize, Serialize};
use uidex_db::Framework;

use crate::error::HarvestError;
use crate::normalise::steps::NamePipeline;

/// Text that marks an anchor as navigation chrome rather than a component.
pub const DEFAULT_STOPLIST: &[&str] = &["Overview", "GitHub", "Template"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionRule {
    Selector(SelectorRule),
    Sitemap(SitemapRule),
}

/// Scrape anchors matching a CSS selector from a single index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorRule {
    pub library: String,
    pub index_url: String,
    /// Base for resolving relative hrefs.
    pub base_domain: String,
    pub framework: Framework,
    pub selector: String,
    /// Name-cleaning steps applied by the normaliser.
    #[serde(default)]
    pub clean: Vec<NameStep>,
    #[serde(default)]
    pub popularity: Option<i64>,
}

/// Walk a sitemap (recursively through sitemap indexes) and derive names from URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapRule {
    pub library: String,
    pub sitemap_url: String,
    pub framework: Framework,
    #[serde(default)]
    pub filter: UrlFilter,
    /// Steps that turn a page URL into a display name.
    pub extract: Vec<NameStep>,
    #[serde(default)]
    pub clean: Vec<NameStep>,
    #[serde(default)]
    pub popularity: Option<i64>,
}

/// Substring include/exclude filter over page URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlFilter {
    /// At least one must occur. Empty means everything is included.
    #[serde(default)]
    pub include: Vec<String>,
    /// None may occur.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl UrlFilter {
    pub fn accepts(&self, url: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| url.contains(p.as_str()));
        included && !self.exclude.iter().any(|p| url.contains(p.as_str()))
    }
}

/// One step of a name-extraction or name-cleaning function.
///
/// Steps run in order; each receives the previous step's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum NameStep {
    /// Remove "42 components" style counters anywhere in the text.
    StripCountPrefix,
    /// Remove the first parenthesised group, e.g. "Button (new)".
    StripParenthetical,
    /// "DatePicker" -> "Date Picker".
    SplitCamelCase,
    /// Drop everything but word characters, whitespace and hyphens.
    StripSymbols,
    /// Remove a trailing suffix, case-insensitive.
    StripSuffix { suffix: String },
    /// Keep capture group 1 (or the whole match) of a regex. No match is a mismatch.
    Capture { pattern: String },
    /// Keep the path segment that follows `marker`. Missing marker is a mismatch.
    After { marker: String },
    /// Keep the n-th non-empty path segment counted from the end (0 = last).
    Segment { from_end: usize },
    /// "date-picker" -> "Date Picker".
    SlugToTitle,
}

impl ExtractionRule {
    pub fn library(&self) -> &str {
        match self {
            ExtractionRule::Selector(r) => &r.library,
            ExtractionRule::Sitemap(r)  => &r.library,
        }
    }

    pub fn framework(&self) -> &Framework {
        match self {
            ExtractionRule::Selector(r) => &r.framework,
            ExtractionRule::Sitemap(r)  => &r.framework,
        }
    }

    /// The document a harvest of this rule starts from.
    pub fn entry_url(&self) -> &str {
        match self {
            ExtractionRule::Selector(r) => &r.index_url,
            ExtractionRule::Sitemap(r)  => &r.sitemap_url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionRule::Selector(_) => "selector",
            ExtractionRule::Sitemap(_)  => "sitemap",
        }
    }

    pub fn clean_steps(&self) -> &[NameStep] {
        match self {
            ExtractionRule::Selector(r) => &r.clean,
            ExtractionRule::Sitemap(r)  => &r.clean,
        }
    }

    /// Per-rule score override, if any.
    pub fn popularity(&self) -> Option<i64> {
        match self {
            ExtractionRule::Selector(r) => r.popularity,
            ExtractionRule::Sitemap(r)  => r.popularity,
        }
    }

    /// Check everything that can be checked without the network:
    /// the selector parses, regexes compile, URLs are absolute.
    pub fn validate(&self) -> Result<(), HarvestError> {
        let library = self.library();
        if library.trim().is_empty() {
            return Err(HarvestError::invalid_rule("<unnamed>", "library is empty"));
        }
        if url::Url::parse(self.entry_url()).is_err() {
            return Err(HarvestError::invalid_rule(library, format!("not an absolute URL: {}", self.entry_url())));
        }
        NamePipeline::compile(library, self.clean_steps())?;

        match self {
            ExtractionRule::Selector(r) => {
                scraper::Selector::parse(&r.selector)
                    .map_err(|e| HarvestError::invalid_rule(library, format!("selector {:?}: {e}", r.selector)))?;
                if url::Url::parse(&r.base_domain).is_err() {
                    return Err(HarvestError::invalid_rule(library, format!("not an absolute URL: {}", r.base_domain)));
                }
            }
            ExtractionRule::Sitemap(r) => {
                if r.extract.is_empty() {
                    return Err(HarvestError::invalid_rule(library, "sitemap rule has no extract steps"));
                }
                NamePipeline::compile(library, &r.extract)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_filter() {
        let filter = UrlFilter {
            include: vec!["/components/".into()],
            exclude: vec!["/api".into(), "#".into()],
        };
        assert!(filter.accepts("https://mui.com/material-ui/react-button/components/x"));
        assert!(!filter.accepts("https://mui.com/material-ui/components/api/button"));
        assert!(!filter.accepts("https://mui.com/material-ui/getting-started/"));
        assert!(UrlFilter::default().accepts("https://anything.test/"));
    }

    #[test]
    fn test_rule_deserialises_from_toml() {
        let raw = r#"
            kind = "sitemap"
            library = "Mantine"
            sitemap_url = "https://mantine.dev/sitemap.xml"
            framework = "React"
            filter = { include = ["/core/"] }
            extract = [{ step = "segment", from_end = 0 }, { step = "slug_to_title" }]
        "#;
        let rule: ExtractionRule = toml::from_str(raw).unwrap();
        assert_eq!(rule.library(), "Mantine");
        assert_eq!(rule.kind(), "sitemap");
        assert!(rule.validate().is_ok());
        match rule {
            ExtractionRule::Sitemap(r) => {
                assert_eq!(r.extract[0], NameStep::Segment { from_end: 0 });
                assert!(r.clean.is_empty());
            }
            _ => panic!("expected sitemap rule"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let rule = ExtractionRule::Selector(SelectorRule {
            library: "Broken".into(),
            index_url: "https://broken.test/".into(),
            base_domain: "https://broken.test".into(),
            framework: Framework::React,
            selector: "a[[[".into(),
            clean: vec![],
            popularity: None,
        });
        assert!(matches!(rule.validate(), Err(HarvestError::InvalidRule { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_capture_pattern() {
        let rule = ExtractionRule::Sitemap(SitemapRule {
            library: "Broken".into(),
            sitemap_url: "https://broken.test/sitemap.xml".into(),
            framework: Framework::Vue,
            filter: UrlFilter::default(),
            extract: vec![NameStep::Capture { pattern: "(unclosed".into() }],
            clean: vec![],
            popularity: None,
        });
        assert!(matches!(rule.validate(), Err(HarvestError::InvalidRule { .. })));
    }
}
