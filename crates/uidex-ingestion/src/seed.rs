//! Seed matrix: libraries x common component slugs.
//!
//! Gives a fresh install a populated catalog without touching the network.
//! Scores vary by a few points per (library, slug) so results are not all
//! tied, but the variance is a hash, not a random draw: seeding twice
//! produces the same catalog.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uidex_db::{CatalogEntry, EntryOrigin, Framework};

use crate::models::RawCandidate;
use crate::normalise::steps::{slug_to_title, NamePipeline};
use crate::normalise::{Intake, Normaliser};

/// A library whose docs follow a predictable per-component URL scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedLibrary {
    pub name: String,
    pub framework: Framework,
    /// `{slug}` is replaced with the component slug.
    pub url_template: String,
    pub score: i64,
}

impl SeedLibrary {
    fn new(name: &str, url_template: &str, score: i64) -> Self {
        Self {
            name: name.to_string(),
            framework: Framework::React,
            url_template: url_template.to_string(),
            score,
        }
    }

    pub fn doc_url(&self, slug: &str) -> String {
        self.url_template.replace("{slug}", slug)
    }
}

pub const COMPONENT_SLUGS: &[&str] = &[
    "accordion", "alert", "alert-dialog", "aspect-ratio", "avatar", "badge",
    "breadcrumb", "button", "calendar", "card", "carousel", "checkbox",
    "collapsible", "combobox", "command", "context-menu", "dialog", "drawer",
    "dropdown-menu", "form", "hover-card", "input", "label", "menubar",
    "navigation-menu", "pagination", "popover", "progress", "radio-group",
    "resizable", "scroll-area", "select", "separator", "sheet", "skeleton",
    "slider", "switch", "table", "tabs", "textarea", "toast", "toggle",
    "toggle-group", "tooltip", "avatar-group", "timeline", "tree-view",
    "date-picker", "rating", "stepper", "transfer", "upload", "watermark",
    "tour", "statistic", "result", "empty", "divider", "grid", "layout",
    "space", "affix", "anchor", "back-top", "config-provider",
];

pub fn default_seed_libraries() -> Vec<SeedLibrary> {
    vec![
        SeedLibrary::new("Material UI", "https://mui.com/material-ui/react-{slug}/", 95),
        SeedLibrary::new("ShadCN UI",   "https://ui.shadcn.com/docs/components/{slug}", 98),
        SeedLibrary::new("Mantine",     "https://mantine.dev/core/{slug}/", 90),
        SeedLibrary::new("Chakra UI",   "https://chakra-ui.com/docs/components/{slug}", 85),
        SeedLibrary::new("Radix UI",    "https://www.radix-ui.com/primitives/docs/components/{slug}", 88),
        SeedLibrary::new("Ant Design",  "https://ant.design/components/{slug}", 92),
    ]
}

/// Deterministic score offset in `-5..=4`.
pub fn score_variance(library: &str, slug: &str) -> i64 {
    let key = format!("{library}/{slug}");
    (fnv64(key.as_bytes()) % 10) as i64 - 5
}

/// Build the full matrix of seed entries.
pub fn generate_seed(libraries: &[SeedLibrary], slugs: &[&str], normaliser: &Normaliser) -> Vec<CatalogEntry> {
    let none = NamePipeline::default();
    let mut entries = Vec::with_capacity(libraries.len() * slugs.len());
    for library in libraries {
        for slug in slugs {
            let raw = RawCandidate {
                name: slug_to_title(slug),
                library: library.name.clone(),
                framework: library.framework.clone(),
                doc_url: library.doc_url(slug),
                popularity_score: library.score + score_variance(&library.name, slug),
                origin: EntryOrigin::Seed,
            };
            match normaliser.normalise(raw, &none, Intake::Harvest) {
                Ok(entry) => entries.push(entry),
                Err(reason) => debug!(library = %library.name, slug, %reason, "Seed entry skipped"),
            }
        }
    }
    entries
}

fn fnv64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 14695981039346656037;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}
