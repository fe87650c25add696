//! uidex-ingestion: Catalog ingestion pipeline.
//! Covers:
//! - Extraction rules as data (selector-based and sitemap-based)
//! - Harvesting (HTML selector scraping, recursive sitemap traversal)
//! - Name normalisation and keyword synthesis
//! - Deduplication by documentation URL
//! - Publishing (full replace, single upsert)
//! - Moderation of user submissions
//! - Seed matrix generation

pub mod dedup;
pub mod error;
pub mod models;
pub mod moderation;
pub mod normalise;
pub mod pipeline;
pub mod publisher;
pub mod rules;
pub mod seed;
pub mod sources;
pub mod targets;

pub use error::{HarvestError, ModerationError};
pub use models::RawCandidate;
pub use moderation::{ModerationQueue, ModerationSettings, SubmissionInput};
pub use normalise::{Intake, Normaliser};
pub use pipeline::{HarvestReport, HarvestRunner, HarvestSettings};
pub use publisher::Publisher;
pub use rules::{ExtractionRule, NameStep, SelectorRule, SitemapRule, UrlFilter};
