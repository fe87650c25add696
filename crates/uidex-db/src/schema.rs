//! Catalog and moderation schema definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// UI framework an entry targets.
///
/// Open-ended on the wire, but the common values are modelled as variants so
/// "react", "React" and "REACT" all land on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Framework {
    React,
    Vue,
    Svelte,
    Angular,
    Css,
    Other(String),
}

impl Framework {
    pub fn as_str(&self) -> &str {
        match self {
            Framework::React    => "React",
            Framework::Vue      => "Vue",
            Framework::Svelte   => "Svelte",
            Framework::Angular  => "Angular",
            Framework::Css      => "CSS",
            Framework::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Framework {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "react"   => Framework::React,
            "vue"     => Framework::Vue,
            "svelte"  => Framework::Svelte,
            "angular" => Framework::Angular,
            "css"     => Framework::Css,
            _         => Framework::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for Framework {
    fn from(raw: String) -> Self {
        Framework::from(raw.as_str())
    }
}

impl From<Framework> for String {
    fn from(framework: Framework) -> Self {
        framework.as_str().to_string()
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which intake path produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    #[default]
    Harvest,
    Seed,
    Moderation,
}

/// A canonical, published catalog entry. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub library: String,
    pub framework: Framework,
    /// Absolute, fragment-free URL. Identity key within one harvest batch.
    pub doc_url: String,
    pub keywords: BTreeSet<String>,
    pub popularity_score: i64,
    #[serde(default)]
    pub origin: EntryOrigin,
    pub created_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Case-insensitive substring match over the requested fields.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str, fields: &[MatchField]) -> bool {
        fields.iter().any(|field| match field {
            MatchField::Name     => self.name.to_lowercase().contains(needle),
            MatchField::Library  => self.library.to_lowercase().contains(needle),
            MatchField::Keywords => self.keywords.iter().any(|k| k.to_lowercase().contains(needle)),
        })
    }
}

/// Fields a catalog query may match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Name,
    Keywords,
    Library,
}

/// Find-by-predicate request: substring `pattern` over `fields`,
/// sorted by popularity descending, at most `limit` rows.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub pattern: String,
    pub fields: Vec<MatchField>,
    pub limit: usize,
}

/// Moderation state. Terminal states are never stored: the submission is deleted instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A user-proposed entry awaiting review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub library: String,
    pub framework: Framework,
    pub doc_url: String,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a submission. Validation happens before this point.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: String,
    pub library: String,
    pub framework: Framework,
    pub doc_url: String,
}
