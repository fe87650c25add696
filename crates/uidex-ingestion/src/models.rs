//! Data carried between harvest stages.

use serde::{Deserialize, Serialize};
use uidex_db::{EntryOrigin, Framework};

/// A candidate produced by a harvester, before normalisation.
/// `name` is raw extracted text; `doc_url` is already absolute and fragment-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub name: String,
    pub library: String,
    pub framework: Framework,
    pub doc_url: String,
    pub popularity_score: i64,
    pub origin: EntryOrigin,
}

/// Why the normaliser dropped a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after cleaning.
    EmptyName,
    /// Starts with '.', a CSS class leaking through.
    LeakedClassName,
    /// Contains braces, inline style or script text.
    LeakedMarkup,
    /// Longer than the configured maximum.
    TooLong(usize),
    EmptyUrl,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyName        => write!(f, "empty name"),
            Rejection::LeakedClassName  => write!(f, "css class name"),
            Rejection::LeakedMarkup     => write!(f, "markup or style text"),
            Rejection::TooLong(n)       => write!(f, "name too long ({n} chars)"),
            Rejection::EmptyUrl         => write!(f, "empty docUrl"),
        }
    }
}
