//! Substring search ranked by popularity.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uidex_db::{CatalogEntry, CatalogQuery, CatalogStore, DbError, MatchField};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("catalog unavailable: {0}")]
    Store(#[from] DbError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Maximum results per query.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize { 20 }

impl Default for SearchSettings {
    fn default() -> Self {
        Self { page_size: default_page_size() }
    }
}

/// Fields a query is matched against.
pub const SEARCH_FIELDS: [MatchField; 3] = [MatchField::Name, MatchField::Keywords, MatchField::Library];

#[derive(Clone)]
pub struct QueryEngine {
    catalog: Arc<dyn CatalogStore>,
    settings: SearchSettings,
}

impl QueryEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>, settings: SearchSettings) -> Self {
        Self { catalog, settings }
    }

    /// Entries whose name, any keyword, or library contains `query`
    /// (case-insensitive), highest popularity first, at most one page.
    ///
    /// An empty, blank or absent query matches nothing.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<CatalogEntry>, SearchError> {
        let pattern = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => return Ok(Vec::new()),
        };

        let hits = self
            .catalog
            .find(&CatalogQuery {
                pattern: pattern.to_string(),
                fields: SEARCH_FIELDS.to_vec(),
                limit: self.settings.page_size,
            })
            .await?;
        debug!(query = pattern, hits = hits.len(), "Search served");
        Ok(hits)
    }
}
