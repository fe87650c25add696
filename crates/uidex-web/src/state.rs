//! Shared application state for the web server.

use std::sync::Arc;
use tracing::info;
use uidex_common::{DocumentFetcher, SandboxClient};
use uidex_db::Database;
use uidex_ingestion::{ExtractionRule, HarvestRunner, ModerationQueue, Normaliser, Publisher};
use uidex_ranker::QueryEngine;

use crate::config::Config;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub db: Database,
    pub engine: QueryEngine,
    pub moderation: ModerationQueue,
    pub harvester: HarvestRunner,
    /// Rules used by `POST /api/admin/harvest`.
    pub rules: Vec<ExtractionRule>,
    pub admin_token: Option<String>,
}

impl AppState {
    /// Open storage and build the real HTTP fetcher from `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let db = if config.storage.persist {
            Database::open(&config.storage.data_dir).await?
        } else {
            Database::in_memory()
        };

        let rules = config.rules();
        let mut client = SandboxClient::new(&config.fetch)?;
        for rule in &rules {
            client.allow_url_host(rule.entry_url());
            if let ExtractionRule::Selector(r) = rule {
                client.allow_url_host(&r.base_domain);
            }
        }
        info!(
            rules = rules.len(),
            persist = config.storage.persist,
            enforce_allowlist = config.fetch.enforce_allowlist,
            "App state ready"
        );
        Ok(Self::with_parts(db, Arc::new(client), config))
    }

    /// Assemble state from an existing database and fetcher.
    pub fn with_parts(db: Database, fetcher: Arc<dyn DocumentFetcher>, config: &Config) -> Self {
        let publisher = Publisher::new(db.catalog());
        let normaliser = Normaliser::new(config.harvest.max_name_len);
        Self {
            engine: QueryEngine::new(db.catalog(), config.search.clone()),
            moderation: ModerationQueue::new(
                db.submissions(),
                publisher.clone(),
                normaliser,
                config.moderation.queue.clone(),
            ),
            harvester: HarvestRunner::new(fetcher, publisher, config.harvest.clone()),
            rules: config.rules(),
            admin_token: config.moderation.admin_token.clone(),
            db,
        }
    }
}

pub type SharedState = Arc<AppState>;
