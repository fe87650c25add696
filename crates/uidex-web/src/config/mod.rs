//! Configuration loading for uidex.
//! Reads uidex.toml from the current directory or the path in UIDEX_CONFIG.
//! A missing file is not an error: every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uidex_common::FetchSettings;
use uidex_ingestion::targets::default_rules;
use uidex_ingestion::{ExtractionRule, HarvestSettings, ModerationSettings};
use uidex_ranker::SearchSettings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub harvest: HarvestSettings,
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub search: SearchSettings,
    /// Extraction rules. Empty means the built-in set.
    #[serde(default)]
    pub rules: Vec<ExtractionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:3001".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// When false, the catalog and queue live in memory only.
    #[serde(default = "bool_true")]
    pub persist: bool,
}

fn default_data_dir() -> PathBuf { PathBuf::from("./data") }
fn bool_true()        -> bool { true }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), persist: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationConfig {
    #[serde(flatten)]
    pub queue: ModerationSettings,
    /// When set, admin routes require a matching `x-admin-token` header.
    #[serde(default)]
    pub admin_token: Option<String>,
}

pub const CONFIG_ENV: &str = "UIDEX_CONFIG";
pub const ADMIN_TOKEN_ENV: &str = "UIDEX_ADMIN_TOKEN";

mod tests;

impl Config {
    /// Load configuration from uidex.toml.
    /// Checks UIDEX_CONFIG first, then the current directory.
    /// UIDEX_ADMIN_TOKEN, if set, overrides `moderation.admin_token`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "uidex.toml".to_string());
        let mut config = Self::load_from(&path)?;
        if let Ok(token) = std::env::var(ADMIN_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.moderation.admin_token = Some(token);
            }
        }
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
        info!(path = %path.display(), rules = config.rules.len(), "Config loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        for rule in &config.rules {
            rule.validate()?;
        }
        Ok(config)
    }

    /// Configured rules, or the built-in set when none are configured.
    pub fn rules(&self) -> Vec<ExtractionRule> {
        if self.rules.is_empty() {
            default_rules()
        } else {
            self.rules.clone()
        }
    }
}
