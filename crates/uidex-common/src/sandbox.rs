use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::UidexError;

/// Several documentation sites answer 403 to default client identifiers.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_DOCUMENTS: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Network settings for every outbound fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// When true, only hosts on the allowlist (and their subdomains) may be fetched.
    #[serde(default)]
    pub enforce_allowlist: bool,
    /// Extra hosts allowed in addition to the hosts of the configured rules.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

fn default_timeout_secs() -> u64 { 20 }
fn default_user_agent()   -> String { BROWSER_USER_AGENT.to_string() }

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            enforce_allowlist: false,
            allowed_domains: Vec::new(),
        }
    }
}

/// Anything that can turn a URL into a document body.
///
/// The harvester only talks to this trait, so tests drive it with in-memory fakes.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, UidexError>;
}

/// A sandbox-capped HTTP client: browser-like headers, a hard timeout,
/// and an optional host allowlist.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
    enforce_allowlist: bool,
}

impl SandboxClient {
    pub fn new(settings: &FetchSettings) -> Result<Self, UidexError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_DOCUMENTS));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let mut sandbox = Self {
            client,
            allowlist: HashSet::new(),
            enforce_allowlist: settings.enforce_allowlist,
        };
        for domain in &settings.allowed_domains {
            sandbox.allow_domain(domain);
        }
        Ok(sandbox)
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.trim().to_lowercase());
    }

    /// Allows the host of `url`, if it has one.
    pub fn allow_url_host(&mut self, url: &str) {
        if let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
            self.allow_domain(&host);
        }
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else { return false };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        if !self.enforce_allowlist {
            return true;
        }
        let Some(host) = parsed.host_str() else { return false };
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, UidexError> {
        if Url::parse(url).is_err() {
            return Err(UidexError::InvalidUrl(url.to_string()));
        }
        if !self.is_allowed(url) {
            return Err(UidexError::SecurityError(format!(
                "fetch refused: URL not permitted by sandbox policy: {url}"
            )));
        }
        Ok(self.client.get(url))
    }
}

#[async_trait]
impl DocumentFetcher for SandboxClient {
    async fn fetch_text(&self, url: &str) -> Result<String, UidexError> {
        let resp = self.get(url)?.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UidexError::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }
        let body = resp.text().await?;
        debug!(url, bytes = body.len(), "Fetched document");
        Ok(body)
    }
}
