//! Search-API providers. A provider turns a query into the list of result
//! URLs that seeds the crawler; the raw result records ride along for
//! callers that want titles or snippets.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

/// The outcome of one provider query: raw result records plus the flat
/// link list the crawler consumes as seeds.
#[derive(Debug)]
pub struct SearchOutcome {
    pub raw: Vec<Value>,
    pub links: Vec<String>,
}

/// A pluggable search backend. Unlike crawl-time fetches, a failed search
/// is an error: with no seeds there is nothing to crawl.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<SearchOutcome, SearchError>> + Send;

    fn name(&self) -> &'static str;
}

fn search_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Metaseek/0.1 (https://github.com/metaseek/metaseek)")
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to create HTTP client")
}

/// YaCy peer search: one `yacysearch.json` request, links taken from
/// `channels[0].items[].link`.
pub struct YacyProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YacyProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: search_client(10),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl SearchProvider for YacyProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, SearchError> {
        let url = format!("{}/yacysearch.json", self.base_url);
        debug!("Querying {} for {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query.to_string()),
                ("maximumRecords", limit.to_string()),
                ("resource", "global".to_string()),
            ])
            .send()
            .await?;

        let body: Value = response.json().await?;
        let items = body
            .get("channels")
            .and_then(|channels| channels.get(0))
            .and_then(|channel| channel.get("items"))
            .and_then(|items| items.as_array())
            .ok_or_else(|| {
                SearchError::Parse("missing channels[0].items in YaCy response".to_string())
            })?;

        let links: Vec<String> = items
            .iter()
            .filter_map(|item| item.get("link").and_then(|link| link.as_str()))
            .map(String::from)
            .take(limit)
            .collect();

        Ok(SearchOutcome {
            raw: items.clone(),
            links,
        })
    }

    fn name(&self) -> &'static str {
        "yacy"
    }
}

/// Google CSE-style search API, paginated in pages of ten. Result pages
/// without an `items` array (past the end of results, or quota-limited)
/// are skipped rather than treated as errors.
pub struct OpenSearchProvider {
    client: reqwest::Client,
    base_url: String,
    endpoint: String,
    api_key: String,
    cx: String,
}

impl OpenSearchProvider {
    pub fn new(base_url: &str, endpoint: &str, api_key: &str, cx: &str) -> Self {
        Self {
            client: search_client(10),
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            cx: cx.to_string(),
        }
    }

    /// Build a provider from `METASEEK_OPENSEARCH_URL`, `_ENDPOINT`
    /// (optional), `_KEY`, and `_CX` environment variables.
    pub fn from_env() -> Result<Self, SearchError> {
        let base_url = required_env("METASEEK_OPENSEARCH_URL")?;
        let endpoint = std::env::var("METASEEK_OPENSEARCH_ENDPOINT")
            .unwrap_or_else(|_| "/customsearch/v1".to_string());
        let api_key = required_env("METASEEK_OPENSEARCH_KEY")?;
        let cx = required_env("METASEEK_OPENSEARCH_CX")?;
        Ok(Self::new(&base_url, &endpoint, &api_key, &cx))
    }
}

fn required_env(name: &str) -> Result<String, SearchError> {
    std::env::var(name).map_err(|_| SearchError::Config(format!("{} is not set", name)))
}

impl SearchProvider for OpenSearchProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, SearchError> {
        let url = format!("{}{}", self.base_url, self.endpoint);
        let pages = limit.div_ceil(10).max(1);

        let mut raw = Vec::new();
        let mut links = Vec::new();

        for page in 0..pages {
            let start = page * 10 + 1;
            debug!("Querying {} for {:?} (start={})", url, query, start);

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("key", self.api_key.clone()),
                    ("cx", self.cx.clone()),
                    ("q", query.to_string()),
                    ("count", "10".to_string()),
                    ("start", start.to_string()),
                ])
                .send()
                .await?;

            let body: Value = response.json().await?;
            let Some(items) = body.get("items").and_then(|items| items.as_array()) else {
                debug!("Result page {} has no items, skipping", page + 1);
                continue;
            };

            for item in items {
                if let Some(link) = item.get("link").and_then(|link| link.as_str()) {
                    links.push(link.to_string());
                }
                raw.push(item.clone());
            }
        }

        links.truncate(limit);
        Ok(SearchOutcome { raw, links })
    }

    fn name(&self) -> &'static str {
        "opensearch"
    }
}
