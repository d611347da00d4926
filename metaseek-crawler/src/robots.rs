use reqwest::Client;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Per-domain robots.txt policy with a lazy, run-scoped cache.
///
/// The first `is_allowed` query for a domain fetches
/// `http://{domain}/robots.txt`; every later query hits the cache. Any
/// fetch or parse problem caches an empty rule set, so unreachable or
/// malformed robots files never block a crawl (fail open). Concurrent
/// first queries for one domain may fetch robots.txt more than once;
/// the duplicate result is identical, so the race is harmless.
pub struct RobotsPolicy {
    client: Client,
    cache: Mutex<HashMap<String, Vec<String>>>,
}

impl RobotsPolicy {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drop all cached rule sets. Called at the start of each crawl run so
    /// reused crawler instances re-read robots files.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }

    /// Whether the URL's path escapes every cached `Disallow` prefix for
    /// its domain. URLs that cannot be parsed are allowed; the crawler
    /// rejects them on its own terms.
    pub async fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        let Some(domain) = network_location(&parsed) else {
            return true;
        };
        let path = parsed.path().to_string();

        {
            let cache = self.cache.lock().await;
            if let Some(rules) = cache.get(&domain) {
                return path_allowed(&path, rules);
            }
        }

        let rules = self.fetch_rules(&domain).await;
        let mut cache = self.cache.lock().await;
        let rules = cache.entry(domain).or_insert(rules);
        path_allowed(&path, rules)
    }

    async fn fetch_rules(&self, domain: &str) -> Vec<String> {
        let robots_url = format!("http://{}/robots.txt", domain);
        debug!("Fetching {}", robots_url);

        match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().as_u16() == 200 => match response.text().await {
                Ok(body) => parse_disallow_rules(&body),
                Err(e) => {
                    info!("Failed to read robots.txt body for {}: {}", domain, e);
                    Vec::new()
                }
            },
            Ok(response) => {
                debug!(
                    "robots.txt for {} returned {}, allowing all",
                    domain,
                    response.status()
                );
                Vec::new()
            }
            Err(e) => {
                info!("Could not fetch robots.txt for {}: {}", domain, e);
                Vec::new()
            }
        }
    }
}

fn path_allowed(path: &str, rules: &[String]) -> bool {
    !rules.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// The network-location component of a URL: `host` or `host:port`.
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Extract `Disallow` path prefixes from a robots.txt body. The key is
/// matched case-insensitively; empty values (which mean "allow all" in the
/// robots grammar) are ignored.
pub fn parse_disallow_rules(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            let (key, value) = line.split_once(':')?;
            if !key.trim().eq_ignore_ascii_case("disallow") {
                return None;
            }
            let value = value.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect()
}
