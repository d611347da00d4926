use crate::error::{CrawlError, Result};
use crate::filter::ContentFilter;
use crate::result::{CrawlEntry, LinkMap};
use crate::robots::{self, RobotsPolicy};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Bounded cross-domain crawler.
///
/// Starting from a set of seed ("primary") URLs, the crawler fans out over
/// a pool of async workers, following only links that cross a domain
/// boundary, down to a configured depth. Primary pages keep their
/// normalized text for later indexing; every other page keeps only its
/// outbound cross-domain links. The visited set, robots cache, and result
/// map are run-scoped: they are reset at the start of every `crawl` call,
/// so one crawler instance can serve repeated, non-interfering runs.
pub struct Crawler {
    client: Client,
    robots: Arc<RobotsPolicy>,
    visited: Arc<Mutex<HashSet<String>>>,
    results: Arc<Mutex<LinkMap>>,
    filter: Arc<ContentFilter>,
    max_depth: usize,
    enforce_robots: bool,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Metaseek/0.1 (https://github.com/metaseek/metaseek)")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            robots: Arc::new(RobotsPolicy::new(client.clone())),
            client,
            visited: Arc::new(Mutex::new(HashSet::new())),
            results: Arc::new(Mutex::new(LinkMap::new())),
            filter: Arc::new(ContentFilter::default()),
            max_depth: 1,
            enforce_robots: true,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_content_filter(mut self, filter: ContentFilter) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Toggle robots.txt enforcement. On by default.
    pub fn with_robots(mut self, enforce: bool) -> Self {
        self.enforce_robots = enforce;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl from the given seed URLs and return the link map.
    ///
    /// Seeds that fail to parse are a caller error and abort the run before
    /// any fetch. Once the traversal is underway, no single unreachable or
    /// filtered page stops it: transport failures are logged and skipped,
    /// policy skips are logged and skipped, and everything else continues.
    pub async fn crawl(&self, seeds: &[String], workers: usize) -> Result<LinkMap> {
        for seed in seeds {
            Url::parse(seed).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", seed, e)))?;
        }

        let workers = workers.max(1);
        info!("Starting crawl of {} seed(s) with {} workers", seeds.len(), workers);

        // Run-scoped caches: fresh for every crawl invocation.
        self.visited.lock().await.clear();
        self.results.lock().await.clear();
        self.robots.clear().await;

        // Worker-owned queues of (url, depth, is_primary).
        let worker_queues: Arc<Vec<Mutex<VecDeque<(String, usize, bool)>>>> =
            Arc::new((0..workers).map(|_| Mutex::new(VecDeque::new())).collect());

        {
            let mut visited = self.visited.lock().await;
            let mut target_worker = 0;
            for seed in seeds {
                if visited.insert(seed.clone()) {
                    let mut queue = worker_queues[target_worker].lock().await;
                    queue.push_back((seed.clone(), 0, true));
                    target_worker = (target_worker + 1) % workers;
                }
            }
        }

        let mut worker_handles = Vec::new();

        for worker_id in 0..workers {
            let client = self.client.clone();
            let robots = self.robots.clone();
            let visited = self.visited.clone();
            let results = self.results.clone();
            let filter = self.filter.clone();
            let progress_cb = self.progress_callback.clone();
            let max_depth = self.max_depth;
            let enforce_robots = self.enforce_robots;
            let worker_queues_clone = worker_queues.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);
                let mut empty_iterations = 0;
                const MAX_EMPTY_ITERATIONS: usize = 10;

                loop {
                    // Own queue first, then steal: work parked on an idle
                    // or already-exited worker must still get processed.
                    let work_item = {
                        let mut queue = worker_queues_clone[worker_id].lock().await;
                        queue.pop_front()
                    };
                    let work_item = match work_item {
                        Some(item) => Some(item),
                        None => Self::steal_work(&worker_queues_clone, worker_id).await,
                    };

                    let (url, depth, is_primary) = if let Some(item) = work_item {
                        empty_iterations = 0;
                        item
                    } else {
                        if Self::all_queues_empty(&worker_queues_clone).await {
                            empty_iterations += 1;
                            if empty_iterations >= MAX_EMPTY_ITERATIONS {
                                debug!("Worker {} exiting", worker_id);
                                break;
                            }
                        } else {
                            empty_iterations = 0;
                        }

                        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
                        continue;
                    };

                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, url.clone());
                    }

                    // Policy gates. Both are skips, not errors; the URL
                    // stays in the visited set either way.
                    if filter.is_blocked(&url) {
                        info!("Skipping filtered link: {}", url);
                        continue;
                    }
                    if enforce_robots && !robots.is_allowed(&url).await {
                        info!("Skipping robots-disallowed link: {}", url);
                        continue;
                    }

                    debug!("Crawling {} at depth {}", url, depth);

                    let body = match Self::fetch_page(&client, &url).await {
                        Ok(body) => body,
                        Err(e) => {
                            // The resilience rule: one unreachable node
                            // never aborts the traversal.
                            warn!("Error crawling {}: {}", url, e);
                            continue;
                        }
                    };

                    let (links, text) = match body {
                        Some(html) => Self::parse_page(&html, &url, is_primary),
                        None => (Vec::new(), None),
                    };

                    let current_domain = Self::page_domain(&url);
                    let mut entry = CrawlEntry::new(url.clone());
                    entry.text = text;

                    let mut target_worker = 0;
                    for link in links {
                        let Some(child_domain) = Self::page_domain(&link) else {
                            continue;
                        };
                        if Some(&child_domain) == current_domain.as_ref() {
                            debug!("Skipping same-domain link: {}", link);
                            continue;
                        }

                        // Cross-domain links are always recorded, even when
                        // the depth bound or the visited set stops the
                        // child from being fetched.
                        entry.outbound_links.push(link.clone());

                        if depth + 1 > max_depth {
                            continue;
                        }

                        let newly_visited = {
                            let mut visited_lock = visited.lock().await;
                            visited_lock.insert(link.clone())
                        };

                        if newly_visited {
                            let mut queue = worker_queues_clone[target_worker].lock().await;
                            queue.push_back((link, depth + 1, false));
                            drop(queue);
                            target_worker = (target_worker + 1) % worker_queues_clone.len();
                        }
                    }

                    let mut results_lock = results.lock().await;
                    results_lock.insert(url, entry);
                }

                debug!("Worker {} finished", worker_id);
            });

            worker_handles.push(handle);
        }

        for outcome in futures::future::join_all(worker_handles).await {
            outcome?;
        }

        let results = self.results.lock().await;
        info!("Crawl complete. Recorded {} pages", results.len());
        Ok(results.clone())
    }

    /// Take one queued item from any other worker's queue.
    async fn steal_work(
        worker_queues: &Arc<Vec<Mutex<VecDeque<(String, usize, bool)>>>>,
        own_id: usize,
    ) -> Option<(String, usize, bool)> {
        for (id, queue) in worker_queues.iter().enumerate() {
            if id == own_id {
                continue;
            }
            let mut queue = queue.lock().await;
            if let Some(item) = queue.pop_front() {
                return Some(item);
            }
        }
        None
    }

    /// Check if all worker queues are empty
    async fn all_queues_empty(worker_queues: &Arc<Vec<Mutex<VecDeque<(String, usize, bool)>>>>) -> bool {
        for queue in worker_queues.iter() {
            if !queue.lock().await.is_empty() {
                return false;
            }
        }
        true
    }

    /// Fetch a page body, returning `None` for non-HTML content.
    async fn fetch_page(client: &Client, url: &str) -> Result<Option<String>> {
        debug!("Fetching {}", url);

        let response = client.get(url).send().await?;
        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);

        if !is_html {
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }

    /// Extract outbound links and, when requested, normalized page text.
    /// Synchronous on purpose: the parsed DOM is not `Send` and must never
    /// be held across an await point.
    fn parse_page(html: &str, current_url: &str, want_text: bool) -> (Vec<String>, Option<String>) {
        let document = Html::parse_document(html);

        let link_selector = Selector::parse("a[href]").unwrap();
        let mut links = Vec::new();

        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href")
                && let Some(absolute_url) = Self::resolve_url(current_url, href)
            {
                links.push(absolute_url);
            }
        }

        let text = want_text.then(|| Self::extract_text(&document));

        (links, text)
    }

    /// Page text with script/style/noscript content removed and whitespace
    /// collapsed to single spaces.
    fn extract_text(document: &Html) -> String {
        let mut collected = String::new();

        for node in document.tree.nodes() {
            if let Some(text) = node.value().as_text() {
                let skip = node
                    .parent()
                    .and_then(|parent| parent.value().as_element())
                    .map(|element| matches!(element.name(), "script" | "style" | "noscript"))
                    .unwrap_or(false);
                if !skip {
                    collected.push_str(&text.text);
                    collected.push(' ');
                }
            }
        }

        collected.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn resolve_url(base: &str, href: &str) -> Option<String> {
        // Skip empty, javascript:, mailto:, tel:, and fragment-only refs.
        if href.is_empty()
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with('#')
        {
            return None;
        }

        let base_url = Url::parse(base).ok()?;
        let mut resolved = base_url.join(href).ok()?;
        resolved.set_fragment(None);

        Some(resolved.to_string())
    }

    /// The `host[:port]` a URL lives on. Crawl-scope containment compares
    /// this raw network location; only the domain graph collapses to
    /// registrable domains.
    fn page_domain(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        robots::network_location(&parsed)
    }

    pub async fn get_visited_count(&self) -> usize {
        self.visited.lock().await.len()
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}
