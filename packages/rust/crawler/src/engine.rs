//! Sequential, prefix-scoped web crawler engine.
//!
//! The crawler starts from a seed URL and performs a BFS traversal over every
//! link whose string form starts with the seed. Pages are fetched one at a
//! time; a failed page is logged and recorded, never fatal.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use cdpdocs_shared::{CdpDocsError, CrawlConfig, Platform, Result};

use crate::text::{extract_links, visible_text};

// ---------------------------------------------------------------------------
// CrawlReport
// ---------------------------------------------------------------------------

/// Summary of one platform crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Platform that was crawled.
    pub platform: Platform,
    /// Seed URL (and prefix boundary) of the crawl.
    pub seed: Url,
    /// Number of pages successfully fetched.
    pub pages_fetched: usize,
    /// Number of fetched pages that produced non-empty text.
    pub pages_indexed: usize,
    /// Frontier entries skipped because they were already visited.
    pub pages_skipped: usize,
    /// Errors encountered (URL, error message).
    pub errors: Vec<(String, String)>,
    /// Whether a page or depth bound stopped the crawl before the frontier drained.
    pub truncated: bool,
    /// Total duration of the crawl.
    pub duration: Duration,
}

/// A fetched page with its extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    /// Requested URL, exactly as it was enqueued.
    pub url: String,
    /// Normalized visible text (never empty).
    pub text: String,
}

// ---------------------------------------------------------------------------
// Crawler
// ---------------------------------------------------------------------------

/// Breadth-first documentation crawler.
pub struct Crawler {
    config: CrawlConfig,
    client: Client,
}

impl Crawler {
    /// Create a new crawler with the given configuration.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| CdpDocsError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// The configuration this crawler was built with.
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawl everything reachable from `seed` that stays under its prefix.
    pub async fn crawl(&self, seed: &Url, platform: Platform) -> (CrawlReport, Vec<CrawledPage>) {
        self.crawl_with_progress(seed, platform, &|_, _| {}).await
    }

    /// Like [`Crawler::crawl`], calling `on_fetch(url, pages_fetched)` after
    /// every successful fetch.
    ///
    /// Returns a summary of the crawl and the indexed pages in visit order.
    #[instrument(skip_all, fields(platform = %platform, seed = %seed))]
    pub async fn crawl_with_progress(
        &self,
        seed: &Url,
        platform: Platform,
        on_fetch: &(dyn Fn(&str, usize) + Sync),
    ) -> (CrawlReport, Vec<CrawledPage>) {
        let start_time = Instant::now();

        let scope = CrawlScope::new(seed);
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<(Url, u32)> = VecDeque::from([(seed.clone(), 0)]);

        let mut pages: Vec<CrawledPage> = Vec::new();
        let mut errors: Vec<(String, String)> = Vec::new();
        let mut pages_fetched: usize = 0;
        let mut pages_skipped: usize = 0;
        let mut truncated = false;

        info!(
            max_pages = ?self.config.max_pages,
            max_depth = ?self.config.max_depth,
            "starting crawl"
        );

        while let Some((url, depth)) = frontier.pop_front() {
            if visited.contains(url.as_str()) {
                pages_skipped += 1;
                continue;
            }

            // Only an unvisited URL counts as work left undone.
            if self.config.max_pages.is_some_and(|max| pages_fetched >= max) {
                info!(pages_fetched, "page budget reached, stopping crawl");
                truncated = true;
                break;
            }
            visited.insert(url.as_str().to_owned());

            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "error crawling page");
                    errors.push((url.to_string(), e.to_string()));
                    continue;
                }
            };

            pages_fetched += 1;
            on_fetch(url.as_str(), pages_fetched);

            let (text, links) = self.process_page(&body, &url);

            if !text.is_empty() {
                pages.push(CrawledPage {
                    url: url.to_string(),
                    text,
                });
            }

            let follow = self.config.max_depth.is_none_or(|max| depth < max);
            for link in links {
                if !scope.contains(&link) || visited.contains(link.as_str()) {
                    continue;
                }
                if follow {
                    frontier.push_back((link, depth + 1));
                } else {
                    truncated = true;
                }
            }
        }

        let report = CrawlReport {
            platform,
            seed: seed.clone(),
            pages_fetched,
            pages_indexed: pages.len(),
            pages_skipped,
            errors,
            truncated,
            duration: start_time.elapsed(),
        };

        info!(
            pages_fetched = report.pages_fetched,
            pages_indexed = report.pages_indexed,
            pages_skipped = report.pages_skipped,
            errors = report.errors.len(),
            truncated = report.truncated,
            duration_ms = report.duration.as_millis(),
            "crawl completed"
        );

        (report, pages)
    }

    /// Fetch a single page body. 4xx/5xx responses are errors.
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| CdpDocsError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(CdpDocsError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| CdpDocsError::Network(format!("{url}: body read failed: {e}")))
    }

    /// Parse a fetched body into its visible text and outgoing links.
    fn process_page(&self, body: &str, url: &Url) -> (String, Vec<Url>) {
        let doc = Html::parse_document(body);
        let text = visible_text(&doc);
        let links = extract_links(&doc, url, self.config.strip_fragments);
        (text, links)
    }
}

// ---------------------------------------------------------------------------
// Scope checking
// ---------------------------------------------------------------------------

/// A URL is in scope when its serialized form starts with the seed's.
///
/// This is plain string containment: a seed of `https://host/docs` admits
/// `https://host/docs-archive/` too.
struct CrawlScope {
    prefix: String,
}

impl CrawlScope {
    fn new(seed: &Url) -> Self {
        Self {
            prefix: seed.as_str().to_owned(),
        }
    }

    fn contains(&self, url: &Url) -> bool {
        url.as_str().starts_with(&self.prefix)
    }
}
