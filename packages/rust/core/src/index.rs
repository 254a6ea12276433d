//! Per-platform page index: platform → (url → text), in crawl order.

use std::collections::{BTreeMap, HashSet};

use cdpdocs_crawler::CrawledPage;
use cdpdocs_shared::Platform;

/// Pages of one platform. URLs are unique; iteration follows insertion order.
#[derive(Debug, Clone, Default)]
struct PlatformPages {
    pages: Vec<CrawledPage>,
    urls: HashSet<String>,
}

/// In-memory index built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DocIndex {
    platforms: BTreeMap<Platform, PlatformPages>,
}

impl DocIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a platform's crawled pages.
    ///
    /// A URL that is already indexed for the platform keeps its first text.
    /// The platform is registered even when `pages` is empty.
    pub fn insert_platform(
        &mut self,
        platform: Platform,
        pages: impl IntoIterator<Item = CrawledPage>,
    ) {
        let entry = self.platforms.entry(platform).or_default();
        for page in pages {
            if entry.urls.insert(page.url.clone()) {
                entry.pages.push(page);
            }
        }
    }

    /// Whether `platform` was indexed at all (possibly with zero pages).
    pub fn has_platform(&self, platform: Platform) -> bool {
        self.platforms.contains_key(&platform)
    }

    /// Pages of `platform` in stored order. Empty if the platform is unknown.
    pub fn pages(&self, platform: Platform) -> impl Iterator<Item = &CrawledPage> {
        self.platforms
            .get(&platform)
            .into_iter()
            .flat_map(|entry| entry.pages.iter())
    }

    pub fn page_count(&self, platform: Platform) -> usize {
        self.platforms
            .get(&platform)
            .map_or(0, |entry| entry.pages.len())
    }

    pub fn total_pages(&self) -> usize {
        self.platforms.values().map(|entry| entry.pages.len()).sum()
    }
}
