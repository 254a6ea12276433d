//! Index-building pipeline: one sequential crawl per platform → [`DocIndex`].

use std::time::Instant;

use tracing::{info, instrument};

use cdpdocs_crawler::{CrawlReport, Crawler};
use cdpdocs_shared::{Platform, PlatformRegistry};

use crate::index::DocIndex;

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called before each platform crawl starts.
    fn phase(&self, name: &str);
    /// Called when a page is fetched during a crawl.
    fn page_fetched(&self, platform: Platform, url: &str, current: usize);
    /// Called when a platform crawl completes.
    fn platform_done(&self, report: &CrawlReport);
    /// Called when the whole index is built.
    fn done(&self, index: &DocIndex);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_fetched(&self, _platform: Platform, _url: &str, _current: usize) {}
    fn platform_done(&self, _report: &CrawlReport) {}
    fn done(&self, _index: &DocIndex) {}
}

/// Crawl every registered platform, in registry order, and index the results.
pub async fn build_index(
    registry: &PlatformRegistry,
    crawler: &Crawler,
    progress: &dyn ProgressReporter,
) -> (DocIndex, Vec<CrawlReport>) {
    build_index_for(registry, crawler, &Platform::ALL, progress).await
}

/// Crawl only `platforms` (still strictly one after another).
///
/// Crawl failures never abort the build: a platform whose crawl failed is
/// present in the index with whatever pages were collected, possibly none.
#[instrument(skip_all, fields(platforms = platforms.len()))]
pub async fn build_index_for(
    registry: &PlatformRegistry,
    crawler: &Crawler,
    platforms: &[Platform],
    progress: &dyn ProgressReporter,
) -> (DocIndex, Vec<CrawlReport>) {
    let start = Instant::now();
    let mut index = DocIndex::new();
    let mut reports = Vec::with_capacity(platforms.len());

    for (platform, seed) in registry.iter().filter(|(p, _)| platforms.contains(p)) {
        progress.phase(&format!("Crawling {platform} documentation"));

        let on_fetch = |url: &str, current: usize| progress.page_fetched(platform, url, current);
        let (report, pages) = crawler.crawl_with_progress(seed, platform, &on_fetch).await;

        index.insert_platform(platform, pages);
        progress.platform_done(&report);
        reports.push(report);
    }

    info!(
        total_pages = index.total_pages(),
        elapsed_ms = start.elapsed().as_millis(),
        "index built"
    );
    progress.done(&index);

    (index, reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use cdpdocs_shared::CrawlConfig;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
        finished: Mutex<Vec<Platform>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }
        fn page_fetched(&self, _platform: Platform, _url: &str, _current: usize) {}
        fn platform_done(&self, report: &CrawlReport) {
            self.finished.lock().unwrap().push(report.platform);
        }
        fn done(&self, _index: &DocIndex) {}
    }

    async fn mount(server: &MockServer, at: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_owned()))
            .mount(server)
            .await;
    }

    fn registry_for(server: &MockServer) -> PlatformRegistry {
        let base = server.uri();
        let mut registry = PlatformRegistry::standard().unwrap();
        for (platform, dir) in [
            (Platform::Segment, "segment"),
            (Platform::MParticle, "mparticle"),
            (Platform::Lytics, "lytics"),
            (Platform::Zeotap, "zeotap"),
        ] {
            let seed = Url::parse(&format!("{base}/{dir}/")).unwrap();
            registry = registry.with_seed(platform, seed);
        }
        registry
    }

    fn crawler() -> Crawler {
        Crawler::new(CrawlConfig {
            timeout_secs: Some(5),
            ..CrawlConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn builds_every_platform_in_order() {
        let server = MockServer::start().await;
        mount(&server, "/segment/", r#"<p>Segment home</p><a href="sources">Sources</a>"#).await;
        mount(&server, "/segment/sources", "<p>Segment sources</p>").await;
        mount(&server, "/mparticle/", "<p>mParticle home</p>").await;
        mount(&server, "/lytics/", "<p>Lytics home</p>").await;
        // Zeotap is left unmounted: its seed 404s.

        let progress = RecordingProgress::default();
        let (index, reports) = build_index(&registry_for(&server), &crawler(), &progress).await;

        assert_eq!(index.page_count(Platform::Segment), 2);
        assert_eq!(index.page_count(Platform::MParticle), 1);
        assert_eq!(index.page_count(Platform::Lytics), 1);
        assert_eq!(index.page_count(Platform::Zeotap), 0);
        assert!(index.has_platform(Platform::Zeotap));

        let order: Vec<_> = reports.iter().map(|r| r.platform).collect();
        assert_eq!(order, Platform::ALL.to_vec());
        assert_eq!(reports[3].errors.len(), 1);

        assert_eq!(*progress.finished.lock().unwrap(), Platform::ALL.to_vec());
        assert_eq!(
            progress.phases.lock().unwrap()[1],
            "Crawling mParticle documentation"
        );
    }

    #[tokio::test]
    async fn index_urls_stay_under_their_seed() {
        let server = MockServer::start().await;
        // Segment links across to the Lytics tree; the link must not be followed.
        mount(&server, "/segment/", r#"<p>Segment</p><a href="/lytics/">Lytics</a>"#).await;
        mount(&server, "/lytics/", "<p>Lytics</p>").await;

        let registry = registry_for(&server);
        let (index, _) = build_index_for(
            &registry,
            &crawler(),
            &[Platform::Segment, Platform::Lytics],
            &SilentProgress,
        )
        .await;

        for platform in [Platform::Segment, Platform::Lytics] {
            let seed = registry.seed(platform).as_str();
            assert_eq!(index.page_count(platform), 1);
            assert!(index.pages(platform).all(|p| p.url.starts_with(seed)));
        }
        assert!(!index.has_platform(Platform::MParticle));
    }
}
