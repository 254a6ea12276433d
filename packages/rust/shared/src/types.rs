//! Core domain types: the four documented platforms and their seed URLs.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::config::SeedsConfig;
use crate::error::{CdpDocsError, Result};

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// One of the four Customer Data Platforms whose documentation is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Segment,
    MParticle,
    Lytics,
    Zeotap,
}

impl Platform {
    /// All platforms, in the fixed order used for alias routing and comparisons.
    pub const ALL: [Platform; 4] = [
        Platform::Segment,
        Platform::MParticle,
        Platform::Lytics,
        Platform::Zeotap,
    ];

    /// Display name used in replies.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Segment => "Segment",
            Platform::MParticle => "mParticle",
            Platform::Lytics => "Lytics",
            Platform::Zeotap => "Zeotap",
        }
    }

    /// Lowercase keyword that routes a question to this platform.
    pub fn alias(self) -> &'static str {
        match self {
            Platform::Segment => "segment",
            Platform::MParticle => "mparticle",
            Platform::Lytics => "lytics",
            Platform::Zeotap => "zeotap",
        }
    }

    /// Built-in documentation root.
    pub fn default_seed(self) -> &'static str {
        match self {
            Platform::Segment => "https://segment.com/docs/",
            Platform::MParticle => "https://docs.mparticle.com/",
            Platform::Lytics => "https://docs.lytics.com/",
            Platform::Zeotap => "https://docs.zeotap.com/home/en-us/",
        }
    }

    /// First platform (in [`Platform::ALL`] order) whose alias occurs in `text`,
    /// compared case-insensitively.
    ///
    /// A question naming several platforms resolves to the earliest one in the
    /// fixed order, not the first one mentioned.
    pub fn detect(text: &str) -> Option<Platform> {
        let lowered = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| lowered.contains(platform.alias()))
    }

    /// Whether `text` mentions any platform alias.
    pub fn mentioned_in(text: &str) -> bool {
        Self::detect(text).is_some()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = CdpDocsError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.alias() == lowered)
            .ok_or_else(|| {
                CdpDocsError::validation(format!(
                    "unknown platform '{s}' (expected one of: segment, mparticle, lytics, zeotap)"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// PlatformRegistry
// ---------------------------------------------------------------------------

/// Immutable mapping from platform to the seed URL that bounds its crawl.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    /// Indexed by `Platform as usize`, so always in [`Platform::ALL`] order.
    seeds: Vec<Url>,
}

impl PlatformRegistry {
    /// Registry with the built-in seed URLs.
    pub fn standard() -> Result<Self> {
        Self::from_config(&SeedsConfig::default())
    }

    /// Registry with built-in seeds, replaced by any overrides from config.
    pub fn from_config(overrides: &SeedsConfig) -> Result<Self> {
        let seeds = Platform::ALL
            .into_iter()
            .map(|platform| {
                let raw = overrides
                    .get(platform)
                    .unwrap_or_else(|| platform.default_seed());
                Url::parse(raw).map_err(|e| {
                    CdpDocsError::invalid_url(format!("invalid seed URL for {platform}"), raw, e)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { seeds })
    }

    /// Replace one platform's seed. Used to point a crawl at a mirror or mock server.
    pub fn with_seed(mut self, platform: Platform, seed: Url) -> Self {
        self.seeds[platform as usize] = seed;
        self
    }

    /// Seed URL for `platform`.
    pub fn seed(&self, platform: Platform) -> &Url {
        &self.seeds[platform as usize]
    }

    /// Iterate `(platform, seed)` in [`Platform::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &Url)> {
        Platform::ALL.into_iter().zip(self.seeds.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_is_case_insensitive() {
        assert_eq!(Platform::detect("What is SEGMENT?"), Some(Platform::Segment));
        assert_eq!(Platform::detect("how does mParticle work"), Some(Platform::MParticle));
        assert_eq!(Platform::detect("Tell me about a widget"), None);
    }

    #[test]
    fn detect_prefers_fixed_order_over_mention_order() {
        // Zeotap is mentioned first but Lytics precedes it in the fixed order.
        assert_eq!(
            Platform::detect("zeotap vs lytics audiences"),
            Some(Platform::Lytics)
        );
    }

    #[test]
    fn detect_matches_inside_words() {
        assert_eq!(Platform::detect("segmentation rules"), Some(Platform::Segment));
    }

    #[test]
    fn platform_from_str() {
        assert_eq!("Zeotap".parse::<Platform>().unwrap(), Platform::Zeotap);
        assert_eq!(" mparticle ".parse::<Platform>().unwrap(), Platform::MParticle);
        assert!("amplitude".parse::<Platform>().is_err());
    }

    #[test]
    fn standard_registry_has_all_seeds_in_order() {
        let registry = PlatformRegistry::standard().unwrap();
        let platforms: Vec<_> = registry.iter().map(|(p, _)| p).collect();
        assert_eq!(platforms, Platform::ALL.to_vec());
        assert_eq!(
            registry.seed(Platform::Zeotap).as_str(),
            "https://docs.zeotap.com/home/en-us/"
        );
    }

    #[test]
    fn registry_applies_overrides() {
        let overrides = SeedsConfig {
            lytics: Some("https://mirror.example.com/lytics/".into()),
            ..SeedsConfig::default()
        };
        let registry = PlatformRegistry::from_config(&overrides).unwrap();
        assert_eq!(
            registry.seed(Platform::Lytics).as_str(),
            "https://mirror.example.com/lytics/"
        );
        assert_eq!(
            registry.seed(Platform::Segment).as_str(),
            "https://segment.com/docs/"
        );
    }

    #[test]
    fn registry_rejects_bad_seed() {
        let overrides = SeedsConfig {
            segment: Some("not a url".into()),
            ..SeedsConfig::default()
        };
        let err = PlatformRegistry::from_config(&overrides).unwrap_err();
        assert!(matches!(&err, CdpDocsError::Parse { input, .. } if input == "not a url"));
        assert!(err.to_string().contains("invalid seed URL for Segment"));
    }

    #[test]
    fn with_seed_replaces_one_platform() {
        let mock = Url::parse("http://127.0.0.1:9999/docs/").unwrap();
        let registry = PlatformRegistry::standard()
            .unwrap()
            .with_seed(Platform::MParticle, mock.clone());
        assert_eq!(registry.seed(Platform::MParticle), &mock);
        assert_eq!(registry.iter().count(), 4);
    }
}
