//! Application configuration for cdpdocs.
//!
//! User config lives at `~/.cdpdocs/cdpdocs.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CdpDocsError, Result};
use crate::types::Platform;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cdpdocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cdpdocs";

// ---------------------------------------------------------------------------
// Config structs (matching cdpdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Crawl bounds and HTTP client settings.
    #[serde(default)]
    pub crawl: CrawlSection,

    /// Per-platform seed URL overrides.
    #[serde(default)]
    pub seeds: SeedsConfig,
}

/// `[crawl]` section.
///
/// Every bound is optional; an absent bound means the crawl runs until the
/// frontier is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSection {
    /// Stop after this many successfully fetched pages per platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// Maximum link depth from the seed URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Drop `#fragment` from discovered links before dedup and scope checks.
    #[serde(default)]
    pub strip_fragments: bool,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            max_pages: None,
            max_depth: None,
            timeout_secs: None,
            strip_fragments: false,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("cdpdocs/", env!("CARGO_PKG_VERSION")).into()
}

/// `[seeds]` section. Unknown keys are rejected: the platform set is fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mparticle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lytics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zeotap: Option<String>,
}

impl SeedsConfig {
    /// Override for `platform`, if one is configured.
    pub fn get(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Segment => self.segment.as_deref(),
            Platform::MParticle => self.mparticle.as_deref(),
            Platform::Lytics => self.lytics.as_deref(),
            Platform::Zeotap => self.zeotap.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Page budget per platform crawl (`None` = unbounded).
    pub max_pages: Option<usize>,
    /// Link depth limit from the seed (`None` = unbounded).
    pub max_depth: Option<u32>,
    /// Per-request timeout in seconds (`None` = wait indefinitely).
    pub timeout_secs: Option<u64>,
    /// Whether discovered links lose their fragment.
    pub strip_fragments: bool,
    /// User-Agent header.
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_pages: config.crawl.max_pages,
            max_depth: config.crawl.max_depth,
            timeout_secs: config.crawl.timeout_secs,
            strip_fragments: config.crawl.strip_fragments,
            user_agent: config.crawl.user_agent.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cdpdocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CdpDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cdpdocs/cdpdocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CdpDocsError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CdpDocsError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Serialize `config` as TOML to `path`, creating parent directories.
pub fn write_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| CdpDocsError::io(dir, e))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| CdpDocsError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| CdpDocsError::io(path, e))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    write_config_to(&path, &AppConfig::default())?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
