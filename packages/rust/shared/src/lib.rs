//! Shared types, error model, and configuration for cdpdocs.
//!
//! This crate is the foundation depended on by all other cdpdocs crates.
//! It provides:
//! - [`CdpDocsError`]: the unified error type
//! - Domain types ([`Platform`], [`PlatformRegistry`])
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, CrawlSection, SeedsConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, write_config_to,
};
pub use error::{CdpDocsError, Result};
pub use types::{Platform, PlatformRegistry};
