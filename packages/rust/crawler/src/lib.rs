//! Web crawler and visible-text extraction.
//!
//! This crate provides:
//! - [`engine`]: Sequential BFS crawler bounded by the seed URL's prefix
//! - [`text`]: Visible-text and link extraction from parsed HTML

pub mod engine;
pub mod text;

pub use engine::{CrawlReport, CrawledPage, Crawler};
pub use text::{extract_links, visible_text};
