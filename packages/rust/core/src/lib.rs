//! Index building and question answering for cdpdocs.
//!
//! This crate ties the crawler to the in-memory [`DocIndex`] and exposes the
//! [`QueryEngine`] that answers questions against it.

pub mod index;
pub mod pipeline;
pub mod query;

pub use index::DocIndex;
pub use pipeline::{ProgressReporter, SilentProgress, build_index, build_index_for};
pub use query::QueryEngine;
