//! Error types for cdpdocs.
//!
//! Library crates return [`CdpDocsError`]; the `cdpdocs` binary converts it
//! into a `color_eyre` report at the top level.

use std::path::PathBuf;

/// Errors raised while setting up or running a crawl.
///
/// Per-page crawl failures are carried as [`CdpDocsError::Network`] values
/// inside a crawl report rather than returned.
#[derive(Debug, thiserror::Error)]
pub enum CdpDocsError {
    /// The config file is unreadable as TOML or the home directory is unknown.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport failure, HTTP 4xx/5xx, or an unreadable response body.
    #[error("network error: {0}")]
    Network(String),

    /// A seed URL that does not parse.
    #[error("parse error: {what} '{input}': {source}")]
    Parse {
        what: String,
        input: String,
        source: url::ParseError,
    },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input rejected by a domain rule, such as an unknown platform name.
    #[error("validation error: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, CdpDocsError>;

impl CdpDocsError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// `what` names the value being parsed, e.g. "invalid seed URL for Segment".
    pub fn invalid_url(what: impl Into<String>, input: &str, source: url::ParseError) -> Self {
        Self::Parse {
            what: what.into(),
            input: input.to_owned(),
            source,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
