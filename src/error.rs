//! Unified error handling for the digest pipeline.

use thiserror::Error;

use crate::record::ResultKind;

/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;

/// Everything that can abort a digest run.
///
/// A `Fetch` error always aborts the run before rendering: a partially
/// fetched result set must never be reported as "no new papers".
#[derive(Error, Debug)]
pub enum DigestError {
    /// Network or parse failure against the search API.
    #[error("fetch failed for the {kind} query: {message}")]
    Fetch { kind: ResultKind, message: String },

    /// The relay refused the configured credentials.
    #[error("SMTP authentication failed: {0}")]
    Auth(String),

    /// The SMTP session could not be established.
    #[error("SMTP connection failed: {0}")]
    Connection(String),

    /// The relay rejected the message.
    #[error("mail delivery failed: {0}")]
    Delivery(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DigestError {
    /// Create a fetch error tagged with the query kind it belongs to.
    pub fn fetch(kind: ResultKind, message: impl std::fmt::Display) -> Self {
        Self::Fetch {
            kind,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
