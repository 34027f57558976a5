//! Configuration loading for a digest run.
//!
//! Everything the pipeline filters on or connects to is sourced from a TOML
//! file at startup; nothing is compiled in. The SMTP password may instead be
//! supplied through the [`PASSWORD_ENV`] environment variable so that the
//! config file can be checked in without credentials.

use std::{env, fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{DigestError, Result};

/// Environment variable consulted before the `mail.password` field.
pub const PASSWORD_ENV: &str = "DIGEST_SMTP_PASSWORD";

fn default_endpoint() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_max_results() -> u32 {
    1000
}

fn default_lag_days() -> u64 {
    2
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "Arxiv Daily Digest".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    pub criteria: Criteria,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// How far behind the run date the digest looks. The index trails real
    /// submission dates by about a day, and the extra margin keeps a slow
    /// index from producing an empty digest. Changing this shifts which
    /// papers every run reports on.
    #[serde(default = "default_lag_days")]
    pub lag_days: u64,
    /// Bound on connect and total request time, in seconds. Absent means
    /// wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_results: default_max_results(),
            lag_days: default_lag_days(),
            timeout_secs: None,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// The author, topic and category terms the digest filters on.
///
/// Matching is case-sensitive substring containment throughout, both when
/// building queries and when re-validating fetched records.
#[derive(Debug, Clone, Deserialize)]
pub struct Criteria {
    pub authors: Vec<String>,
    pub topics: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    /// Optional; [`PASSWORD_ENV`] takes precedence when set.
    #[serde(default)]
    pub password: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, terms) in [
            ("criteria.authors", &self.criteria.authors),
            ("criteria.topics", &self.criteria.topics),
            ("criteria.categories", &self.criteria.categories),
        ] {
            if terms.is_empty() {
                return Err(DigestError::config(format!(
                    "{name} must list at least one term"
                )));
            }
            if terms.iter().any(|t| t.trim().is_empty()) {
                return Err(DigestError::config(format!("{name} contains an empty term")));
            }
        }
        if self.search.max_results == 0 {
            return Err(DigestError::config("search.max_results must be positive"));
        }
        for (name, value) in [
            ("mail.smtp_host", &self.mail.smtp_host),
            ("mail.username", &self.mail.username),
            ("mail.from", &self.mail.from),
            ("mail.to", &self.mail.to),
        ] {
            if value.is_empty() {
                return Err(DigestError::config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

impl MailConfig {
    /// Resolve the SMTP password, preferring the environment.
    pub fn password(&self) -> Result<String> {
        if let Ok(password) = env::var(PASSWORD_ENV)
            && !password.is_empty()
        {
            return Ok(password);
        }
        self.password.clone().ok_or_else(|| {
            DigestError::config(format!(
                "no SMTP password configured: set {PASSWORD_ENV} or mail.password"
            ))
        })
    }
}
