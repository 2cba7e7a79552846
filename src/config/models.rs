// src/config/models.rs
use crate::health::Credentials;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime settings, taken from command line flags with environment fallbacks.
#[derive(Parser, Debug, Clone)]
#[command(name = "public-api-checker")]
#[command(version, about = "A checker for business level API endpoints", long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Base URL for outgoing check requests (e.g., vulcand base URL)
    #[arg(long = "baseurl", env = "BASE_URL", default_value = "http://localhost:1234/")]
    pub base_url: String,

    /// User for basic auth in outgoing check requests
    #[arg(long, env = "USER", default_value = "")]
    pub user: String,

    /// Password for basic auth in outgoing check requests
    #[arg(long, env = "PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// YAML or JSON file replacing the built-in list of checks
    #[arg(long, env = "CHECKS_FILE")]
    pub checks_file: Option<PathBuf>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::parse_base_url(&self.base_url)?;
        Ok(())
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::new(&self.user, &self.password)
    }
}

/// A named downstream endpoint, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckDefinition {
    pub id: String,
    pub path: String,
}

impl CheckDefinition {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChecksFile {
    pub checks: Vec<CheckDefinition>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    #[error("no checks configured")]
    NoChecks,

    #[error("check #{index} is invalid: {reason}")]
    InvalidCheck { index: usize, reason: &'static str },

    #[error("duplicate check id {0:?}")]
    DuplicateCheck(String),
}
