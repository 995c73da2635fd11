//! Error types for configuration loading and MDX validation.

use std::path::PathBuf;

use docgate_rules::RuleConfigError;
use thiserror::Error;

/// Failure to load the ruleset at start-up. Always fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigLoadError {
    /// The configuration file could not be read.
    #[error("Failed to read lint config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of `.json`, `.yaml`, `.yml`.
    #[error("Unsupported lint config format: {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The content is not valid JSON for a ruleset.
    #[error("Invalid JSON lint config: {0}")]
    Json(#[source] serde_json::Error),

    /// The content is not valid YAML for a ruleset.
    #[error("Invalid YAML lint config: {0}")]
    Yaml(String),

    /// The ruleset parsed but does not match the rule registry.
    #[error(transparent)]
    Rules(#[from] RuleConfigError),
}

/// The MDX parser rejected the input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct MdxParseError {
    message: String,
}

impl MdxParseError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the parse failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
