//! Error types for ruleset construction.

use thiserror::Error;

/// Errors raised while turning a raw ruleset into a [`crate::LintConfig`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleConfigError {
    /// The ruleset names a rule that is not registered.
    #[error("Unknown rule '{name}'")]
    UnknownRule {
        /// The key as written in the ruleset.
        name: String,
    },

    /// The same rule is configured twice (e.g. once by id and once by alias).
    #[error("Rule {id} is configured more than once")]
    DuplicateRule {
        /// Canonical rule id.
        id: &'static str,
    },

    /// A rule's parameters do not match its option schema.
    #[error("Invalid options for rule {id}: {source}")]
    InvalidOptions {
        /// Canonical rule id.
        id: &'static str,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}
