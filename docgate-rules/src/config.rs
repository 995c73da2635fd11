//! Ruleset configuration.
//!
//! A [`RawLintConfig`] mirrors the markdownlint configuration shape:
//!
//! ```json
//! {
//!   "default": true,
//!   "MD013": false,
//!   "no-hard-tabs": { "spaces_per_tab": 4, "severity": "warning" }
//! }
//! ```
//!
//! [`LintConfig::from_raw`] validates it against the rule registry and
//! instantiates every enabled rule once. The result is immutable.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::MarkdownDocument;
use crate::error::RuleConfigError;
use crate::rules::{self, Rule, RuleDescriptor, Violation};

/// Finding severity. Reported alongside findings; does not affect counting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// Ruleset as written in a configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLintConfig {
    /// Enable every rule not mentioned explicitly.
    #[serde(default = "enabled_by_default")]
    pub default: bool,
    /// Per-rule settings keyed by rule id or alias. Keys starting with `$`
    /// (e.g. `$schema`) are ignored.
    #[serde(flatten)]
    pub rules: BTreeMap<String, Value>,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for RawLintConfig {
    fn default() -> Self {
        Self {
            default: true,
            rules: BTreeMap::new(),
        }
    }
}

/// A single rule's entry: `true`/`false`, or an options object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RuleSetting {
    Toggle(bool),
    Options(RuleOptions),
}

#[derive(Debug, Clone, Deserialize)]
struct RuleOptions {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(flatten)]
    params: Map<String, Value>,
}

/// An enabled rule with its parameters applied.
#[derive(Debug)]
pub struct ConfiguredRule {
    descriptor: &'static RuleDescriptor,
    severity: Severity,
    rule: Box<dyn Rule>,
}

impl ConfiguredRule {
    #[must_use]
    pub fn descriptor(&self) -> &'static RuleDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        self.rule.check(doc)
    }
}

/// The validated, immutable ruleset.
#[derive(Debug)]
pub struct LintConfig {
    rules: Vec<ConfiguredRule>,
}

impl LintConfig {
    /// Validate `raw` and build every enabled rule.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown rule names, rules configured twice, and
    /// parameters that do not match a rule's options.
    pub fn from_raw(raw: RawLintConfig) -> Result<Self, RuleConfigError> {
        let mut settings: BTreeMap<&'static str, RuleSetting> = BTreeMap::new();
        let mut seen: BTreeSet<&'static str> = BTreeSet::new();

        for (name, value) in raw.rules {
            if name.starts_with('$') {
                continue;
            }
            let descriptor = rules::lookup(&name).ok_or(RuleConfigError::UnknownRule { name })?;
            if !seen.insert(descriptor.id) {
                return Err(RuleConfigError::DuplicateRule { id: descriptor.id });
            }
            let setting = serde_json::from_value(value)
                .map_err(|source| RuleConfigError::InvalidOptions { id: descriptor.id, source })?;
            settings.insert(descriptor.id, setting);
        }

        let mut configured = Vec::new();
        for descriptor in rules::RULES {
            let (severity, params) = match settings.remove(descriptor.id) {
                None if raw.default => (Severity::default(), Map::new()),
                Some(RuleSetting::Toggle(true)) => (Severity::default(), Map::new()),
                Some(RuleSetting::Options(options)) if options.enabled.unwrap_or(true) => {
                    (options.severity.unwrap_or_default(), options.params)
                }
                _ => continue,
            };
            configured.push(ConfiguredRule {
                descriptor,
                severity,
                rule: descriptor.build(params)?,
            });
        }

        Ok(Self { rules: configured })
    }

    /// Every built-in rule with default options.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in rule rejects its own defaults.
    pub fn all_rules() -> Result<Self, RuleConfigError> {
        Self::from_raw(RawLintConfig::default())
    }

    /// Enabled rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    /// Whether the rule named by id or alias is enabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.descriptor.matches(name))
    }
}
