//! # docgate-rules
//!
//! Markdown style rules with mechanical fixes, following markdownlint's rule
//! ids, aliases and configuration shape.
//!
//! ## Quick Start
//!
//! ```rust
//! use docgate_rules::{LintConfig, apply_fixes, lint_text};
//!
//! let config = LintConfig::all_rules().unwrap();
//! let findings = lint_text(&config, "#Title\n");
//! assert_eq!(findings.len(), 1);
//!
//! let fixed = apply_fixes("#Title\n", &findings);
//! assert_eq!(fixed, "# Title\n");
//! assert!(lint_text(&config, &fixed).is_empty());
//! ```

mod config;
mod document;
mod error;
mod finding;
mod fix;
mod lint;
pub mod rules;

pub use config::{ConfiguredRule, LintConfig, RawLintConfig, Severity};
pub use document::{AtxHeading, Line, LineKind, MarkdownDocument};
pub use error::RuleConfigError;
pub use finding::{Deletion, FixInfo, LintFinding, ValidationResult};
pub use fix::apply_fixes;
pub use lint::{lint_documents, lint_text};
