//! # docgate
//!
//! Validation core of the docgate service: MDX syntax checks and markdown
//! lint-and-fix orchestration over a ruleset loaded once at start-up.
//!
//! ## Quick Start
//!
//! ```rust
//! use docgate::{ConfigSource, LintOptions, LintOrchestrator, load_lint_config};
//!
//! let config = load_lint_config(&ConfigSource::Embedded).unwrap();
//! let orchestrator = LintOrchestrator::new(config);
//!
//! let options = LintOptions { fix: true, ..LintOptions::default() };
//! let outcome = orchestrator.lint_and_maybe_fix(&options.document("#Title\n"), options.fix);
//! assert_eq!(outcome.fixed_text.as_deref(), Some("# Title\n"));
//! assert_eq!(outcome.error_num(), 0);
//! ```

mod config;
mod document;
mod engine;
mod error;
mod lint;
pub mod mdx;

pub use config::{
    ConfigFormat, ConfigSource, DEFAULT_LINT_CONFIG, DEFAULT_PORT, ServiceLimits,
    load_lint_config, parse_lint_config,
};
pub use document::{DEFAULT_FILENAME, Document, LintOptions};
pub use engine::{BuiltinLintEngine, LintEngine};
pub use error::{ConfigLoadError, MdxParseError};
pub use lint::{LintOrchestrator, LintOutcome, LintReport};
pub use mdx::{MarkdownRsParser, MdxParser};

pub use docgate_rules::{LintConfig, LintFinding, ValidationResult};
