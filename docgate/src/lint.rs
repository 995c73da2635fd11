//! Lint orchestration: lint, optionally fix, and re-lint.
//!
//! Per request the flow is `Received -> Linted -> [FixApplied -> Relinted] -> Responded`.
//! A single fix pass is applied; a fix that exposes another fixable
//! violation is resolved by the caller's next request, not by iterating here.
//!
//! Known limitation: a fix can turn a non-heading line into a heading
//! (`###B:` becomes `### B:`), which exposes heading rules that did not
//! apply before. When the re-lint reports more findings than the submitted
//! text had, the fix pass is discarded: `fixed_text` is `None` and the
//! findings describe the submitted text.

use std::sync::Arc;

use docgate_rules::{LintConfig, ValidationResult};
use serde::Serialize;

use crate::document::Document;
use crate::engine::{BuiltinLintEngine, LintEngine};

/// Result of one orchestration run.
///
/// `validations` is always computed from the text the caller ends up with:
/// the fixed text when `fixed_text` is `Some`, the submitted text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOutcome {
    /// Final findings.
    pub validations: ValidationResult,
    /// Text after the fix pass; `None` when no fix was requested, applicable,
    /// or kept.
    pub fixed_text: Option<String>,
    /// Number of findings before any fix was applied.
    pub initial_count: usize,
}

impl LintOutcome {
    /// Number of findings in the final result.
    #[must_use]
    pub fn error_num(&self) -> usize {
        self.validations.error_count()
    }

    /// Wire representation returned to HTTP callers.
    #[must_use]
    pub fn into_report(self) -> LintReport {
        LintReport {
            validations: self.validations.to_string(),
            error_num: self.validations.error_count(),
            fixed_text: self.fixed_text,
        }
    }
}

/// JSON body of a lint response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    /// Rendering of the final findings, one per line.
    pub validations: String,
    /// Fixed text, or `null`.
    pub fixed_text: Option<String>,
    /// Count of findings in the final result.
    pub error_num: usize,
}

/// Runs the lint/fix/re-lint sequence against a fixed ruleset.
#[derive(Debug, Clone)]
pub struct LintOrchestrator<E = BuiltinLintEngine> {
    config: Arc<LintConfig>,
    engine: E,
}

impl LintOrchestrator {
    /// Orchestrator over the built-in rule engine.
    #[must_use]
    pub fn new(config: Arc<LintConfig>) -> Self {
        Self::with_engine(config, BuiltinLintEngine)
    }
}

impl<E: LintEngine> LintOrchestrator<E> {
    #[must_use]
    pub fn with_engine(config: Arc<LintConfig>, engine: E) -> Self {
        Self { config, engine }
    }

    #[must_use]
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Lint `document`; when `fix` is set, apply all fixable findings once
    /// and lint the fixed text again.
    ///
    /// When `fix` is set but nothing is fixable, the unchanged text is linted
    /// again and `fixed_text` is `None`. `fixed_text` is also `None` when the
    /// fix pass leaves the text unchanged or raises the finding count.
    #[must_use]
    pub fn lint_and_maybe_fix(&self, document: &Document, fix: bool) -> LintOutcome {
        let initial = self.engine.lint(&self.config, document);
        let initial_count = initial.error_count();
        tracing::debug!(
            document = document.name(),
            findings = initial_count,
            fix,
            "Linted document"
        );

        if !fix {
            return LintOutcome {
                validations: initial,
                fixed_text: None,
                initial_count,
            };
        }

        let fixable = initial.fixable();
        if fixable.is_empty() {
            let validations = self.engine.lint(&self.config, document);
            return LintOutcome {
                validations,
                fixed_text: None,
                initial_count,
            };
        }

        let fixed_text = self.engine.apply_fixes(document.text(), &fixable);
        if fixed_text == document.text() {
            return LintOutcome {
                validations: initial,
                fixed_text: None,
                initial_count,
            };
        }

        let fixed = Document::new(document.name(), fixed_text);
        let validations = self.engine.lint(&self.config, &fixed);
        if validations.error_count() > initial_count {
            tracing::debug!(
                document = document.name(),
                before = initial_count,
                after = validations.error_count(),
                "Discarded fix pass that raised the finding count"
            );
            return LintOutcome {
                validations: initial,
                fixed_text: None,
                initial_count,
            };
        }

        tracing::info!(
            document = document.name(),
            applied = fixable.len(),
            before = initial_count,
            after = validations.error_count(),
            "Applied markdown fixes"
        );

        LintOutcome {
            validations,
            fixed_text: Some(fixed.text().to_owned()),
            initial_count,
        }
    }
}
