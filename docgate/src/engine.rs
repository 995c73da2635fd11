//! The lint rule engine seen by the orchestrator.

use docgate_rules::{LintConfig, LintFinding, ValidationResult};

use crate::document::Document;

/// Lints documents and applies fix descriptors.
///
/// [`crate::LintOrchestrator`] is generic over this trait; the default is
/// [`BuiltinLintEngine`].
pub trait LintEngine: Send + Sync {
    /// Lint `document` under `config`, keyed by the document's name.
    fn lint(&self, config: &LintConfig, document: &Document) -> ValidationResult;

    /// Apply every fix carried by `findings` to `text` in one pass.
    fn apply_fixes(&self, text: &str, findings: &[&LintFinding]) -> String;
}

/// The `docgate-rules` engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLintEngine;

impl LintEngine for BuiltinLintEngine {
    fn lint(&self, config: &LintConfig, document: &Document) -> ValidationResult {
        docgate_rules::lint_documents(config, [(document.name(), document.text())])
    }

    fn apply_fixes(&self, text: &str, findings: &[&LintFinding]) -> String {
        docgate_rules::apply_fixes(text, findings.iter().copied())
    }
}
