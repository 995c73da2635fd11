//! Running a ruleset over documents.

use crate::config::LintConfig;
use crate::document::MarkdownDocument;
use crate::finding::{LintFinding, ValidationResult};

/// Lint a single text with every enabled rule.
///
/// Findings are ordered by rule (registry order), then by line. Findings on
/// lines where an inline comment disables the rule are dropped.
#[must_use]
pub fn lint_text(config: &LintConfig, text: &str) -> Vec<LintFinding> {
    let doc = MarkdownDocument::parse(text);
    let mut findings = Vec::new();
    for configured in config.rules() {
        let descriptor = configured.descriptor();
        for violation in configured.check(&doc) {
            if doc.is_rule_disabled(violation.line_number, descriptor.id) {
                continue;
            }
            findings.push(LintFinding {
                line_number: violation.line_number,
                rule_id: descriptor.id,
                rule_alias: descriptor.alias,
                rule_description: descriptor.description,
                error_detail: violation.detail,
                error_context: violation.context,
                error_range: violation.range,
                severity: configured.severity(),
                fix_info: violation.fix.filter(|_| descriptor.fixable),
            });
        }
    }
    findings
}

/// Lint several named documents.
#[must_use]
pub fn lint_documents<'a, I>(config: &LintConfig, documents: I) -> ValidationResult
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut result = ValidationResult::new();
    for (name, text) in documents {
        result.insert(name, lint_text(config, text));
    }
    result
}
