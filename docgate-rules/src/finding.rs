//! Lint findings, fix descriptors and per-document results.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::Severity;

/// What a fix removes before inserting its replacement text.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Deletion {
    /// Delete this many characters starting at the edit column (may be zero).
    Chars(usize),
    /// Delete the whole line, including its line ending.
    Line,
}

/// A mechanical repair for a single finding.
///
/// Columns are 1-indexed and counted in characters, not bytes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FixInfo {
    /// Line the edit applies to (1-indexed).
    pub line_number: usize,
    /// Column at which the edit starts (1-indexed).
    pub edit_column: usize,
    /// Characters (or the line) removed at `edit_column`.
    pub deletion: Deletion,
    /// Text inserted at `edit_column`; `\n` is rewritten to the document's line ending.
    pub insert_text: String,
}

impl FixInfo {
    #[must_use]
    pub fn insert(line_number: usize, edit_column: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            edit_column,
            deletion: Deletion::Chars(0),
            insert_text: text.into(),
        }
    }

    #[must_use]
    pub fn delete(line_number: usize, edit_column: usize, count: usize) -> Self {
        Self::replace(line_number, edit_column, count, String::new())
    }

    #[must_use]
    pub fn replace(
        line_number: usize,
        edit_column: usize,
        count: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            edit_column,
            deletion: Deletion::Chars(count),
            insert_text: text.into(),
        }
    }

    #[must_use]
    pub fn delete_line(line_number: usize) -> Self {
        Self {
            line_number,
            edit_column: 1,
            deletion: Deletion::Line,
            insert_text: String::new(),
        }
    }
}

/// A single rule violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct LintFinding {
    /// Line number (1-indexed).
    pub line_number: usize,
    /// Canonical rule id, e.g. `MD018`.
    pub rule_id: &'static str,
    /// Rule alias, e.g. `no-missing-space-atx`.
    pub rule_alias: &'static str,
    /// Fixed, rule-level description.
    pub rule_description: &'static str,
    /// Finding-specific detail such as `Expected: 1; Actual: 2`.
    pub error_detail: Option<String>,
    /// Text of the offending construct.
    pub error_context: Option<String>,
    /// `(column, length)` of the offending range, 1-indexed.
    pub error_range: Option<(usize, usize)>,
    /// Severity configured for the rule.
    pub severity: Severity,
    /// Present when the violation can be repaired without further input.
    pub fix_info: Option<FixInfo>,
}

impl LintFinding {
    /// Whether the finding carries a fix descriptor.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix_info.is_some()
    }
}

/// Renders `<line>: <id>/<alias> <description> [<detail>] [Context: "<context>"]`.
impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} {}",
            self.line_number, self.rule_id, self.rule_alias, self.rule_description
        )?;
        if let Some(detail) = &self.error_detail {
            write!(f, " [{detail}]")?;
        }
        if let Some(context) = &self.error_context {
            write!(f, " [Context: \"{context}\"]")?;
        }
        Ok(())
    }
}

/// Findings keyed by document identifier.
///
/// Within a document, findings keep the engine's order (rule order, then line order).
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationResult {
    documents: BTreeMap<String, Vec<LintFinding>>,
}

impl ValidationResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the findings for `name`, replacing any earlier entry.
    pub fn insert(&mut self, name: impl Into<String>, findings: Vec<LintFinding>) {
        self.documents.insert(name.into(), findings);
    }

    /// Findings for one document.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[LintFinding]> {
        self.documents.get(name).map(Vec::as_slice)
    }

    /// All findings across documents, in document-key order.
    pub fn findings(&self) -> impl Iterator<Item = &LintFinding> {
        self.documents.values().flatten()
    }

    /// Findings that carry a fix descriptor.
    #[must_use]
    pub fn fixable(&self) -> Vec<&LintFinding> {
        self.findings().filter(|f| f.is_fixable()).collect()
    }

    /// Total number of findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.error_count() == 0
    }
}

/// One finding per line; the document key is not part of the rendering.
impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finding) in self.findings().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{finding}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn finding(line_number: usize, fix_info: Option<FixInfo>) -> LintFinding {
        LintFinding {
            line_number,
            rule_id: "MD018",
            rule_alias: "no-missing-space-atx",
            rule_description: "No space after hash on atx style heading",
            error_detail: None,
            error_context: Some("#Title".to_owned()),
            error_range: Some((1, 2)),
            severity: Severity::Error,
            fix_info,
        }
    }

    #[test]
    fn test_display_includes_context() {
        let rendered = finding(3, None).to_string();
        assert_eq!(
            rendered,
            "3: MD018/no-missing-space-atx No space after hash on atx style heading [Context: \"#Title\"]"
        );
    }

    #[test]
    fn test_display_includes_detail_before_context() {
        let mut f = finding(1, None);
        f.error_detail = Some("Expected: 1; Actual: 2".to_owned());
        f.error_context = None;
        assert!(f.to_string().ends_with(" [Expected: 1; Actual: 2]"));
    }

    #[test]
    fn test_result_rendering_omits_document_key() {
        let mut result = ValidationResult::new();
        result.insert(
            "readme",
            vec![finding(1, None), finding(4, Some(FixInfo::insert(4, 2, " ")))],
        );

        let rendered = result.to_string();
        assert!(!rendered.contains("readme"));
        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.fixable().len(), 1);
    }

    #[test]
    fn test_empty_result_renders_empty_string() {
        let result = ValidationResult::new();
        assert!(result.is_empty());
        assert_eq!(result.to_string(), "");
    }
}
