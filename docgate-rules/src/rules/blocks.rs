//! Block-level rules: MD013, MD040.

use serde::Deserialize;

use super::{Rule, Violation};
use crate::document::{AtxHeading, LineKind, MarkdownDocument, char_len};

/// MD013: lines longer than the configured limit.
///
/// Outside `strict` mode a line only counts as too long when there is
/// whitespace beyond the limit, so long URLs and similar tokens pass.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineLength {
    line_length: usize,
    heading_line_length: Option<usize>,
    code_block_line_length: Option<usize>,
    code_blocks: bool,
    headings: bool,
    strict: bool,
}

impl Default for LineLength {
    fn default() -> Self {
        Self {
            line_length: 80,
            heading_line_length: None,
            code_block_line_length: None,
            code_blocks: true,
            headings: true,
            strict: false,
        }
    }
}

impl Rule for LineLength {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for line in doc.lines() {
            let limit = if line.kind.is_code() {
                if !self.code_blocks {
                    continue;
                }
                self.code_block_line_length.unwrap_or(self.line_length)
            } else if AtxHeading::parse(line.text).is_some() {
                if !self.headings {
                    continue;
                }
                self.heading_line_length.unwrap_or(self.line_length)
            } else {
                self.line_length
            };

            let length = char_len(line.text);
            if length <= limit {
                continue;
            }
            if !self.strict && !line.text.chars().skip(limit).any(char::is_whitespace) {
                continue;
            }
            violations.push(
                Violation::at(line.number)
                    .with_detail(format!("Expected: {limit}; Actual: {length}"))
                    .with_range(limit + 1, length - limit),
            );
        }
        violations
    }
}

/// MD040: fenced code blocks without an info string.
#[derive(Debug, Default)]
pub struct FencedCodeLanguage;

impl Rule for FencedCodeLanguage {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        doc.lines()
            .iter()
            .filter(|line| matches!(&line.kind, LineKind::FenceOpen { info } if info.is_empty()))
            .map(|line| Violation::at(line.number).with_context(line.text.trim()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn check(rule: &dyn Rule, text: &str) -> Vec<Violation> {
        rule.check(&MarkdownDocument::parse(text))
    }

    fn limited(line_length: usize) -> LineLength {
        LineLength {
            line_length,
            ..LineLength::default()
        }
    }

    #[test]
    fn test_line_length_reports_long_prose() {
        let violations = check(&limited(10), "short\nthis line is too long\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line_number, 2);
        assert_eq!(
            violations[0].detail.as_deref(),
            Some("Expected: 10; Actual: 21")
        );
        assert_eq!(violations[0].range, Some((11, 11)));
    }

    #[test]
    fn test_line_length_relaxed_for_unbroken_tokens() {
        let text = "see https://example.com/a/very/long/path\n";
        assert!(check(&limited(10), text).is_empty());

        let strict = LineLength {
            strict: true,
            ..limited(10)
        };
        assert_eq!(check(&strict, text).len(), 1);
    }

    #[test]
    fn test_line_length_code_blocks_toggle() {
        let text = "```\nlet value = compute_something_long();\n```\n";
        assert_eq!(check(&limited(10), text).len(), 1);

        let skip_code = LineLength {
            code_blocks: false,
            ..limited(10)
        };
        assert!(check(&skip_code, text).is_empty());
    }

    #[test]
    fn test_fenced_code_language() {
        let text = "```\nplain\n```\n\n```rust\nfn main() {}\n```\n";
        let violations = check(&FencedCodeLanguage, text);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line_number, 1);
    }
}
