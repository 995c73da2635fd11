//! Whitespace rules: MD009, MD010, MD012, MD047.

use serde::Deserialize;

use super::{Rule, Violation};
use crate::document::{MarkdownDocument, char_len};
use crate::finding::FixInfo;

/// MD009: trailing spaces, except an exact `br_spaces` hard line break.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoTrailingSpaces {
    br_spaces: usize,
    strict: bool,
}

impl Default for NoTrailingSpaces {
    fn default() -> Self {
        Self {
            br_spaces: 2,
            strict: false,
        }
    }
}

impl NoTrailingSpaces {
    fn expected(&self) -> String {
        if self.br_spaces < 2 || self.strict {
            "Expected: 0".to_owned()
        } else {
            format!("Expected: 0 or {}", self.br_spaces)
        }
    }
}

impl Rule for NoTrailingSpaces {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        let line_break_allowed = self.br_spaces >= 2 && !self.strict;
        doc.prose_lines()
            .filter_map(|line| {
                let content = line.text.trim_end_matches(' ');
                let trailing = line.text.len() - content.len();
                if trailing == 0 {
                    return None;
                }
                if line_break_allowed && trailing == self.br_spaces && !content.trim().is_empty()
                {
                    return None;
                }
                let column = char_len(content) + 1;
                Some(
                    Violation::at(line.number)
                        .with_detail(format!("{}; Actual: {trailing}", self.expected()))
                        .with_range(column, trailing)
                        .with_fix(FixInfo::delete(line.number, column, trailing)),
                )
            })
            .collect()
    }
}

/// MD010: hard tabs, replaced by `spaces_per_tab` spaces each.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoHardTabs {
    code_blocks: bool,
    spaces_per_tab: usize,
}

impl Default for NoHardTabs {
    fn default() -> Self {
        Self {
            code_blocks: true,
            spaces_per_tab: 1,
        }
    }
}

impl Rule for NoHardTabs {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for line in doc.lines() {
            if line.kind.is_code() && !self.code_blocks {
                continue;
            }
            let chars: Vec<char> = line.text.chars().collect();
            let mut idx = 0;
            while idx < chars.len() {
                if chars[idx] != '\t' {
                    idx += 1;
                    continue;
                }
                let run = chars[idx..].iter().take_while(|&&c| c == '\t').count();
                let column = idx + 1;
                violations.push(
                    Violation::at(line.number)
                        .with_detail(format!("Column: {column}"))
                        .with_range(column, run)
                        .with_fix(FixInfo::replace(
                            line.number,
                            column,
                            run,
                            " ".repeat(run * self.spaces_per_tab),
                        )),
                );
                idx += run;
            }
        }
        violations
    }
}

/// MD012: more than `maximum` consecutive blank lines outside code blocks.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoMultipleBlanks {
    maximum: usize,
}

impl Default for NoMultipleBlanks {
    fn default() -> Self {
        Self { maximum: 1 }
    }
}

impl Rule for NoMultipleBlanks {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut blanks = 0;
        for line in doc.lines() {
            if line.kind.is_code() || !line.text.trim().is_empty() {
                blanks = 0;
                continue;
            }
            blanks += 1;
            if blanks > self.maximum {
                violations.push(
                    Violation::at(line.number)
                        .with_detail(format!("Expected: {}; Actual: {blanks}", self.maximum))
                        .with_fix(FixInfo::delete_line(line.number)),
                );
            }
        }
        violations
    }
}

/// MD047: the text must end with exactly one line break.
#[derive(Debug, Default)]
pub struct SingleTrailingNewline;

impl Rule for SingleTrailingNewline {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        let Some(last) = doc.lines().last() else {
            return Vec::new();
        };
        if last.text.is_empty() {
            return Vec::new();
        }
        let column = char_len(last.text) + 1;
        vec![
            Violation::at(last.number)
                .with_range(column, 1)
                .with_fix(FixInfo::insert(last.number, column, "\n")),
        ]
    }
}
