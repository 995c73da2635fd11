//! Heading rules: MD001, MD018, MD019, MD023, MD025, MD026.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{Rule, Violation};
use crate::document::{MarkdownDocument, char_len};
use crate::finding::FixInfo;

/// Heading ending in an HTML entity such as `&copy;`.
static TRAILING_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"&(?:#\d+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);$") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid entity regex: {err}"),
    }
});

/// MD001: heading levels increase by at most one.
#[derive(Debug, Default)]
pub struct HeadingIncrement;

impl Rule for HeadingIncrement {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut previous: Option<usize> = None;
        for (line, heading) in doc.headings() {
            if let Some(prev) = previous
                && heading.level > prev + 1
            {
                violations.push(
                    Violation::at(line.number)
                        .with_detail(format!(
                            "Expected: h{}; Actual: h{}",
                            prev + 1,
                            heading.level
                        ))
                        .with_context(line.text.trim()),
                );
            }
            previous = Some(heading.level);
        }
        violations
    }
}

/// MD018: `#Heading` is missing the space after the opening sequence.
#[derive(Debug, Default)]
pub struct NoMissingSpaceAtx;

impl Rule for NoMissingSpaceAtx {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        doc.prose_lines()
            .filter_map(|line| {
                let indent = line.text.bytes().take_while(|&b| b == b' ').count();
                if indent > 3 {
                    return None;
                }
                let rest = &line.text[indent..];
                let hashes = rest.bytes().take_while(|&b| b == b'#').count();
                let next = rest[hashes..].chars().next()?;
                if hashes == 0 || matches!(next, '#' | ' ' | '\t') {
                    return None;
                }
                // `#Heading#` is a closed heading missing both spaces; leave it alone.
                if line.text.trim_end().ends_with('#') {
                    return None;
                }
                Some(
                    Violation::at(line.number)
                        .with_context(line.text.trim_end())
                        .with_range(indent + 1, hashes + 1)
                        .with_fix(FixInfo::insert(line.number, indent + hashes + 1, " ")),
                )
            })
            .collect()
    }
}

/// MD019: more than one space between the opening sequence and the text.
#[derive(Debug, Default)]
pub struct NoMultipleSpaceAtx;

impl Rule for NoMultipleSpaceAtx {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        doc.headings()
            .filter(|(_, heading)| heading.spacing > 1 && !heading.content.is_empty())
            .map(|(line, heading)| {
                let hashes_end = heading.indent + heading.level;
                Violation::at(line.number)
                    .with_context(line.text.trim())
                    .with_range(heading.indent + 1, heading.level + heading.spacing)
                    .with_fix(FixInfo::delete(
                        line.number,
                        hashes_end + 2,
                        heading.spacing - 1,
                    ))
            })
            .collect()
    }
}

/// MD023: headings indented by one to three spaces.
#[derive(Debug, Default)]
pub struct HeadingStartLeft;

impl Rule for HeadingStartLeft {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        doc.headings()
            .filter(|(_, heading)| heading.indent > 0)
            .map(|(line, heading)| {
                Violation::at(line.number)
                    .with_context(line.text.trim())
                    .with_range(1, heading.indent + heading.level)
                    .with_fix(FixInfo::delete(line.number, 1, heading.indent))
            })
            .collect()
    }
}

/// MD025: only one heading at the top level.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingleH1 {
    level: usize,
}

impl Default for SingleH1 {
    fn default() -> Self {
        Self { level: 1 }
    }
}

impl Rule for SingleH1 {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        doc.headings()
            .filter(|(_, heading)| heading.level == self.level)
            .skip(1)
            .map(|(line, _)| Violation::at(line.number).with_context(line.text.trim()))
            .collect()
    }
}

/// MD026: heading text ends in punctuation.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoTrailingPunctuation {
    punctuation: String,
}

impl Default for NoTrailingPunctuation {
    fn default() -> Self {
        Self {
            punctuation: ".,;:!\u{3002}\u{ff0c}\u{ff1b}\u{ff1a}\u{ff01}".to_owned(),
        }
    }
}

impl Rule for NoTrailingPunctuation {
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation> {
        doc.headings()
            .filter_map(|(line, heading)| {
                let last = heading.content.chars().last()?;
                if !self.punctuation.contains(last) || TRAILING_ENTITY.is_match(heading.content)
                {
                    return None;
                }
                let byte_idx = heading.content_start + heading.content.len() - last.len_utf8();
                let column = char_len(&line.text[..byte_idx]) + 1;
                Some(
                    Violation::at(line.number)
                        .with_detail(format!("Punctuation: '{last}'"))
                        .with_context(line.text.trim())
                        .with_range(column, 1)
                        .with_fix(FixInfo::delete(line.number, column, 1)),
                )
            })
            .collect()
    }
}
