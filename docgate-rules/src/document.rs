//! Line model of a markdown document as seen by the rules.
//!
//! The document is split on `\r\n`, `\r` and `\n`, so text ending in a line
//! break has a final empty line. Each line is classified as prose or as part
//! of a fenced code block, and inline `markdownlint-*` comments are folded
//! into a per-line set of disabled rule ids.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::rules;

/// Inline configuration comment, e.g. `<!-- markdownlint-disable MD013 line-length -->`.
static INLINE_CONFIG: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"<!--\s*markdownlint-(disable-next-line|disable-line|disable|enable)((?:\s+[A-Za-z0-9_-]+)*)\s*-->",
    ) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid inline config regex: {err}"),
    }
});

/// Split text into lines the way fix descriptors address them.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        let ending = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + ending..];
    }
    lines.push(rest);
    lines
}

/// The first line ending used in `text`, or `\n` when there is none.
#[must_use]
pub fn line_ending(text: &str) -> &'static str {
    match text.find(['\r', '\n']) {
        Some(pos) if text[pos..].starts_with("\r\n") => "\r\n",
        Some(pos) if text[pos..].starts_with('\r') => "\r",
        _ => "\n",
    }
}

/// Number of characters in `s`, used for 1-indexed column arithmetic.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Classification of a line relative to fenced code blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Prose,
    /// Opening fence; `info` is the trimmed info string (language tag etc.).
    FenceOpen {
        info: String,
    },
    /// Line inside a fenced block.
    Code,
    /// Closing fence.
    FenceClose,
}

impl LineKind {
    /// Whether the line belongs to a fenced code block (fences included).
    #[must_use]
    pub fn is_code(&self) -> bool {
        !matches!(self, Self::Prose)
    }
}

#[derive(Debug, Clone)]
pub struct Line<'a> {
    /// 1-indexed line number.
    pub number: usize,
    pub text: &'a str,
    pub kind: LineKind,
}

/// An ATX heading (`# Title`) on a prose line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxHeading<'a> {
    /// Leading spaces before the opening sequence (0..=3).
    pub indent: usize,
    /// Number of `#` characters (1..=6).
    pub level: usize,
    /// Whitespace characters between the opening sequence and the content.
    pub spacing: usize,
    /// Heading text with the optional closing sequence and trailing whitespace removed.
    pub content: &'a str,
    /// Byte offset of `content` within the line.
    pub content_start: usize,
}

impl AtxHeading<'_> {
    /// Parse an ATX heading per `CommonMark`; returns `None` for anything else.
    #[must_use]
    pub fn parse(text: &str) -> Option<AtxHeading<'_>> {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let rest = &text[indent..];
        let level = rest.bytes().take_while(|&b| b == b'#').count();
        if level == 0 || level > 6 {
            return None;
        }
        let after = &rest[level..];
        if !after.is_empty() && !after.starts_with([' ', '\t']) {
            return None;
        }
        let spacing = after.len() - after.trim_start_matches([' ', '\t']).len();
        let body = after[spacing..].trim_end_matches([' ', '\t']);
        let without_closing = body.trim_end_matches('#');
        let content = if without_closing.len() < body.len()
            && (without_closing.is_empty() || without_closing.ends_with([' ', '\t']))
        {
            without_closing.trim_end_matches([' ', '\t'])
        } else {
            body
        };

        Some(AtxHeading {
            indent,
            level,
            spacing,
            content,
            content_start: indent + level + spacing,
        })
    }
}

/// A fence delimiter line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fence<'a> {
    fence_char: char,
    len: usize,
    info: &'a str,
}

fn parse_fence(line: &str) -> Option<Fence<'_>> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let trimmed = &line[indent..];
    let fence_char = match trimmed.as_bytes().first() {
        Some(b'`') => '`',
        Some(b'~') => '~',
        _ => return None,
    };

    let len = trimmed.chars().take_while(|&c| c == fence_char).count();
    if len < 3 {
        return None;
    }
    let info = trimmed[len..].trim();
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    Some(Fence {
        fence_char,
        len,
        info,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Prose,
    Fenced { fence_char: char, opening_len: usize },
}

/// A markdown document split into classified lines.
#[derive(Debug, Clone)]
pub struct MarkdownDocument<'a> {
    lines: Vec<Line<'a>>,
    disabled: Vec<BTreeSet<&'static str>>,
}

impl<'a> MarkdownDocument<'a> {
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        let mut state = FenceState::Prose;
        let lines: Vec<Line<'a>> = split_lines(text)
            .into_iter()
            .enumerate()
            .map(|(idx, line)| {
                let fence = parse_fence(line);
                let kind = match (state, fence) {
                    (FenceState::Prose, Some(fence)) => {
                        state = FenceState::Fenced {
                            fence_char: fence.fence_char,
                            opening_len: fence.len,
                        };
                        LineKind::FenceOpen {
                            info: fence.info.to_owned(),
                        }
                    }
                    (FenceState::Prose, None) => LineKind::Prose,
                    (
                        FenceState::Fenced {
                            fence_char,
                            opening_len,
                        },
                        Some(fence),
                    ) if fence.fence_char == fence_char
                        && fence.len >= opening_len
                        && fence.info.is_empty() =>
                    {
                        state = FenceState::Prose;
                        LineKind::FenceClose
                    }
                    (FenceState::Fenced { .. }, _) => LineKind::Code,
                };
                Line {
                    number: idx + 1,
                    text: line,
                    kind,
                }
            })
            .collect();

        let disabled = inline_disabled_rules(&lines);
        Self { lines, disabled }
    }

    #[must_use]
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Prose lines only, i.e. lines outside fenced code blocks.
    pub fn prose_lines(&self) -> impl Iterator<Item = &Line<'a>> {
        self.lines.iter().filter(|line| !line.kind.is_code())
    }

    /// ATX headings on prose lines, in document order.
    pub fn headings(&self) -> impl Iterator<Item = (&Line<'a>, AtxHeading<'a>)> {
        self.prose_lines()
            .filter_map(|line| AtxHeading::parse(line.text).map(|heading| (line, heading)))
    }

    /// Whether inline comments disable rule `id` on `line_number`.
    #[must_use]
    pub fn is_rule_disabled(&self, line_number: usize, id: &str) -> bool {
        line_number
            .checked_sub(1)
            .and_then(|idx| self.disabled.get(idx))
            .is_some_and(|set| set.contains(id))
    }
}

/// Resolve the rule names listed in a comment; an empty list means every rule.
fn named_rules(list: &str) -> BTreeSet<&'static str> {
    let names: Vec<&str> = list.split_whitespace().collect();
    if names.is_empty() {
        return rules::RULES.iter().map(|descriptor| descriptor.id).collect();
    }
    names
        .into_iter()
        .filter_map(rules::lookup)
        .map(|descriptor| descriptor.id)
        .collect()
}

fn inline_disabled_rules(lines: &[Line<'_>]) -> Vec<BTreeSet<&'static str>> {
    let mut current: BTreeSet<&'static str> = BTreeSet::new();
    let mut next_line: BTreeSet<&'static str> = BTreeSet::new();
    let mut result = Vec::with_capacity(lines.len());

    for line in lines {
        let mut this_line = std::mem::take(&mut next_line);
        if !line.kind.is_code() {
            for caps in INLINE_CONFIG.captures_iter(line.text) {
                let action = caps.get(1).map_or("", |m| m.as_str());
                let names = named_rules(caps.get(2).map_or("", |m| m.as_str()));
                match action {
                    "disable" => current.extend(names),
                    "enable" => current.retain(|id| !names.contains(id)),
                    "disable-line" => this_line.extend(names),
                    _ => next_line.extend(names),
                }
            }
        }
        this_line.extend(current.iter().copied());
        result.push(this_line);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines("a\r\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\rb\r\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_line_ending_detects_first_break() {
        assert_eq!(line_ending("a\r\nb\n"), "\r\n");
        assert_eq!(line_ending("a\nb\r\n"), "\n");
        assert_eq!(line_ending("no breaks"), "\n");
    }

    #[test]
    fn test_atx_heading_parse() {
        let heading = AtxHeading::parse("## Title ##").unwrap();
        assert_eq!(heading.level, 2);
        assert_eq!(heading.content, "Title");
        assert_eq!(heading.content_start, 3);

        let indented = AtxHeading::parse("  #   Spaced").unwrap();
        assert_eq!(indented.indent, 2);
        assert_eq!(indented.spacing, 3);
        assert_eq!(indented.content, "Spaced");

        assert!(AtxHeading::parse("#Title").is_none());
        assert!(AtxHeading::parse("####### seven").is_none());
        assert!(AtxHeading::parse("    # code").is_none());
        assert_eq!(AtxHeading::parse("#").map(|h| h.content), Some(""));
    }

    #[test]
    fn test_atx_heading_keeps_hash_without_space() {
        let heading = AtxHeading::parse("# C#").unwrap();
        assert_eq!(heading.content, "C#");
    }

    #[test]
    fn test_fenced_blocks_are_classified() {
        let doc = MarkdownDocument::parse("text\n```rust\n# not a heading\n```\nafter");
        let kinds: Vec<&LineKind> = doc.lines().iter().map(|l| &l.kind).collect();
        assert_eq!(kinds[0], &LineKind::Prose);
        assert_eq!(
            kinds[1],
            &LineKind::FenceOpen {
                info: "rust".to_owned()
            }
        );
        assert_eq!(kinds[2], &LineKind::Code);
        assert_eq!(kinds[3], &LineKind::FenceClose);
        assert_eq!(kinds[4], &LineKind::Prose);
        assert_eq!(doc.headings().count(), 0);
    }

    #[test]
    fn test_mismatched_fence_does_not_close_block() {
        let doc = MarkdownDocument::parse("````\n~~~\n```\n````\n# Heading");
        assert_eq!(doc.lines()[1].kind, LineKind::Code);
        assert_eq!(doc.lines()[2].kind, LineKind::Code);
        assert_eq!(doc.lines()[3].kind, LineKind::FenceClose);
        assert_eq!(doc.headings().count(), 1);
    }

    #[test]
    fn test_inline_disable_and_enable() {
        let text = "a\n<!-- markdownlint-disable MD009 -->\nb\n<!-- markdownlint-enable MD009 -->\nc";
        let doc = MarkdownDocument::parse(text);
        assert!(!doc.is_rule_disabled(1, "MD009"));
        assert!(doc.is_rule_disabled(3, "MD009"));
        assert!(!doc.is_rule_disabled(3, "MD010"));
        assert!(!doc.is_rule_disabled(5, "MD009"));
    }

    #[test]
    fn test_inline_disable_by_alias_and_next_line() {
        let text = "<!-- markdownlint-disable-next-line no-hard-tabs -->\n\ttab\n\ttab";
        let doc = MarkdownDocument::parse(text);
        assert!(doc.is_rule_disabled(2, "MD010"));
        assert!(!doc.is_rule_disabled(3, "MD010"));
    }

    #[test]
    fn test_inline_disable_all() {
        let doc = MarkdownDocument::parse("<!-- markdownlint-disable -->\n#x");
        assert!(doc.is_rule_disabled(2, "MD018"));
        assert!(doc.is_rule_disabled(2, "MD047"));
    }
}
