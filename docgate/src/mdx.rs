//! MDX syntax validation.

use markdown::ParseOptions;
use markdown::mdast::Node;

use crate::error::MdxParseError;

/// Response body for a document that parsed.
pub const MDX_SUCCESS_MESSAGE: &str = "Successfully parsed mdx";

/// Prefix of the response body for a document that did not parse.
pub const MDX_FAILURE_PREFIX: &str = "MDX parse failure: ";

/// Checks whether text is syntactically valid MDX.
///
/// Only the outcome is observed; the syntax tree is discarded.
pub trait MdxParser: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MdxParseError`] describing the first syntax error.
    fn parse(&self, text: &str) -> Result<(), MdxParseError>;
}

/// MDX parser backed by `markdown-rs` with its MDX construct set
/// (JSX, expressions, ESM) enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRsParser;

impl MdxParser for MarkdownRsParser {
    fn parse(&self, text: &str) -> Result<(), MdxParseError> {
        let tree = markdown::to_mdast(text, &ParseOptions::mdx())
            .map_err(|message| MdxParseError::new(message.to_string()))?;
        match unterminated_jsx_offset(text, &tree) {
            Some(offset) => {
                let (line, column) = line_column(text, offset);
                Err(MdxParseError::new(format!(
                    "{line}:{column}: Unexpected end of JSX tag, expected a closing `>` or a matching closing tag"
                )))
            }
            None => Ok(()),
        }
    }
}

/// markdown-rs keeps a JSX opener that runs into the end of input as plain
/// text. Find the byte offset of the first such `<` in a text node.
fn unterminated_jsx_offset(source: &str, tree: &Node) -> Option<usize> {
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if let Node::Text(text) = node
            && let Some(position) = &text.position
            && let Some(raw) = source.get(position.start.offset..position.end.offset)
            && let Some(offset) = jsx_opener(raw)
        {
            return Some(position.start.offset + offset);
        }
        if let Some(children) = node.children() {
            stack.extend(children.iter().rev());
        }
    }
    None
}

/// Offset of an unescaped `<` that starts a tag name, closing tag or fragment.
fn jsx_opener(raw: &str) -> Option<usize> {
    let mut previous = None;
    let mut chars = raw.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c == '<'
            && previous != Some('\\')
            && let Some(&(_, next)) = chars.peek()
            && (next.is_alphabetic() || matches!(next, '_' | '$' | '/' | '>'))
        {
            return Some(idx);
        }
        previous = Some(c);
    }
    None
}

/// 1-based line and column (in chars) of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    (line, before[line_start..].chars().count() + 1)
}

/// Validate `text` with `parser`, logging failures at debug level.
///
/// # Errors
///
/// Returns the parser's [`MdxParseError`] unchanged.
pub fn validate_mdx<P: MdxParser + ?Sized>(parser: &P, text: &str) -> Result<(), MdxParseError> {
    parser.parse(text).inspect_err(|err| {
        tracing::debug!(error = %err, bytes = text.len(), "MDX parse failed");
    })
}

/// Render an outcome as the response body text.
#[must_use]
pub fn outcome_message(outcome: &Result<(), MdxParseError>) -> String {
    match outcome {
        Ok(()) => MDX_SUCCESS_MESSAGE.to_owned(),
        Err(err) => format!("{MDX_FAILURE_PREFIX}{err}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mdx() {
        assert!(validate_mdx(&MarkdownRsParser, "# Valid\n\nSome *text*.").is_ok());
    }

    #[test]
    fn test_valid_mdx_with_component() {
        let text = "# Title\n\n<Note kind=\"info\">\n  Hello\n</Note>\n";
        assert!(validate_mdx(&MarkdownRsParser, text).is_ok());
    }

    #[test]
    fn test_unclosed_tag_fails() {
        let err = validate_mdx(&MarkdownRsParser, "<Unclosed").unwrap_err();
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_unclosed_tag_reports_position() {
        for text in ["<Unclosed", "<Unclosed\n"] {
            let err = MarkdownRsParser.parse(text).unwrap_err();
            assert!(err.message().starts_with("1:1: "), "{text:?}: {err}");
        }
        assert!(MarkdownRsParser.parse("# Title\n\nSee <Widget").is_err());
    }

    #[test]
    fn test_code_and_entities_pass() {
        for text in ["`<Inline>` code\n", "```\n<Block\n```\n", "Compare 1 &lt; 2\n"] {
            assert!(MarkdownRsParser.parse(text).is_ok(), "{text:?}");
        }
    }

    #[test]
    fn test_jsx_opener() {
        assert_eq!(jsx_opener("x <Y"), Some(2));
        assert_eq!(jsx_opener("</"), Some(0));
        assert_eq!(jsx_opener("<>"), Some(0));
        assert_eq!(jsx_opener("1 < 2"), None);
        assert_eq!(jsx_opener("\\<a"), None);
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("ab\ncd<", 5), (2, 3));
        assert_eq!(line_column("<", 0), (1, 1));
    }

    #[test]
    fn test_outcome_message() {
        assert_eq!(outcome_message(&Ok(())), "Successfully parsed mdx");
        let failure = outcome_message(&Err(MdxParseError::new("1:10: unexpected end of file")));
        assert_eq!(failure, "MDX parse failure: 1:10: unexpected end of file");
    }
}
