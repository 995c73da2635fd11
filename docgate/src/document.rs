//! Request-scoped inputs: the submitted document and the lint options.

/// Document key used when the caller does not name the document.
pub const DEFAULT_FILENAME: &str = "readme";

/// Submitted text plus its identifier. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    text: String,
}

impl Document {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Options of a lint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
    /// Document key (default: `readme`).
    pub filename: String,
    /// Apply mechanical fixes and re-lint (default: `false`).
    pub fix: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_owned(),
            fix: false,
        }
    }
}

impl LintOptions {
    /// Build options from decoded query pairs.
    ///
    /// Never fails: a missing or blank `filename` falls back to `readme`, and
    /// `fix` is only enabled by a case-insensitive `true`. Unknown keys are
    /// ignored. When a key repeats, the last value wins.
    #[must_use]
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key {
                "filename" => {
                    let value = value.trim();
                    let name = if value.is_empty() { DEFAULT_FILENAME } else { value };
                    name.clone_into(&mut options.filename);
                }
                "fix" => options.fix = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
        options
    }

    /// Attach the options' document key to `text`.
    #[must_use]
    pub fn document(&self, text: impl Into<String>) -> Document {
        Document::new(self.filename.clone(), text)
    }
}
