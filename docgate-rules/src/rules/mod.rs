//! Rule registry.
//!
//! Every rule is described by a static [`RuleDescriptor`] (id, alias, description,
//! whether it can emit fixes) and is instantiated from its configured
//! parameters when a [`crate::LintConfig`] is built.

mod blocks;
mod headings;
mod whitespace;

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};

use crate::document::MarkdownDocument;
use crate::error::RuleConfigError;
use crate::finding::FixInfo;

pub use blocks::{FencedCodeLanguage, LineLength};
pub use headings::{
    HeadingIncrement, HeadingStartLeft, NoMissingSpaceAtx, NoMultipleSpaceAtx,
    NoTrailingPunctuation, SingleH1,
};
pub use whitespace::{NoHardTabs, NoMultipleBlanks, NoTrailingSpaces, SingleTrailingNewline};

/// A configured rule instance.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Report violations in `doc`, in line order.
    fn check(&self, doc: &MarkdownDocument<'_>) -> Vec<Violation>;
}

/// A violation as reported by a rule, before the engine attaches rule metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub line_number: usize,
    pub detail: Option<String>,
    pub context: Option<String>,
    pub range: Option<(usize, usize)>,
    pub fix: Option<FixInfo>,
}

impl Violation {
    #[must_use]
    pub fn at(line_number: usize) -> Self {
        Self {
            line_number,
            detail: None,
            context: None,
            range: None,
            fix: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, column: usize, length: usize) -> Self {
        self.range = Some((column, length));
        self
    }

    #[must_use]
    pub fn with_fix(mut self, fix: FixInfo) -> Self {
        self.fix = Some(fix);
        self
    }
}

type BuildFn = fn(Map<String, Value>) -> Result<Box<dyn Rule>, serde_json::Error>;

/// Static description of a registered rule.
#[derive(Debug)]
pub struct RuleDescriptor {
    pub id: &'static str,
    pub alias: &'static str,
    pub description: &'static str,
    /// Whether the rule can attach [`FixInfo`] to its findings.
    pub fixable: bool,
    build: BuildFn,
}

impl RuleDescriptor {
    /// Whether `name` refers to this rule by id or alias (case-insensitive).
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name) || self.alias.eq_ignore_ascii_case(name)
    }

    /// Instantiate the rule from its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidOptions`] if the parameters do not
    /// match the rule's options.
    pub fn build(&self, params: Map<String, Value>) -> Result<Box<dyn Rule>, RuleConfigError> {
        (self.build)(params).map_err(|source| RuleConfigError::InvalidOptions {
            id: self.id,
            source,
        })
    }
}

/// Rules whose options deserialize straight into the rule value.
fn configured<R>(params: Map<String, Value>) -> Result<Box<dyn Rule>, serde_json::Error>
where
    R: Rule + DeserializeOwned + 'static,
{
    let rule: R = serde_json::from_value(Value::Object(params))?;
    Ok(Box::new(rule))
}

/// Rules without options; any parameter is rejected.
fn plain<R>(params: Map<String, Value>) -> Result<Box<dyn Rule>, serde_json::Error>
where
    R: Rule + Default + 'static,
{
    if let Some(key) = params.keys().next() {
        return Err(serde_json::Error::custom(format!("unknown option `{key}`")));
    }
    Ok(Box::new(R::default()))
}

/// All built-in rules, in evaluation order.
pub static RULES: &[RuleDescriptor] = &[
    RuleDescriptor {
        id: "MD001",
        alias: "heading-increment",
        description: "Heading levels should only increment by one level at a time",
        fixable: false,
        build: plain::<HeadingIncrement>,
    },
    RuleDescriptor {
        id: "MD009",
        alias: "no-trailing-spaces",
        description: "Trailing spaces",
        fixable: true,
        build: configured::<NoTrailingSpaces>,
    },
    RuleDescriptor {
        id: "MD010",
        alias: "no-hard-tabs",
        description: "Hard tabs",
        fixable: true,
        build: configured::<NoHardTabs>,
    },
    RuleDescriptor {
        id: "MD012",
        alias: "no-multiple-blanks",
        description: "Multiple consecutive blank lines",
        fixable: true,
        build: configured::<NoMultipleBlanks>,
    },
    RuleDescriptor {
        id: "MD013",
        alias: "line-length",
        description: "Line length",
        fixable: false,
        build: configured::<LineLength>,
    },
    RuleDescriptor {
        id: "MD018",
        alias: "no-missing-space-atx",
        description: "No space after hash on atx style heading",
        fixable: true,
        build: plain::<NoMissingSpaceAtx>,
    },
    RuleDescriptor {
        id: "MD019",
        alias: "no-multiple-space-atx",
        description: "Multiple spaces after hash on atx style heading",
        fixable: true,
        build: plain::<NoMultipleSpaceAtx>,
    },
    RuleDescriptor {
        id: "MD023",
        alias: "heading-start-left",
        description: "Headings must start at the beginning of the line",
        fixable: true,
        build: plain::<HeadingStartLeft>,
    },
    RuleDescriptor {
        id: "MD025",
        alias: "single-h1",
        description: "Multiple top-level headings in the same document",
        fixable: false,
        build: configured::<SingleH1>,
    },
    RuleDescriptor {
        id: "MD026",
        alias: "no-trailing-punctuation",
        description: "Trailing punctuation in heading",
        fixable: true,
        build: configured::<NoTrailingPunctuation>,
    },
    RuleDescriptor {
        id: "MD040",
        alias: "fenced-code-language",
        description: "Fenced code blocks should have a language specified",
        fixable: false,
        build: plain::<FencedCodeLanguage>,
    },
    RuleDescriptor {
        id: "MD047",
        alias: "single-trailing-newline",
        description: "Files should end with a single newline character",
        fixable: true,
        build: plain::<SingleTrailingNewline>,
    },
];

/// Find a rule by id or alias.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static RuleDescriptor> {
    RULES.iter().find(|descriptor| descriptor.matches(name))
}
