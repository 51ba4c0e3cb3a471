//! Error types for grammar compilation and argv matching.
//!
//! Two persistent failure kinds reach callers:
//!
//! - [`DocoptError::Grammar`]: the usage document itself is malformed (the
//!   developer wrote something wrong).
//! - [`DocoptError::Argument`]: the user's argv does not satisfy the grammar.
//!
//! Option resolution raises the narrower [`OptionError`], which the two
//! parse passes convert into one of the above: an ambiguous prefix in the
//! usage text is a grammar defect, the same condition in argv is a user error.

use thiserror::Error;

/// Errors surfaced by [`parse`](crate::parse) and [`build_pattern_tree`](crate::build_pattern_tree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocoptError {
    /// The usage document could not be compiled.
    #[error("usage grammar error: {0}")]
    Grammar(String),

    /// The argument vector did not match the usage grammar.
    #[error("argument error: {0}")]
    Argument(String),
}

impl DocoptError {
    pub fn is_grammar(&self) -> bool {
        matches!(self, DocoptError::Grammar(_))
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, DocoptError::Argument(_))
    }

    /// The bare message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            DocoptError::Grammar(msg) | DocoptError::Argument(msg) => msg,
        }
    }
}

/// Failure while resolving a `--long` or `-s` token against the option registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("'{prefix}' is not a unique prefix: {candidates}")]
    AmbiguousPrefix { prefix: String, candidates: String },

    #[error("{option} is specified ambiguously {count} times")]
    AmbiguousShort { option: String, count: usize },

    #[error("{0} requires an argument")]
    MissingArgument(String),

    #[error("{0} must not have an argument")]
    UnexpectedArgument(String),
}

impl OptionError {
    pub(crate) fn into_grammar(self) -> DocoptError {
        DocoptError::Grammar(self.to_string())
    }

    pub(crate) fn into_argument(self) -> DocoptError {
        DocoptError::Argument(self.to_string())
    }
}

/// Errors loading a [`ParseConfig`](crate::ParseConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`DocoptError`].
pub type Result<T> = std::result::Result<T, DocoptError>;
