//! Error taxonomy.
//!
//! Request-level problems (`ConfigError`) and broken formatters
//! (`FormatterError`) escape from [`crate::lint`] as a `LintError`.
//! Everything scoped to a single input (`InputFault`, `RuleFault`) is
//! recovered locally and becomes data inside the report.

use serde::Serialize;
use std::path::PathBuf;

/// Error returned by a dialect adapter for malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} ({line}:{column})")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn at(pos: crate::models::Position, message: impl Into<String>) -> Self {
        Self::new(pos.line, pos.column, message)
    }
}

/// Fatal, input-scoped failure recorded on an `InputResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputFault {
    #[error("failed to read input: {message}")]
    Io { message: String },
    #[error("failed to parse input: {0}")]
    Parse(ParseError),
}

impl InputFault {
    pub fn io(err: &std::io::Error) -> Self {
        InputFault::Io {
            message: err.to_string(),
        }
    }
}

/// A rule implementation misbehaved while checking a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RuleFault(pub String);

/// Invalid or contradictory request; aborts the whole call.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no input given: pass either `code` or `files`")]
    MissingInput,
    #[error("`code` and `files` are mutually exclusive")]
    ConflictingInput,
    #[error("unknown syntax \"{0}\" (expected one of: css, scss, less, sugarss)")]
    UnknownDialect(String),
    #[error("unknown rule \"{0}\"")]
    UnknownRule(String),
    #[error("invalid option for rule \"{rule}\": {reason}")]
    InvalidRuleOption { rule: String, reason: String },
    #[error("invalid setting for rule \"{rule}\": {reason}")]
    InvalidRuleSetting { rule: String, reason: String },
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    InvalidGlob {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("no files matching the pattern(s): {}", .0.join(", "))]
    NoFilesMatched(Vec<String>),
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Failure produced by a formatter; surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("formatter failed: {0}")]
    Custom(String),
}

/// Everything that can escape from a lint call.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Formatter(#[from] FormatterError),
}
