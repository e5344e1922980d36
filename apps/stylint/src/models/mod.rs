//! Shared data models for lint results and the parsed syntax tree.

pub mod tree;

use crate::error::InputFault;
use crate::syntax::Dialect;
use serde::{Deserialize, Serialize};

/// A 1-based source position. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position reached after walking over `text` starting here.
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        for ch in text.chars() {
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

/// Severity attached to a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    #[default]
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single rule violation with its position inside one input.
pub struct Violation {
    pub rule: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Which adapter produced the tree an `InputResult` was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseArtifact {
    pub dialect: Dialect,
    pub nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Lint outcome for one concrete input: violations or a fatal error.
pub struct InputResult {
    pub source: String,
    pub dialect: Dialect,
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<InputFault>,
    #[serde(skip)]
    pub artifact: Option<ParseArtifact>,
}

impl InputResult {
    /// Result for an input that parsed; `violations` must already be sorted.
    pub fn linted(
        source: impl Into<String>,
        dialect: Dialect,
        violations: Vec<Violation>,
        artifact: ParseArtifact,
    ) -> Self {
        Self {
            source: source.into(),
            dialect,
            violations,
            error: None,
            artifact: Some(artifact),
        }
    }

    /// Result for an input that could not be read or parsed.
    pub fn failed(source: impl Into<String>, dialect: Dialect, error: InputFault) -> Self {
        Self {
            source: source.into(),
            dialect,
            violations: Vec::new(),
            error: Some(error),
            artifact: None,
        }
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
            || self
                .violations
                .iter()
                .any(|v| v.severity == Severity::Error)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub fatal: usize,
    pub inputs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Ordered per-input results plus the roll-up status of the batch.
pub struct LintReport {
    pub results: Vec<InputResult>,
    pub errored: bool,
    pub summary: Summary,
}

impl LintReport {
    /// Fold per-input results into a report, keeping their order.
    pub fn aggregate(results: Vec<InputResult>) -> Self {
        let mut summary = Summary {
            inputs: results.len(),
            ..Summary::default()
        };
        for r in &results {
            if r.error.is_some() {
                summary.fatal += 1;
            }
            for v in &r.violations {
                match v.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                }
            }
        }
        let errored = results.iter().any(InputResult::is_errored);
        Self {
            results,
            errored,
            summary,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Look up the result for a given source identifier.
    pub fn get(&self, source: &str) -> Option<&InputResult> {
        self.results.iter().find(|r| r.source == source)
    }
}
