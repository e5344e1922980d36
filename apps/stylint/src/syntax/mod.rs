//! Dialect adapters and dialect resolution.
//!
//! Each dialect maps to one `SyntaxAdapter`. Brace-based dialects share the
//! parser in `block`, parameterized by a `Flavor`; SugarSS has its own
//! indentation parser. Adapters are stateless `'static` values, so they can
//! be shared across worker threads without synchronization.

mod block;
mod sugarss;

use crate::error::{ConfigError, ParseError};
use crate::models::tree::Root;
use block::{BlockSyntax, Flavor};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use sugarss::IndentSyntax;

/// A concrete style-sheet grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Css,
    Scss,
    Less,
    Sugarss,
}

/// Fixed extension table used when no explicit syntax is requested.
/// Anything not listed here is parsed as plain CSS.
pub const EXTENSIONS: &[(&str, Dialect)] = &[
    ("scss", Dialect::Scss),
    ("less", Dialect::Less),
    ("sss", Dialect::Sugarss),
];

/// Deepest block nesting an adapter accepts; deeper input is a parse error.
pub const MAX_NESTING: usize = 128;

/// Parses text of one dialect into a syntax tree.
pub trait SyntaxAdapter: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn parse(&self, text: &str) -> Result<Root, ParseError>;
}

static CSS: BlockSyntax = BlockSyntax::new(Dialect::Css, Flavor::CSS);
static SCSS: BlockSyntax = BlockSyntax::new(Dialect::Scss, Flavor::SCSS);
static LESS: BlockSyntax = BlockSyntax::new(Dialect::Less, Flavor::LESS);
static SUGARSS: IndentSyntax = IndentSyntax;

impl Dialect {
    pub const ALL: [Dialect; 4] = [Dialect::Css, Dialect::Scss, Dialect::Less, Dialect::Sugarss];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Css => "css",
            Dialect::Scss => "scss",
            Dialect::Less => "less",
            Dialect::Sugarss => "sugarss",
        }
    }

    pub fn adapter(self) -> &'static dyn SyntaxAdapter {
        match self {
            Dialect::Css => &CSS,
            Dialect::Scss => &SCSS,
            Dialect::Less => &LESS,
            Dialect::Sugarss => &SUGARSS,
        }
    }

    /// Dialect implied by a path's extension, if it is in `EXTENSIONS`.
    pub fn from_extension(path: &Path) -> Option<Dialect> {
        let ext = path.extension()?.to_str()?;
        EXTENSIONS
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, d)| *d)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownDialect(s.to_string()))
    }
}

/// Pick the dialect for one input.
///
/// An explicit hint wins unconditionally; otherwise the extension of
/// `source` is looked up in `EXTENSIONS`; otherwise plain CSS.
pub fn resolve(hint: Option<&str>, source: Option<&Path>) -> Result<Dialect, ConfigError> {
    if let Some(h) = hint {
        return h.parse();
    }
    Ok(source
        .and_then(Dialect::from_extension)
        .unwrap_or(Dialect::Css))
}
