//! stylint core library.
//!
//! Lints style sheets written in CSS, SCSS, Less or SugarSS with a single
//! rule set. Each input is parsed by the adapter for its dialect (explicit
//! `syntax` first, then file extension, then CSS), checked by every enabled
//! rule, and folded into one ordered `LintReport`.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Rule configuration, discovery and loading.
//! - `error`: Request, input, rule and formatter error types.
//! - `input`: Code or glob patterns into resolved inputs.
//! - `lint`: Request validation and the per-input pipeline.
//! - `models`: Report data and the parsed syntax tree.
//! - `output`: JSON/string formatters.
//! - `rules`: Rule trait, registry and built-in rules.
//! - `syntax`: Dialect resolution and parsers.
//! - `utils`: Terminal helpers.
//!
//! ```no_run
//! use stylint::{lint, Config, LintOptions};
//! use stylint::config::RuleConfig;
//!
//! let rules = RuleConfig::new().rule("block-no-empty", serde_json::json!(true));
//! let out = lint(LintOptions::new(Config::new(rules)).code("a {}")).unwrap();
//! assert!(out.results.errored);
//! ```
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod lint;
pub mod models;
pub mod output;
pub mod rules;
pub mod syntax;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, FormatterError, InputFault, LintError, ParseError, RuleFault};
pub use lint::{lint, LintOptions, Linter};
pub use models::LintReport;
pub use output::{Formatter, LintOutput};
pub use rules::RuleRegistry;
pub use syntax::Dialect;
