//! Rule trait, reporting contract and the rule registry.

mod block_no_empty;
mod color_no_invalid_hex;
mod comment_no_empty;
mod declaration_block_no_duplicate_properties;
mod length_zero_no_unit;

#[cfg(test)]
pub(crate) mod testing;

use crate::error::RuleFault;
use crate::models::tree::Root;
use crate::models::{Position, Severity, Violation};
use crate::syntax::Dialect;
use serde::Serialize;
use serde_json::Value as Json;

/// Per-invocation inputs a rule may consult besides the tree.
pub struct RuleContext<'a> {
    /// Primary option as configured (`true` for all built-in rules).
    pub primary: &'a Json,
    /// Dialect the tree was parsed with.
    pub dialect: Dialect,
}

/// A named check over a parsed style sheet.
pub trait Rule: Send + Sync {
    /// Unique identifier (e.g., "block-no-empty").
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Validate the configured primary option before any input is linted.
    fn validate_options(&self, primary: &Json) -> Result<(), String> {
        match primary {
            Json::Bool(true) => Ok(()),
            other => Err(format!("expected `true`, got `{other}`")),
        }
    }

    /// Run the check, reporting problems through `report`.
    ///
    /// An `Err` means the rule itself failed; it is recorded as a single
    /// violation attributed to this rule.
    fn check(&self, root: &Root, ctx: &RuleContext<'_>, report: &mut Reporter<'_>)
        -> Result<(), RuleFault>;
}

/// Collects violations for one rule, tagging each with the rule name and
/// the configured severity.
pub struct Reporter<'a> {
    rule: &'a str,
    severity: Severity,
    custom_message: Option<&'a str>,
    out: &'a mut Vec<Violation>,
}

impl<'a> Reporter<'a> {
    pub fn new(
        rule: &'a str,
        severity: Severity,
        custom_message: Option<&'a str>,
        out: &'a mut Vec<Violation>,
    ) -> Self {
        Self {
            rule,
            severity,
            custom_message,
            out,
        }
    }

    pub fn report(&mut self, at: Position, message: impl AsRef<str>) {
        let text = self.custom_message.unwrap_or(message.as_ref());
        self.out.push(Violation {
            rule: self.rule.to_string(),
            line: at.line,
            column: at.column,
            message: format!("{} ({})", text, self.rule),
            severity: self.severity,
        });
    }
}

/// Registry of available rules, looked up by name.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a registry with all built-in rules registered.
    pub fn default_rules() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(block_no_empty::BlockNoEmpty));
        registry.register(Box::new(color_no_invalid_hex::ColorNoInvalidHex));
        registry.register(Box::new(comment_no_empty::CommentNoEmpty));
        registry.register(Box::new(
            declaration_block_no_duplicate_properties::DeclarationBlockNoDuplicateProperties,
        ));
        registry.register(Box::new(length_zero_no_unit::LengthZeroNoUnit));
        registry
    }

    /// Registers a rule. A later rule with the same name shadows an earlier one.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.retain(|r| r.name() != rule.name());
        self.rules.push(rule);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.name() == name).map(|r| r.as_ref())
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Returns rule metadata for documentation/introspection.
    pub fn rule_metadata(&self) -> Vec<RuleMetadata> {
        self.rules
            .iter()
            .map(|r| RuleMetadata {
                name: r.name().to_string(),
                description: r.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::default_rules()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleMetadata {
    pub name: String,
    pub description: String,
}

/// A word inside a declaration value, with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Split a value into words, skipping quoted strings and the arguments of
/// the functions named in `skip` (case-insensitive).
pub(crate) fn value_words<'a>(value: &'a str, skip: &[&str]) -> Vec<Word<'a>> {
    let mut words = Vec::new();
    let mut functions: Vec<&str> = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let skipping = |functions: &[&str]| {
        functions
            .iter()
            .any(|f| skip.iter().any(|s| s.eq_ignore_ascii_case(f)))
    };

    for (i, c) in value.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        let separator = c.is_whitespace() || matches!(c, ',' | '/' | '(' | ')' | '"' | '\'');
        if !separator {
            start.get_or_insert(i);
            continue;
        }
        let word = start.take().map(|s| Word {
            offset: s,
            text: &value[s..i],
        });
        match c {
            '(' => functions.push(word.map_or("", |w| w.text)),
            ')' => {
                if let Some(w) = word.filter(|_| !skipping(&functions)) {
                    words.push(w);
                }
                functions.pop();
                continue;
            }
            '"' | '\'' => quote = Some(c),
            _ => {}
        }
        if c != '(' {
            if let Some(w) = word.filter(|_| !skipping(&functions)) {
                words.push(w);
            }
        }
    }
    if let Some(s) = start {
        if !skipping(&functions) {
            words.push(Word {
                offset: s,
                text: &value[s..],
            });
        }
    }
    words
}
