use super::{Reporter, Rule, RuleContext};
use crate::models::Severity;
use crate::syntax::Dialect;
use serde_json::Value as Json;

/// Parse `text` and return the `(line, column)` of every violation.
pub fn check(rule: &dyn Rule, dialect: Dialect, text: &str) -> Vec<(usize, usize)> {
    let root = dialect.adapter().parse(text).expect("fixture should parse");
    let primary = Json::Bool(true);
    let ctx = RuleContext {
        primary: &primary,
        dialect,
    };
    let mut out = Vec::new();
    let mut reporter = Reporter::new(rule.name(), Severity::Error, None, &mut out);
    rule.check(&root, &ctx, &mut reporter).expect("rule should not fail");
    out.into_iter().map(|v| (v.line, v.column)).collect()
}
