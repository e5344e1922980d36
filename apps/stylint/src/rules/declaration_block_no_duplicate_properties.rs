use super::{Reporter, Rule, RuleContext};
use crate::error::RuleFault;
use crate::models::tree::{Node, Root};
use std::collections::HashSet;

/// Disallow the same property twice within one block. Sass and Less
/// variables are not properties and may be reassigned.
pub struct DeclarationBlockNoDuplicateProperties;

impl Rule for DeclarationBlockNoDuplicateProperties {
    fn name(&self) -> &'static str {
        "declaration-block-no-duplicate-properties"
    }

    fn description(&self) -> &'static str {
        "Disallow duplicate properties within declaration blocks"
    }

    fn check(&self, root: &Root, _ctx: &RuleContext<'_>, report: &mut Reporter<'_>) -> Result<(), RuleFault> {
        root.walk_containers(&mut |nodes| {
            let mut seen: HashSet<String> = HashSet::new();
            for node in nodes {
                let Node::Declaration(decl) = node else {
                    continue;
                };
                if decl.is_variable() {
                    continue;
                }
                if !seen.insert(decl.prop.to_ascii_lowercase()) {
                    report.report(decl.start, format!("Unexpected duplicate \"{}\"", decl.prop));
                }
            }
        });
        Ok(())
    }
}
