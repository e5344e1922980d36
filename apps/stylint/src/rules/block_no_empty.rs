use super::{Reporter, Rule, RuleContext};
use crate::error::RuleFault;
use crate::models::tree::Root;

/// Disallow empty blocks. A block holding only comments is not empty.
pub struct BlockNoEmpty;

impl Rule for BlockNoEmpty {
    fn name(&self) -> &'static str {
        "block-no-empty"
    }

    fn description(&self) -> &'static str {
        "Disallow empty blocks"
    }

    fn check(&self, root: &Root, _ctx: &RuleContext<'_>, report: &mut Reporter<'_>) -> Result<(), RuleFault> {
        root.walk(&mut |node| {
            if let Some(block) = node.block() {
                if block.nodes.is_empty() {
                    report.report(block.open, "Unexpected empty block");
                }
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::check;
    use crate::syntax::Dialect;

    #[test]
    fn test_reports_at_block_opener() {
        let found = check(&BlockNoEmpty, Dialect::Css, "a { color: red; }\nb {}\n@media print {\n}");
        assert_eq!(found, vec![(2, 3), (3, 14)]);
    }

    #[test]
    fn test_comment_only_block_is_not_empty() {
        assert!(check(&BlockNoEmpty, Dialect::Css, "a { /* todo */ }").is_empty());
    }

    #[test]
    fn test_at_rule_without_block_is_ignored() {
        assert!(check(&BlockNoEmpty, Dialect::Css, "@import \"x.css\";").is_empty());
        assert!(check(&BlockNoEmpty, Dialect::Less, ".a { .mixin(); }").is_empty());
    }
}
