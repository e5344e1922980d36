use super::{Reporter, Rule, RuleContext};
use crate::error::RuleFault;
use crate::models::tree::{Node, Root};

/// Disallow empty `/* */` comments. `//` comments are left alone.
pub struct CommentNoEmpty;

impl Rule for CommentNoEmpty {
    fn name(&self) -> &'static str {
        "comment-no-empty"
    }

    fn description(&self) -> &'static str {
        "Disallow empty comments"
    }

    fn check(&self, root: &Root, _ctx: &RuleContext<'_>, report: &mut Reporter<'_>) -> Result<(), RuleFault> {
        root.walk(&mut |node| {
            if let Node::Comment(c) = node {
                if !c.inline && c.text.trim().is_empty() {
                    report.report(c.start, "Unexpected empty comment");
                }
            }
        });
        Ok(())
    }
}
