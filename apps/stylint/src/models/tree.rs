//! Syntax tree produced by the dialect adapters.
//!
//! The tree has four node kinds: rules, at-rules, declarations and
//! comments. Rule and at-rule nodes own an optional `Block`; a missing block
//! means the statement had no body at all (e.g. `@import "a";` or a Less
//! mixin call), which is different from an empty one.

use super::Position;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Root {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(RuleNode),
    AtRule(AtRuleNode),
    Declaration(Declaration),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Position of the block opener (`{`, or the end of the selector line
    /// for indentation-based syntax).
    pub open: Position,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    pub selector: String,
    pub start: Position,
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRuleNode {
    pub name: String,
    pub params: String,
    pub start: Position,
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    /// Raw value with surrounding whitespace and `!important` removed.
    pub value: String,
    pub important: bool,
    pub start: Position,
    pub value_start: Position,
}

impl Declaration {
    /// Source position of the byte offset `offset` inside `value`.
    pub fn value_position(&self, offset: usize) -> Position {
        let end = offset.min(self.value.len());
        match self.value.get(..end) {
            Some(prefix) => self.value_start.advance(prefix),
            None => self.value_start,
        }
    }

    /// Sass `$var` and Less `@var` declarations. An interpolated Less
    /// property (`@{name}-x`) is a regular property.
    pub fn is_variable(&self) -> bool {
        self.prop.starts_with('$') || (self.prop.starts_with('@') && !self.prop.starts_with("@{"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment body without delimiters.
    pub text: String,
    pub start: Position,
    /// `//` comment (SCSS, Less, SugarSS).
    pub inline: bool,
}

impl Node {
    pub fn start(&self) -> Position {
        match self {
            Node::Rule(r) => r.start,
            Node::AtRule(a) => a.start,
            Node::Declaration(d) => d.start,
            Node::Comment(c) => c.start,
        }
    }

    pub fn block(&self) -> Option<&Block> {
        match self {
            Node::Rule(r) => r.block.as_ref(),
            Node::AtRule(a) => a.block.as_ref(),
            _ => None,
        }
    }
}

impl Root {
    /// Depth-first, pre-order traversal of every node.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        walk_nodes(&self.nodes, f);
    }

    /// Visit the root node list and every block's node list.
    pub fn walk_containers<'a>(&'a self, f: &mut dyn FnMut(&'a [Node])) {
        f(&self.nodes);
        self.walk(&mut |node| {
            if let Some(block) = node.block() {
                f(&block.nodes);
            }
        });
    }

    pub fn walk_decls<'a>(&'a self, f: &mut dyn FnMut(&'a Declaration)) {
        self.walk(&mut |node| {
            if let Node::Declaration(d) = node {
                f(d);
            }
        });
    }

    pub fn node_count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_| n += 1);
        n
    }
}

fn walk_nodes<'a>(nodes: &'a [Node], f: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        if let Some(block) = node.block() {
            walk_nodes(&block.nodes, f);
        }
    }
}
