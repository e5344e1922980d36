//! Indentation-based parser for SugarSS.
//!
//! Every non-blank line is one statement. Nesting comes from indentation:
//! lines indented deeper than a rule belong to its block, lines indented
//! deeper than a declaration continue its value.

use super::block::split_important;
use super::{Dialect, SyntaxAdapter, MAX_NESTING};
use crate::error::ParseError;
use crate::models::tree::{AtRuleNode, Block, Comment, Declaration, Node, Root, RuleNode};
use crate::models::Position;

pub(crate) struct IndentSyntax;

impl SyntaxAdapter for IndentSyntax {
    fn dialect(&self) -> Dialect {
        Dialect::Sugarss
    }

    fn parse(&self, text: &str) -> Result<Root, ParseError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let items = scan(text)?;
        let mut builder = Builder {
            items,
            idx: 0,
            depth: 0,
        };
        let nodes = builder.level(0)?;
        Ok(Root { nodes })
    }
}

enum Kind {
    Comment { text: String, inline: bool },
    Decl(Declaration),
    Rule { selector: String, end: Position },
    AtRule { name: String, params: String },
}

struct Item<'a> {
    indent: usize,
    start: Position,
    /// Whole source line, used to extend multi-line values.
    raw: &'a str,
    kind: Kind,
}

/// Split the text into classified lines, joining multi-line comments.
fn scan(text: &str) -> Result<Vec<Item<'_>>, ParseError> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let mut items = Vec::new();
    let mut indent_char: Option<char> = None;
    let mut i = 0;
    while i < lines.len() {
        let raw = lines[i];
        let number = i + 1;
        i += 1;
        let indent = raw.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        let content = raw[indent..].trim_end();
        if content.is_empty() {
            continue;
        }
        for c in raw.chars().take(indent) {
            match indent_char {
                None => indent_char = Some(c),
                Some(seen) if seen != c => {
                    return Err(ParseError::new(
                        number,
                        1,
                        "Mixed tabs and spaces are not allowed",
                    ));
                }
                Some(_) => {}
            }
        }
        let start = Position::new(number, indent + 1);

        let kind = if let Some(rest) = content.strip_prefix("//") {
            Kind::Comment {
                text: rest.trim().to_string(),
                inline: true,
            }
        } else if let Some(rest) = content.strip_prefix("/*") {
            let mut body = String::new();
            let mut tail = rest;
            loop {
                if let Some(end) = tail.find("*/") {
                    body.push_str(&tail[..end]);
                    break;
                }
                body.push_str(tail);
                body.push('\n');
                match lines.get(i) {
                    Some(next) => {
                        tail = next;
                        i += 1;
                    }
                    None => return Err(ParseError::at(start, "Unclosed comment")),
                }
            }
            Kind::Comment {
                text: body.trim().to_string(),
                inline: false,
            }
        } else if let Some(rest) = content.strip_prefix('@') {
            let name_len = rest
                .find(|c: char| c.is_whitespace() || c == '(')
                .unwrap_or(rest.len());
            Kind::AtRule {
                name: rest[..name_len].to_string(),
                params: rest[name_len..].trim().to_string(),
            }
        } else if let Some(decl) = declaration(content, start) {
            Kind::Decl(decl)
        } else {
            Kind::Rule {
                selector: content.to_string(),
                end: Position::new(number, indent + 1 + content.chars().count()),
            }
        };
        items.push(Item {
            indent,
            start,
            raw,
            kind,
        });
    }
    Ok(items)
}

/// `prop: value` where the colon is followed by whitespace or ends the line.
fn declaration(content: &str, start: Position) -> Option<Declaration> {
    let colon = content.char_indices().find_map(|(i, c)| {
        if c != ':' {
            return None;
        }
        let after = content[i + 1..].chars().next();
        after.map_or(true, char::is_whitespace).then_some(i)
    })?;
    let prop = content[..colon].trim();
    if prop.is_empty() || prop.contains(char::is_whitespace) {
        return None;
    }
    let rest = &content[colon + 1..];
    let lead = rest.len() - rest.trim_start().len();
    let value_start = start.advance(&content[..colon + 1 + lead]);
    let (value, important) = split_important(rest.trim());
    Some(Declaration {
        prop: prop.to_string(),
        value,
        important,
        start,
        value_start,
    })
}

struct Builder<'a> {
    items: Vec<Item<'a>>,
    idx: usize,
    /// Number of blocks currently open.
    depth: usize,
}

impl Builder<'_> {
    fn child_indent(&self, parent: usize) -> Option<usize> {
        self.items
            .get(self.idx)
            .filter(|next| next.indent > parent)
            .map(|next| next.indent)
    }

    /// Parse the children of the statement at `at`, indented to `indent`.
    fn nested(&mut self, indent: usize, at: Position) -> Result<Vec<Node>, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::at(at, "Nesting too deep"));
        }
        self.depth += 1;
        let nodes = self.level(indent);
        self.depth -= 1;
        nodes
    }

    fn level(&mut self, indent: usize) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        while let Some(item) = self.items.get(self.idx) {
            if item.indent < indent {
                break;
            }
            if item.indent > indent {
                return Err(ParseError::new(item.start.line, 1, "Unexpected indentation"));
            }
            let own = item.indent;
            let start = item.start;
            self.idx += 1;
            let child = self.child_indent(own);
            let kind = std::mem::replace(
                &mut self.items[self.idx - 1].kind,
                Kind::Comment {
                    text: String::new(),
                    inline: true,
                },
            );
            let node = match kind {
                Kind::Comment { text, inline } => {
                    if let Some(next) = child.and_then(|_| self.items.get(self.idx)) {
                        return Err(ParseError::new(next.start.line, 1, "Unexpected indentation"));
                    }
                    Node::Comment(Comment {
                        text,
                        start,
                        inline,
                    })
                }
                Kind::Decl(mut decl) => {
                    while let Some(next) = self.items.get(self.idx).filter(|n| n.indent > own) {
                        decl.value.push('\n');
                        decl.value.push_str(next.raw.trim_end());
                        self.idx += 1;
                    }
                    Node::Declaration(decl)
                }
                Kind::Rule { selector, end } => {
                    let nodes = match child {
                        Some(ci) => self.nested(ci, start)?,
                        None => Vec::new(),
                    };
                    Node::Rule(RuleNode {
                        selector,
                        start,
                        block: Some(Block { open: end, nodes }),
                    })
                }
                Kind::AtRule { name, params } => {
                    let block = match child {
                        Some(ci) => Some(Block {
                            open: start,
                            nodes: self.nested(ci, start)?,
                        }),
                        None => None,
                    };
                    Node::AtRule(AtRuleNode {
                        name,
                        params,
                        start,
                        block,
                    })
                }
            };
            nodes.push(node);
        }
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Root, ParseError> {
        IndentSyntax.parse(text)
    }

    #[test]
    fn test_rules_and_declarations() {
        let root = parse(".one\n  color: black\n  top: 0px\n.two").unwrap();
        assert_eq!(root.nodes.len(), 2);
        let Node::Rule(one) = &root.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(one.selector, ".one");
        let block = one.block.as_ref().unwrap();
        assert_eq!(block.nodes.len(), 2);
        let Node::Declaration(top) = &block.nodes[1] else {
            panic!("expected declaration");
        };
        assert_eq!(top.prop, "top");
        assert_eq!(top.value, "0px");
        assert_eq!(top.start, Position::new(3, 3));
        assert_eq!(top.value_start, Position::new(3, 8));
        let Node::Rule(two) = &root.nodes[1] else {
            panic!("expected rule");
        };
        assert!(two.block.as_ref().unwrap().nodes.is_empty());
    }

    #[test]
    fn test_pseudo_selector_is_not_a_declaration() {
        let root = parse("a:hover\n  color: red").unwrap();
        assert!(matches!(&root.nodes[0], Node::Rule(r) if r.selector == "a:hover"));
    }

    #[test]
    fn test_multiline_value_continues() {
        let root = parse("a\n  margin: 0\n    1px").unwrap();
        let mut decls = Vec::new();
        root.walk_decls(&mut |d| decls.push(d.clone()));
        assert_eq!(decls[0].value, "0\n    1px");
        let unit = decls[0].value.find("px").unwrap();
        assert_eq!(decls[0].value_position(unit), Position::new(3, 6));
    }

    #[test]
    fn test_comments_and_at_rules() {
        let root = parse("// note\n/* a\n b */\n@media print\n  a\n    top: 0").unwrap();
        assert!(matches!(&root.nodes[0], Node::Comment(c) if c.inline && c.text == "note"));
        assert!(matches!(&root.nodes[1], Node::Comment(c) if !c.inline && c.text == "a\n b"));
        assert!(matches!(&root.nodes[2], Node::AtRule(a) if a.name == "media" && a.block.is_some()));
        assert_eq!(root.node_count(), 5);
    }

    #[test]
    fn test_mixed_indentation_fails() {
        let err = parse("a\n  color: red\nb\n\tcolor: blue").unwrap_err();
        assert_eq!(err.line, 4);
        assert!(err.message.contains("Mixed tabs"));
    }

    #[test]
    fn test_bad_dedent_fails() {
        let err = parse("a\n    color: red\n  top: 0").unwrap_err();
        assert_eq!(err.message, "Unexpected indentation");
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| -> String {
            (0..depth).map(|i| format!("{}a\n", " ".repeat(i))).collect()
        };
        assert!(parse(&nested(MAX_NESTING + 1)).is_ok());

        let err = parse(&nested(MAX_NESTING + 2)).unwrap_err();
        assert_eq!(err.message, "Nesting too deep");
        assert_eq!(err.line, MAX_NESTING + 1);
    }

    #[test]
    fn test_unclosed_comment_fails() {
        let err = parse("/* never\nclosed").unwrap_err();
        assert_eq!(err.message, "Unclosed comment");
    }
}
