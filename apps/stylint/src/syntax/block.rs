//! Brace-based parser shared by CSS, SCSS and Less.
//!
//! The parser works statement by statement: it collects characters up to the
//! next `;`, `{` or `}` outside of strings, comments, parentheses and
//! interpolations, then classifies what it collected. Every collected
//! character keeps its source position, so nodes get exact start positions
//! without a second pass.

use super::{Dialect, SyntaxAdapter, MAX_NESTING};
use crate::error::ParseError;
use crate::models::tree::{AtRuleNode, Block, Comment, Declaration, Node, Root, RuleNode};
use crate::models::Position;

/// Lexical differences between the brace-based dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flavor {
    /// `//` comments run to the end of the line.
    pub line_comments: bool,
    /// Character that opens an interpolation when followed by `{`.
    pub interpolation: Option<char>,
    /// `@name: value;` variables and `.mixin();` calls.
    pub less: bool,
}

impl Flavor {
    pub const CSS: Flavor = Flavor {
        line_comments: false,
        interpolation: None,
        less: false,
    };
    pub const SCSS: Flavor = Flavor {
        line_comments: true,
        interpolation: Some('#'),
        less: false,
    };
    pub const LESS: Flavor = Flavor {
        line_comments: true,
        interpolation: Some('@'),
        less: true,
    };
}

pub(crate) struct BlockSyntax {
    dialect: Dialect,
    flavor: Flavor,
}

impl BlockSyntax {
    pub const fn new(dialect: Dialect, flavor: Flavor) -> Self {
        Self { dialect, flavor }
    }
}

impl SyntaxAdapter for BlockSyntax {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn parse(&self, text: &str) -> Result<Root, ParseError> {
        let mut parser = Parser::new(text, self.flavor);
        let nodes = parser.nodes(None)?;
        Ok(Root { nodes })
    }
}

type Spanned = (char, Position);

struct Parser {
    chars: Vec<char>,
    idx: usize,
    pos: Position,
    flavor: Flavor,
    /// Number of blocks currently open.
    depth: usize,
}

impl Parser {
    fn new(text: &str, flavor: Flavor) -> Self {
        // A leading byte order mark is not part of the style sheet.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            chars: text.chars().collect(),
            idx: 0,
            pos: Position::START,
            flavor,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.idx + n).copied()
    }

    fn bump(&mut self) -> Option<Spanned> {
        let ch = self.peek()?;
        let at = self.pos;
        self.idx += 1;
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some((ch, at))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn at_line_comment(&self) -> bool {
        self.flavor.line_comments && self.peek() == Some('/') && self.peek_at(1) == Some('/')
    }

    fn at_block_comment(&self) -> bool {
        self.peek() == Some('/') && self.peek_at(1) == Some('*')
    }

    /// Parse nodes until end of input, or until the `}` matching `open`.
    fn nodes(&mut self, open: Option<Position>) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return match open {
                        Some(at) => Err(ParseError::at(at, "Unclosed block")),
                        None => Ok(nodes),
                    };
                }
                Some('}') => {
                    if open.is_none() {
                        return Err(ParseError::at(self.pos, "Unexpected }"));
                    }
                    self.bump();
                    return Ok(nodes);
                }
                Some(';') => {
                    self.bump();
                }
                Some(_) if self.at_block_comment() => {
                    let start = self.pos;
                    let body = self.block_comment(start)?;
                    nodes.push(Node::Comment(Comment {
                        text: body.trim().to_string(),
                        start,
                        inline: false,
                    }));
                }
                Some(_) if self.at_line_comment() => {
                    let start = self.pos;
                    let body = self.line_comment();
                    nodes.push(Node::Comment(Comment {
                        text: body.trim().to_string(),
                        start,
                        inline: true,
                    }));
                }
                Some(_) => {
                    if let Some(node) = self.statement()? {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    /// Parse the body of the block opened at `open`.
    fn nested(&mut self, open: Position) -> Result<Vec<Node>, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::at(open, "Nesting too deep"));
        }
        self.depth += 1;
        let nodes = self.nodes(Some(open));
        self.depth -= 1;
        nodes
    }

    /// Consume `/* ... */` and return the body.
    fn block_comment(&mut self, start: Position) -> Result<String, ParseError> {
        self.bump();
        self.bump();
        let mut body = String::new();
        loop {
            if self.peek().is_none() {
                return Err(ParseError::at(start, "Unclosed comment"));
            }
            if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                self.bump();
                self.bump();
                return Ok(body);
            }
            if let Some((ch, _)) = self.bump() {
                body.push(ch);
            }
        }
    }

    /// Consume `// ...` up to (not including) the newline.
    fn line_comment(&mut self) -> String {
        self.bump();
        self.bump();
        let mut body = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
            body.push(ch);
        }
        body
    }

    fn string(&mut self, buf: &mut Vec<Spanned>) -> Result<(), ParseError> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Ok(());
        };
        buf.push(quote);
        loop {
            match self.peek() {
                None | Some('\n') => return Err(ParseError::at(start, "Unclosed string")),
                Some('\\') => {
                    buf.extend(self.bump());
                    buf.extend(self.bump());
                }
                Some(c) => {
                    buf.extend(self.bump());
                    if c == quote.0 {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn interpolation(&mut self, buf: &mut Vec<Spanned>) -> Result<(), ParseError> {
        let start = self.pos;
        buf.extend(self.bump());
        buf.extend(self.bump());
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                None => return Err(ParseError::at(start, "Unclosed interpolation")),
                Some('{') => depth += 1,
                Some('}') => depth -= 1,
                Some(_) => {}
            }
            buf.extend(self.bump());
        }
        Ok(())
    }

    /// Collect one statement and classify it.
    fn statement(&mut self) -> Result<Option<Node>, ParseError> {
        let mut buf: Vec<Spanned> = Vec::new();
        let mut parens = 0usize;
        while let Some(ch) = self.peek() {
            match ch {
                '"' | '\'' => self.string(&mut buf)?,
                '/' if self.at_block_comment() => {
                    let start = self.pos;
                    buf.extend(self.bump());
                    buf.extend(self.bump());
                    let body = self.block_comment_tail(start)?;
                    buf.extend(body);
                }
                '/' if parens == 0 && self.at_line_comment() => {
                    self.line_comment();
                }
                c if Some(c) == self.flavor.interpolation && self.peek_at(1) == Some('{') => {
                    self.interpolation(&mut buf)?
                }
                '(' => {
                    parens += 1;
                    buf.extend(self.bump());
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    buf.extend(self.bump());
                }
                ';' | '{' | '}' if parens == 0 => break,
                _ => buf.extend(self.bump()),
            }
        }

        let text = trim(&buf);
        let terminator = self.peek();
        if terminator == Some('{') {
            let open = self.pos;
            self.bump();
            // A bare `{}` is a rule with an empty selector.
            let start = text.first().map_or(open, |&(_, p)| p);
            let nodes = self.nested(open)?;
            let block = Some(Block { open, nodes });
            return Ok(Some(if text.first().is_some_and(|(c, _)| *c == '@') {
                at_rule(text, start, block)
            } else {
                Node::Rule(RuleNode {
                    selector: collect(text),
                    start,
                    block,
                })
            }));
        }
        if terminator == Some(';') {
            self.bump();
        }
        let Some(&(first, start)) = text.first() else {
            return Ok(None);
        };
        if first == '@' {
            if self.flavor.less && is_less_variable(text) {
                return Ok(Some(declaration(text)));
            }
            return Ok(Some(at_rule(text, start, None)));
        }
        if text.iter().any(|(c, _)| *c == ':') {
            return Ok(Some(declaration(text)));
        }
        if self.flavor.less && matches!(first, '.' | '#') {
            // Mixin call: a rule without a body.
            return Ok(Some(Node::Rule(RuleNode {
                selector: collect(text),
                start,
                block: None,
            })));
        }
        Err(ParseError::at(start, "Unknown word"))
    }

    /// Like `block_comment`, but keeps the characters (with delimiters).
    fn block_comment_tail(&mut self, start: Position) -> Result<Vec<Spanned>, ParseError> {
        let mut out = Vec::new();
        loop {
            if self.peek().is_none() {
                return Err(ParseError::at(start, "Unclosed comment"));
            }
            let closing = self.peek() == Some('*') && self.peek_at(1) == Some('/');
            out.extend(self.bump());
            if closing {
                out.extend(self.bump());
                return Ok(out);
            }
        }
    }
}

fn trim(chars: &[Spanned]) -> &[Spanned] {
    let start = chars
        .iter()
        .position(|(c, _)| !c.is_whitespace())
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|(c, _)| !c.is_whitespace())
        .map_or(start, |i| i + 1);
    &chars[start..end]
}

fn collect(chars: &[Spanned]) -> String {
    chars.iter().map(|(c, _)| *c).collect()
}

/// `@name: value` in Less declares a variable, not an at-rule; so does an
/// interpolated property such as `@{prop}-suffix: value`.
fn is_less_variable(text: &[Spanned]) -> bool {
    let mut name_start = 1;
    if text.get(1).is_some_and(|(c, _)| *c == '{') {
        match text[1..].iter().position(|(c, _)| *c == '}') {
            Some(close) => name_start = close + 2,
            None => return false,
        }
    }
    let name_len = text[name_start..]
        .iter()
        .take_while(|(c, _)| c.is_alphanumeric() || *c == '-' || *c == '_')
        .count();
    if name_start == 1 && name_len == 0 {
        return false;
    }
    text[name_start + name_len..]
        .iter()
        .find(|(c, _)| !c.is_whitespace())
        .is_some_and(|(c, _)| *c == ':')
}

fn at_rule(text: &[Spanned], start: Position, block: Option<Block>) -> Node {
    let name_len = text[1..]
        .iter()
        .take_while(|(c, _)| !c.is_whitespace() && *c != '(' && *c != '{')
        .count();
    Node::AtRule(AtRuleNode {
        name: collect(&text[1..1 + name_len]),
        params: collect(trim(&text[1 + name_len..])),
        start,
        block,
    })
}

fn declaration(text: &[Spanned]) -> Node {
    let colon = text.iter().position(|(c, _)| *c == ':').unwrap_or(text.len());
    let prop = collect(trim(&text[..colon]));
    let rest = text.get(colon + 1..).unwrap_or(&[]);
    let value = trim(rest);
    let value_start = match value.first() {
        Some(&(_, p)) => p,
        None => text
            .get(colon)
            .map_or(text[0].1, |&(_, p)| Position::new(p.line, p.column + 1)),
    };
    let (value, important) = split_important(&collect(value));
    Node::Declaration(Declaration {
        prop,
        value,
        important,
        start: text[0].1,
        value_start,
    })
}

/// Strip a trailing `!important` flag from a raw value.
pub(super) fn split_important(raw: &str) -> (String, bool) {
    const FLAG: &str = "!important";
    let lower = raw.to_ascii_lowercase();
    if lower.ends_with(FLAG) {
        let cut = raw.len() - FLAG.len();
        (raw[..cut].trim_end().to_string(), true)
    } else {
        (raw.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flavor: Flavor, text: &str) -> Result<Root, ParseError> {
        BlockSyntax::new(Dialect::Css, flavor).parse(text)
    }

    fn first_rule(root: &Root) -> &RuleNode {
        root.nodes
            .iter()
            .find_map(|n| match n {
                Node::Rule(r) => Some(r),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_empty_rule_block_position() {
        let root = parse(Flavor::CSS, "b {}").unwrap();
        let rule = first_rule(&root);
        assert_eq!(rule.selector, "b");
        assert_eq!(rule.start, Position::new(1, 1));
        let block = rule.block.as_ref().unwrap();
        assert_eq!(block.open, Position::new(1, 3));
        assert!(block.nodes.is_empty());
    }

    #[test]
    fn test_declarations_and_value_positions() {
        let root = parse(Flavor::CSS, "a {\n  top: 0px;\n  color: red !important\n}").unwrap();
        let mut decls = Vec::new();
        root.walk_decls(&mut |d| decls.push(d.clone()));
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].prop, "top");
        assert_eq!(decls[0].start, Position::new(2, 3));
        assert_eq!(decls[0].value_start, Position::new(2, 8));
        assert_eq!(decls[1].value, "red");
        assert!(decls[1].important);
    }

    #[test]
    fn test_scss_line_comments_and_variables() {
        let root = parse(Flavor::SCSS, "$foo: bar; // foo;\nb {}").unwrap();
        assert_eq!(root.nodes.len(), 3);
        match &root.nodes[0] {
            Node::Declaration(d) => assert_eq!((d.prop.as_str(), d.value.as_str()), ("$foo", "bar")),
            other => panic!("unexpected node {other:?}"),
        }
        match &root.nodes[1] {
            Node::Comment(c) => assert!(c.inline && c.text == "foo;"),
            other => panic!("unexpected node {other:?}"),
        }
        let rule = first_rule(&root);
        assert_eq!(rule.block.as_ref().unwrap().open, Position::new(2, 3));
    }

    #[test]
    fn test_css_rejects_line_comment() {
        let err = parse(Flavor::CSS, "$foo: bar; // foo;\nb {}").unwrap_err();
        assert_eq!(err.message, "Unknown word");
        assert_eq!((err.line, err.column), (1, 12));
    }

    #[test]
    fn test_scss_interpolation_in_selector() {
        let root = parse(Flavor::SCSS, ".a-#{$x} { color: red; }").unwrap();
        assert_eq!(first_rule(&root).selector, ".a-#{$x}");
    }

    #[test]
    fn test_less_variable_and_mixin_call() {
        let root = parse(Flavor::LESS, "@foo: bar;\n.a { .mixin(); }\n@media print { b { top: 0 } }").unwrap();
        assert!(matches!(&root.nodes[0], Node::Declaration(d) if d.prop == "@foo"));
        let rule = first_rule(&root);
        let inner = &rule.block.as_ref().unwrap().nodes[0];
        assert!(matches!(inner, Node::Rule(r) if r.block.is_none() && r.selector == ".mixin()"));
        assert!(matches!(&root.nodes[2], Node::AtRule(a) if a.name == "media" && a.params == "print"));
    }

    #[test]
    fn test_url_with_slashes_is_not_a_comment() {
        let root = parse(Flavor::SCSS, "a { background: url(//cdn.example/x.png); }").unwrap();
        let mut values = Vec::new();
        root.walk_decls(&mut |d| values.push(d.value.clone()));
        assert_eq!(values, vec!["url(//cdn.example/x.png)"]);
    }

    #[test]
    fn test_unclosed_block_reports_opener() {
        let err = parse(Flavor::CSS, "a {\n  color: red;").unwrap_err();
        assert_eq!(err.message, "Unclosed block");
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn test_unexpected_closing_brace() {
        let err = parse(Flavor::CSS, "a {}\n}").unwrap_err();
        assert_eq!(err.message, "Unexpected }");
        assert_eq!((err.line, err.column), (2, 1));
    }

    #[test]
    fn test_unclosed_comment_and_string() {
        assert_eq!(parse(Flavor::CSS, "/* a").unwrap_err().message, "Unclosed comment");
        assert_eq!(
            parse(Flavor::CSS, "a { content: \"x; }").unwrap_err().message,
            "Unclosed string"
        );
    }

    #[test]
    fn test_bare_block_has_empty_selector() {
        let root = parse(Flavor::CSS, "{}").unwrap();
        let rule = first_rule(&root);
        assert_eq!(rule.selector, "");
        assert_eq!(rule.start, Position::new(1, 1));
        assert!(rule.block.as_ref().unwrap().nodes.is_empty());
    }

    #[test]
    fn test_less_interpolated_property() {
        let root = parse(Flavor::LESS, "a { @{prop}-color: red; }").unwrap();
        let mut decls = Vec::new();
        root.walk_decls(&mut |d| decls.push(d.clone()));
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].prop, "@{prop}-color");
        assert_eq!(decls[0].value, "red");
        assert!(!decls[0].is_variable());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| "a{".repeat(depth) + &"}".repeat(depth);
        assert!(parse(Flavor::SCSS, &nested(MAX_NESTING)).is_ok());

        let err = parse(Flavor::SCSS, &nested(MAX_NESTING + 1)).unwrap_err();
        assert_eq!(err.message, "Nesting too deep");
        assert_eq!((err.line, err.column), (1, 2 * (MAX_NESTING + 1)));

        let err = parse(Flavor::CSS, &nested(100_000)).unwrap_err();
        assert_eq!(err.message, "Nesting too deep");
    }

    #[test]
    fn test_at_rule_without_block() {
        let root = parse(Flavor::CSS, "@import \"a.css\";").unwrap();
        assert!(matches!(&root.nodes[0], Node::AtRule(a) if a.name == "import" && a.block.is_none()));
    }
}
