use super::{value_words, Reporter, Rule, RuleContext};
use crate::error::RuleFault;
use crate::models::tree::Root;
use regex::Regex;
use std::sync::OnceLock;

static HEX_CANDIDATE: OnceLock<Regex> = OnceLock::new();

fn hex_candidate() -> &'static Regex {
    HEX_CANDIDATE.get_or_init(|| Regex::new(r"#([0-9A-Za-z]+)").expect("invalid regex pattern"))
}

/// Disallow malformed hex colors such as `#ff` or `#12345z`.
pub struct ColorNoInvalidHex;

fn is_valid_hex(digits: &str) -> bool {
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

impl Rule for ColorNoInvalidHex {
    fn name(&self) -> &'static str {
        "color-no-invalid-hex"
    }

    fn description(&self) -> &'static str {
        "Disallow invalid hex colors"
    }

    fn check(&self, root: &Root, _ctx: &RuleContext<'_>, report: &mut Reporter<'_>) -> Result<(), RuleFault> {
        root.walk_decls(&mut |decl| {
            for word in value_words(&decl.value, &["url"]) {
                for caps in hex_candidate().captures_iter(word.text) {
                    let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    // `a#b` is an identifier, not a color.
                    let glued = word.text[..whole.start()]
                        .chars()
                        .next_back()
                        .is_some_and(|c| c.is_alphanumeric() || c == '&');
                    if glued || is_valid_hex(digits.as_str()) {
                        continue;
                    }
                    report.report(
                        decl.value_position(word.offset + whole.start()),
                        format!("Unexpected invalid hex color \"{}\"", whole.as_str()),
                    );
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
    fn test_invalid_lengths_and_digits() {
        let css = "a {\n  color: #ff;\n  background: #fff #12345z #abcd #aabbccdd;\n}";
        let found = check(&ColorNoInvalidHex, Dialect::Css, css);
        assert_eq!(found, vec![(2, 10), (3, 20)]);
    }

    #[test]
    fn test_url_fragments_and_interpolation_ignored() {
        let scss = "a { background: url(x.svg#zz); color: #{$c}; }";
        assert!(check(&ColorNoInvalidHex, Dialect::Scss, scss).is_empty());
    }
}
