use super::{value_words, Reporter, Rule, RuleContext};
use crate::error::RuleFault;
use crate::models::tree::Root;
use regex::Regex;
use std::sync::OnceLock;

static NUMBER_WITH_UNIT: OnceLock<Regex> = OnceLock::new();

fn number_with_unit() -> &'static Regex {
    NUMBER_WITH_UNIT.get_or_init(|| {
        Regex::new(r"(?i)^([+-]?(?:\d+\.?\d*|\.\d+))([a-z]+)$").expect("invalid regex pattern")
    })
}

const LENGTH_UNITS: &[&str] = &[
    "em", "ex", "ch", "rem", "vh", "vw", "vmin", "vmax", "cm", "mm", "q", "in", "pt", "pc", "px",
];

/// Disallow units on zero lengths (`0px` -> `0`).
pub struct LengthZeroNoUnit;

impl Rule for LengthZeroNoUnit {
    fn name(&self) -> &'static str {
        "length-zero-no-unit"
    }

    fn description(&self) -> &'static str {
        "Disallow units for zero lengths"
    }

    fn check(&self, root: &Root, _ctx: &RuleContext<'_>, report: &mut Reporter<'_>) -> Result<(), RuleFault> {
        root.walk_decls(&mut |decl| {
            if decl.prop.starts_with("--") {
                return;
            }
            for word in value_words(&decl.value, &["url", "calc", "var"]) {
                let Some(caps) = number_with_unit().captures(word.text) else {
                    continue;
                };
                let (number, unit) = (&caps[1], &caps[2]);
                let is_zero = number.parse::<f64>().map_or(false, |n| n == 0.0);
                if is_zero && LENGTH_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit)) {
                    report.report(decl.value_position(word.offset + number.len()), "Unexpected unit");
                }
            }
        });
        Ok(())
    }
}
