//! Report formatters and the formatting step of a lint call.
//!
//! Supports `json` (default) and `string` (human) outputs. Callers may pass
//! any closure `Fn(&LintReport) -> Result<String, FormatterError>` instead.

use crate::error::{FormatterError, InputFault};
use crate::models::{InputResult, LintReport, Severity};
use crate::utils::{display_path, use_colors};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Turns a finished report into text.
pub trait Formatter: Send + Sync {
    fn format(&self, report: &LintReport) -> Result<String, FormatterError>;
}

impl<F> Formatter for F
where
    F: Fn(&LintReport) -> Result<String, FormatterError> + Send + Sync,
{
    fn format(&self, report: &LintReport) -> Result<String, FormatterError> {
        self(report)
    }
}

/// What a lint call hands back: formatted text plus the structured report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintOutput {
    pub output: String,
    pub results: LintReport,
}

/// Run `formatter` over `report`; its failure escapes unchanged.
pub fn format_report(
    report: LintReport,
    formatter: &dyn Formatter,
) -> Result<LintOutput, FormatterError> {
    let output = formatter.format(&report)?;
    Ok(LintOutput {
        output,
        results: report,
    })
}

/// Pretty-printed JSON of the whole report.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &LintReport) -> Result<String, FormatterError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// Human-readable listing, one line per finding, then a summary line.
#[derive(Debug, Clone, Default)]
pub struct StringFormatter {
    color: bool,
    base: Option<PathBuf>,
}

impl StringFormatter {
    /// Coloured unless `NO_COLOR` is set; paths relative to the working dir.
    pub fn new() -> Self {
        Self {
            color: use_colors(),
            base: std::env::current_dir().ok(),
        }
    }

    /// No colours, paths as reported.
    pub fn plain() -> Self {
        Self {
            color: false,
            base: None,
        }
    }

    fn paint(&self, text: &str, severity: Option<Severity>) -> String {
        if !self.color {
            return text.to_string();
        }
        match severity {
            Some(Severity::Error) => text.red().bold().to_string(),
            Some(Severity::Warning) => text.yellow().bold().to_string(),
            None => text.bold().to_string(),
        }
    }

    fn write_input(&self, out: &mut String, r: &InputResult) {
        let file = display_path(&r.source, self.base.as_deref());
        let file = self.paint(&file, None);
        if let Some(fault) = &r.error {
            let (line, column, message) = match fault {
                InputFault::Parse(e) => (e.line, e.column, e.message.clone()),
                InputFault::Io { .. } => (1, 1, fault.to_string()),
            };
            let _ = writeln!(
                out,
                "{} {} {}:{}:{} — {}",
                self.paint("✖", Some(Severity::Error)),
                self.paint("⟦fatal⟧", Some(Severity::Error)),
                file,
                line,
                column,
                message
            );
            return;
        }
        for v in &r.violations {
            let (icon, tag) = match v.severity {
                Severity::Error => ("✖", "⟦error⟧"),
                Severity::Warning => ("▲", "⟦warn⟧"),
            };
            let _ = writeln!(
                out,
                "{} {} {}:{}:{} — {}",
                self.paint(icon, Some(v.severity)),
                self.paint(tag, Some(v.severity)),
                file,
                v.line,
                v.column,
                v.message
            );
        }
    }
}

impl Formatter for StringFormatter {
    fn format(&self, report: &LintReport) -> Result<String, FormatterError> {
        let mut out = String::new();
        for r in &report.results {
            self.write_input(&mut out, r);
        }
        let s = &report.summary;
        let summary = format!(
            "— Summary — errors={} warnings={} fatal={} inputs={}",
            s.errors, s.warnings, s.fatal, s.inputs
        );
        out.push_str(&self.paint(&summary, None));
        out.push('\n');
        Ok(out)
    }
}

/// Look up a built-in formatter by its CLI name.
pub fn formatter_by_name(name: &str) -> Result<Box<dyn Formatter>, FormatterError> {
    match name {
        "json" => Ok(Box::new(JsonFormatter)),
        "string" => Ok(Box::new(StringFormatter::new())),
        other => Err(FormatterError::Custom(format!(
            "unknown formatter `{other}` (expected json|string)"
        ))),
    }
}
