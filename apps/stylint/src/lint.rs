//! Lint orchestration: request validation, per-input pipeline, aggregation.
//!
//! Only request-level problems (`ConfigError`) and formatter failures escape
//! from `Linter::lint`. Read failures, parse failures and misbehaving rules
//! are recorded inside the returned `LintReport`, so one bad input never
//! aborts the batch.

use crate::config::{Config, RuleSetting};
use crate::error::{ConfigError, InputFault, LintError};
use crate::input::{self, InputSource, ResolvedInput};
use crate::models::{InputResult, LintReport, ParseArtifact, Position, Severity, Violation};
use crate::output::{format_report, Formatter, JsonFormatter, LintOutput};
use crate::rules::{Reporter, Rule, RuleContext, RuleRegistry};
use crate::syntax::Dialect;
use rayon::prelude::*;
use serde_json::Value as Json;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{debug, info};

/// Caller-facing options for one lint call.
///
/// Exactly one of `code` / `files` must be set.
pub struct LintOptions {
    pub config: Config,
    pub code: Option<String>,
    pub code_filename: Option<PathBuf>,
    pub files: Vec<String>,
    pub syntax: Option<String>,
    pub formatter: Option<Box<dyn Formatter>>,
    /// Return an empty report instead of failing when no file matches.
    pub allow_empty_input: bool,
}

impl LintOptions {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            code: None,
            code_filename: None,
            files: Vec::new(),
            syntax: None,
            formatter: None,
            allow_empty_input: false,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn code_filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.code_filename = Some(path.into());
        self
    }

    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn syntax(mut self, name: impl Into<String>) -> Self {
        self.syntax = Some(name.into());
        self
    }

    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn allow_empty_input(mut self, allow: bool) -> Self {
        self.allow_empty_input = allow;
        self
    }
}

/// An enabled rule with its resolved options.
pub struct PlannedRule<'r> {
    pub rule: &'r dyn Rule,
    pub primary: Json,
    pub severity: Severity,
    pub message: Option<String>,
}

/// Validated request: one input source, checked hint, rules to run.
pub struct LintRequest<'r> {
    pub source: InputSource,
    pub syntax: Option<Dialect>,
    pub plan: Vec<PlannedRule<'r>>,
    pub allow_empty_input: bool,
}

/// Runs rules from an explicit registry; holds no other state.
pub struct Linter {
    registry: RuleRegistry,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(RuleRegistry::default_rules())
    }
}

impl Linter {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Resolve the enabled rules of `config` in declaration order.
    pub fn plan(&self, config: &Config) -> Result<Vec<PlannedRule<'_>>, ConfigError> {
        let default_severity = config.default_severity.unwrap_or_default();
        let mut plan = Vec::new();
        for (name, setting) in config.rules.settings()? {
            let rule = self
                .registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))?;
            let RuleSetting::On(opts) = setting else {
                continue;
            };
            rule.validate_options(&opts.primary)
                .map_err(|reason| ConfigError::InvalidRuleOption {
                    rule: name.to_string(),
                    reason,
                })?;
            plan.push(PlannedRule {
                rule,
                primary: opts.primary,
                severity: opts.severity.unwrap_or(default_severity),
                message: opts.message,
            });
        }
        Ok(plan)
    }

    /// Validate caller options into a request without touching any input.
    pub fn request(&self, options: &mut LintOptions) -> Result<LintRequest<'_>, ConfigError> {
        let source = match (options.code.take(), options.files.is_empty()) {
            (Some(_), false) => return Err(ConfigError::ConflictingInput),
            (None, true) => return Err(ConfigError::MissingInput),
            (Some(text), true) => InputSource::Code {
                text,
                filename: options.code_filename.take(),
            },
            (None, false) => InputSource::Files(std::mem::take(&mut options.files)),
        };
        let syntax = options
            .syntax
            .as_deref()
            .map(str::parse::<Dialect>)
            .transpose()?;
        Ok(LintRequest {
            source,
            syntax,
            plan: self.plan(&options.config)?,
            allow_empty_input: options.allow_empty_input,
        })
    }

    /// Lint every input of the request and aggregate the results.
    pub fn run(&self, request: &LintRequest<'_>) -> Result<LintReport, ConfigError> {
        let hint = request.syntax.map(Dialect::name);
        let inputs = input::expand(&request.source, hint)?;
        if inputs.is_empty() && !request.allow_empty_input {
            if let InputSource::Files(patterns) = &request.source {
                return Err(ConfigError::NoFilesMatched(patterns.clone()));
            }
        }
        info!(
            "linting {} input(s) with {} rule(s)",
            inputs.len(),
            request.plan.len()
        );
        let results: Vec<InputResult> = inputs
            .par_iter()
            .map(|input| run_input(input, &request.plan))
            .collect();
        Ok(LintReport::aggregate(results))
    }

    /// Validate, lint, aggregate and format.
    pub fn lint(&self, mut options: LintOptions) -> Result<LintOutput, LintError> {
        let request = self.request(&mut options)?;
        let report = self.run(&request)?;
        let output = match options.formatter.as_deref() {
            Some(f) => format_report(report, f)?,
            None => format_report(report, &JsonFormatter)?,
        };
        Ok(output)
    }
}

/// Lint with the built-in rule registry.
pub fn lint(options: LintOptions) -> Result<LintOutput, LintError> {
    Linter::default().lint(options)
}

/// Parse one input and run every planned rule against it.
pub fn run_input(input: &ResolvedInput, plan: &[PlannedRule<'_>]) -> InputResult {
    let text = match &input.text {
        Ok(t) => t,
        Err(fault) => {
            debug!("{}: {}", input.source, fault);
            return InputResult::failed(&input.source, input.dialect, fault.clone());
        }
    };
    let adapter = input.dialect.adapter();
    let root = match adapter.parse(text) {
        Ok(root) => root,
        Err(e) => {
            debug!("{}: {} parse failed: {}", input.source, input.dialect, e);
            return InputResult::failed(&input.source, input.dialect, InputFault::Parse(e));
        }
    };

    let mut violations: Vec<Violation> = Vec::new();
    for planned in plan {
        let name = planned.rule.name();
        let ctx = RuleContext {
            primary: &planned.primary,
            dialect: adapter.dialect(),
        };
        let mut found = Vec::new();
        let outcome = {
            let mut reporter =
                Reporter::new(name, planned.severity, planned.message.as_deref(), &mut found);
            panic::catch_unwind(AssertUnwindSafe(|| {
                planned.rule.check(&root, &ctx, &mut reporter)
            }))
        };
        let fault = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(fault)) => Some(fault.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };
        match fault {
            None => violations.append(&mut found),
            Some(detail) => {
                debug!("{}: rule {} failed: {}", input.source, name, detail);
                violations.push(Violation {
                    rule: name.to_string(),
                    line: Position::START.line,
                    column: Position::START.column,
                    message: format!("Internal error in rule \"{name}\": {detail}"),
                    severity: Severity::Error,
                });
            }
        }
    }
    violations.sort_by_key(|v| (v.line, v.column));

    let artifact = ParseArtifact {
        dialect: adapter.dialect(),
        nodes: root.node_count(),
    };
    InputResult::linted(&input.source, input.dialect, violations, artifact)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}
