//! Rule configuration and configuration file loading.
//!
//! A configuration is a map from rule name to setting, plus an optional
//! default severity:
//!
//! ```toml
//! defaultSeverity = "warning"
//!
//! [rules]
//! block-no-empty = true
//! length-zero-no-unit = [true, { severity = "error" }]
//! comment-no-empty = false
//! ```
//!
//! Rule order is declaration order in the file, whatever the format.
//! `false` and `null` disable a rule. `[primary, { severity, message }]`
//! attaches secondary options; any other value is the primary option.
//!
//! Files are `stylint.toml|yaml|yml|json`; the format follows the extension.

use crate::error::ConfigError;
use crate::models::Severity;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names probed by `discover_config`, in priority order.
pub const CONFIG_FILES: &[&str] = &[
    "stylint.toml",
    "stylint.yaml",
    "stylint.yml",
    "stylint.json",
];

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Root configuration loaded from `stylint.toml|yaml|json`.
pub struct Config {
    #[serde(default)]
    pub rules: RuleConfig,
    pub default_severity: Option<Severity>,
}

impl Config {
    pub fn new(rules: RuleConfig) -> Self {
        Self {
            rules,
            default_severity: None,
        }
    }

    pub fn with_default_severity(mut self, severity: Severity) -> Self {
        self.default_severity = Some(severity);
        self
    }
}

/// Rule name -> raw setting, in declaration order.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct RuleConfig(Map<String, Json>);

impl RuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule setting. Replacing keeps the original position.
    pub fn rule(mut self, name: impl Into<String>, value: Json) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret every entry, in declaration order.
    pub fn settings(&self) -> Result<Vec<(&str, RuleSetting)>, ConfigError> {
        self.0
            .iter()
            .map(|(name, value)| {
                RuleSetting::from_json(value)
                    .map(|s| (name.as_str(), s))
                    .map_err(|reason| ConfigError::InvalidRuleSetting {
                        rule: name.clone(),
                        reason,
                    })
            })
            .collect()
    }
}

/// Interpreted value of one `rules` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetting {
    Off,
    On(RuleOptions),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleOptions {
    pub primary: Json,
    pub severity: Option<Severity>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Secondary {
    severity: Option<Severity>,
    message: Option<String>,
}

impl RuleSetting {
    pub fn from_json(value: &Json) -> Result<Self, String> {
        match value {
            Json::Null | Json::Bool(false) => Ok(RuleSetting::Off),
            Json::Array(items) if items.len() == 2 && items[1].is_object() => {
                if matches!(items[0], Json::Null | Json::Bool(false)) {
                    return Ok(RuleSetting::Off);
                }
                let secondary: Secondary =
                    serde_json::from_value(items[1].clone()).map_err(|e| e.to_string())?;
                Ok(RuleSetting::On(RuleOptions {
                    primary: items[0].clone(),
                    severity: secondary.severity,
                    message: secondary.message,
                }))
            }
            other => Ok(RuleSetting::On(RuleOptions {
                primary: other.clone(),
                severity: None,
                message: None,
            })),
        }
    }
}

/// Walk upward from `start` and return the first config file found.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut cur = start;
    loop {
        if let Some(found) = CONFIG_FILES
            .iter()
            .map(|name| cur.join(name))
            .find(|p| p.is_file())
        {
            return Some(found);
        }
        cur = cur.parent()?;
    }
}

/// Load a `Config` from `path`; the format follows the file extension.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let parsed = match ext.as_deref() {
        Some("toml") => toml::from_str::<Config>(&s).map_err(|e| e.to_string()),
        Some("yaml") | Some("yml") => serde_yaml::from_str::<Config>(&s).map_err(|e| e.to_string()),
        _ => serde_json::from_str::<Config>(&s).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| ConfigError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}
