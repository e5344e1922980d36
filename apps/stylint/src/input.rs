//! Input expansion: literal code or glob patterns into resolved inputs.
//!
//! Expansion order is deterministic for a given filesystem state: patterns
//! are visited in the order given, and each pattern's matches in the order
//! the `glob` crate yields them (sorted per directory level). A path
//! matched by several patterns is kept once, at its first position.

use crate::error::{ConfigError, InputFault};
use crate::syntax::{self, Dialect};
use glob::glob;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Identifier used for literal code without a filename.
pub const CODE_SOURCE: &str = "<input>";

/// Where the text to lint comes from. Exactly one kind per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Code {
        text: String,
        /// Optional filename used for display and extension inference.
        filename: Option<PathBuf>,
    },
    Files(Vec<String>),
}

/// One concrete unit of work: identifier, text (or read failure), dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub source: String,
    pub path: Option<PathBuf>,
    pub dialect: Dialect,
    pub text: Result<String, InputFault>,
}

enum Match {
    File(PathBuf),
    Unreadable(PathBuf, InputFault),
}

/// Expand `source` into resolved inputs, reading every matched file.
///
/// Zero matches yield an empty vector; whether that is acceptable is the
/// caller's decision.
pub fn expand(source: &InputSource, hint: Option<&str>) -> Result<Vec<ResolvedInput>, ConfigError> {
    match source {
        InputSource::Code { text, filename } => {
            let dialect = syntax::resolve(hint, filename.as_deref())?;
            let source = filename
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|| CODE_SOURCE.to_string());
            Ok(vec![ResolvedInput {
                source,
                path: filename.clone(),
                dialect,
                text: Ok(text.clone()),
            }])
        }
        InputSource::Files(patterns) => {
            let matches = collect_matches(patterns)?;
            debug!("{} file(s) matched {:?}", matches.len(), patterns);
            matches
                .into_par_iter()
                .map(|m| {
                    let (path, text) = match m {
                        Match::File(path) => {
                            let text = fs::read_to_string(&path).map_err(|e| InputFault::io(&e));
                            (path, text)
                        }
                        Match::Unreadable(path, fault) => (path, Err(fault)),
                    };
                    Ok(ResolvedInput {
                        source: path.to_string_lossy().to_string(),
                        dialect: syntax::resolve(hint, Some(&path))?,
                        path: Some(path),
                        text,
                    })
                })
                .collect()
        }
    }
}

fn collect_matches(patterns: &[String]) -> Result<Vec<Match>, ConfigError> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut matches = Vec::new();
    for pattern in patterns {
        let entries = glob(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_dir() || !seen.insert(path.clone()) {
                        continue;
                    }
                    matches.push(Match::File(path));
                }
                Err(e) => {
                    let path = e.path().to_path_buf();
                    if seen.insert(path.clone()) {
                        let fault = InputFault::io(e.error());
                        matches.push(Match::Unreadable(path, fault));
                    }
                }
            }
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pattern(dir: &std::path::Path, tail: &str) -> String {
        dir.join(tail).to_string_lossy().to_string()
    }

    #[test]
    fn test_code_yields_one_input() {
        let inputs = expand(
            &InputSource::Code {
                text: "a {}".into(),
                filename: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].source, CODE_SOURCE);
        assert_eq!(inputs[0].dialect, Dialect::Css);
        assert_eq!(inputs[0].text.as_deref(), Ok("a {}"));
    }

    #[test]
    fn test_code_filename_drives_inference() {
        let inputs = expand(
            &InputSource::Code {
                text: "a {}".into(),
                filename: Some(PathBuf::from("theme.less")),
            },
            None,
        )
        .unwrap();
        assert_eq!(inputs[0].source, "theme.less");
        assert_eq!(inputs[0].dialect, Dialect::Less);
    }

    #[test]
    fn test_glob_order_dedup_and_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("b.css"), "b {}").unwrap();
        std::fs::write(root.join("a.scss"), "a {}").unwrap();
        std::fs::create_dir_all(root.join("c.css")).unwrap();
        let inputs = expand(
            &InputSource::Files(vec![pattern(root, "*.css"), pattern(root, "*")]),
            None,
        )
        .unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|i| i.path.as_ref().unwrap().file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["b.css", "a.scss"]);
        assert_eq!(inputs[1].dialect, Dialect::Scss);
    }

    #[test]
    fn test_no_match_is_empty() {
        let dir = tempdir().unwrap();
        let inputs = expand(&InputSource::Files(vec![pattern(dir.path(), "*.css")]), None).unwrap();
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = expand(&InputSource::Files(vec!["a/***/b".into()]), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    }

    #[test]
    fn test_unreadable_file_is_captured() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.css"), [0xff, 0xfe, 0x00]).unwrap();
        let inputs = expand(&InputSource::Files(vec![pattern(dir.path(), "*.css")]), None).unwrap();
        assert_eq!(inputs.len(), 1);
        assert!(matches!(inputs[0].text, Err(InputFault::Io { .. })));
    }

    #[test]
    fn test_hint_applies_to_every_file() {
        let dir = tempdir().unwrap();
        for name in ["x.css", "x.less", "x.sss"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let inputs = expand(
            &InputSource::Files(vec![pattern(dir.path(), "x.*")]),
            Some("scss"),
        )
        .unwrap();
        assert_eq!(inputs.len(), 3);
        assert!(inputs.iter().all(|i| i.dialect == Dialect::Scss));
    }
}
