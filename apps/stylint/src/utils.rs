//! Terminal helpers shared by the printers and the binary.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colours are on unless `NO_COLOR` is set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if use_colors() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Show `source` relative to `base` when it is a path under it.
pub fn display_path(source: &str, base: Option<&Path>) -> String {
    let path = Path::new(source);
    match base {
        Some(base) if path.is_absolute() => pathdiff::diff_paths(path, base)
            .filter(|rel| !rel.starts_with(".."))
            .map(|rel| rel.to_string_lossy().to_string())
            .unwrap_or_else(|| source.to_string()),
        _ => source.to_string(),
    }
}
