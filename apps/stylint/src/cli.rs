//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stylint",
    version,
    about = "Style sheet linter for CSS, SCSS, Less and SugarSS",
    long_about = "stylint — lint style sheets in several dialects with one rule set.\n\nConfiguration precedence: --config > nearest stylint.toml|yaml|yml|json > no rules.",
    after_help = "Examples:\n  stylint lint 'src/**/*.scss'\n  stylint lint --code 'a {}' --formatter string\n  cat theme.less | stylint lint --stdin --stdin-filename theme.less",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Log progress (info level)")]
    pub verbose: bool,
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Log internals (debug level)")]
    pub debug: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current stylint version.")]
    Version,
    /// Lint files or a code string
    #[command(
        about = "Run lint checks",
        long_about = "Lint every file matching the given glob patterns, or a literal code string. Exits 2 when any error-severity violation or fatal input error is reported.",
        after_help = "Examples:\n  stylint lint 'styles/*.css' --config stylint.toml\n  stylint lint 'legacy/*.css' --syntax scss"
    )]
    Lint {
        #[arg(help = "Glob patterns of files to lint")]
        files: Vec<String>,
        #[arg(long, conflicts_with_all = ["files", "stdin"], help = "Literal code to lint")]
        code: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "files", help = "Read code from standard input")]
        stdin: bool,
        #[arg(long, help = "Filename for --code/--stdin (display and syntax inference)")]
        stdin_filename: Option<String>,
        #[arg(long, help = "Path to a config file (default: discovered upward from cwd)")]
        config: Option<String>,
        #[arg(long, help = "Force a syntax: css|scss|less|sugarss")]
        syntax: Option<String>,
        #[arg(long, default_value = "json", help = "Output mode: json|string")]
        formatter: String,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Do not fail when no file matches")]
        allow_empty_input: bool,
    },
    /// List built-in rules
    #[command(about = "List rules", long_about = "Print the name and description of every built-in rule.")]
    Rules {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lint_arguments() {
        let cli = Cli::parse_from([
            "stylint", "lint", "a/*.css", "b/*.scss", "--syntax", "scss", "--formatter", "string", "-v",
        ]);
        assert!(cli.verbose);
        let Commands::Lint {
            files,
            syntax,
            formatter,
            ..
        } = cli.cmd
        else {
            panic!("expected lint");
        };
        assert_eq!(files, vec!["a/*.css", "b/*.scss"]);
        assert_eq!(syntax.as_deref(), Some("scss"));
        assert_eq!(formatter, "string");
    }

    #[test]
    fn test_code_conflicts_with_files() {
        let res = Cli::try_parse_from(["stylint", "lint", "a.css", "--code", "a {}"]);
        assert!(res.is_err());
    }
}
