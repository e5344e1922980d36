//! stylint CLI binary entry point.
//! Delegates to the library for linting and prints results.

use clap::Parser;
use std::io::Read;
use std::process;
use stylint::cli::{Cli, Commands};
use stylint::config::{self, Config};
use stylint::output::formatter_by_name;
use stylint::utils::{error_prefix, info_prefix, note_prefix};
use stylint::{LintOptions, Linter};
use tracing::debug;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Rules { output } => {
            let linter = Linter::default();
            let meta = linter.registry().rule_metadata();
            if output.as_deref() == Some("json") {
                match serde_json::to_string_pretty(&meta) {
                    Ok(s) => println!("{s}"),
                    Err(e) => fail(e),
                }
            } else {
                for m in meta {
                    println!("{} {} — {}", info_prefix(), m.name, m.description);
                }
            }
        }
        Commands::Lint {
            files,
            code,
            stdin,
            stdin_filename,
            config,
            syntax,
            formatter,
            allow_empty_input,
        } => {
            let cfg = resolve_config(config.as_deref());
            let code = if stdin {
                let mut buf = String::new();
                if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                    fail(format!("failed to read stdin: {e}"));
                }
                Some(buf)
            } else {
                code
            };

            let mut options = LintOptions::new(cfg)
                .files(files)
                .allow_empty_input(allow_empty_input);
            if let Some(code) = code {
                options = options.code(code);
            }
            if let Some(name) = stdin_filename {
                options = options.code_filename(name);
            }
            if let Some(name) = syntax {
                options = options.syntax(name);
            }
            options.formatter = match formatter_by_name(&formatter) {
                Ok(f) => Some(f),
                Err(e) => fail(e),
            };

            match Linter::default().lint(options) {
                Ok(out) => {
                    if out.output.ends_with('\n') {
                        print!("{}", out.output);
                    } else {
                        println!("{}", out.output);
                    }
                    if out.results.errored {
                        process::exit(2);
                    }
                }
                Err(e) => fail(e),
            }
        }
    }
}

/// `--config` wins; otherwise search upward from the working directory.
fn resolve_config(explicit: Option<&str>) -> Config {
    let path = match explicit {
        Some(p) => Some(std::path::PathBuf::from(p)),
        None => std::env::current_dir()
            .ok()
            .and_then(|cwd| config::discover_config(&cwd)),
    };
    match path {
        Some(path) => {
            debug!("using config {}", path.display());
            config::load_config(&path).unwrap_or_else(|e| fail(e))
        }
        None => {
            eprintln!(
                "{} No stylint.toml|yaml|yml|json found; no rules enabled.",
                note_prefix()
            );
            Config::default()
        }
    }
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), err);
    process::exit(1);
}

fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}
