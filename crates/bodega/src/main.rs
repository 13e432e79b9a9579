//! `bodega`: command-line client for the bodega e-commerce back-office.
//!
//! Diagnostics go to stderr through `tracing`; command output goes to
//! stdout in the format picked with `--output`. Failures render as a
//! `miette` report and map to a stable process exit code.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, GlobalOpts};

/// Crates whose spans and events the CLI reports on.
const LOG_TARGETS: &[&str] = &["bodega", "bodega_core", "bodega_api", "bodega_config"];

/// `RUST_LOG` wins; otherwise `-q` silences everything below errors and
/// each `-v` opens one more level on the bodega crates only.
fn log_directives(global: &GlobalOpts) -> String {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn install_logging(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(global)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(output::color_enabled(&global.color, std::io::stderr().is_terminal()))
        .with_target(global.verbose > 1)
        .init();
}

#[tokio::main]
async fn main() {
    let Cli { global, command } = Cli::parse();
    install_logging(&global);

    let Err(err) = commands::dispatch(command, &global).await else {
        return;
    };
    let code = err.exit_code();
    tracing::debug!(code, "command failed");
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(code);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["bodega"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn verbosity_scopes_levels_to_bodega_crates() {
        assert_eq!(
            log_directives(&global(&["-vv"])),
            "bodega=debug,bodega_core=debug,bodega_api=debug,bodega_config=debug"
        );
        assert!(log_directives(&global(&[])).starts_with("bodega=warn,"));
        assert!(log_directives(&global(&["-vvvv"])).contains("bodega_api=trace"));
    }

    #[test]
    fn quiet_overrides_verbose() {
        let directives = log_directives(&global(&["-q", "-vvv"]));
        assert!(directives.split(',').all(|d| d.ends_with("=error")));
    }

    #[test]
    fn log_color_follows_the_color_flag() {
        let always = global(&["--color", "always"]);
        assert!(output::color_enabled(&always.color, false));
        let never = global(&["--color", "never"]);
        assert!(!output::color_enabled(&never.color, true));
        let auto = global(&[]);
        assert!(!output::color_enabled(&auto.color, false));
    }
}
