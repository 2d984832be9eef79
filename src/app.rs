//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env`
//! - parses CLI arguments
//! - initialises logging
//! - runs one figure, or all of them

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, decoherence_config_from_args, figure_config_from_args};
use crate::domain::{DecoherenceConfig, FigureConfig, FigureKind};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fpit` binary.
pub fn run() -> Result<(), AppError> {
    // Env-backed flags (FPIT_OUT_DIR) and RUST_LOG may live in a dotfile.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_logging(cli.common.verbose);

    let cfg = figure_config_from_args(&cli.common);
    let deco = cli
        .command
        .decoherence_args()
        .map(decoherence_config_from_args)
        .unwrap_or_default();

    match cli.command.kind() {
        Some(kind) => pipeline::run_figure(kind, &cfg, &deco, false).map(|_| ()),
        None => run_all(&cfg, &deco),
    }
}

/// Every figure in catalogue order.
///
/// A failing figure is logged and skipped; the first failure decides the
/// exit code once the rest have run.
pub fn run_all(cfg: &FigureConfig, deco: &DecoherenceConfig) -> Result<(), AppError> {
    let mut first_err: Option<AppError> = None;
    let mut done = 0usize;
    for kind in FigureKind::ALL {
        match pipeline::run_figure(kind, cfg, deco, true) {
            Ok(_) => done += 1,
            Err(e) => {
                error!(figure = kind.slug(), code = e.exit_code(), error = %e, "Figure failed");
                first_err.get_or_insert(e);
            }
        }
    }
    info!(done, total = FigureKind::ALL.len(), "All figures processed");
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Logs go to stderr; stdout carries the report.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Rewrite argv so `fpit` defaults to `fpit all`.
///
/// Rules:
/// - `fpit`                       -> `fpit all`
/// - `fpit --seed 7 ...`          -> `fpit all --seed 7 ...`
/// - `fpit --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("all".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "all".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_everything() {
        assert_eq!(rewrite_args(args(&["fpit"])), args(&["fpit", "all"]));
        assert_eq!(
            rewrite_args(args(&["fpit", "--seed", "7"])),
            args(&["fpit", "all", "--seed", "7"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(args(&["fpit", "lisa"])), args(&["fpit", "lisa"]));
        assert_eq!(rewrite_args(args(&["fpit", "--help"])), args(&["fpit", "--help"]));
    }

    #[test]
    fn rewritten_argv_parses() {
        let cli = Cli::try_parse_from(rewrite_args(args(&["fpit", "--points", "12"]))).unwrap();
        assert_eq!(cli.command.kind(), None);
        let deco = decoherence_config_from_args(cli.command.decoherence_args().unwrap());
        assert_eq!(deco.points, 12);
    }
}
