use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use difflink::app::{self, EXIT_FAILURE, FileSource, RunConfig};
use difflink::infra::pr_files::RealCommandRunner;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Converts file references in a pull request comment into diff links.
///
/// Reads the comment body from standard input (or `--input`) and prints the
/// converted body. Exits with 0 when links were added, 1 when the body is
/// unchanged, and 2 on failure.
#[derive(Debug, Parser)]
#[command(name = "difflink", version)]
struct Cli {
    /// Pull request whose changed files are linked.
    #[arg(long = "pr", env = "PR_NUMBER")]
    pr_number: Option<u64>,
    /// Read the PR files JSON from this path instead of `gh pr-files`.
    #[arg(long = "files", env = "DIFFLINK_FILES")]
    files_path: Option<PathBuf>,
    /// Read the comment body from this path instead of standard input.
    #[arg(long = "input")]
    input_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let file_source = match FileSource::from_options(cli.pr_number, cli.files_path) {
        Ok(file_source) => file_source,
        Err(err) => {
            error!("{err}");

            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let config = RunConfig {
        file_source,
        input_path: cli.input_path,
    };

    match app::run(
        &config,
        &RealCommandRunner,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    ) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!("{err}");

            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Logs to stderr so stdout carries only the converted comment body.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
