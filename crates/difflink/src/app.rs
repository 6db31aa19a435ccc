//! One conversion run: read the comment, load the PR files, rewrite, and
//! report whether anything changed.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::converter::rewrite;
use crate::domain::file::FileSet;
use crate::infra::pr_files::{self, CommandRunner, PrFilesError};

/// Exit status when no mention was linked.
pub const EXIT_UNCHANGED: u8 = 1;
/// Exit status when the run failed before or while converting.
pub const EXIT_FAILURE: u8 = 2;

/// Where the pull request file inventory comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSource {
    /// Query `gh pr-files` for this pull request number.
    PullRequest(u64),
    /// Read a PR files JSON document from disk.
    JsonFile(PathBuf),
}

impl FileSource {
    /// Picks the inventory source from the configured options.
    ///
    /// A JSON file takes precedence over the pull request number.
    ///
    /// # Errors
    /// Returns [`AppError::MissingPrNumber`] when neither option is set.
    pub fn from_options(
        pr_number: Option<u64>,
        files_path: Option<PathBuf>,
    ) -> Result<Self, AppError> {
        match (files_path, pr_number) {
            (Some(files_path), _) => Ok(Self::JsonFile(files_path)),
            (None, Some(pr_number)) => Ok(Self::PullRequest(pr_number)),
            (None, None) => Err(AppError::MissingPrNumber),
        }
    }

    fn load(&self, runner: &dyn CommandRunner) -> Result<FileSet, PrFilesError> {
        match self {
            Self::PullRequest(pr_number) => pr_files::fetch_pr_files(runner, *pr_number),
            Self::JsonFile(path) => pr_files::load_pr_files(path),
        }
    }
}

/// Settings for a single run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub file_source: FileSource,
    /// Comment body file; standard input is used when absent.
    pub input_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("PR_NUMBER environment variable is required")]
    MissingPrNumber,
    #[error("Failed to read comment body: {0}")]
    ReadInput(#[source] io::Error),
    #[error("Failed to write converted comment body: {0}")]
    WriteOutput(#[source] io::Error),
    #[error(transparent)]
    PrFiles(#[from] PrFilesError),
}

/// Whether the run linked any mention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// At least one mention was linked; `links` counts them.
    Changed { links: usize },
    /// The body was echoed as read.
    Unchanged,
}

impl Outcome {
    /// Process exit status for this outcome: `0` when links were added and
    /// [`EXIT_UNCHANGED`] otherwise.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Changed { .. } => 0,
            Self::Unchanged => EXIT_UNCHANGED,
        }
    }
}

/// Reads the comment body, converts file references, and writes the result
/// followed by a newline to `output`.
///
/// # Errors
/// Returns an error when the input cannot be read, the PR files cannot be
/// loaded, or the output cannot be written. The converter is not invoked
/// after a failure.
pub fn run(
    config: &RunConfig,
    runner: &dyn CommandRunner,
    stdin: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<Outcome, AppError> {
    match &config.file_source {
        FileSource::PullRequest(pr_number) => {
            info!("Starting diff link conversion for PR #{pr_number}");
        }
        FileSource::JsonFile(path) => {
            info!("Starting diff link conversion for {}", path.display());
        }
    }

    let comment_body = read_comment_body(config, stdin)?;
    let files = config.file_source.load(runner)?;

    info!("Processing file references");
    let converted = rewrite(&comment_body, &files);

    output
        .write_all(converted.text.as_bytes())
        .and_then(|()| output.write_all(b"\n"))
        .and_then(|()| output.flush())
        .map_err(AppError::WriteOutput)?;

    if converted.changed {
        info!(
            links = converted.links,
            "Diff link conversion completed with changes"
        );

        return Ok(Outcome::Changed {
            links: converted.links,
        });
    }

    info!("Diff link conversion completed without changes");

    Ok(Outcome::Unchanged)
}

fn read_comment_body(config: &RunConfig, stdin: &mut dyn Read) -> Result<String, AppError> {
    if let Some(input_path) = &config.input_path {
        debug!(path = %input_path.display(), "Reading comment body from file");

        return fs::read_to_string(input_path).map_err(AppError::ReadInput);
    }

    let mut comment_body = String::new();
    stdin
        .read_to_string(&mut comment_body)
        .map_err(AppError::ReadInput)?;

    Ok(comment_body)
}
