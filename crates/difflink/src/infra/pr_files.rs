//! Pull request file inventory backed by the `gh pr-files` extension or a
//! JSON file with the same shape.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::file::{FileEntry, FileSet};

const GH_PROGRAM: &str = "gh";
const GH_PR_FILES_SUBCOMMAND: &str = "pr-files";

/// Process boundary for external commands.
///
/// Production uses [`RealCommandRunner`], while tests inject
/// `MockCommandRunner` to avoid depending on an installed `gh`.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs `command` to completion and captures its output.
    ///
    /// # Errors
    /// Returns an error when the process cannot be spawned.
    fn run(&self, command: &mut Command) -> std::io::Result<Output>;
}

pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, command: &mut Command) -> std::io::Result<Output> {
        command.output()
    }
}

#[derive(Debug, Error)]
pub enum PrFilesError {
    #[error("Failed to run `gh pr-files`. Make sure the gh-pr-files extension is installed: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("`gh pr-files {pr_number}` failed: {stderr}")]
    Command { pr_number: u64, stderr: String },
    #[error("Failed to read PR files from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid PR files JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct PrFilesResponse {
    files: Vec<FileEntry>,
}

/// Fetches the changed files of pull request `pr_number` via
/// `gh pr-files <pr_number>`.
///
/// # Errors
/// Returns an error when `gh` cannot be spawned, exits unsuccessfully, or
/// prints output that is not a PR files document.
pub fn fetch_pr_files(
    runner: &dyn CommandRunner,
    pr_number: u64,
) -> Result<FileSet, PrFilesError> {
    info!(pr_number, "Getting PR files with diff URLs");

    let output = runner
        .run(
            Command::new(GH_PROGRAM)
                .arg(GH_PR_FILES_SUBCOMMAND)
                .arg(pr_number.to_string()),
        )
        .map_err(PrFilesError::Spawn)?;

    if !output.status.success() {
        return Err(PrFilesError::Command {
            pr_number,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_pr_files(&String::from_utf8_lossy(&output.stdout))
}

/// Loads a PR files document from `path`.
///
/// # Errors
/// Returns an error when the file cannot be read or is not a PR files
/// document.
pub fn load_pr_files(path: &Path) -> Result<FileSet, PrFilesError> {
    info!(path = %path.display(), "Reading PR files");

    let content = fs::read_to_string(path).map_err(|source| PrFilesError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_pr_files(&content)
}

/// Parses `{"files": [{"path": ..., "url": ...}]}` into a [`FileSet`].
///
/// # Errors
/// Returns an error when `json` does not match that shape.
pub fn parse_pr_files(json: &str) -> Result<FileSet, PrFilesError> {
    let response: PrFilesResponse = serde_json::from_str(json)?;
    let file_set = FileSet::from_entries(response.files);
    debug!(files = file_set.len(), "Parsed PR files");

    Ok(file_set)
}
