// git-fancy - A guided Git commit assistant.
// Copyright (C) 2025 Jean-Philippe Cugnet <jean-philippe@cugnet.eu>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3 of the License.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! The repository inspector.
//!
//! [`Repo`] is the seam between the guided commit workflow and the underlying
//! version-control system. Queries are fail-soft: any invocation error maps
//! to a safe default ("no data") so a transient Git error — for instance a
//! branch with no upstream — never crashes the workflow. Actions are the
//! opposite: they report failures, carrying the captured stderr.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    process::{self, ProcessError},
    tracing::LogResult as _,
};

/// The project manifest file checked before offering a version bump.
const MANIFEST_FILE_NAME: &str = "package.json";

/// An error that can occur when getting the Git repo root.
#[derive(Debug, Error)]
pub enum RepoRootError {
    /// The git command cannot be run or its output cannot be decoded.
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// Git itself has returned an error.
    #[error("{0}")]
    Git(String),
}

/// An error that can occur when issuing a repository action.
#[derive(Debug, Error)]
pub enum GitError {
    /// The command cannot be run or its output cannot be decoded.
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// The command ran but reported a failure.
    #[error("`{command}` has returned an error: {stderr}")]
    Failed {
        /// The command that failed.
        command: String,
        /// The stderr captured from the command.
        stderr: String,
    },
}

/// An ephemeral snapshot of the repository state.
///
/// Computed fresh each time it is needed, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Whether the current directory is inside a working tree.
    pub is_repository: bool,
    /// The tracked changed paths, as porcelain status lines.
    pub changed_files: Vec<String>,
    /// The staged paths.
    pub staged_files: Vec<String>,
    /// Whether any remote is configured.
    pub has_remote: bool,
    /// One-line summaries of the commits ahead of the remote.
    pub commits_ahead: Vec<String>,
    /// Whether the working tree is clean.
    pub is_working_tree_clean: bool,
}

/// The interface between the workflow and the version-control system.
pub trait Repo {
    /// Returns whether the current directory is inside a working tree.
    fn is_repository(&self) -> bool;

    /// Returns the tracked changed paths, untracked files excluded.
    fn changed_files(&self) -> Vec<String>;

    /// Returns the staged paths.
    fn staged_files(&self) -> Vec<String>;

    /// Returns whether there are staged changes.
    fn has_staged_changes(&self) -> bool {
        !self.staged_files().is_empty()
    }

    /// Returns whether there are uncommitted changes, untracked included.
    fn has_uncommitted_changes(&self) -> bool;

    /// Returns whether any remote is configured.
    fn has_remote(&self) -> bool;

    /// Returns one-line summaries of the commits ahead of the remote.
    ///
    /// Empty when there is no remote or when the query fails, e.g. when the
    /// current branch has no upstream.
    fn commits_ahead(&self) -> Vec<String>;

    /// Returns whether the working tree is clean.
    ///
    /// This is not the complement of [`Repo::has_uncommitted_changes`]: both
    /// report their safe default on a query failure, so a failed query is
    /// "not clean" *and* "no uncommitted changes".
    fn is_working_tree_clean(&self) -> bool;

    /// Returns the name of the current branch.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Returns whether a project manifest is present.
    fn has_manifest(&self) -> bool;

    /// Stages every change in the working tree.
    fn stage_all(&self) -> Result<(), GitError>;

    /// Stages an explicit list of files.
    fn stage(&self, files: &[String]) -> Result<(), GitError>;

    /// Creates a commit with the given message.
    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Pushes the given branch to `origin`.
    fn push(&self, branch: &str) -> Result<(), GitError>;

    /// Bumps the package version with `npm version`.
    fn bump_version(&self, kind: &str) -> Result<(), GitError>;

    /// Aggregates the queries into a state snapshot.
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            is_repository: self.is_repository(),
            changed_files: self.changed_files(),
            staged_files: self.staged_files(),
            has_remote: self.has_remote(),
            commits_ahead: self.commits_ahead(),
            is_working_tree_clean: self.is_working_tree_clean(),
        }
    }
}

/// The production repository inspector, shelling out to `git` and `npm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRepo;

impl GitRepo {
    /// Runs a fail-soft query, returning its trimmed stdout.
    fn query(&self, args: &[&str]) -> Option<String> {
        let exec = process::run("git", args).ok()?;
        exec.success.then(|| exec.stdout.trim().to_owned())
    }

    /// Runs an action, reporting a failure with the captured stderr.
    fn action(&self, program: &str, args: &[&str]) -> Result<(), GitError> {
        let exec = process::run(program, args)?;

        if exec.success {
            Ok(())
        } else {
            tracing::debug!(status_code = ?exec.status_code, "action failed");
            Err(GitError::Failed {
                command: format!("{program} {}", args.join(" ")),
                stderr: exec.stderr.trim().to_owned(),
            })
            .log_err()
        }
    }
}

impl Repo for GitRepo {
    fn is_repository(&self) -> bool {
        self.query(&["rev-parse", "--is-inside-work-tree"])
            .is_some_and(|stdout| stdout == "true")
    }

    fn changed_files(&self) -> Vec<String> {
        self.query(&["status", "--porcelain"])
            .map(|stdout| tracked_changes(&stdout))
            .unwrap_or_default()
    }

    fn staged_files(&self) -> Vec<String> {
        self.query(&["diff", "--cached", "--name-only"])
            .map(|stdout| lines(&stdout))
            .unwrap_or_default()
    }

    fn has_uncommitted_changes(&self) -> bool {
        self.query(&["status", "--porcelain"])
            .is_some_and(|stdout| !stdout.is_empty())
    }

    fn has_remote(&self) -> bool {
        self.query(&["remote"])
            .is_some_and(|stdout| !stdout.is_empty())
    }

    fn commits_ahead(&self) -> Vec<String> {
        let Some(branch) = self.query(&["branch", "--show-current"]) else {
            return vec![];
        };

        self.query(&["log", &format!("origin/{branch}..HEAD"), "--oneline"])
            .map(|stdout| lines(&stdout))
            .unwrap_or_default()
    }

    fn is_working_tree_clean(&self) -> bool {
        self.query(&["status", "--porcelain"])
            .is_some_and(|stdout| stdout.is_empty())
    }

    fn current_branch(&self) -> Result<String, GitError> {
        let exec = process::run("git", &["branch", "--show-current"])?;

        if exec.success {
            Ok(exec.stdout.trim().to_owned())
        } else {
            Err(GitError::Failed {
                command: String::from("git branch --show-current"),
                stderr: exec.stderr.trim().to_owned(),
            })
            .log_err()
        }
    }

    fn has_manifest(&self) -> bool {
        Path::new(MANIFEST_FILE_NAME).exists()
    }

    fn stage_all(&self) -> Result<(), GitError> {
        self.action("git", &["add", "."])
    }

    fn stage(&self, files: &[String]) -> Result<(), GitError> {
        let mut args = vec!["add"];
        args.extend(files.iter().map(String::as_str));
        self.action("git", &args)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.action("git", &["commit", "-m", message])
    }

    fn push(&self, branch: &str) -> Result<(), GitError> {
        self.action("git", &["push", "origin", branch])
    }

    fn bump_version(&self, kind: &str) -> Result<(), GitError> {
        self.action("npm", &["version", kind])
    }
}

/// Returns the path of the Git repo root.
pub fn repo_root() -> Result<PathBuf, RepoRootError> {
    let exec = process::run("git", &["rev-parse", "--show-toplevel"])?;

    if exec.success {
        Ok(PathBuf::from(exec.stdout.trim()))
    } else {
        Err(RepoRootError::Git(exec.stderr.trim().to_owned())).log_err()
    }
}

/// Splits a command output into its non-empty lines.
fn lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Extracts the tracked changes from a porcelain status output.
///
/// Untracked files are excluded: staging them is an explicit decision, not
/// something the workflow considers a pending change.
fn tracked_changes(porcelain: &str) -> Vec<String> {
    porcelain
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("??"))
        .map(ToOwned::to_owned)
        .collect()
}
