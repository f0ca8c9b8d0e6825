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

//! The `run` subcommand: the guided commit workflow.
//!
//! The workflow is a linear-with-branches state machine: display the
//! repository state, optionally stage, then either take the no-changes
//! branch or compose, format, confirm and commit, before the optional
//! version-bump and push steps. When the user rejects the formatted message,
//! only the composition loop restarts: staging is not re-offered and the
//! state report is not re-rendered.

use std::{env, path::PathBuf};

use clap::Parser;
use colored::Colorize as _;
use eyre::{Context as _, Result};
use itertools::Itertools as _;

use crate::{
    error,
    formats::{FormatStore, Formats},
    formatter::{self, CommitParts, DefaultTemplates},
    helpers::ensure_in_repository,
    prompt::{InputValidation, Prompt, Terminal},
    repo::{GitRepo, Repo, Snapshot},
    settings::{Settings, SettingsStore},
    success, warning,
};

/// The commit types offered by the message formatter.
const COMMIT_TYPES: [&str; 6] =
    ["feat", "fix", "chore", "docs", "style", "refactor"];

/// The bump kinds accepted by `npm version`.
const VERSION_KINDS: [&str; 7] = [
    "patch",
    "minor",
    "major",
    "prepatch",
    "preminor",
    "premajor",
    "prerelease",
];

/// The run command.
#[derive(Debug, Parser)]
pub struct Run {
    /// The directory in which to run the workflow.
    path: Option<PathBuf>,
    /// Skip the npm version bump for this invocation.
    #[arg(long, short = 'n')]
    skip_npm: bool,
    /// Skip the commit message formatter for this invocation.
    #[arg(long, short = 'm')]
    skip_format: bool,
}

impl super::Command for Run {
    fn run(&self) -> Result<()> {
        if let Some(path) = &self.path {
            env::set_current_dir(path).wrap_err_with(|| {
                format!("Failed to change into {}", path.display())
            })?;
        }

        let repo = GitRepo;
        ensure_in_repository(&repo)?;

        let settings = SettingsStore::open()?.load()?;
        let formats = FormatStore::open()?.load()?;
        let defaults = DefaultTemplates::load()?;

        Workflow {
            prompt: &mut Terminal,
            repo: &repo,
            settings,
            defaults,
            formats,
            skip_npm: self.skip_npm,
            skip_format: self.skip_format,
        }
        .run()
    }
}

/// The guided commit workflow.
struct Workflow<'a, P, R> {
    /// The prompt used to ask the questions.
    prompt: &'a mut P,
    /// The repository inspector.
    repo: &'a R,
    /// The settings driving the optional steps.
    settings: Settings,
    /// The built-in style templates.
    defaults: DefaultTemplates,
    /// The custom formats.
    formats: Formats,
    /// Whether the version bump is suppressed for this invocation.
    skip_npm: bool,
    /// Whether the formatter is suppressed for this invocation.
    skip_format: bool,
}

impl<P: Prompt, R: Repo> Workflow<'_, P, R> {
    /// Runs the workflow to completion.
    fn run(mut self) -> Result<()> {
        if self.settings.log_settings {
            self.settings.display();
        }

        display_snapshot(&self.repo.snapshot());

        let changed = self.repo.changed_files();

        if self.settings.trigger_git_add && !changed.is_empty() {
            self.stage_files()?;
        }

        if !self.settings.trigger_git_add
            && !self.repo.has_staged_changes()
            && !self.repo.has_uncommitted_changes()
        {
            return self.handle_no_changes();
        }

        if !changed.is_empty() {
            let message = self.compose_until_confirmed()?;

            // Staging is optional, so re-check before committing: skipping
            // here is a notice, not an error.
            if self.repo.has_staged_changes() {
                self.repo.commit(message.trim())?;
                success!("Commit created successfully!");
            } else {
                warning!(
                    "No changes staged for commit. Skipping commit step."
                );
            }
        }

        if self.settings.trigger_npm
            && !self.skip_npm
            && self.repo.has_manifest()
        {
            self.bump_version()?;
        }

        self.push_or_skip()
    }

    /// Returns whether the message formatter is active for this invocation.
    fn formatter_enabled(&self) -> bool {
        self.settings.trigger_message_formatter && !self.skip_format
    }

    /// Offers to stage all, some, or none of the changed files.
    fn stage_files(&mut self) -> Result<()> {
        let choice = self.prompt.select(
            "What files would you like to add?",
            &["All files", "Specific files", "No files"],
            0,
        )?;

        match choice.as_str() {
            "All files" => self.repo.stage_all()?,
            "Specific files" => {
                let files = self.prompt.input(
                    "Enter the files to add (comma separated):",
                    InputValidation::NonEmpty,
                )?;

                let files: Vec<String> = files
                    .split(',')
                    .map(str::trim)
                    .filter(|file| !file.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();

                self.repo.stage(&files)?;
            }
            _ => (),
        }

        Ok(())
    }

    /// Terminates the workflow when there is nothing to commit.
    ///
    /// With unpushed commits, offers to push them, bump the version or
    /// cancel; without, only a yes/no prompt to bump the version. This branch
    /// never falls through to the commit steps.
    fn handle_no_changes(&mut self) -> Result<()> {
        warning!("No changes to commit.");

        if self.repo.commits_ahead().is_empty() {
            if self.prompt.confirm(
                "No changes to commit. Would you like to update the npm \
                 version?",
                false,
            )? {
                self.bump_version()?;
            } else {
                warning!("No action taken. Exiting.");
            }
        } else {
            let choice = self.prompt.select(
                "There are no changes to commit. What would you like to do?",
                &[
                    "Push existing commits to remote",
                    "Update npm version",
                    "Cancel",
                ],
                0,
            )?;

            match choice.as_str() {
                "Push existing commits to remote" => self.push()?,
                "Update npm version" => self.bump_version()?,
                _ => (),
            }
        }

        Ok(())
    }

    /// Composes and formats a message until the user confirms it.
    ///
    /// On rejection, only the just-entered message is discarded.
    fn compose_until_confirmed(&mut self) -> Result<String> {
        loop {
            let parts = self.compose()?;
            let message = formatter::format_message(
                &self.settings.commit_message_style,
                &parts,
                &self.defaults,
                &self.formats,
            );

            if self.formatter_enabled() {
                println!("\n{}", "Formatted commit message:".cyan().bold());
                println!("{}\n", message.magenta());

                if !self.prompt.confirm("Does the commit look good?", true)? {
                    warning!("Commit aborted. Let's try again...");
                    continue;
                }
            }

            return Ok(message);
        }
    }

    /// Collects the commit message components.
    fn compose(&mut self) -> Result<CommitParts> {
        if self.formatter_enabled() {
            let commit_type = self.prompt.select(
                "Select the type of commit:",
                &COMMIT_TYPES,
                0,
            )?;
            let message = self.prompt.input(
                "Enter your commit message:",
                InputValidation::LongerThan(5),
            )?;
            let description = self.prompt.input(
                "Optional commit description (or press Enter to skip):",
                InputValidation::None,
            )?;

            Ok(CommitParts {
                commit_type,
                message,
                description,
            })
        } else {
            let message = self.prompt.input(
                "Enter your commit message:",
                InputValidation::NonEmpty,
            )?;

            Ok(CommitParts {
                message,
                ..CommitParts::default()
            })
        }
    }

    /// Offers to bump the package version.
    ///
    /// Requires a clean working tree: when dirty, warns and skips without
    /// prompting. A failed bump is reported and the workflow continues.
    fn bump_version(&mut self) -> Result<()> {
        if !self.repo.is_working_tree_clean() {
            warning!(
                "Cannot update the npm version: the working tree is not \
                 clean. Commit or stash your changes first."
            );
            return Ok(());
        }

        if self
            .prompt
            .confirm("Would you like to update the npm version?", true)?
        {
            let kind = self.prompt.select(
                "Select the version type:",
                &VERSION_KINDS,
                0,
            )?;

            match self.repo.bump_version(&kind) {
                Ok(()) => success!("npm version updated successfully!"),
                Err(bump_error) => {
                    error!("Failed to update the npm version: {bump_error}");
                }
            }
        }

        Ok(())
    }

    /// Offers to push, or reports why the push step is skipped.
    fn push_or_skip(&mut self) -> Result<()> {
        if self.settings.trigger_push && self.repo.has_remote() {
            if self
                .prompt
                .confirm("Would you like to push the changes?", true)?
            {
                self.push()?;
            }
        } else if self.repo.has_remote() {
            success!("Alright, skipping push.");
        } else {
            success!("No remote configured. Skipping push.");
        }

        Ok(())
    }

    /// Pushes the current branch to origin.
    fn push(&mut self) -> Result<()> {
        let branch = self.repo.current_branch()?;
        self.repo.push(&branch)?;
        success!("Changes pushed successfully!");
        Ok(())
    }
}

/// Renders the repository state report.
fn display_snapshot(snapshot: &Snapshot) {
    println!("\n{}", "Project state:".bold());
    println!("{}", "---------------------------".cyan());

    display_entries("Changed files (not staged):", &snapshot.changed_files);
    println!();
    display_entries("Staged files:", &snapshot.staged_files);
    println!();

    if snapshot.has_remote {
        display_entries("Commits not pushed:", &snapshot.commits_ahead);
    } else {
        println!(
            "{} {}",
            "Commits not pushed:".green(),
            "No remote configured".yellow()
        );
    }

    println!("{}\n", "---------------------------".cyan());
}

/// Renders one list of the state report.
fn display_entries(label: &str, entries: &[String]) {
    if entries.is_empty() {
        println!("{} {}", label.green(), "None".yellow());
    } else {
        println!("{}", label.green());
        println!(
            "{}",
            entries
                .iter()
                .map(|entry| format!("  - {entry}"))
                .join("\n")
        );
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::pedantic, clippy::restriction)]

    use std::cell::RefCell;

    use crate::{
        prompt::{
            PromptError,
            script::{Answer, Script},
        },
        repo::GitError,
    };

    use super::*;

    /// A repository double recording the actions issued by the workflow.
    #[derive(Debug, Default)]
    struct FakeRepo {
        changed: Vec<String>,
        staged: RefCell<Vec<String>>,
        uncommitted: bool,
        remote: bool,
        ahead: Vec<String>,
        dirty: bool,
        manifest: bool,
        actions: RefCell<Vec<String>>,
    }

    impl FakeRepo {
        fn record(&self, action: String) {
            self.actions.borrow_mut().push(action);
        }

        fn actions(&self) -> Vec<String> {
            self.actions.borrow().clone()
        }
    }

    impl Repo for FakeRepo {
        fn is_repository(&self) -> bool {
            true
        }

        fn changed_files(&self) -> Vec<String> {
            self.changed.clone()
        }

        fn staged_files(&self) -> Vec<String> {
            self.staged.borrow().clone()
        }

        fn has_uncommitted_changes(&self) -> bool {
            self.uncommitted
        }

        fn has_remote(&self) -> bool {
            self.remote
        }

        fn commits_ahead(&self) -> Vec<String> {
            self.ahead.clone()
        }

        fn is_working_tree_clean(&self) -> bool {
            !self.dirty
        }

        fn current_branch(&self) -> Result<String, GitError> {
            Ok(String::from("main"))
        }

        fn has_manifest(&self) -> bool {
            self.manifest
        }

        fn stage_all(&self) -> Result<(), GitError> {
            self.staged.borrow_mut().push(String::from("<all>"));
            self.record(String::from("stage_all"));
            Ok(())
        }

        fn stage(&self, files: &[String]) -> Result<(), GitError> {
            self.staged.borrow_mut().extend(files.iter().cloned());
            self.record(format!("stage {}", files.join(" ")));
            Ok(())
        }

        fn commit(&self, message: &str) -> Result<(), GitError> {
            self.record(format!("commit {message}"));
            Ok(())
        }

        fn push(&self, branch: &str) -> Result<(), GitError> {
            self.record(format!("push {branch}"));
            Ok(())
        }

        fn bump_version(&self, kind: &str) -> Result<(), GitError> {
            self.record(format!("bump {kind}"));
            Ok(())
        }
    }

    fn run_workflow(
        script: &mut Script,
        repo: &FakeRepo,
        settings: Settings,
    ) -> Result<()> {
        Workflow {
            prompt: script,
            repo,
            settings,
            defaults: DefaultTemplates::load().unwrap(),
            formats: Formats::default(),
            skip_npm: false,
            skip_format: false,
        }
        .run()
    }

    fn quiet_settings() -> Settings {
        Settings {
            trigger_npm: false,
            trigger_push: false,
            ..Settings::default()
        }
    }

    #[test]
    fn stages_everything_then_commits() {
        let repo = FakeRepo {
            changed: vec![String::from(" M src/lib.rs")],
            ..FakeRepo::default()
        };

        let mut script = Script::new([
            Answer::Select(String::from("All files")),
            Answer::Select(String::from("feat")),
            Answer::Input(String::from("add feature x")),
            Answer::Input(String::new()),
            Answer::Confirm(true),
        ]);

        run_workflow(&mut script, &repo, quiet_settings()).unwrap();

        assert_eq!(
            repo.actions(),
            vec!["stage_all", "commit feat: add feature x"]
        );
        assert!(script.is_exhausted());
    }

    #[test]
    fn specific_files_are_split_on_commas() {
        let repo = FakeRepo {
            changed: vec![String::from(" M a.rs"), String::from(" M b.rs")],
            ..FakeRepo::default()
        };

        let mut script = Script::new([
            Answer::Select(String::from("Specific files")),
            Answer::Input(String::from("a.rs, b.rs")),
            Answer::Select(String::from("fix")),
            Answer::Input(String::from("repair the parser")),
            Answer::Input(String::new()),
            Answer::Confirm(true),
        ]);

        run_workflow(&mut script, &repo, quiet_settings()).unwrap();

        assert_eq!(
            repo.actions(),
            vec!["stage a.rs b.rs", "commit fix: repair the parser"]
        );
    }

    #[test]
    fn free_text_message_applies_the_clean_template_verbatim() {
        let repo = FakeRepo {
            changed: vec![String::from(" M src/lib.rs")],
            staged: RefCell::new(vec![String::from("src/lib.rs")]),
            uncommitted: true,
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_git_add: false,
            trigger_message_formatter: false,
            ..quiet_settings()
        };

        let mut script =
            Script::new([Answer::Input(String::from("fix bug"))]);

        run_workflow(&mut script, &repo, settings).unwrap();

        // The clean template is applied with empty type and description, and
        // the result is only trimmed as a whole at commit time.
        assert_eq!(repo.actions(), vec!["commit : fix bug"]);
        assert!(script.is_exhausted());
    }

    #[test]
    fn no_changes_with_unpushed_commits_offers_push_bump_or_cancel() {
        let repo = FakeRepo {
            remote: true,
            ahead: vec![String::from("abc123 previous work")],
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_git_add: false,
            ..Settings::default()
        };

        let mut script =
            Script::new([Answer::Select(String::from("Cancel"))]);

        run_workflow(&mut script, &repo, settings).unwrap();

        // The branch terminates the workflow: no composition, no push step.
        assert!(repo.actions().is_empty());
        assert!(script.is_exhausted());
        assert_eq!(script.questions().len(), 1);
    }

    #[test]
    fn no_changes_branch_can_push_the_unpushed_commits() {
        let repo = FakeRepo {
            remote: true,
            ahead: vec![String::from("abc123 previous work")],
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_git_add: false,
            ..Settings::default()
        };

        let mut script = Script::new([Answer::Select(String::from(
            "Push existing commits to remote",
        ))]);

        run_workflow(&mut script, &repo, settings).unwrap();

        assert_eq!(repo.actions(), vec!["push main"]);
    }

    #[test]
    fn no_changes_without_unpushed_commits_only_offers_a_bump() {
        let repo = FakeRepo {
            manifest: true,
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_git_add: false,
            ..Settings::default()
        };

        let mut script = Script::new([Answer::Confirm(false)]);

        run_workflow(&mut script, &repo, settings).unwrap();

        assert!(repo.actions().is_empty());
        assert!(script.is_exhausted());
    }

    #[test]
    fn rejecting_the_formatted_message_recomposes_without_restaging() {
        let repo = FakeRepo {
            changed: vec![String::from(" M src/lib.rs")],
            ..FakeRepo::default()
        };

        let mut script = Script::new([
            Answer::Select(String::from("All files")),
            Answer::Select(String::from("feat")),
            Answer::Input(String::from("first version")),
            Answer::Input(String::new()),
            Answer::Confirm(false),
            Answer::Select(String::from("fix")),
            Answer::Input(String::from("second version")),
            Answer::Input(String::new()),
            Answer::Confirm(true),
        ]);

        run_workflow(&mut script, &repo, quiet_settings()).unwrap();

        assert_eq!(
            repo.actions(),
            vec!["stage_all", "commit fix: second version"]
        );

        let staging_prompts = script
            .questions()
            .iter()
            .filter(|question| {
                question.as_str() == "What files would you like to add?"
            })
            .count();
        assert_eq!(staging_prompts, 1);
    }

    #[test]
    fn dirty_tree_skips_the_version_bump_without_prompting() {
        let repo = FakeRepo {
            dirty: true,
            manifest: true,
            uncommitted: true,
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_push: false,
            ..Settings::default()
        };

        let mut script = Script::new([]);

        run_workflow(&mut script, &repo, settings).unwrap();

        assert!(repo.actions().is_empty());
    }

    #[test]
    fn bump_collects_a_kind_from_the_fixed_enumeration() {
        let repo = FakeRepo {
            manifest: true,
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_push: false,
            ..Settings::default()
        };

        let mut script = Script::new([
            Answer::Confirm(true),
            Answer::Select(String::from("patch")),
        ]);

        run_workflow(&mut script, &repo, settings).unwrap();

        assert_eq!(repo.actions(), vec!["bump patch"]);
    }

    #[test]
    fn push_prompts_and_pushes_the_current_branch() {
        let repo = FakeRepo {
            remote: true,
            ..FakeRepo::default()
        };

        let settings = Settings {
            trigger_npm: false,
            ..Settings::default()
        };

        let mut script = Script::new([Answer::Confirm(true)]);

        run_workflow(&mut script, &repo, settings).unwrap();

        assert_eq!(repo.actions(), vec!["push main"]);
    }

    #[test]
    fn the_skip_format_flag_overrides_the_formatter_toggle() {
        let repo = FakeRepo {
            changed: vec![String::from(" M src/lib.rs")],
            staged: RefCell::new(vec![String::from("src/lib.rs")]),
            uncommitted: true,
            ..FakeRepo::default()
        };

        let mut script =
            Script::new([Answer::Input(String::from("quick fix"))]);

        let result = Workflow {
            prompt: &mut script,
            repo: &repo,
            settings: Settings {
                trigger_git_add: false,
                ..quiet_settings()
            },
            defaults: DefaultTemplates::load().unwrap(),
            formats: Formats::default(),
            skip_npm: false,
            skip_format: true,
        }
        .run();

        result.unwrap();
        assert_eq!(repo.actions(), vec!["commit : quick fix"]);
    }

    #[test]
    fn snapshot_aggregates_the_repository_queries() {
        let repo = FakeRepo {
            changed: vec![String::from(" M src/lib.rs")],
            remote: true,
            ahead: vec![String::from("abc123 previous work")],
            ..FakeRepo::default()
        };

        let snapshot = repo.snapshot();

        assert!(snapshot.is_repository);
        assert_eq!(snapshot.changed_files, vec![" M src/lib.rs"]);
        assert!(snapshot.staged_files.is_empty());
        assert!(snapshot.has_remote);
        assert_eq!(snapshot.commits_ahead, vec!["abc123 previous work"]);
        assert!(snapshot.is_working_tree_clean);
    }

    #[test]
    fn cancelling_a_prompt_aborts_with_the_cancellation_error() {
        let repo = FakeRepo {
            changed: vec![String::from(" M src/lib.rs")],
            ..FakeRepo::default()
        };

        let mut script = Script::new([Answer::Cancel]);

        let error = run_workflow(&mut script, &repo, quiet_settings())
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<PromptError>(),
            Some(PromptError::Cancelled)
        ));
        assert!(repo.actions().is_empty());
    }
}
