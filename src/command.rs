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

//! The git-fancy CLI.

mod format;
mod init;
mod run;
mod settings;

use clap::Parser;
use colored::Colorize as _;
use eyre::Result;

use self::{format::Format, init::Init, run::Run, settings::Settings};
use crate::{
    error, helpers::NotARepository, hint, prompt::PromptError,
    repo::RepoRootError,
};

/// A guided Git commit assistant.
#[derive(Debug, Parser)]
#[command(author, version = env!("VERSION_WITH_GIT"))]
pub enum GitFancy {
    /// Runs the guided commit workflow.
    Run(Run),
    /// Manages the commit message formats.
    Format(Format),
    /// Shows or updates the settings.
    Settings(Settings),
    /// Initialises the configuration.
    Init(Init),
}

/// A CLI command.
trait Command {
    /// Runs the command.
    fn run(&self) -> Result<()>;
}

impl GitFancy {
    /// Runs git-fancy.
    pub fn run() -> Result<()> {
        crate::tracing::init()?;

        let result = match Self::parse() {
            Self::Run(run) => run.run(),
            Self::Format(format) => format.run(),
            Self::Settings(settings) => settings.run(),
            Self::Init(init) => init.run(),
        };

        match result {
            Err(error) => handle_errors(&error),
            Ok(()) => Ok(()),
        }
    }
}

/// Reports a workflow error and terminates with the matching exit code.
///
/// The exit-code contract: 0 on normal completion and on user cancellation,
/// `exitcode::USAGE` when the command is not run from a Git repository, and
/// `exitcode::SOFTWARE` for any unexpected error. Commands already issued are
/// never rolled back.
fn handle_errors(error: &color_eyre::Report) -> Result<()> {
    if matches!(
        error.downcast_ref::<PromptError>(),
        Some(PromptError::Cancelled)
    ) {
        println!("\n{}", "Goodbye my friend 👋".red().bold());
        Ok(())
    } else if let Some(not_a_repository) =
        error.downcast_ref::<NotARepository>()
    {
        error!("{not_a_repository}.");
        std::process::exit(exitcode::USAGE);
    } else if let Some(repo_root_error) =
        error.downcast_ref::<RepoRootError>()
    {
        error!("{repo_root_error}");
        hint!(
            "git-fancy keeps its configuration at the root of a Git \
             repository. Run it from inside one."
        );
        std::process::exit(exitcode::USAGE);
    } else {
        error!("An unexpected error has occurred: {error:#}");
        std::process::exit(exitcode::SOFTWARE);
    }
}
