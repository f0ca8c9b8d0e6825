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

//! The `format` subcommand.

use clap::{Parser, Subcommand};
use colored::Colorize as _;
use eyre::Result;

use crate::{
    error,
    formats::{COMMIT_TYPES, Format as CommitFormat, FormatStore},
    prompt::{InputValidation, Prompt, PromptError, Terminal},
    success, warning,
};

/// The format command.
#[derive(Debug, Parser)]
pub struct Format {
    /// The operation to apply to the commit message formats.
    #[command(subcommand)]
    command: FormatCommand,
}

/// The operations on the commit message formats.
#[derive(Debug, Subcommand)]
enum FormatCommand {
    /// Lists all commit message formats.
    List,
    /// Adds a commit message format.
    Add {
        /// The name of the format to add.
        name: String,
    },
    /// Removes a commit message format.
    Remove {
        /// The name of the format to remove.
        name: String,
    },
    /// Exports a commit message format as JSON.
    Export {
        /// The name of the format to export.
        name: String,
    },
    /// Exports and displays all commit message formats.
    ExportAll,
}

impl super::Command for Format {
    fn run(&self) -> Result<()> {
        match &self.command {
            FormatCommand::List => list(),
            FormatCommand::Add { name } => add(name),
            FormatCommand::Remove { name } => remove(name),
            FormatCommand::Export { name } => export(name),
            FormatCommand::ExportAll => export_all(),
        }
    }
}

/// Lists the available formats.
fn list() -> Result<()> {
    let formats = FormatStore::open()?.load()?;

    if formats.is_empty() {
        warning!(
            "No formats available. Use `git-fancy format add <name>` to add \
             a new format."
        );
        return Ok(());
    }

    println!("{}", "Available commit message formats:".bold());
    for name in formats.names() {
        println!("{}", format!("- {name}").cyan());
    }

    Ok(())
}

/// Adds a format, running the prefix wizard.
pub(super) fn add(name: &str) -> Result<()> {
    add_with(&mut Terminal, &FormatStore::open()?, name)
}

/// Adds a format to the given store.
///
/// Adding an existing name is a no-op: the wizard is not run and the stored
/// record is left unchanged.
fn add_with(
    prompt: &mut impl Prompt,
    store: &FormatStore,
    name: &str,
) -> Result<()> {
    let mut formats = store.load()?;

    if formats.contains(name) {
        error!("Format \"{name}\" already exists.");
        return Ok(());
    }

    let format = collect_format(prompt)?;
    formats.insert(name, format);
    store.save(&formats)?;

    success!("Format \"{name}\" added successfully!");
    Ok(())
}

/// Removes a format.
///
/// Removing a missing name is a no-op: nothing is written to disk.
fn remove(name: &str) -> Result<()> {
    let store = FormatStore::open()?;
    let mut formats = store.load()?;

    if formats.remove(name).is_none() {
        error!("Format \"{name}\" does not exist.");
        return Ok(());
    }

    store.save(&formats)?;
    success!("Format \"{name}\" removed successfully!");
    Ok(())
}

/// Prints one format as pretty JSON.
fn export(name: &str) -> Result<()> {
    let formats = FormatStore::open()?.load()?;

    let Some(format) = formats.get(name) else {
        error!("Format \"{name}\" does not exist.");
        return Ok(());
    };

    println!("{}", format!("Format \"{name}\":").bold());
    println!("{}", serde_json::to_string_pretty(format)?.cyan());
    Ok(())
}

/// Prints every format as an indented name/type/prefix listing.
fn export_all() -> Result<()> {
    let formats = FormatStore::open()?.load()?;

    if formats.is_empty() {
        warning!("No formats available to export.");
        return Ok(());
    }

    println!("{}", "Available formats:".bold());
    for (name, format) in formats.iter() {
        println!("{}", format!("- {name}:").cyan());
        for (commit_type, prefix) in format {
            println!("{}", format!("  {commit_type}: {prefix}").green());
        }
    }

    Ok(())
}

/// Asks for one prefix per commit type.
///
/// Prefixes are trimmed here, at collection time: this is the only trim point
/// of the format flow.
fn collect_format(
    prompt: &mut impl Prompt,
) -> Result<CommitFormat, PromptError> {
    let mut format = CommitFormat::new();

    for commit_type in COMMIT_TYPES {
        let prefix = prompt.input(
            &format!(
                "Enter the prefix for commit type \"{commit_type}\" (e.g. \
                 [{commit_type}], {commit_type}:, <{commit_type}>):"
            ),
            InputValidation::None,
        )?;

        format.insert(commit_type.to_owned(), prefix.trim().to_owned());
    }

    Ok(format)
}
