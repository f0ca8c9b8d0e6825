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

//! The `init` subcommand.

use std::fs;

use clap::Parser;
use eyre::{Context as _, Result};
use indoc::indoc;

use crate::{
    helpers::ensure_in_repository,
    hint,
    prompt::{InputValidation, Prompt as _, Terminal},
    repo::GitRepo,
    settings::{SettingsStore, config_dir},
    success, warning,
};

/// The init command.
#[derive(Debug, Parser)]
pub struct Init;

impl super::Command for Init {
    fn run(&self) -> Result<()> {
        ensure_in_repository(&GitRepo)?;

        let dir = config_dir()?;
        if dir.exists() {
            warning!("Directory {} already exists.", dir.display());
        } else {
            fs::create_dir_all(&dir)
                .wrap_err("Failed to create the configuration directory")?;
            success!("Directory {} created successfully!", dir.display());
        }

        let mut prompt = Terminal;

        if prompt.confirm(
            "Would you like to create a new commit message format?",
            false,
        )? {
            let name = prompt.input(
                "Enter the name of the new format:",
                InputValidation::NonEmpty,
            )?;
            super::format::add(&name)?;
        }

        let store = SettingsStore::open()?;
        let settings = store.load()?;

        if settings.log_settings {
            settings.display();
        }

        if prompt.confirm("Would you like to update the settings?", false)? {
            super::settings::update()?;
        } else {
            store.save(&settings)?;
            success!("Default settings saved successfully!");
        }

        hint!(
            "{}",
            indoc! {"
                You can now adjust the settings at any time with `git-fancy
                settings update`, and create your first guided commit with
                `git-fancy run`."}
        );

        Ok(())
    }
}
