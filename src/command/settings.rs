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

//! The `settings` subcommand.

use clap::{Parser, Subcommand};
use eyre::Result;

use crate::{
    formats::{FormatStore, Formats},
    formatter::DefaultTemplates,
    prompt::{Prompt, PromptError, Terminal},
    settings::{Settings as StoredSettings, SettingsStore},
    success,
};

/// The settings command.
#[derive(Debug, Parser)]
pub struct Settings {
    /// The operation to apply to the settings.
    #[command(subcommand)]
    command: SettingsCommand,
}

/// The operations on the settings.
#[derive(Debug, Subcommand)]
enum SettingsCommand {
    /// Shows the current settings.
    Get,
    /// Updates the settings interactively.
    Update,
}

impl super::Command for Settings {
    fn run(&self) -> Result<()> {
        match &self.command {
            SettingsCommand::Get => get(),
            SettingsCommand::Update => update(),
        }
    }
}

/// Displays the current settings.
fn get() -> Result<()> {
    SettingsStore::open()?.load()?.display();
    Ok(())
}

/// Walks the update wizard and persists the whole record.
pub(super) fn update() -> Result<()> {
    let store = SettingsStore::open()?;
    let current = store.load()?;
    let formats = FormatStore::open()?.load()?;
    let defaults = DefaultTemplates::load()?;

    let updated =
        collect_settings(&mut Terminal, &current, &formats, &defaults)?;
    store.save(&updated)?;

    success!("Settings updated successfully!");
    Ok(())
}

/// Asks a confirmation per toggle, then a style among the custom formats and
/// the built-in styles.
fn collect_settings(
    prompt: &mut impl Prompt,
    current: &StoredSettings,
    formats: &Formats,
    defaults: &DefaultTemplates,
) -> Result<StoredSettings, PromptError> {
    let log_settings =
        prompt.confirm("Enable settings logging?", current.log_settings)?;
    let trigger_git_add = prompt
        .confirm("Enable the git add feature?", current.trigger_git_add)?;
    let trigger_npm = prompt
        .confirm("Enable the npm versioning feature?", current.trigger_npm)?;
    let trigger_message_formatter = prompt.confirm(
        "Enable the commit message formatter feature?",
        current.trigger_message_formatter,
    )?;
    let trigger_push = prompt
        .confirm("Enable the push to server feature?", current.trigger_push)?;

    // Custom formats come first, then the built-in styles.
    let styles: Vec<&str> = formats.names().chain(defaults.names()).collect();
    let starting_cursor = styles
        .iter()
        .position(|&style| style == current.commit_message_style)
        .unwrap_or(0);

    let commit_message_style = prompt.select(
        "Select the default commit message style:",
        &styles,
        starting_cursor,
    )?;

    Ok(StoredSettings {
        log_settings,
        trigger_git_add,
        trigger_npm,
        trigger_message_formatter,
        trigger_push,
        commit_message_style,
    })
}

#[cfg(test)]
mod test {
    #![allow(clippy::pedantic, clippy::restriction)]

    use indexmap::indexmap;

    use crate::prompt::script::{Answer, Script};

    use super::*;

    #[test]
    fn collect_settings_builds_the_whole_record() {
        let mut script = Script::new([
            Answer::Confirm(true),
            Answer::Confirm(false),
            Answer::Confirm(true),
            Answer::Confirm(true),
            Answer::Confirm(false),
            Answer::Select(String::from("modern")),
        ]);

        let settings = collect_settings(
            &mut script,
            &StoredSettings::default(),
            &Formats::default(),
            &DefaultTemplates::load().unwrap(),
        )
        .unwrap();

        assert!(settings.log_settings);
        assert!(!settings.trigger_git_add);
        assert!(settings.trigger_npm);
        assert!(settings.trigger_message_formatter);
        assert!(!settings.trigger_push);
        assert_eq!(settings.commit_message_style, "modern");
        assert!(script.is_exhausted());
    }

    #[test]
    fn custom_formats_are_offered_as_styles() {
        let mut formats = Formats::default();
        formats.insert(
            "mine",
            indexmap! { String::from("feat") => String::from("[feat]") },
        );

        let mut script = Script::new([
            Answer::Confirm(false),
            Answer::Confirm(true),
            Answer::Confirm(true),
            Answer::Confirm(true),
            Answer::Confirm(true),
            Answer::Select(String::from("mine")),
        ]);

        let settings = collect_settings(
            &mut script,
            &StoredSettings::default(),
            &formats,
            &DefaultTemplates::load().unwrap(),
        )
        .unwrap();

        assert_eq!(settings.commit_message_style, "mine");
    }
}
