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

//! The settings store.
//!
//! Settings are a flat record of behavioral toggles persisted as JSON in the
//! `.git-fancy` directory at the repository root. The store is an explicit
//! value, never ambient state: commands construct one, load, and save whole
//! records — there are no partial patches on disk.

use std::{fs, io, path::PathBuf};

use colored::Colorize as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    repo::{RepoRootError, repo_root},
    tracing::LogResult as _,
};

/// The name of the git-fancy configuration directory.
pub const CONFIG_DIR_NAME: &str = ".git-fancy";

/// The name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// The name of the default commit message style.
pub const DEFAULT_STYLE: &str = "clean";

/// An error that can occur when loading the settings.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An error has occurred while reading the settings file.
    #[error("Failed to read {SETTINGS_FILE_NAME}")]
    Read(#[source] io::Error),
    /// The settings file cannot be parsed.
    #[error("Invalid settings in {SETTINGS_FILE_NAME}")]
    Parse(#[source] serde_json::Error),
}

/// An error that can occur when saving the settings.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The configuration directory cannot be created.
    #[error("Failed to create the {CONFIG_DIR_NAME} directory")]
    CreateDir(#[source] io::Error),
    /// The settings cannot be serialized.
    #[error("Failed to serialize the settings")]
    Serialize(#[source] serde_json::Error),
    /// An error has occurred while writing the settings file.
    #[error("Failed to write {SETTINGS_FILE_NAME}")]
    Write(#[source] io::Error),
}

/// The behavioral toggles of the guided commit workflow.
///
/// Serialized with camelCase keys, so a hand-written `settings.json` reads
/// naturally as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Whether to echo the settings at the start of the workflow.
    pub log_settings: bool,
    /// Whether to offer the staging step.
    pub trigger_git_add: bool,
    /// Whether to offer the npm version bump step.
    pub trigger_npm: bool,
    /// Whether to run the commit message formatter.
    pub trigger_message_formatter: bool,
    /// Whether to offer the push step.
    pub trigger_push: bool,
    /// The name of the commit message style to apply.
    pub commit_message_style: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_settings: false,
            trigger_git_add: true,
            trigger_npm: true,
            trigger_message_formatter: true,
            trigger_push: true,
            commit_message_style: String::from(DEFAULT_STYLE),
        }
    }
}

impl Settings {
    /// Prints the settings as a human-readable report.
    pub fn display(&self) {
        println!("\n{}", "Current settings:".bold());
        println!("{}", "---------------------------".cyan());
        display_toggle("Settings logging", self.log_settings);
        display_toggle("Git add step", self.trigger_git_add);
        display_toggle("npm version step", self.trigger_npm);
        display_toggle("Commit message formatter", self.trigger_message_formatter);
        display_toggle("Push step", self.trigger_push);
        println!(
            "{} {}",
            "Commit message style:".green(),
            self.commit_message_style.magenta()
        );
        println!("{}", "---------------------------".cyan());
    }
}

/// Prints one toggle of the settings report.
fn display_toggle(label: &str, enabled: bool) {
    let state = if enabled {
        "Enabled".yellow()
    } else {
        "Disabled".red()
    };
    println!("{} {state}", format!("{label}:").green());
}

/// The store for the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// The path of the settings file.
    file: PathBuf,
}

impl SettingsStore {
    /// Opens the store of the enclosing repository.
    pub fn open() -> Result<Self, RepoRootError> {
        Ok(Self::in_dir(config_dir()?))
    }

    /// Opens the store backed by the given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            file: dir.into().join(SETTINGS_FILE_NAME),
        }
    }

    /// Loads the settings, falling back to the defaults.
    ///
    /// An absent file is not an error: it yields the default record without
    /// writing anything to disk.
    pub fn load(&self) -> Result<Settings, LoadError> {
        match fs::read_to_string(&self.file) {
            Ok(settings) => serde_json::from_str(&settings)
                .map_err(LoadError::Parse)
                .log_err(),

            Err(error) => match error.kind() {
                io::ErrorKind::NotFound => Ok(Settings::default()),
                _ => Err(LoadError::Read(error)).log_err(),
            },
        }
    }

    /// Saves the whole settings record.
    pub fn save(&self, settings: &Settings) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(SaveError::Serialize)
            .log_err()?;

        if let Some(dir) = self.file.parent() {
            fs::create_dir_all(dir)
                .map_err(SaveError::CreateDir)
                .log_err()?;
        }

        fs::write(&self.file, format!("{json}\n"))
            .map_err(SaveError::Write)
            .log_err()
    }
}

/// Returns the path of the git-fancy configuration directory.
pub fn config_dir() -> Result<PathBuf, RepoRootError> {
    Ok(repo_root()?.join(CONFIG_DIR_NAME))
}

#[cfg(test)]
mod test {
    #![allow(clippy::pedantic, clippy::restriction)]

    use assert_fs::TempDir;

    use super::*;

    #[test]
    fn load_returns_the_defaults_when_the_file_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::in_dir(temp_dir.path());

        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn defaults_match_the_documented_record() {
        let settings = Settings::default();

        assert!(!settings.log_settings);
        assert!(settings.trigger_git_add);
        assert!(settings.trigger_npm);
        assert!(settings.trigger_message_formatter);
        assert!(settings.trigger_push);
        assert_eq!(settings.commit_message_style, "clean");
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::in_dir(temp_dir.path());

        let settings = Settings {
            log_settings: true,
            trigger_npm: false,
            commit_message_style: String::from("compact"),
            ..Settings::default()
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn settings_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        let object = json.as_object().unwrap();

        assert!(object.contains_key("logSettings"));
        assert!(object.contains_key("triggerGitAdd"));
        assert!(object.contains_key("triggerNpm"));
        assert!(object.contains_key("triggerMessageFormatter"));
        assert!(object.contains_key("triggerPush"));
        assert!(object.contains_key("commitMessageStyle"));
    }

    #[test]
    fn missing_keys_fall_back_to_their_default() {
        let settings: Settings =
            serde_json::from_str(r#"{"triggerPush": false}"#).unwrap();

        assert!(!settings.trigger_push);
        assert!(settings.trigger_git_add);
        assert_eq!(settings.commit_message_style, "clean");
    }
}
