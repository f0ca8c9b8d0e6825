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

//! The custom format store.
//!
//! A format is a named mapping from commit-type token to a prefix string,
//! e.g. `feat` to `[feat]` or `feat:`. The whole collection is stored as one
//! JSON object in the `.git-fancy` directory; every mutation writes the
//! record back in full.

use std::{fs, io, path::PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    repo::RepoRootError,
    settings::{CONFIG_DIR_NAME, config_dir},
    tracing::LogResult as _,
};

/// The name of the formats file.
pub const FORMATS_FILE_NAME: &str = "formats.json";

/// The commit-type tokens a format maps to prefixes.
pub const COMMIT_TYPES: [&str; 7] =
    ["feat", "fix", "chore", "docs", "style", "refactor", "test"];

/// A commit message format: commit-type token to prefix string.
pub type Format = IndexMap<String, String>;

/// An error that can occur when loading the formats.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An error has occurred while reading the formats file.
    #[error("Failed to read {FORMATS_FILE_NAME}")]
    Read(#[source] io::Error),
    /// The formats file cannot be parsed.
    #[error("Invalid formats in {FORMATS_FILE_NAME}")]
    Parse(#[source] serde_json::Error),
}

/// An error that can occur when saving the formats.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The configuration directory cannot be created.
    #[error("Failed to create the {CONFIG_DIR_NAME} directory")]
    CreateDir(#[source] io::Error),
    /// The formats cannot be serialized.
    #[error("Failed to serialize the formats")]
    Serialize(#[source] serde_json::Error),
    /// An error has occurred while writing the formats file.
    #[error("Failed to write {FORMATS_FILE_NAME}")]
    Write(#[source] io::Error),
}

/// The collection of custom formats, keyed by name.
///
/// Insertion order is preserved: formats list and export in the order they
/// were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Formats {
    /// The formats, by name.
    formats: IndexMap<String, Format>,
}

impl Formats {
    /// Returns whether there are no formats.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Returns whether a format with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Gets a format by name.
    pub fn get(&self, name: &str) -> Option<&Format> {
        self.formats.get(name)
    }

    /// Iterates over the format names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Iterates over the formats, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Format)> {
        self.formats
            .iter()
            .map(|(name, format)| (name.as_str(), format))
    }

    /// Inserts a format under the given name.
    pub fn insert(&mut self, name: impl Into<String>, format: Format) {
        self.formats.insert(name.into(), format);
    }

    /// Removes a format by name.
    pub fn remove(&mut self, name: &str) -> Option<Format> {
        self.formats.shift_remove(name)
    }
}

/// The store for the formats file.
#[derive(Debug, Clone)]
pub struct FormatStore {
    /// The path of the formats file.
    file: PathBuf,
}

impl FormatStore {
    /// Opens the store of the enclosing repository.
    pub fn open() -> Result<Self, RepoRootError> {
        Ok(Self::in_dir(config_dir()?))
    }

    /// Opens the store backed by the given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            file: dir.into().join(FORMATS_FILE_NAME),
        }
    }

    /// Loads the formats, falling back to an empty collection.
    pub fn load(&self) -> Result<Formats, LoadError> {
        match fs::read_to_string(&self.file) {
            Ok(formats) => serde_json::from_str(&formats)
                .map_err(LoadError::Parse)
                .log_err(),

            Err(error) => match error.kind() {
                io::ErrorKind::NotFound => Ok(Formats::default()),
                _ => Err(LoadError::Read(error)).log_err(),
            },
        }
    }

    /// Saves the whole formats record.
    pub fn save(&self, formats: &Formats) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(formats)
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
