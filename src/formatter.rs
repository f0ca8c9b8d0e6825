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

//! The commit message formatter.
//!
//! Styles resolve through a two-tier fallback: the built-in templates first,
//! then the custom formats, then the `clean` built-in as a last resort.
//! Resolution never fails: an unresolvable style degrades to `clean` with a
//! warning, never with an error.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{formats::Formats, settings::DEFAULT_STYLE, warning};

/// The built-in templates, shipped with the binary.
const DEFAULT_TEMPLATES: &str = include_str!("../templates/default_formats.json");

/// An error that can occur when loading the built-in templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The built-in templates cannot be parsed.
    #[error("Failed to parse the built-in templates")]
    Parse(#[from] serde_json::Error),
    /// The built-in templates are missing the `clean` style.
    #[error("The built-in templates are missing the {DEFAULT_STYLE} style")]
    MissingDefault,
}

/// The components of a commit message collected by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitParts {
    /// The commit-type token, empty when the formatter is disabled.
    pub commit_type: String,
    /// The commit message itself.
    pub message: String,
    /// The optional description, empty when skipped.
    pub description: String,
}

/// The built-in style templates, keyed by style name.
///
/// Templates contain `[type]`, `[message]` and `[description]` placeholders,
/// substituted literally and at most once each.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, String>")]
pub struct DefaultTemplates {
    /// The templates, by style name.
    styles: IndexMap<String, String>,
}

impl TryFrom<IndexMap<String, String>> for DefaultTemplates {
    type Error = TemplateError;

    fn try_from(styles: IndexMap<String, String>) -> Result<Self, TemplateError> {
        if styles.contains_key(DEFAULT_STYLE) {
            Ok(Self { styles })
        } else {
            Err(TemplateError::MissingDefault)
        }
    }
}

impl DefaultTemplates {
    /// Loads the built-in templates shipped with the binary.
    pub fn load() -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(DEFAULT_TEMPLATES)?)
    }

    /// Gets the template for a style.
    pub fn get(&self, style: &str) -> Option<&str> {
        self.styles.get(style).map(String::as_str)
    }

    /// Iterates over the style names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Gets the `clean` template.
    fn clean(&self) -> &str {
        #[expect(
            clippy::expect_used,
            reason = "The presence of the clean style is checked on load."
        )]
        let template = self
            .styles
            .get(DEFAULT_STYLE)
            .map(String::as_str)
            .expect("The built-in templates are missing the clean style");

        template
    }
}

/// Formats a commit message by resolving the configured style.
///
/// The result is not trimmed: trimming happens at commit time only.
pub fn format_message(
    style: &str,
    parts: &CommitParts,
    defaults: &DefaultTemplates,
    formats: &Formats,
) -> String {
    if let Some(template) = defaults.get(style) {
        apply_template(template, parts)
    } else if let Some(format) = formats.get(style) {
        match format.get(&parts.commit_type) {
            Some(prefix) => apply_prefix(prefix, parts),
            None => {
                warning!(
                    "Commit type \"{}\" not found in custom format \
                     \"{style}\". Using the \"{DEFAULT_STYLE}\" format.",
                    parts.commit_type
                );
                apply_template(defaults.clean(), parts)
            }
        }
    } else {
        warning!(
            "Format \"{style}\" not found. Using the \"{DEFAULT_STYLE}\" \
             format."
        );
        apply_template(defaults.clean(), parts)
    }
}

/// Substitutes each placeholder of a built-in template, at most once.
///
/// An empty substitution leaves the surrounding text untouched: there is no
/// trimming logic here beyond the final overall trim at commit time.
fn apply_template(template: &str, parts: &CommitParts) -> String {
    template
        .replacen("[type]", &parts.commit_type, 1)
        .replacen("[message]", &parts.message, 1)
        .replacen("[description]", &parts.description, 1)
}

/// Applies a custom format prefix.
///
/// The separator before the description is only emitted when there is a
/// description.
fn apply_prefix(prefix: &str, parts: &CommitParts) -> String {
    let mut message = format!("{prefix} {}", parts.message);

    if !parts.description.is_empty() {
        message.push_str(&format!(" -- {}", parts.description));
    }

    message
}
