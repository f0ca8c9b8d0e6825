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

//! Helpers for writing CLIs.

use thiserror::Error;

use crate::repo::Repo;

/// The error returned when the current directory is not a Git repository.
#[derive(Debug, Error)]
#[error("Not a git repository. Please initialise a git repository first")]
pub struct NotARepository;

/// Ensures the command is run from inside a Git repository.
///
/// This is the only hard precondition of the workflow: every other repository
/// query is fail-soft.
pub fn ensure_in_repository(repo: &impl Repo) -> Result<(), NotARepository> {
    if repo.is_repository() {
        Ok(())
    } else {
        Err(NotARepository)
    }
}

/// Uncapitalises the first character in s.
pub fn uncapitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Prints a success.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        let message = format!($($arg)*).green().bold();
        println!("{message}");
    }};
}

/// Prints a warning.
#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        let message = format!($($arg)*).yellow().bold();
        eprintln!("{message}");
    }};
}

/// Prints an error.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        let message = format!($($arg)*);
        let message = $crate::helpers::uncapitalise(&message);
        let message = format!("Error: {message}").red().bold();
        eprintln!("{message}");
    }};
}

/// Prints a hint.
#[macro_export]
macro_rules! hint {
    ($($arg:tt)*) => {{
        use colored::Colorize as _;
        let message = format!($($arg)*).blue();
        eprintln!("{message}");
    }};
}
