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

//! A guided Git commit assistant.
//!
//! git-fancy wraps routine Git operations — staging, commit-message
//! construction, optional version bumping, optional pushing — behind guided
//! prompts, with user-configurable commit-message templates and behavioral
//! toggles persisted as JSON in a `.git-fancy` directory at the repository
//! root.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![warn(rust_2018_idioms)]
#![warn(clippy::redundant_pub_crate)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::use_self)]

pub mod command;
pub mod helpers;

mod formats;
mod formatter;
mod process;
mod prompt;
mod repo;
mod settings;
mod tracing;

pub use command::GitFancy;
