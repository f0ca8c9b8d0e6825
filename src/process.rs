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

//! A thin abstraction over external command invocations.
//!
//! Every call to `git` or `npm` goes through [`run`], which returns a
//! structured result instead of raw bytes. All textual parsing of command
//! output happens in the callers, so the fragility of shelling out stays in
//! one place.

use std::{io, process::Command, string::FromUtf8Error};

use thiserror::Error;

use crate::tracing::LogResult as _;

/// The structured result of an external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exec {
    /// Whether the command exited successfully.
    pub success: bool,
    /// The status code of the command, if any.
    pub status_code: Option<i32>,
    /// The standard output of the command.
    pub stdout: String,
    /// The standard error of the command.
    pub stderr: String,
}

/// Errors that can occur when invoking an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command cannot be run at all.
    #[error("Failed to run the {program} command")]
    CannotRun {
        /// The program that cannot be run.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The output of the command is not proper UTF-8.
    #[error("The output of the {program} command is not proper UTF-8")]
    Encoding {
        /// The program whose output cannot be decoded.
        program: String,
        /// The underlying decoding error.
        #[source]
        source: FromUtf8Error,
    },
}

/// Runs an external command and captures its output.
///
/// The invocation is synchronous and blocking, without a timeout: a hang in
/// the underlying command hangs the caller.
#[tracing::instrument(level = "trace")]
pub fn run(program: &str, args: &[&str]) -> Result<Exec, ProcessError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| ProcessError::CannotRun {
            program: program.to_owned(),
            source,
        })
        .log_err()?;

    let exec = Exec {
        success: output.status.success(),
        status_code: output.status.code(),
        stdout: decode(program, output.stdout)?,
        stderr: decode(program, output.stderr)?,
    };

    tracing::trace!(?exec);
    Ok(exec)
}

/// Decodes a captured output stream as UTF-8.
fn decode(program: &str, bytes: Vec<u8>) -> Result<String, ProcessError> {
    String::from_utf8(bytes)
        .map_err(|source| ProcessError::Encoding {
            program: program.to_owned(),
            source,
        })
        .log_err()
}
