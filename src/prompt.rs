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

//! The interactive prompt seam.
//!
//! The guided commit workflow never talks to the terminal directly: it asks
//! its questions through [`Prompt`], so a scripted double can drive the state
//! machine in tests. [`Terminal`] is the production implementation, backed by
//! `inquire`.

use inquire::{Confirm, CustomUserError, InquireError, Select, Text, validator::Validation};
use thiserror::Error;

/// The size of a page in the terminal.
const PAGE_SIZE: usize = 15;

/// Errors that can occur while prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user has canceled the prompt with Esc or Ctrl-C.
    ///
    /// This is not a failure: the top-level handler turns it into a friendly
    /// goodbye instead of an error report.
    #[error("The operation was canceled by the user")]
    Cancelled,
    /// The prompt itself has failed.
    #[error("Failed to run the prompt")]
    Failure(#[source] InquireError),
}

impl PromptError {
    /// Maps an `inquire` error, distinguishing user cancellation.
    fn from_inquire(error: InquireError) -> Self {
        match error {
            InquireError::OperationCanceled
            | InquireError::OperationInterrupted => Self::Cancelled,
            error => Self::Failure(error),
        }
    }
}

/// The validation applied to a text answer.
///
/// Validation failures re-ask in place: they never escape the prompt as
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputValidation {
    /// Any answer is accepted, the empty one included.
    None,
    /// The answer must be non-empty.
    NonEmpty,
    /// The answer must be strictly longer than the given length.
    LongerThan(usize),
}

impl InputValidation {
    /// Checks an answer, returning the reason when it is invalid.
    pub fn check(self, input: &str) -> Result<(), String> {
        match self {
            Self::None => Ok(()),
            Self::NonEmpty => {
                if input.is_empty() {
                    Err(String::from("The answer cannot be empty"))
                } else {
                    Ok(())
                }
            }
            Self::LongerThan(min) => {
                if input.len() > min {
                    Ok(())
                } else {
                    Err(format!(
                        "The answer must be longer than {min} characters"
                    ))
                }
            }
        }
    }
}

/// A synchronous question-and-answer interface.
pub trait Prompt {
    /// Asks the user to choose among a list of options.
    fn select(
        &mut self,
        message: &str,
        options: &[&str],
        starting_cursor: usize,
    ) -> Result<String, PromptError>;

    /// Asks the user for a line of text.
    fn input(
        &mut self,
        message: &str,
        validation: InputValidation,
    ) -> Result<String, PromptError>;

    /// Asks the user a yes/no question.
    fn confirm(
        &mut self,
        message: &str,
        default: bool,
    ) -> Result<bool, PromptError>;
}

/// The production prompt, backed by `inquire`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Prompt for Terminal {
    fn select(
        &mut self,
        message: &str,
        options: &[&str],
        starting_cursor: usize,
    ) -> Result<String, PromptError> {
        let options = options.iter().map(|&option| option.to_owned()).collect();

        Select::new(message, options)
            .with_page_size(PAGE_SIZE)
            .with_starting_cursor(starting_cursor)
            .prompt()
            .map_err(PromptError::from_inquire)
    }

    fn input(
        &mut self,
        message: &str,
        validation: InputValidation,
    ) -> Result<String, PromptError> {
        let text = Text::new(message);

        let text = match validation {
            InputValidation::None => text,
            validation => text.with_validator(
                move |input: &str| -> Result<Validation, CustomUserError> {
                    match validation.check(input) {
                        Ok(()) => Ok(Validation::Valid),
                        Err(reason) => Ok(Validation::Invalid(reason.into())),
                    }
                },
            ),
        };

        text.prompt().map_err(PromptError::from_inquire)
    }

    fn confirm(
        &mut self,
        message: &str,
        default: bool,
    ) -> Result<bool, PromptError> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(PromptError::from_inquire)
    }
}
