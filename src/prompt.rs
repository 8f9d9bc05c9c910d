//! Interactive input providers.
//!
//! The credential store and book commands ask a [`Prompter`] for input rather
//! than reading the terminal themselves, so tests can script the answers.

use std::{env, fmt, path::PathBuf, result::Result as StdResult};

use inquire::{
    Confirm, CustomType, Password, PasswordDisplayMode, Select, Text, error::InquireError,
    validator::Validation,
};

use crate::{
    books::{BookDraft, PhysicalFormat},
    error::{Error, Result},
    paths,
};

/// Credentials entered by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginInput {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of interactive input for the core.
pub trait Prompter {
    /// Ask for an account email and password.
    fn request_credentials(&mut self) -> Result<LoginInput>;

    /// Ask for the fields of a new book.
    fn request_book_fields(&mut self) -> Result<BookDraft>;
}

/// Prompter backed by the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn request_credentials(&mut self) -> Result<LoginInput> {
        println!("Please login to Literal.club");
        let email = required_text("Email:")?;
        let password = map_prompt(
            Password::new("Password:")
                .with_display_mode(PasswordDisplayMode::Hidden)
                .without_confirmation()
                .prompt(),
        )?;
        Ok(LoginInput { email, password })
    }

    fn request_book_fields(&mut self) -> Result<BookDraft> {
        let title = required_text("Title:")?;
        let subtitle = optional_text("Subtitle:")?;
        let description = optional_text("Description:")?;
        let authors = split_authors(&required_text("Authors (comma separated):")?);
        let language = map_prompt(Text::new("Language:").with_default("en").prompt())?;
        let published_date = optional_validated("Published date (YYYY-MM-DD):", |input| {
            is_iso_date(input)
        })?;
        let isbn10 = optional_validated("ISBN-10:", |input| is_isbn(input, 10))?;
        let isbn13 = optional_validated("ISBN-13:", |input| is_isbn(input, 13))?;
        let page_count = map_prompt(page_count_prompt().prompt_skippable())?;
        let publisher = optional_text("Publisher:")?;
        let mature = map_prompt(
            Confirm::new("Mature content?")
                .with_default(false)
                .prompt(),
        )?;
        let physical_format =
            map_prompt(Select::new("Physical format:", PhysicalFormat::all().to_vec()).prompt())?;
        let cover_path = match optional_text("Cover image path (blank to skip):")? {
            Some(raw) => Some(paths::expand_path(&raw, &current_dir())?),
            None => None,
        };

        Ok(BookDraft {
            title,
            subtitle,
            description,
            authors,
            language,
            published_date,
            isbn10,
            isbn13,
            page_count,
            publisher,
            mature,
            physical_format,
            cover_path,
        })
    }
}

/// Split a comma-separated author list into trimmed names.
pub fn split_authors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check for a `YYYY-MM-DD` date shape.
fn is_iso_date(input: &str) -> bool {
    let parts: Vec<&str> = input.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return false;
    };
    let digits = |part: &str, len: usize| part.len() == len && part.chars().all(|c| c.is_ascii_digit());
    if !(digits(*year, 4) && digits(*month, 2) && digits(*day, 2)) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12)) && matches!(day.parse::<u8>(), Ok(1..=31))
}

/// Check that an ISBN has the expected number of digits, ignoring hyphens.
fn is_isbn(input: &str, len: usize) -> bool {
    let chars: Vec<char> = input.chars().filter(|c| *c != '-').collect();
    if chars.len() != len {
        return false;
    }
    chars.iter().enumerate().all(|(index, c)| {
        c.is_ascii_digit() || (len == 10 && index == 9 && (*c == 'X' || *c == 'x'))
    })
}

/// Page count prompt; Esc leaves the count unset.
fn page_count_prompt() -> CustomType<'static, u32> {
    CustomType::new("Page count:")
        .with_help_message("Esc to skip")
        .with_error_message("Enter a whole number of pages.")
}

/// Prompt for a non-empty value.
fn required_text(message: &str) -> Result<String> {
    let value = map_prompt(
        Text::new(message)
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid("A value is required.".into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt(),
    )?;
    Ok(value.trim().to_string())
}

/// Prompt for a value that may be left blank.
fn optional_text(message: &str) -> Result<Option<String>> {
    let value = map_prompt(Text::new(message).prompt())?;
    Ok(non_empty(value))
}

/// Prompt for a value that may be left blank but must pass `check` otherwise.
fn optional_validated<F>(message: &str, check: F) -> Result<Option<String>>
where
    F: Fn(&str) -> bool + Clone + 'static,
{
    let value = map_prompt(
        Text::new(message)
            .with_validator(move |input: &str| {
                let trimmed = input.trim();
                if trimmed.is_empty() || check(trimmed) {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Invalid("Invalid value.".into()))
                }
            })
            .prompt(),
    )?;
    Ok(non_empty(value))
}

/// Trim a prompt answer, mapping blanks to `None`.
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolve the directory relative cover paths are taken from.
fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Map inquire errors into crate errors.
fn map_prompt<T>(result: StdResult<T, InquireError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}
