//! Action output channel.
//!
//! Mirrors the runner conventions for reporting back to a workflow:
//! outputs are appended to the file named by `GITHUB_OUTPUT` (or written to
//! stdout when running outside a runner) and failures become an
//! `::error::` workflow command.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use super::{DELETED_COUNT_OUTPUT, RunOutcome};

/// Environment variable naming the runner's output file.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Heredoc delimiter for multi-line output values.
const MULTILINE_DELIMITER: &str = "ghadelimiter_discussion_sweeper";

/// Where action outputs are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutput {
    file: Option<PathBuf>,
}

impl ActionOutput {
    /// Uses `GITHUB_OUTPUT` when set and non-empty, otherwise stdout.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            file: std::env::var_os(GITHUB_OUTPUT_ENV)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Appends outputs to `path`.
    #[must_use]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }

    /// Writes outputs to the provided stdout writer.
    #[must_use]
    pub const fn stdout() -> Self {
        Self { file: None }
    }

    /// Sets an output.
    ///
    /// `stdout` is used only when no output file is configured.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the output file cannot be appended to, or if a
    /// multi-line value contains the heredoc delimiter.
    pub fn set_output(&self, stdout: &mut dyn Write, name: &str, value: &str) -> io::Result<()> {
        let entry = format_entry(name, value)?;
        match &self.file {
            Some(path) => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?
                .write_all(entry.as_bytes()),
            None => stdout.write_all(entry.as_bytes()),
        }
    }

    /// Reports an outcome: `deleted-count` on success, an `::error::`
    /// command on failure.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn publish(&self, stdout: &mut dyn Write, outcome: &RunOutcome) -> io::Result<()> {
        match outcome {
            RunOutcome::Succeeded { deleted_count } => {
                self.set_output(stdout, DELETED_COUNT_OUTPUT, &deleted_count.to_string())
            },
            RunOutcome::Failed { message } => writeln!(stdout, "{}", error_command(message)),
        }
    }
}

fn format_entry(name: &str, value: &str) -> io::Result<String> {
    if !value.contains('\n') && !value.contains('\r') {
        return Ok(format!("{name}={value}\n"));
    }
    if value.contains(MULTILINE_DELIMITER) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output '{name}' contains the delimiter {MULTILINE_DELIMITER}"),
        ));
    }
    Ok(format!(
        "{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n"
    ))
}

/// Escapes workflow command data: `%`, `\r`, `\n`.
#[must_use]
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats an `::error::` workflow command.
#[must_use]
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}
