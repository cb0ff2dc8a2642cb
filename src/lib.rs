//! # Discussion Sweeper
//!
//! Prunes stale, auto-generated GitHub Discussions.
//!
//! A run looks up one discussion category in a repository, walks the first
//! page of its discussions oldest-first, and deletes every discussion whose
//! title matches a template and which is old enough under the configured
//! cleanup mode.
//!
//! ## Features
//!
//! - Title templates with `{placeholder}` wildcards, matched whole-string
//! - Two cleanup policies: `expiration` (age-gated) and `immediate`
//! - GitHub Actions input/output conventions, plus CLI flags and TOML config
//! - Ambient repository detection from `GITHUB_REPOSITORY` or the git remote
//! - Dry-run mode that reports without deleting
//!
//! ## Example
//!
//! ```rust,ignore
//! use discussion_sweeper::action::{self, RunOutcome};
//! use discussion_sweeper::config::EnvInputs;
//! use discussion_sweeper::context::RepoRef;
//! use discussion_sweeper::github::GraphqlConnector;
//!
//! let ambient = RepoRef::from_environment();
//! let outcome = action::run(&EnvInputs, ambient.as_ref(), chrono::Utc::now(), &GraphqlConnector);
//! match outcome {
//!     RunOutcome::Succeeded { deleted_count } => println!("deleted {deleted_count}"),
//!     RunOutcome::Failed { message } => eprintln!("{message}"),
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod action;
pub mod config;
pub mod context;
pub mod eligibility;
pub mod github;
pub mod matcher;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use action::RunOutcome;
pub use config::SweeperConfig;
pub use context::{RepoRef, resolve_repo_ref};
pub use eligibility::{Eligibility, evaluate, is_eligible};
pub use github::DiscussionApi;
pub use matcher::{TemplateMatcher, TitleMatcher};
pub use models::{CleanupMode, Discussion, DiscussionCategory};
pub use services::{DiscussionSweeper, SweepPlan, SweepReport};

/// Error type for sweeper operations.
///
/// The display text of every variant is what a workflow author sees when a
/// run fails, so the wording is kept stable.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `MissingConfiguration` | A required input (token, category) is absent or empty |
/// | `InvalidFormat` | `target-repo` is not `owner/repo` |
/// | `CategoryNotFound` | No category in the repository has the configured name |
/// | `RemoteFailure` | Transport, HTTP status or GraphQL errors from GitHub |
/// | `InvalidConfiguration` | An input is present but cannot be parsed |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required configuration value was not supplied.
    #[error("Input required and not supplied: {0}")]
    MissingConfiguration(String),

    /// The repository reference could not be split into owner and repo.
    ///
    /// Carries the offending input verbatim.
    #[error("Invalid target-repo format: {0}")]
    InvalidFormat(String),

    /// The configured discussion category does not exist in the repository.
    #[error("Category \"{0}\" not found.")]
    CategoryNotFound(String),

    /// A call to the remote API failed.
    ///
    /// The message is reported as-is; no prefix is added.
    #[error("{0}")]
    RemoteFailure(String),

    /// A configuration value was supplied but is not usable.
    #[error("Invalid value for input '{input}': {reason}")]
    InvalidConfiguration {
        /// The input name, e.g. `expiration-hours`.
        input: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for sweeper operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingConfiguration("github-token".to_string());
        assert_eq!(
            err.to_string(),
            "Input required and not supplied: github-token"
        );

        let err = Error::InvalidFormat("invalid-format".to_string());
        assert_eq!(err.to_string(), "Invalid target-repo format: invalid-format");

        let err = Error::CategoryNotFound("Announcements".to_string());
        assert_eq!(err.to_string(), "Category \"Announcements\" not found.");

        let err = Error::RemoteFailure("GraphQL error".to_string());
        assert_eq!(err.to_string(), "GraphQL error");

        let err = Error::InvalidConfiguration {
            input: "cleanup-mode".to_string(),
            reason: "expected 'expiration' or 'immediate'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for input 'cleanup-mode': expected 'expiration' or 'immediate'"
        );
    }
}
