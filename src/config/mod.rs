//! Configuration management.
//!
//! A run is configured by action inputs resolved from layered sources,
//! highest precedence first:
//!
//! 1. command-line flags
//! 2. `INPUT_<NAME>` environment variables set by the Actions runner
//! 3. an optional TOML file ([`ConfigFile`])
//! 4. built-in defaults
//!
//! [`SweeperConfig::from_source`] validates the merged inputs.

mod inputs;

pub use inputs::{EnvInputs, InputSource, LayeredInputs, MapInputs, lookup};

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::matcher::DEFAULT_TITLE_TEMPLATE;
use crate::models::CleanupMode;
use crate::{Error, Result};

/// Input names, as declared in the action metadata.
pub mod names {
    /// Token used to authenticate against the GraphQL API.
    pub const GITHUB_TOKEN: &str = "github-token";
    /// `owner/repo` to sweep.
    pub const TARGET_REPO: &str = "target-repo";
    /// Exact name of the discussion category.
    pub const CATEGORY_NAME: &str = "discussion-category-name";
    /// Age in hours after which a discussion expires.
    pub const EXPIRATION_HOURS: &str = "expiration-hours";
    /// Title template with `{placeholder}` wildcards.
    pub const TITLE_TEMPLATE: &str = "discussion-title-template";
    /// `expiration` or `immediate`.
    pub const CLEANUP_MODE: &str = "cleanup-mode";
    /// Report without deleting.
    pub const DRY_RUN: &str = "dry-run";
    /// GraphQL endpoint.
    pub const API_URL: &str = "api-url";
    /// HTTP request timeout in seconds.
    pub const REQUEST_TIMEOUT: &str = "request-timeout-seconds";
}

/// Environment variable naming the TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "SWEEPER_CONFIG_PATH";

/// Default age threshold: one week.
pub const DEFAULT_EXPIRATION_HOURS: u64 = 168;

/// Default GraphQL endpoint for github.com.
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Validated configuration for one run.
#[derive(Debug)]
pub struct SweeperConfig {
    /// API token.
    pub github_token: SecretString,
    /// Explicit `owner/repo`, if any. Resolved against the ambient repository.
    pub target_repo: Option<String>,
    /// Category whose discussions are swept.
    pub category_name: String,
    /// Age threshold in hours.
    pub expiration_hours: u64,
    /// Title template.
    pub title_template: String,
    /// Cleanup policy.
    pub cleanup_mode: CleanupMode,
    /// Skip the delete mutation.
    pub dry_run: bool,
    /// GraphQL endpoint.
    pub api_url: String,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl SweeperConfig {
    /// Builds a configuration from an input source.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfiguration`] if `github-token` or
    ///   `discussion-category-name` is absent or blank
    /// - [`Error::InvalidConfiguration`] if a numeric, boolean or mode input
    ///   cannot be parsed
    pub fn from_source(source: &dyn InputSource) -> Result<Self> {
        let github_token = required(source, names::GITHUB_TOKEN)?;
        let target_repo = lookup(source, names::TARGET_REPO);
        let category_name = required(source, names::CATEGORY_NAME)?;

        let expiration_hours = lookup(source, names::EXPIRATION_HOURS)
            .map(|raw| parse_u64(names::EXPIRATION_HOURS, &raw))
            .transpose()?
            .unwrap_or(DEFAULT_EXPIRATION_HOURS);

        let title_template = lookup(source, names::TITLE_TEMPLATE)
            .unwrap_or_else(|| DEFAULT_TITLE_TEMPLATE.to_string());

        let cleanup_mode = lookup(source, names::CLEANUP_MODE)
            .map(|raw| raw.parse::<CleanupMode>())
            .transpose()?
            .unwrap_or_default();

        let dry_run = lookup(source, names::DRY_RUN)
            .map(|raw| parse_bool(names::DRY_RUN, &raw))
            .transpose()?
            .unwrap_or(false);

        let api_url =
            lookup(source, names::API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = lookup(source, names::REQUEST_TIMEOUT)
            .map(|raw| parse_timeout(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            github_token: SecretString::from(github_token),
            target_repo,
            category_name,
            expiration_hours,
            title_template,
            cleanup_mode,
            dry_run,
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Computes the cutoff instant for a run started at `now`.
    ///
    /// Thresholds beyond the representable range saturate to the earliest
    /// instant, so nothing expires.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        i64::try_from(self.expiration_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

fn required(source: &dyn InputSource, name: &str) -> Result<String> {
    lookup(source, name).ok_or_else(|| Error::MissingConfiguration(name.to_string()))
}

fn parse_u64(input: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| Error::InvalidConfiguration {
        input: input.to_string(),
        reason: format!("expected a non-negative integer, got '{raw}'"),
    })
}

/// Parses a timeout in seconds; zero is not a valid timeout.
fn parse_timeout(raw: &str) -> Result<u64> {
    match parse_u64(names::REQUEST_TIMEOUT, raw)? {
        0 => Err(Error::InvalidConfiguration {
            input: names::REQUEST_TIMEOUT.to_string(),
            reason: "must be at least 1 second".to_string(),
        }),
        secs => Ok(secs),
    }
}

/// Accepts the YAML 1.2 core booleans the Actions toolkit accepts.
fn parse_bool(input: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(Error::InvalidConfiguration {
            input: input.to_string(),
            reason: format!("expected 'true' or 'false', got '{raw}'"),
        }),
    }
}

/// Configuration file structure (for TOML parsing).
///
/// Keys are the input names in `snake_case`:
///
/// ```toml
/// github_token = "ghp_..."
/// target_repo = "octo/hello"
/// discussion_category_name = "Announcements"
/// expiration_hours = 72
/// cleanup_mode = "immediate"
/// dry_run = true
/// ```
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// API token.
    pub github_token: Option<String>,
    /// Target repository.
    pub target_repo: Option<String>,
    /// Category name.
    pub discussion_category_name: Option<String>,
    /// Age threshold in hours.
    pub expiration_hours: Option<u64>,
    /// Title template.
    pub discussion_title_template: Option<String>,
    /// Cleanup mode.
    pub cleanup_mode: Option<String>,
    /// Dry run.
    pub dry_run: Option<bool>,
    /// GraphQL endpoint.
    pub api_url: Option<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_seconds: Option<u64>,
}

impl ConfigFile {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::InvalidConfiguration {
                input: "config".to_string(),
                reason: format!("cannot read {}: {e}", path.display()),
            })?;

        Self::parse(&contents).map_err(|e| match e {
            Error::InvalidConfiguration { input, reason } => Error::InvalidConfiguration {
                input,
                reason: format!("{}: {reason}", path.display()),
            },
            other => other,
        })
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] on malformed TOML, unknown
    /// keys or mistyped values.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::InvalidConfiguration {
            input: "config".to_string(),
            reason: e.to_string(),
        })
    }
}

impl InputSource for ConfigFile {
    fn get(&self, name: &str) -> Option<String> {
        match name {
            names::GITHUB_TOKEN => self.github_token.clone(),
            names::TARGET_REPO => self.target_repo.clone(),
            names::CATEGORY_NAME => self.discussion_category_name.clone(),
            names::EXPIRATION_HOURS => self.expiration_hours.map(|h| h.to_string()),
            names::TITLE_TEMPLATE => self.discussion_title_template.clone(),
            names::CLEANUP_MODE => self.cleanup_mode.clone(),
            names::DRY_RUN => self.dry_run.map(|d| d.to_string()),
            names::API_URL => self.api_url.clone(),
            names::REQUEST_TIMEOUT => self.request_timeout_seconds.map(|s| s.to_string()),
            _ => None,
        }
    }
}
