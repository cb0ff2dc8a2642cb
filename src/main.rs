//! Binary entry point for discussion-sweeper.
//!
//! Runs as a GitHub Actions step (inputs from `INPUT_*`, outputs to
//! `GITHUB_OUTPUT`) or locally with flags, a TOML file and `.env`.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use discussion_sweeper::action::{self, ActionOutput, RunOutcome};
use discussion_sweeper::config::{
    CONFIG_PATH_ENV, ConfigFile, EnvInputs, LayeredInputs, MapInputs, names,
};
use discussion_sweeper::context::RepoRef;
use discussion_sweeper::github::GraphqlConnector;
use discussion_sweeper::observability::{self, LogFormat, LoggingConfig};

/// Deletes stale, template-titled discussions from a GitHub Discussions category.
#[derive(Parser)]
#[command(name = "discussion-sweeper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Token with `discussions: write` permission.
    #[arg(long)]
    github_token: Option<String>,

    /// Repository to sweep as `owner/repo` (default: the current repository).
    #[arg(long)]
    target_repo: Option<String>,

    /// Exact name of the discussion category.
    #[arg(long)]
    discussion_category_name: Option<String>,

    /// Age in hours after which a discussion expires (default: 168).
    #[arg(long)]
    expiration_hours: Option<String>,

    /// Title template; `{name}` placeholders match anything.
    #[arg(long)]
    discussion_title_template: Option<String>,

    /// `expiration` or `immediate`.
    #[arg(long)]
    cleanup_mode: Option<String>,

    /// Report what would be deleted without deleting.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    dry_run: Option<String>,

    /// GraphQL endpoint (GitHub Enterprise Server).
    #[arg(long)]
    api_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    request_timeout_seconds: Option<String>,

    /// Path to a TOML configuration file.
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Log format: pretty or json.
    #[arg(long, env = "SWEEPER_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl Cli {
    /// Inputs given as flags.
    fn flag_inputs(&self) -> MapInputs {
        let mut inputs = MapInputs::new();
        inputs.insert_opt(names::GITHUB_TOKEN, self.github_token.clone());
        inputs.insert_opt(names::TARGET_REPO, self.target_repo.clone());
        inputs.insert_opt(names::CATEGORY_NAME, self.discussion_category_name.clone());
        inputs.insert_opt(names::EXPIRATION_HOURS, self.expiration_hours.clone());
        inputs.insert_opt(names::TITLE_TEMPLATE, self.discussion_title_template.clone());
        inputs.insert_opt(names::CLEANUP_MODE, self.cleanup_mode.clone());
        inputs.insert_opt(names::DRY_RUN, self.dry_run.clone());
        inputs.insert_opt(names::API_URL, self.api_url.clone());
        inputs.insert_opt(names::REQUEST_TIMEOUT, self.request_timeout_seconds.clone());
        inputs
    }
}

fn main() -> ExitCode {
    // A missing .env is the normal case on a runner.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = observability::init(&LoggingConfig::from_env(cli.log_format, cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let outcome = match build_inputs(&cli) {
        Ok(inputs) => {
            let ambient = RepoRef::from_environment();
            action::run(&inputs, ambient.as_ref(), chrono::Utc::now(), &GraphqlConnector)
        },
        Err(e) => RunOutcome::Failed {
            message: e.to_string(),
        },
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = ActionOutput::from_env().publish(&mut stdout, &outcome) {
        eprintln!("Failed to write action output: {e}");
        return ExitCode::FAILURE;
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Flags, then `INPUT_*`, then the config file, then `GITHUB_TOKEN`.
fn build_inputs(cli: &Cli) -> discussion_sweeper::Result<LayeredInputs> {
    let mut inputs = LayeredInputs::new().then(cli.flag_inputs()).then(EnvInputs);

    if let Some(path) = cli.config.as_deref() {
        inputs = inputs.then(ConfigFile::load(path)?);
    }

    let mut fallback = MapInputs::new();
    fallback.insert_opt(names::GITHUB_TOKEN, std::env::var("GITHUB_TOKEN").ok());

    Ok(inputs.then(fallback))
}
