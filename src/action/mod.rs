//! Action entry point.
//!
//! [`run`] is the catch-all boundary of a sweep: it reads the inputs,
//! resolves the repository, computes the cutoff, connects to GitHub and
//! sweeps, folding every failure into [`RunOutcome::Failed`]. Publishing the
//! outcome is left to the caller (see [`output`]).

pub mod output;

pub use output::ActionOutput;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::config::{InputSource, SweeperConfig, names};
use crate::context::{RepoRef, resolve_repo_ref};
use crate::github::ApiConnector;
use crate::matcher::TemplateMatcher;
use crate::services::{DiscussionSweeper, SweepPlan, SweepReport};
use crate::{Error, Result};

/// Name of the action output carrying the deletion count.
pub const DELETED_COUNT_OUTPUT: &str = "deleted-count";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The sweep completed.
    Succeeded {
        /// Discussions deleted (or that would be, in a dry run).
        deleted_count: usize,
    },
    /// The run stopped at the first error.
    Failed {
        /// The error's display text.
        message: String,
    },
}

impl RunOutcome {
    /// Returns `true` for [`RunOutcome::Succeeded`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The deletion count of a successful run.
    #[must_use]
    pub const fn deleted_count(&self) -> Option<usize> {
        match self {
            Self::Succeeded { deleted_count } => Some(*deleted_count),
            Self::Failed { .. } => None,
        }
    }
}

impl From<Result<SweepReport>> for RunOutcome {
    fn from(result: Result<SweepReport>) -> Self {
        match result {
            Ok(report) => Self::Succeeded {
                deleted_count: report.deleted,
            },
            Err(e) => Self::Failed {
                message: e.to_string(),
            },
        }
    }
}

/// Runs one sweep.
///
/// `ambient` is the repository the run belongs to, used when `target-repo`
/// is not supplied. `now` freezes the clock for the cutoff. Never panics on
/// bad input or remote errors.
pub fn run(
    source: &dyn InputSource,
    ambient: Option<&RepoRef>,
    now: DateTime<Utc>,
    connector: &dyn ApiConnector,
) -> RunOutcome {
    let outcome = RunOutcome::from(execute(source, ambient, now, connector));
    if let RunOutcome::Failed { message } = &outcome {
        warn!(error = %message, "Sweep failed");
    }
    outcome
}

fn execute(
    source: &dyn InputSource,
    ambient: Option<&RepoRef>,
    now: DateTime<Utc>,
    connector: &dyn ApiConnector,
) -> Result<SweepReport> {
    let config = SweeperConfig::from_source(source)?;
    let repo = resolve_target(config.target_repo.as_deref(), ambient)?;

    let cutoff = config.cutoff(now);
    info!(
        "Expiration cutoff: {}",
        cutoff.to_rfc3339_opts(SecondsFormat::Millis, true)
    );

    let matcher = TemplateMatcher::compile(&config.title_template)?;
    debug!(
        template = matcher.template(),
        pattern = matcher.as_regex_str(),
        placeholders = ?matcher.placeholders(),
        mode = %config.cleanup_mode,
        dry_run = config.dry_run,
        "Compiled title template"
    );

    let api = connector.connect(&config)?;

    let plan = SweepPlan::new(repo, config.category_name, matcher, cutoff)
        .with_mode(config.cleanup_mode)
        .with_dry_run(config.dry_run);

    let report = DiscussionSweeper::new(api.as_ref()).sweep(&plan)?;
    debug!(summary = %report.summary(), "Sweep report");
    Ok(report)
}

/// Applies the resolver, requiring an ambient default when no input is given.
fn resolve_target(input: Option<&str>, ambient: Option<&RepoRef>) -> Result<RepoRef> {
    match ambient {
        Some(default) => resolve_repo_ref(input, default),
        None => match input {
            Some(raw) => RepoRef::parse(raw),
            None => Err(Error::MissingConfiguration(names::TARGET_REPO.to_string())),
        },
    }
}
