//! Per-discussion deletion eligibility.
//!
//! A discussion is eligible when it is both *expired* and *matched*. Both
//! judgments are kept on [`Eligibility`] so a skip can be logged with its
//! reasons without evaluating twice.

use chrono::{DateTime, Utc};

use crate::matcher::TitleMatcher;
use crate::models::{CleanupMode, Discussion};

/// The two sub-judgments behind a keep-or-delete decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Created strictly before the cutoff, or the mode ignores age.
    pub expired: bool,
    /// The title matches the template.
    pub matched: bool,
}

impl Eligibility {
    /// Returns `true` if the discussion should be deleted.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.expired && self.matched
    }
}

/// Evaluates a discussion against the matcher, cutoff and mode.
///
/// In [`CleanupMode::Expiration`] a discussion created exactly at `cutoff`
/// is not expired.
#[must_use]
pub fn evaluate(
    discussion: &Discussion,
    matcher: &dyn TitleMatcher,
    cutoff: DateTime<Utc>,
    mode: CleanupMode,
) -> Eligibility {
    let expired = mode.ignores_age() || discussion.created_at < cutoff;
    let matched = matcher.matches(&discussion.title);
    Eligibility { expired, matched }
}

/// Shorthand for `evaluate(..).is_eligible()`.
#[must_use]
pub fn is_eligible(
    discussion: &Discussion,
    matcher: &dyn TitleMatcher,
    cutoff: DateTime<Utc>,
    mode: CleanupMode,
) -> bool {
    evaluate(discussion, matcher, cutoff, mode).is_eligible()
}
