//! Category sweep.
//!
//! Finds the configured category, walks its first page of discussions
//! oldest-first and deletes each eligible one before evaluating the next.
//!
//! # Example
//!
//! ```rust,ignore
//! use discussion_sweeper::services::{DiscussionSweeper, SweepPlan};
//!
//! let plan = SweepPlan::new(repo, "Announcements", matcher, cutoff).with_dry_run(true);
//! let report = DiscussionSweeper::new(&client).sweep(&plan)?;
//! println!("{}", report.summary());
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::context::RepoRef;
use crate::eligibility::evaluate;
use crate::github::DiscussionApi;
use crate::matcher::TitleMatcher;
use crate::models::{CleanupMode, Discussion};
use crate::{Error, Result};

/// Safely converts Duration to milliseconds as u64, capping at `u64::MAX`.
#[inline]
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Everything a sweep needs to decide, fixed before the first remote call.
pub struct SweepPlan {
    /// Repository to sweep.
    pub repo: RepoRef,
    /// Exact (case-sensitive) category name.
    pub category_name: String,
    /// Title predicate.
    pub matcher: Box<dyn TitleMatcher>,
    /// Frozen cutoff instant.
    pub cutoff: DateTime<Utc>,
    /// Cleanup policy.
    pub mode: CleanupMode,
    /// Count eligible discussions without deleting them.
    pub dry_run: bool,
}

impl SweepPlan {
    /// Creates a plan in [`CleanupMode::Expiration`] that deletes.
    #[must_use]
    pub fn new(
        repo: RepoRef,
        category_name: impl Into<String>,
        matcher: impl TitleMatcher + 'static,
        cutoff: DateTime<Utc>,
    ) -> Self {
        Self {
            repo,
            category_name: category_name.into(),
            matcher: Box::new(matcher),
            cutoff,
            mode: CleanupMode::default(),
            dry_run: false,
        }
    }

    /// Sets the cleanup mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: CleanupMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables dry-run.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl std::fmt::Debug for SweepPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepPlan")
            .field("repo", &self.repo)
            .field("category_name", &self.category_name)
            .field("cutoff", &self.cutoff)
            .field("mode", &self.mode)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// Result of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Discussions evaluated.
    pub checked: usize,
    /// Discussions deleted, or that would be deleted in a dry run.
    pub deleted: usize,
    /// Discussions kept.
    pub skipped: usize,
    /// Whether deletes were suppressed.
    pub dry_run: bool,
    /// Wall time of the sweep in milliseconds.
    pub duration_ms: u64,
}

impl SweepReport {
    /// Returns a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let action = if self.dry_run { "would delete" } else { "deleted" };
        format!(
            "{action} {} of {} discussions ({} kept) in {}ms",
            self.deleted, self.checked, self.skipped, self.duration_ms
        )
    }
}

/// Runs sweeps against a [`DiscussionApi`].
pub struct DiscussionSweeper<'a> {
    api: &'a dyn DiscussionApi,
}

impl<'a> DiscussionSweeper<'a> {
    /// Creates a sweeper over `api`.
    #[must_use]
    pub const fn new(api: &'a dyn DiscussionApi) -> Self {
        Self { api }
    }

    /// Executes a plan.
    ///
    /// Deletions happen one at a time in the order the API returned the
    /// discussions. The first failing delete aborts the sweep; discussions
    /// already deleted stay deleted.
    ///
    /// # Errors
    ///
    /// - [`Error::CategoryNotFound`] if no category has the plan's name
    /// - [`Error::RemoteFailure`] if any remote call fails
    #[instrument(
        name = "sweeper.sweep",
        skip(self, plan),
        fields(
            repo = %plan.repo,
            category = %plan.category_name,
            mode = %plan.mode,
            dry_run = plan.dry_run
        )
    )]
    pub fn sweep(&self, plan: &SweepPlan) -> Result<SweepReport> {
        let start = Instant::now();
        let mut report = SweepReport {
            dry_run: plan.dry_run,
            ..Default::default()
        };

        info!(
            "Searching for discussions in {} category \"{}\"",
            plan.repo, plan.category_name
        );

        let category_id = self.find_category_id(plan)?;
        info!("Found category ID: {category_id}");

        let discussions = self.api.list_discussions(&plan.repo, &category_id)?;
        info!("Found {} discussions in category.", discussions.len());

        for discussion in &discussions {
            report.checked += 1;

            let eligibility = evaluate(discussion, plan.matcher.as_ref(), plan.cutoff, plan.mode);
            if !eligibility.is_eligible() {
                debug!(
                    "Skipping: \"{}\" (Expired: {}, Match: {})",
                    discussion.title, eligibility.expired, eligibility.matched
                );
                report.skipped += 1;
                continue;
            }

            if plan.dry_run {
                info!("Would delete expired discussion: {}", describe(discussion));
            } else {
                info!("Deleting expired discussion: {}", describe(discussion));
                self.api.delete_discussion(&discussion.id)?;
            }
            report.deleted += 1;
        }

        report.duration_ms = duration_to_millis(start.elapsed());

        if plan.dry_run {
            info!("Would delete {} discussions.", report.deleted);
        } else {
            info!("Deleted {} discussions.", report.deleted);
        }
        debug!(
            checked = report.checked,
            deleted = report.deleted,
            skipped = report.skipped,
            duration_ms = report.duration_ms,
            "Sweep completed"
        );

        Ok(report)
    }

    fn find_category_id(&self, plan: &SweepPlan) -> Result<String> {
        self.api
            .list_categories(&plan.repo)?
            .into_iter()
            .find(|category| category.name == plan.category_name)
            .map(|category| category.id)
            .ok_or_else(|| Error::CategoryNotFound(plan.category_name.clone()))
    }
}

/// `"title" (url) created at createdAt`
fn describe(discussion: &Discussion) -> String {
    format!(
        "\"{}\" ({}) created at {}",
        discussion.title,
        discussion.url,
        discussion
            .created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{DEFAULT_TITLE_TEMPLATE, TemplateMatcher};
    use crate::models::DiscussionCategory;
    use chrono::TimeZone;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `f` with debug logging captured as plain text.
    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    #[derive(Default)]
    struct FakeApi {
        categories: Vec<DiscussionCategory>,
        discussions: Vec<Discussion>,
        fail_delete_of: Option<String>,
        deleted: Mutex<Vec<String>>,
        listed_category: Mutex<Option<String>>,
    }

    impl FakeApi {
        fn deleted(&self) -> Vec<String> {
            self.deleted.lock().unwrap().clone()
        }
    }

    impl DiscussionApi for FakeApi {
        fn list_categories(&self, _repo: &RepoRef) -> Result<Vec<DiscussionCategory>> {
            Ok(self.categories.clone())
        }

        fn list_discussions(&self, _repo: &RepoRef, category_id: &str) -> Result<Vec<Discussion>> {
            *self.listed_category.lock().unwrap() = Some(category_id.to_string());
            Ok(self.discussions.clone())
        }

        fn delete_discussion(&self, discussion_id: &str) -> Result<()> {
            if self.fail_delete_of.as_deref() == Some(discussion_id) {
                return Err(Error::RemoteFailure("delete refused".to_string()));
            }
            self.deleted.lock().unwrap().push(discussion_id.to_string());
            Ok(())
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn invite(id: &str, login: &str, day: u32) -> Discussion {
        Discussion::new(
            id,
            format!("SWA access invite for @{login} (my-swa) - 2024-01-{day:02}"),
            at(day),
            format!("https://github.com/o/r/discussions/{id}"),
        )
    }

    fn fixture() -> FakeApi {
        FakeApi {
            categories: vec![
                DiscussionCategory::new("cat-1", "General"),
                DiscussionCategory::new("cat-123", "Announcements"),
            ],
            discussions: vec![
                invite("disc-1", "alice", 1),
                invite("disc-2", "bob", 9),
                Discussion::new("disc-3", "Random discussion", at(1), "https://x/3"),
            ],
            ..Default::default()
        }
    }

    fn plan(cutoff: DateTime<Utc>) -> SweepPlan {
        SweepPlan::new(
            RepoRef::new("o", "r"),
            "Announcements",
            TemplateMatcher::compile(DEFAULT_TITLE_TEMPLATE).unwrap(),
            cutoff,
        )
    }

    #[test]
    fn test_expiration_deletes_only_old_matching() {
        let api = fixture();
        let report = DiscussionSweeper::new(&api).sweep(&plan(at(3))).unwrap();

        assert_eq!(api.deleted(), ["disc-1"]);
        assert_eq!(api.listed_category.lock().unwrap().as_deref(), Some("cat-123"));
        assert_eq!(report.checked, 3);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.skipped, 2);
        assert!(!report.dry_run);
    }

    #[test]
    fn test_immediate_ignores_age() {
        let api = fixture();
        let report = DiscussionSweeper::new(&api)
            .sweep(&plan(at(3)).with_mode(CleanupMode::Immediate))
            .unwrap();

        assert_eq!(api.deleted(), ["disc-1", "disc-2"]);
        assert_eq!(report.deleted, 2);
    }

    #[test]
    fn test_dry_run_never_deletes() {
        let api = fixture();
        let report = DiscussionSweeper::new(&api)
            .sweep(&plan(at(3)).with_mode(CleanupMode::Immediate).with_dry_run(true))
            .unwrap();

        assert!(api.deleted().is_empty());
        assert_eq!(report.deleted, 2);
        assert!(report.dry_run);
        assert!(report.summary().starts_with("would delete 2 of 3"));
    }

    #[test]
    fn test_category_lookup_is_case_sensitive() {
        let api = fixture();
        let mut plan = plan(at(3));
        plan.category_name = "announcements".to_string();

        let err = DiscussionSweeper::new(&api).sweep(&plan).unwrap_err();
        assert_eq!(err.to_string(), "Category \"announcements\" not found.");
        assert!(api.listed_category.lock().unwrap().is_none());
    }

    #[test]
    fn test_failing_delete_aborts() {
        let mut api = fixture();
        api.discussions = vec![
            invite("disc-1", "alice", 1),
            invite("disc-2", "bob", 2),
            invite("disc-4", "carol", 2),
        ];
        api.fail_delete_of = Some("disc-2".to_string());

        let err = DiscussionSweeper::new(&api).sweep(&plan(at(3))).unwrap_err();

        assert_eq!(err.to_string(), "delete refused");
        assert_eq!(api.deleted(), ["disc-1"]);
    }

    #[test]
    fn test_empty_category() {
        let mut api = fixture();
        api.discussions.clear();

        let report = DiscussionSweeper::new(&api).sweep(&plan(at(3))).unwrap();
        assert_eq!(report, SweepReport { duration_ms: report.duration_ms, ..Default::default() });
    }

    #[test]
    fn test_log_lines() {
        let api = fixture();
        let (report, logs) =
            with_captured_logs(|| DiscussionSweeper::new(&api).sweep(&plan(at(3))));
        report.unwrap();

        for line in [
            "Searching for discussions in o/r category \"Announcements\"",
            "Found category ID: cat-123",
            "Found 3 discussions in category.",
            "Deleting expired discussion: \"SWA access invite for @alice (my-swa) - 2024-01-01\" \
             (https://github.com/o/r/discussions/disc-1) created at 2024-01-01T00:00:00Z",
            "Skipping: \"SWA access invite for @bob (my-swa) - 2024-01-09\" (Expired: false, Match: true)",
            "Skipping: \"Random discussion\" (Expired: true, Match: false)",
            "Deleted 1 discussions.",
        ] {
            assert!(logs.contains(line), "missing {line:?} in:\n{logs}");
        }
    }

    #[test]
    fn test_dry_run_log_lines() {
        let api = fixture();
        let (report, logs) = with_captured_logs(|| {
            DiscussionSweeper::new(&api).sweep(&plan(at(3)).with_dry_run(true))
        });
        report.unwrap();

        assert!(logs.contains("Would delete expired discussion: \"SWA access invite for @alice"));
        assert!(logs.contains("Would delete 1 discussions."));
        assert!(!logs.contains("Deleting expired discussion"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            describe(&invite("disc-1", "alice", 1)),
            "\"SWA access invite for @alice (my-swa) - 2024-01-01\" \
             (https://github.com/o/r/discussions/disc-1) created at 2024-01-01T00:00:00Z"
        );
    }
}
