//! Discussion and category records as returned by the GraphQL API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discussion category within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionCategory {
    /// GraphQL node ID (e.g. `DIC_kwDO...`).
    pub id: String,
    /// Display name, compared case-sensitively.
    pub name: String,
}

impl DiscussionCategory {
    /// Creates a category record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A single discussion thread.
///
/// Read-only: the sweeper never mutates a record, it either keeps it or
/// deletes it remotely by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    /// GraphQL node ID used by the `deleteDiscussion` mutation.
    pub id: String,
    /// Discussion title, matched against the title template.
    pub title: String,
    /// Creation time, compared against the cutoff instant.
    pub created_at: DateTime<Utc>,
    /// HTML URL, used only in log lines.
    pub url: String,
}

impl Discussion {
    /// Creates a discussion record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at,
            url: url.into(),
        }
    }
}
