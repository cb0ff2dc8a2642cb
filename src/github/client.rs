//! Blocking GraphQL client for the discussions API.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

use super::DiscussionApi;
use super::queries::{
    CategoriesRepository, DELETE_DISCUSSION, DeleteDiscussionData, DiscussionsRepository,
    GraphqlResponse, LIST_CATEGORIES, LIST_DISCUSSIONS, RepositoryData,
};
use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::context::RepoRef;
use crate::models::{Discussion, DiscussionCategory};
use crate::{Error, Result};

/// GitHub GraphQL client.
///
/// Every call is a single blocking POST; nothing is retried.
pub struct GraphqlClient {
    endpoint: String,
    token: SecretString,
    client: reqwest::blocking::Client,
}

impl GraphqlClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS);

    /// Creates a client for `endpoint` authenticating with `token`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, token: SecretString) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            client: Self::build_http_client(Self::DEFAULT_TIMEOUT),
        }
    }

    /// Sets the per-request timeout. A zero timeout disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::build_http_client(timeout);
        self
    }

    fn build_http_client(timeout: Duration) -> reqwest::blocking::Client {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(format!("discussion-sweeper/{}", env!("CARGO_PKG_VERSION")));
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new())
    }

    /// POSTs a document and decodes its `data`.
    fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("bearer {}", self.token.expose_secret()),
            )
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .map_err(|e| Error::RemoteFailure(format!("GraphQL request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::RemoteFailure(format!("GraphQL response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(Error::RemoteFailure(http_error_message(
                status.as_u16(),
                &body,
            )));
        }

        decode_response(&body)
    }
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl DiscussionApi for GraphqlClient {
    #[instrument(name = "github.list_categories", skip(self), fields(repo = %repo))]
    fn list_categories(&self, repo: &RepoRef) -> Result<Vec<DiscussionCategory>> {
        let data: RepositoryData<CategoriesRepository> = self.execute(
            LIST_CATEGORIES,
            json!({ "owner": repo.owner, "repo": repo.repo }),
        )?;
        let categories = require_repository(data, repo)?
            .discussion_categories
            .into_items();
        debug!(count = categories.len(), "Fetched discussion categories");
        Ok(categories)
    }

    #[instrument(name = "github.list_discussions", skip(self), fields(repo = %repo))]
    fn list_discussions(&self, repo: &RepoRef, category_id: &str) -> Result<Vec<Discussion>> {
        let data: RepositoryData<DiscussionsRepository> = self.execute(
            LIST_DISCUSSIONS,
            json!({ "owner": repo.owner, "repo": repo.repo, "categoryId": category_id }),
        )?;
        let discussions = require_repository(data, repo)?.discussions.into_items();
        debug!(count = discussions.len(), "Fetched discussions");
        Ok(discussions)
    }

    #[instrument(name = "github.delete_discussion", skip(self))]
    fn delete_discussion(&self, discussion_id: &str) -> Result<()> {
        let _: DeleteDiscussionData =
            self.execute(DELETE_DISCUSSION, json!({ "id": discussion_id }))?;
        Ok(())
    }
}

/// Decodes a GraphQL response body.
///
/// A non-empty `errors` array wins over any partial `data`; its messages are
/// joined with `; `.
pub(super) fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: GraphqlResponse<T> = serde_json::from_str(body)
        .map_err(|e| Error::RemoteFailure(format!("Malformed GraphQL response: {e}")))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::RemoteFailure(message));
    }

    envelope
        .data
        .ok_or_else(|| Error::RemoteFailure("GraphQL response contained no data".to_string()))
}

fn require_repository<R>(data: RepositoryData<R>, repo: &RepoRef) -> Result<R> {
    data.repository.ok_or_else(|| {
        Error::RemoteFailure(format!(
            "Could not resolve to a Repository with the name '{repo}'."
        ))
    })
}

/// Message for a non-2xx response, preferring GitHub's JSON `message`.
fn http_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .map_or_else(
            || format!("GraphQL endpoint returned HTTP {status}"),
            |message| format!("{message} (HTTP {status})"),
        )
}
