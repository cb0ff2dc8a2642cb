//! GitHub discussions API.
//!
//! The sweeper talks to GitHub only through [`DiscussionApi`]. The
//! production implementation is [`GraphqlClient`]; tests substitute an
//! in-memory fake. [`ApiConnector`] builds an implementation from the
//! validated configuration, so the token never leaves this module's
//! callers as plain text.

mod client;
mod queries;

pub use client::GraphqlClient;

use secrecy::{ExposeSecret, SecretString};

use crate::Result;
use crate::config::SweeperConfig;
use crate::context::RepoRef;
use crate::models::{Discussion, DiscussionCategory};

/// Remote operations needed by a sweep.
///
/// All calls are blocking and issued sequentially.
pub trait DiscussionApi: Send + Sync {
    /// Lists the first 100 discussion categories of `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RemoteFailure`] on transport or API errors.
    fn list_categories(&self, repo: &RepoRef) -> Result<Vec<DiscussionCategory>>;

    /// Lists the first 100 discussions in a category, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RemoteFailure`] on transport or API errors.
    fn list_discussions(&self, repo: &RepoRef, category_id: &str) -> Result<Vec<Discussion>>;

    /// Deletes a discussion by node ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RemoteFailure`] on transport or API errors.
    fn delete_discussion(&self, discussion_id: &str) -> Result<()>;
}

/// Creates an authenticated [`DiscussionApi`] for a run.
pub trait ApiConnector {
    /// Connects using the token and endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    fn connect(&self, config: &SweeperConfig) -> Result<Box<dyn DiscussionApi>>;
}

/// Connects to the GraphQL endpoint with [`GraphqlClient`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphqlConnector;

impl ApiConnector for GraphqlConnector {
    fn connect(&self, config: &SweeperConfig) -> Result<Box<dyn DiscussionApi>> {
        let token = SecretString::from(config.github_token.expose_secret().to_string());
        Ok(Box::new(
            GraphqlClient::new(config.api_url.clone(), token).with_timeout(config.request_timeout),
        ))
    }
}
