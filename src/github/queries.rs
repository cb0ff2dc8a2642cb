//! GraphQL documents and response shapes.

use serde::Deserialize;

use crate::models::{Discussion, DiscussionCategory};

/// First page of discussion categories.
pub const LIST_CATEGORIES: &str = r"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    discussionCategories(first: 100) {
      nodes {
        id
        name
      }
    }
  }
}";

/// First page of a category's discussions, oldest first.
pub const LIST_DISCUSSIONS: &str = r"
query($owner: String!, $repo: String!, $categoryId: ID!) {
  repository(owner: $owner, name: $repo) {
    discussions(first: 100, categoryId: $categoryId, orderBy: {field: CREATED_AT, direction: ASC}) {
      nodes {
        id
        title
        createdAt
        url
      }
    }
  }
}";

/// Deletes one discussion by node ID.
pub const DELETE_DISCUSSION: &str = r"
mutation($id: ID!) {
  deleteDiscussion(input: {id: $id}) {
    clientMutationId
  }
}";

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    /// Payload; absent or null when the request failed as a whole.
    pub data: Option<T>,
    /// Errors reported alongside (or instead of) the payload.
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    /// Human-readable message.
    pub message: String,
}

/// `{ repository { ... } }`; the repository is null when it cannot be
/// resolved.
#[derive(Debug, Deserialize)]
pub struct RepositoryData<R> {
    /// The repository, if it exists and is visible to the token.
    pub repository: Option<R>,
}

/// A GraphQL connection; only `nodes` is requested.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    /// Page items; individual items may be null.
    #[serde(default)]
    pub nodes: Vec<Option<T>>,
}

impl<T> Connection<T> {
    /// Non-null items, in order.
    pub fn into_items(self) -> Vec<T> {
        self.nodes.into_iter().flatten().collect()
    }
}

/// Repository fields selected by [`LIST_CATEGORIES`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesRepository {
    /// Categories connection.
    pub discussion_categories: Connection<DiscussionCategory>,
}

/// Repository fields selected by [`LIST_DISCUSSIONS`].
#[derive(Debug, Deserialize)]
pub struct DiscussionsRepository {
    /// Discussions connection.
    pub discussions: Connection<Discussion>,
}

/// Payload of [`DELETE_DISCUSSION`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDiscussionData {
    /// Mutation payload.
    pub delete_discussion: Option<serde_json::Value>,
}
