//! IssueTracker trait abstraction for the remote tracker API.
//!
//! Implementations:
//! - `LinearClient` (in linear-api) - Linear's GraphQL endpoint
//! - Scripted fakes in tests

use async_trait::async_trait;
use thiserror::Error;

use crate::issue::Issue;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Remote issue tracker abstraction.
///
/// Transport concerns (auth, retries, timeouts) belong entirely to the
/// implementation; the core only sees issues and errors.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Issues assigned to the authenticated user, newest created
    /// first. The incoming reconciler relies on this ordering.
    async fn assigned_issues(&self) -> Result<Vec<Issue>>;

    /// Look up a single issue by its human identifier. Not-found is a
    /// normal outcome, not an error.
    async fn issue_by_identifier(&self, identifier: &str) -> Result<Option<Issue>>;

    /// Replace an issue's description.
    async fn update_description(&self, id: &str, description: &str) -> Result<()>;
}
