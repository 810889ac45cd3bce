//! Issue data as seen during one sync pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remote issue. The tracker owns these; the sync holds a transient
/// copy for the duration of a single pass and never caches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable, globally unique identifier (GraphQL node id).
    pub id: String,
    /// Human-readable key used as the document anchor, e.g. "ENG-123".
    pub identifier: String,
    pub title: String,
    /// Free text; may contain a managed region (see `marker`).
    pub description: Option<String>,
    /// Canonical link to the issue.
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
