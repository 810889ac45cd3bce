//! Linear GraphQL client.
//!
//! Implements sync-core's `IssueTracker` over Linear's GraphQL
//! endpoint. Only the slice of the API the sync needs is modeled:
//! the viewer's assigned issues, single-issue lookup by identifier,
//! and the description-update mutation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use sync_core::issue::Issue;
use sync_core::tracker::{IssueTracker, Result, TrackerError};

const LINEAR_ENDPOINT: &str = "https://api.linear.app/graphql";

const ASSIGNED_ISSUES_QUERY: &str = r#"
query {
  viewer {
    assignedIssues(orderBy: createdAt) {
      nodes {
        id
        identifier
        title
        description
        url
        createdAt
        completedAt
      }
    }
  }
}
"#;

const ISSUE_BY_IDENTIFIER_QUERY: &str = r#"
query IssueByIdentifier($id: String!) {
  issue(id: $id) {
    id
    identifier
    title
    description
    url
    createdAt
    completedAt
  }
}
"#;

const UPDATE_DESCRIPTION_MUTATION: &str = r#"
mutation UpdateIssue($id: String!, $description: String!) {
  issueUpdate(id: $id, input: { description: $description }) {
    success
  }
}
"#;

/// Client for Linear's GraphQL API.
pub struct LinearClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl LinearClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: LINEAR_ENDPOINT.to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (for tests or proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// POST one GraphQL request and unwrap the response envelope.
    async fn query<T>(&self, query: &str, variables: serde_json::Value) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| TrackerError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Http(format!("Linear API error: {status}")));
        }

        let envelope: GraphqlEnvelope<T> = response
            .json()
            .await
            .map_err(|e| TrackerError::UnexpectedResponse(e.to_string()))?;

        if let Some(errors) = envelope.errors {
            let message = errors
                .into_iter()
                .next()
                .map(|e| e.message)
                .unwrap_or_else(|| "unknown GraphQL error".to_string());
            return Err(TrackerError::Graphql(message));
        }

        envelope
            .data
            .ok_or_else(|| TrackerError::UnexpectedResponse("missing data field".to_string()))
    }
}

#[async_trait]
impl IssueTracker for LinearClient {
    async fn assigned_issues(&self) -> Result<Vec<Issue>> {
        let data: ViewerData = self.query(ASSIGNED_ISSUES_QUERY, json!({})).await?;

        let mut issues: Vec<Issue> = data
            .viewer
            .assigned_issues
            .nodes
            .into_iter()
            .map(Issue::from)
            .collect();

        // Newest created first; the incoming reconciler relies on it.
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!("Fetched {} assigned issue(s)", issues.len());
        Ok(issues)
    }

    async fn issue_by_identifier(&self, identifier: &str) -> Result<Option<Issue>> {
        let result: Result<IssueData> = self
            .query(ISSUE_BY_IDENTIFIER_QUERY, json!({ "id": identifier }))
            .await;

        match result {
            Ok(data) => Ok(data.issue.map(Issue::from)),
            // Linear reports unknown identifiers as GraphQL errors;
            // those are a normal not-found outcome here.
            Err(TrackerError::Graphql(message)) => {
                debug!("Lookup for {identifier} returned GraphQL error: {message}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update_description(&self, id: &str, description: &str) -> Result<()> {
        let data: IssueUpdateData = self
            .query(
                UPDATE_DESCRIPTION_MUTATION,
                json!({ "id": id, "description": description }),
            )
            .await?;

        if !data.issue_update.success {
            return Err(TrackerError::UnexpectedResponse(format!(
                "issueUpdate reported failure for {id}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    #[serde(rename = "assignedIssues")]
    assigned_issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Vec<IssueNode>,
}

#[derive(Debug, Deserialize)]
struct IssueData {
    issue: Option<IssueNode>,
}

#[derive(Debug, Deserialize)]
struct IssueUpdateData {
    #[serde(rename = "issueUpdate")]
    issue_update: IssueUpdatePayload,
}

#[derive(Debug, Deserialize)]
struct IssueUpdatePayload {
    success: bool,
}

/// Issue in Linear's wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    id: String,
    identifier: String,
    title: String,
    description: Option<String>,
    url: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<IssueNode> for Issue {
    fn from(node: IssueNode) -> Self {
        Issue {
            id: node.id,
            identifier: node.identifier,
            title: node.title,
            description: node.description,
            url: node.url,
            created_at: node.created_at,
            completed_at: node.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_assigned_issues_response() {
        let body = r#"{
            "data": {
                "viewer": {
                    "assignedIssues": {
                        "nodes": [
                            {
                                "id": "uuid-1",
                                "identifier": "ENG-1",
                                "title": "Fix bug",
                                "description": null,
                                "url": "https://linear.app/acme/issue/ENG-1",
                                "createdAt": "2024-01-15T00:00:00.000Z",
                                "completedAt": null
                            }
                        ]
                    }
                }
            }
        }"#;

        let envelope: GraphqlEnvelope<ViewerData> = serde_json::from_str(body).unwrap();
        let nodes = envelope.data.unwrap().viewer.assigned_issues.nodes;

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].identifier, "ENG-1");
        assert!(nodes[0].description.is_none());
        assert!(nodes[0].completed_at.is_none());
    }

    #[test]
    fn deserializes_graphql_error_envelope() {
        let body = r#"{
            "errors": [
                { "message": "Entity not found: Issue" }
            ]
        }"#;

        let envelope: GraphqlEnvelope<IssueData> = serde_json::from_str(body).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(
            envelope.errors.unwrap()[0].message,
            "Entity not found: Issue"
        );
    }

    #[test]
    fn deserializes_issue_update_payload() {
        let body = r#"{ "data": { "issueUpdate": { "success": true } } }"#;

        let envelope: GraphqlEnvelope<IssueUpdateData> = serde_json::from_str(body).unwrap();
        assert!(envelope.data.unwrap().issue_update.success);
    }

    #[test]
    fn issue_node_converts_with_timestamps() {
        let node: IssueNode = serde_json::from_str(
            r#"{
                "id": "uuid-1",
                "identifier": "ENG-1",
                "title": "Fix bug",
                "description": "old notes",
                "url": "https://linear.app/acme/issue/ENG-1",
                "createdAt": "2024-01-15T08:30:00.000Z",
                "completedAt": "2024-01-20T00:00:00.000Z"
            }"#,
        )
        .unwrap();

        let issue = Issue::from(node);
        assert_eq!(issue.created_at.format("%Y-%m-%d").to_string(), "2024-01-15");
        assert_eq!(
            issue.completed_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-01-20"
        );
    }
}
