//! Command orchestration: the plugin's two sync actions as CLI verbs.
//!
//! `pull` brings tracker issues into the document, `push` sends
//! section bodies back out. Both are generic over the store and
//! tracker so tests run against fakes.

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use sync_core::reconcile::{reconcile_incoming, reconcile_outgoing};
use sync_core::store::DocumentStore;
use sync_core::tracker::IssueTracker;

/// Fetch assigned issues and fold them into the document, creating it
/// first if it does not exist. Writes back only when the text changed.
pub async fn pull<S, T>(store: &S, tracker: &T, document_path: &str) -> Result<()>
where
    S: DocumentStore,
    T: IssueTracker,
{
    let issues = tracker
        .assigned_issues()
        .await
        .context("failed to fetch assigned issues")?;

    if issues.is_empty() {
        info!("No assigned issues; nothing to pull");
        return Ok(());
    }

    let content = if store.exists(document_path).await? {
        store.read(document_path).await?
    } else {
        info!("Creating sync document at {document_path}");
        store.create(document_path, "").await?;
        String::new()
    };

    let updated = reconcile_incoming(&content, &issues);
    if updated == content {
        info!("Document already up to date");
        return Ok(());
    }

    store.write(document_path, &updated).await?;
    info!("Pulled {} issue(s) into {document_path}", issues.len());
    Ok(())
}

/// Merge section bodies into issue descriptions on the tracker.
///
/// Updates apply one at a time in document order; one failed update is
/// logged and does not stop the rest. A missing document is fatal for
/// this direction.
pub async fn push<S, T>(store: &S, tracker: &T, document_path: &str) -> Result<()>
where
    S: DocumentStore,
    T: IssueTracker,
{
    let content = store
        .read(document_path)
        .await
        .with_context(|| format!("document not found: {document_path}"))?;

    let updates = reconcile_outgoing(&content, tracker).await;
    if updates.is_empty() {
        info!("Nothing to push");
        return Ok(());
    }

    let mut applied = 0usize;
    let mut failed = 0usize;
    for update in &updates {
        match tracker
            .update_description(&update.issue_id, &update.description)
            .await
        {
            Ok(()) => applied += 1,
            Err(e) => {
                failed += 1;
                warn!("Failed to update issue {}: {e}", update.issue_id);
            }
        }
    }

    info!("Pushed {applied} description(s), {failed} failure(s)");
    if applied == 0 && failed > 0 {
        bail!("all {failed} description update(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    use sync_core::issue::Issue;
    use sync_core::store::InMemoryStore;
    use sync_core::tracker::{Result as TrackerResult, TrackerError};

    fn issue(identifier: &str, title: &str) -> Issue {
        Issue {
            id: format!("id-{identifier}"),
            identifier: identifier.to_string(),
            title: title.to_string(),
            description: None,
            url: format!("https://linear.app/acme/issue/{identifier}"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    /// Scripted tracker: serves a fixed issue list and records the
    /// descriptions pushed to it; ids in `failing_updates` reject.
    struct FakeTracker {
        issues: Vec<Issue>,
        failing_updates: Vec<String>,
        pushed: Mutex<HashMap<String, String>>,
    }

    impl FakeTracker {
        fn with_issues(issues: Vec<Issue>) -> Self {
            Self {
                issues,
                failing_updates: Vec::new(),
                pushed: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn assigned_issues(&self) -> TrackerResult<Vec<Issue>> {
            Ok(self.issues.clone())
        }

        async fn issue_by_identifier(&self, identifier: &str) -> TrackerResult<Option<Issue>> {
            Ok(self
                .issues
                .iter()
                .find(|issue| issue.identifier == identifier)
                .cloned())
        }

        async fn update_description(&self, id: &str, description: &str) -> TrackerResult<()> {
            if self.failing_updates.iter().any(|failing| failing == id) {
                return Err(TrackerError::Http("boom".into()));
            }
            self.pushed
                .lock()
                .unwrap()
                .insert(id.to_string(), description.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn pull_creates_missing_document() {
        let store = InMemoryStore::new();
        let tracker = FakeTracker::with_issues(vec![issue("ENG-1", "Fix bug")]);

        pull(&store, &tracker, "Linear/Tasks.md").await.unwrap();

        let content = store.read("Linear/Tasks.md").await.unwrap();
        assert!(content.starts_with("# [ENG-1] Fix bug\n> Created: 2024-01-15\n\n"));
    }

    #[tokio::test]
    async fn pull_with_no_issues_touches_nothing() {
        let store = InMemoryStore::new();
        let tracker = FakeTracker::with_issues(vec![]);

        pull(&store, &tracker, "Tasks.md").await.unwrap();
        assert!(!store.exists("Tasks.md").await.unwrap());
    }

    #[tokio::test]
    async fn pull_twice_is_stable() {
        let store = InMemoryStore::new();
        let tracker = FakeTracker::with_issues(vec![issue("ENG-1", "Fix bug")]);

        pull(&store, &tracker, "Tasks.md").await.unwrap();
        let first = store.read("Tasks.md").await.unwrap();

        pull(&store, &tracker, "Tasks.md").await.unwrap();
        let second = store.read("Tasks.md").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn push_fails_on_missing_document() {
        let store = InMemoryStore::new();
        let tracker = FakeTracker::with_issues(vec![]);

        let result = push(&store, &tracker, "Tasks.md").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn push_applies_section_bodies() {
        let store = InMemoryStore::new();
        store
            .write("Tasks.md", "# [ENG-1] Fix bug\n\nDo the thing")
            .await
            .unwrap();
        let mut remote = issue("ENG-1", "Fix bug");
        remote.description = Some("old notes".to_string());
        let tracker = FakeTracker::with_issues(vec![remote]);

        push(&store, &tracker, "Tasks.md").await.unwrap();

        let pushed = tracker.pushed.lock().unwrap();
        assert_eq!(
            pushed.get("id-ENG-1").unwrap(),
            "old notes\n\n<!-- obsidian-sync-start -->\nDo the thing\n<!-- obsidian-sync-end -->"
        );
    }

    #[tokio::test]
    async fn one_failed_update_does_not_stop_the_rest() {
        let store = InMemoryStore::new();
        store
            .write(
                "Tasks.md",
                "# [ENG-1] Fix bug\n\nfirst\n\n# [ENG-2] Ship it\n\nsecond",
            )
            .await
            .unwrap();
        let mut tracker = FakeTracker::with_issues(vec![
            issue("ENG-1", "Fix bug"),
            issue("ENG-2", "Ship it"),
        ]);
        tracker.failing_updates.push("id-ENG-1".to_string());

        push(&store, &tracker, "Tasks.md").await.unwrap();

        let pushed = tracker.pushed.lock().unwrap();
        assert!(!pushed.contains_key("id-ENG-1"));
        assert!(pushed.get("id-ENG-2").unwrap().contains("second"));
    }
}
