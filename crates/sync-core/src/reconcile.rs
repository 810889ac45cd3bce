//! The two one-directional reconciliation passes.
//!
//! Incoming (tracker -> document): new issues become fresh sections at
//! the top of the document; issues already tracked get their metadata
//! run rewritten, with user-authored bodies left alone.
//!
//! Outgoing (document -> tracker): each section body is merged into
//! the matching issue's description through the managed region, so
//! description text written on the Linear side survives every push.
//!
//! Both passes are idempotent; callers compare output with input to
//! decide whether anything needs writing back.

use tracing::{debug, warn};

use crate::document;
use crate::issue::Issue;
use crate::marker;
use crate::tracker::IssueTracker;

/// A pending description rewrite for one issue, ready to be applied
/// through the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionUpdate {
    pub issue_id: String,
    pub description: String,
}

/// Fold freshly fetched issues into the document text.
///
/// Pure text transformation: no storage or network calls happen here.
/// `issues` must arrive newest-created-first; new sections keep that
/// order when prepended.
pub fn reconcile_incoming(content: &str, issues: &[Issue]) -> String {
    let existing = document::extract_keys(content);

    let (tracked, new): (Vec<Issue>, Vec<Issue>) = issues
        .iter()
        .cloned()
        .partition(|issue| existing.contains(&issue.identifier));

    debug!(
        "Reconciling {} tracked and {} new issue(s) into document",
        tracked.len(),
        new.len()
    );

    let updated = document::update_metadata(content, &tracked);
    document::prepend_sections(&updated, &new)
}

/// Compute description rewrites for every section with a non-empty
/// body.
///
/// Sections whose key resolves to no issue are skipped with a warning,
/// and a tracker failure on one lookup skips just that section; the
/// rest of the document still processes.
pub async fn reconcile_outgoing<T: IssueTracker + ?Sized>(
    content: &str,
    tracker: &T,
) -> Vec<DescriptionUpdate> {
    let mut updates = Vec::new();

    for section in document::parse(content) {
        if section.body.is_empty() {
            continue;
        }

        let issue = match tracker.issue_by_identifier(&section.key).await {
            Ok(Some(issue)) => issue,
            Ok(None) => {
                warn!("Issue not found: {}", section.key);
                continue;
            }
            Err(e) => {
                warn!("Lookup failed for {}: {e}", section.key);
                continue;
            }
        };

        let foreign = marker::extract_foreign(issue.description.as_deref());
        let description = marker::build_description(&foreign, &section.body);

        updates.push(DescriptionUpdate {
            issue_id: issue.id,
            description,
        });
    }

    updates
}
