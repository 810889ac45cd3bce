//! sync-core: Reconciliation between a sectioned markdown document and
//! a remote issue tracker.
//!
//! This crate provides the core functionality for:
//! - Parsing the sync document into per-issue sections
//! - Managing the marker-delimited region inside issue descriptions
//! - Computing the two one-directional reconciliation passes
//! - DocumentStore and IssueTracker trait abstractions
//!
//! Everything here is pure text transformation; network and storage
//! live behind the trait seams.

pub mod document;
pub mod issue;
pub mod marker;
pub mod reconcile;
pub mod store;
pub mod tracker;

pub use document::Section;
pub use issue::Issue;
pub use reconcile::{DescriptionUpdate, reconcile_incoming, reconcile_outgoing};
pub use store::{DocumentStore, InMemoryStore, StoreError};
pub use tracker::{IssueTracker, TrackerError};
