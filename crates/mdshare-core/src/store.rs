//! Document store collaborator
//!
//! The share pipeline never owns documents. The viewer's "add to editor"
//! action goes through this trait so any backing store can receive the
//! decrypted content.

use std::fmt;

/// Input for creating a document in the editor's store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

/// Opaque identifier returned by the store for a newly created document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait DocumentStore {
    /// Create a new document. Never deduplicates: every call yields a new id.
    fn create_document(&mut self, doc: NewDocument) -> anyhow::Result<DocumentId>;
}
