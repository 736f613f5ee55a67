use serde::{Deserialize, Serialize};

/// A document handed to the share flow by the editor's document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedDocument {
    pub title: String,
    pub content: String,
}

impl SharedDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The record packed into every payload and recovered by the viewer.
///
/// The title lives here rather than in the URL, so for encrypted links it
/// is protected along with the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub title: String,
    pub markdown: String,
}

impl From<&SharedDocument> for ContentRecord {
    fn from(doc: &SharedDocument) -> Self {
        Self {
            title: doc.title.clone(),
            markdown: doc.content.clone(),
        }
    }
}

/// Result of the cheap pre-flight size check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeEstimate {
    /// Whether the predicted payload stays within `limit_bytes`
    pub fits: bool,
    /// Deflated size of the packed record
    pub compressed_bytes: usize,
    /// Whitespace-separated words in the markdown
    pub word_count: usize,
    /// Predicted payload length after encryption and encoding
    pub estimated_bytes: usize,
    /// Budget the estimate was checked against
    pub limit_bytes: usize,
}
