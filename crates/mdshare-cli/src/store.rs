//! Filesystem-backed document store for imported shares

use anyhow::Context;
use mdshare_core::{DocumentId, DocumentStore, NewDocument};
use std::path::{Path, PathBuf};

const MAX_SLUG_LEN: usize = 48;

/// Writes each imported document to `<dir>/<slug>-<uuid>.md`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: expand_tilde(dir.as_ref()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentStore for DirectoryStore {
    fn create_document(&mut self, doc: NewDocument) -> anyhow::Result<DocumentId> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating documents dir: {}", self.dir.display()))?;

        let stem = format!("{}-{}", slugify(&doc.title), uuid::Uuid::new_v4());
        let path = self.dir.join(format!("{stem}.md"));
        std::fs::write(&path, doc.content.as_bytes())
            .with_context(|| format!("writing document: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "document written");
        Ok(DocumentId(stem))
    }
}

/// Expand `~` in path to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}

/// Lowercase ASCII slug for file names; "untitled" when nothing survives.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len().min(MAX_SLUG_LEN));
    for c in title.chars() {
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}
