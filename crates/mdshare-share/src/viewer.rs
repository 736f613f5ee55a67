//! Viewer flow: share URL → content
//!
//! ```text
//! open(url) ─┬─ empty fragment ─────────────────────────► Failed(NoData)
//!            ├─ plain payload ── decodes ───────────────► Content
//!            │                └─ does not ──────────────► Failed(Corrupted)
//!            └─ encrypted ─┬─ malformed ────────────────► Failed(Corrupted)
//!                          └─► AwaitingPassword ──Submit──► Decrypting ──Decrypted──► Content
//!                                    ▲                          │
//!                                    └─────────Rejected─────────┘  (WrongPassword | Corrupted)
//! ```
//!
//! Every submit re-derives the key from scratch; nothing from a failed
//! attempt is kept.

use mdshare_core::{
    ContentRecord, DocumentId, DocumentStore, NewDocument, ShareError, ShareResult,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::payload::{extract_fragment, is_encrypted, parse, EncryptedParts};
use crate::pipeline::Pipeline;

#[derive(Debug)]
pub enum ViewerState {
    /// Encrypted link waiting for a password; carries the last failure
    AwaitingPassword { error: Option<ShareError> },
    Decrypting,
    /// Decrypted (or plain) content, ready for the renderer
    Content(ContentRecord),
    /// Terminal: the link itself is unusable
    Failed(ShareError),
}

impl ViewerState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ViewerState::Decrypting)
    }
}

#[derive(Debug)]
pub enum ViewerEvent {
    Submit,
    Decrypted(ContentRecord),
    Rejected(ShareError),
}

/// Pure viewer-flow transition for the password loop. Events that make no
/// sense in the current state leave it unchanged.
pub fn transition(state: ViewerState, event: ViewerEvent) -> ViewerState {
    use ViewerEvent as E;
    use ViewerState as S;

    match (state, event) {
        (S::AwaitingPassword { .. }, E::Submit) => S::Decrypting,
        (S::Decrypting, E::Decrypted(record)) => S::Content(record),
        (S::Decrypting, E::Rejected(error)) => S::AwaitingPassword { error: Some(error) },
        (state, _) => state,
    }
}

/// Drives one received link through the viewer state machine.
#[derive(Debug)]
pub struct ViewerFlow {
    pipeline: Pipeline,
    parts: Option<EncryptedParts>,
    state: ViewerState,
}

impl ViewerFlow {
    /// Load a link. Accepts a full URL, a `#fragment` or a bare payload.
    ///
    /// Plain payloads resolve immediately; encrypted ones are checked for
    /// structure and then wait for a password.
    pub fn open(pipeline: Pipeline, url_or_fragment: &str) -> Self {
        let Some(payload) = extract_fragment(url_or_fragment) else {
            debug!("share link has no fragment");
            return Self::with_state(pipeline, None, ViewerState::Failed(ShareError::NoData));
        };

        if !is_encrypted(payload) {
            let state = match pipeline.decode_plain(payload) {
                Ok(record) => ViewerState::Content(record),
                Err(e) => ViewerState::Failed(as_corrupted(e)),
            };
            return Self::with_state(pipeline, None, state);
        }

        match parse(payload) {
            Ok(parts) => Self::with_state(
                pipeline,
                Some(parts),
                ViewerState::AwaitingPassword { error: None },
            ),
            Err(e) => Self::with_state(pipeline, None, ViewerState::Failed(e)),
        }
    }

    fn with_state(pipeline: Pipeline, parts: Option<EncryptedParts>, state: ViewerState) -> Self {
        Self {
            pipeline,
            parts,
            state,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn is_encrypted(&self) -> bool {
        self.parts.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// The content to render, once available.
    pub fn content(&self) -> Option<&ContentRecord> {
        match &self.state {
            ViewerState::Content(record) => Some(record),
            _ => None,
        }
    }

    /// Try a password. Wrong passwords and post-decryption corruption both
    /// leave the flow waiting for another attempt.
    pub fn submit(&mut self, password: &SecretString) -> &ViewerState {
        if !matches!(self.state, ViewerState::AwaitingPassword { .. }) {
            return &self.state;
        }
        let Some(parts) = self.parts.as_ref() else {
            return &self.state;
        };
        step(&mut self.state, ViewerEvent::Submit);

        let event = match self.pipeline.open(parts, password) {
            Ok(record) => {
                info!(bytes = record.markdown.len(), "share link decrypted");
                ViewerEvent::Decrypted(record)
            }
            Err(e) => {
                debug!(error = %e, "share link decryption rejected");
                ViewerEvent::Rejected(e)
            }
        };
        step(&mut self.state, event);
        &self.state
    }

    /// Copy the received content into the local document store.
    ///
    /// Creates a new document on every call.
    pub fn import_into(&self, store: &mut dyn DocumentStore) -> ShareResult<DocumentId> {
        let record = self
            .content()
            .ok_or_else(|| ShareError::Unknown(anyhow::anyhow!("no content to import yet")))?;

        let id = store.create_document(NewDocument {
            title: record.title.clone(),
            content: record.markdown.clone(),
        })?;
        info!(document = %id, "imported shared document");
        Ok(id)
    }
}

fn step(state: &mut ViewerState, event: ViewerEvent) {
    let prev = std::mem::replace(state, ViewerState::Decrypting);
    *state = transition(prev, event);
}

/// Plain-path failures are all reported as corruption.
fn as_corrupted(e: ShareError) -> ShareError {
    match e {
        ShareError::Corrupted(_) => e,
        other => ShareError::corrupted(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdshare_core::ErrorKind;

    fn record() -> ContentRecord {
        ContentRecord {
            title: "T".into(),
            markdown: "M".into(),
        }
    }

    #[test]
    fn test_password_loop_transitions() {
        let s = transition(ViewerState::AwaitingPassword { error: None }, ViewerEvent::Submit);
        assert!(matches!(s, ViewerState::Decrypting));

        let s = transition(s, ViewerEvent::Rejected(ShareError::WrongPassword));
        assert!(matches!(
            s,
            ViewerState::AwaitingPassword { error: Some(ShareError::WrongPassword) }
        ));

        let s = transition(s, ViewerEvent::Submit);
        let s = transition(s, ViewerEvent::Decrypted(record()));
        assert!(matches!(s, ViewerState::Content(ref r) if *r == record()));
    }

    #[test]
    fn test_terminal_states_ignore_events() {
        let s = transition(ViewerState::Failed(ShareError::NoData), ViewerEvent::Submit);
        assert!(matches!(s, ViewerState::Failed(ShareError::NoData)));

        let s = transition(ViewerState::Content(record()), ViewerEvent::Submit);
        assert!(matches!(s, ViewerState::Content(_)));
    }

    #[test]
    fn test_submit_while_decrypting_is_ignored() {
        let s = transition(ViewerState::Decrypting, ViewerEvent::Submit);
        assert!(matches!(s, ViewerState::Decrypting));
    }

    #[test]
    fn test_empty_fragment_is_no_data() {
        for input in ["", "https://mdshare.app/s", "https://mdshare.app/s#", "#"] {
            let flow = ViewerFlow::open(Pipeline::default(), input);
            match flow.state() {
                ViewerState::Failed(e) => {
                    assert_eq!(e.kind(), ErrorKind::NoData, "input {input:?}")
                }
                other => panic!("input {input:?}: unexpected state {other:?}"),
            }
        }
    }

    #[test]
    fn test_import_before_content_fails() {
        struct NeverCalled;
        impl DocumentStore for NeverCalled {
            fn create_document(&mut self, _: NewDocument) -> anyhow::Result<DocumentId> {
                panic!("store must not be touched");
            }
        }

        let flow = ViewerFlow::open(Pipeline::default(), "");
        assert!(flow.import_into(&mut NeverCalled).is_err());
    }
}
