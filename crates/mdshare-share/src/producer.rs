//! Share flow: document + password → share URL
//!
//! ```text
//! EditingPassword ──Submit──► Validating ──Validated──► Encrypting ──Sealed──► Ready
//!        ▲                        │                         │
//!        └────────Rejected────────┴─────────Rejected────────┘
//! ```
//!
//! `transition` is the whole state machine and does no work. `ShareFlow`
//! drives it, running validation and sealing between events. Passwords are
//! borrowed for the duration of a submit and never stored in any state.

use mdshare_core::config::LinkConfig;
use mdshare_core::{ContentRecord, ShareError, ShareResult, SharedDocument, SizeEstimate};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::estimate::SizeEstimator;
use crate::payload::share_url;
use crate::pipeline::Pipeline;

/// Link settings the producer needs, usually taken from [`LinkConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSettings {
    pub origin: String,
    pub min_password_len: usize,
    pub max_payload_bytes: usize,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self::from(&LinkConfig::default())
    }
}

impl From<&LinkConfig> for ShareSettings {
    fn from(config: &LinkConfig) -> Self {
        Self {
            origin: config.origin.clone(),
            min_password_len: config.min_password_len,
            max_payload_bytes: config.max_payload_bytes,
        }
    }
}

#[derive(Debug)]
pub enum ShareState {
    /// Waiting for a password; carries the reason the last attempt failed
    EditingPassword { error: Option<ShareError> },
    /// Checking password rules and the size estimate
    Validating,
    /// Deriving the key and sealing the payload
    Encrypting,
    /// Link is ready to copy
    Ready { url: String, payload: String },
}

impl Default for ShareState {
    fn default() -> Self {
        ShareState::EditingPassword { error: None }
    }
}

impl ShareState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ShareState::Validating | ShareState::Encrypting)
    }
}

#[derive(Debug)]
pub enum ShareEvent {
    Submit,
    Validated,
    Sealed { url: String, payload: String },
    Rejected(ShareError),
    /// Back to password entry, e.g. to create another link
    Edit,
}

/// Pure share-flow transition. Events that make no sense in the current
/// state leave it unchanged; in particular a second `Submit` while busy is
/// ignored.
pub fn transition(state: ShareState, event: ShareEvent) -> ShareState {
    use ShareEvent as E;
    use ShareState as S;

    match (state, event) {
        (S::EditingPassword { .. }, E::Submit) => S::Validating,
        (S::Validating, E::Validated) => S::Encrypting,
        (S::Encrypting, E::Sealed { url, payload }) => S::Ready { url, payload },
        (S::Validating | S::Encrypting, E::Rejected(error)) => {
            S::EditingPassword { error: Some(error) }
        }
        (S::EditingPassword { .. } | S::Ready { .. }, E::Edit) => {
            S::EditingPassword { error: None }
        }
        (state, _) => state,
    }
}

/// Drives one document through the share state machine.
#[derive(Debug)]
pub struct ShareFlow {
    pipeline: Pipeline,
    settings: ShareSettings,
    estimator: SizeEstimator,
    record: ContentRecord,
    estimate: SizeEstimate,
    state: ShareState,
}

impl ShareFlow {
    /// Start sharing `doc`. Runs the size estimate up front so the caller can
    /// warn before asking for a password.
    pub fn new(
        pipeline: Pipeline,
        settings: ShareSettings,
        doc: &SharedDocument,
    ) -> ShareResult<Self> {
        let estimator =
            SizeEstimator::new(settings.max_payload_bytes).with_compressor(pipeline.compressor());
        let record = ContentRecord::from(doc);
        let estimate = estimator.estimate_record(&record)?;

        Ok(Self {
            pipeline,
            settings,
            estimator,
            record,
            estimate,
            state: ShareState::default(),
        })
    }

    pub fn state(&self) -> &ShareState {
        &self.state
    }

    pub fn estimate(&self) -> &SizeEstimate {
        &self.estimate
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// The finished URL, once `Ready`.
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            ShareState::Ready { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Return to password entry, discarding any error or finished link.
    pub fn edit(&mut self) -> &ShareState {
        self.apply(ShareEvent::Edit)
    }

    /// Validate the password pair and, if everything checks out, seal the
    /// document into an encrypted link.
    pub fn submit(&mut self, password: &SecretString, confirmation: &SecretString) -> &ShareState {
        if !matches!(self.state, ShareState::EditingPassword { .. }) {
            return &self.state;
        }
        self.apply(ShareEvent::Submit);

        if let Err(e) = self.validate(password, confirmation) {
            debug!(error = %e, "share rejected before encryption");
            return self.apply(ShareEvent::Rejected(e));
        }
        self.apply(ShareEvent::Validated);

        let event = match self.pipeline.seal(&self.record, password) {
            Ok(payload) => self.sealed(payload),
            Err(e) => {
                tracing::warn!(error = %e, "sealing share payload failed");
                ShareEvent::Rejected(e)
            }
        };
        self.apply(event)
    }

    /// Produce an unencrypted link. Only the size check applies.
    pub fn share_plain(&mut self) -> &ShareState {
        if !matches!(self.state, ShareState::EditingPassword { .. }) {
            return &self.state;
        }
        self.apply(ShareEvent::Submit);

        if let Err(e) = self.estimator.check(&self.estimate) {
            return self.apply(ShareEvent::Rejected(e));
        }
        self.apply(ShareEvent::Validated);

        let event = match self.pipeline.encode_plain(&self.record) {
            Ok(payload) => self.sealed(payload),
            Err(e) => ShareEvent::Rejected(e),
        };
        self.apply(event)
    }

    fn validate(&self, password: &SecretString, confirmation: &SecretString) -> ShareResult<()> {
        let password = password.expose_secret();
        if password.chars().count() < self.settings.min_password_len {
            return Err(ShareError::PasswordTooShort {
                min: self.settings.min_password_len,
            });
        }
        if password != confirmation.expose_secret() {
            return Err(ShareError::PasswordMismatch);
        }
        self.estimator.check(&self.estimate)
    }

    fn sealed(&self, payload: String) -> ShareEvent {
        let url = share_url(&self.settings.origin, &payload);
        info!(
            payload = payload.len(),
            encrypted = crate::payload::is_encrypted(&payload),
            "share link ready"
        );
        ShareEvent::Sealed { url, payload }
    }

    fn apply(&mut self, event: ShareEvent) -> &ShareState {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, event);
        &self.state
    }
}
