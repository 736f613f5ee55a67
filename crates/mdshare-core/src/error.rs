use thiserror::Error;

pub type ShareResult<T> = Result<T, ShareError>;

/// Every failure a share or viewer flow can surface to its caller.
///
/// Lower-level codec and crypto errors never cross the flow boundary; they
/// are folded into one of these variants first.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error(
        "document too large to share: ~{estimated_bytes} bytes after encryption \
         (limit {limit_bytes}, {word_count} words)"
    )]
    TooLarge {
        estimated_bytes: usize,
        limit_bytes: usize,
        word_count: usize,
    },

    #[error("wrong password")]
    WrongPassword,

    #[error("share link is corrupted: {0}")]
    Corrupted(String),

    #[error("share link carries no data")]
    NoData,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

/// Coarse classification of a [`ShareError`], for callers that branch on
/// the kind of failure rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TooLarge,
    WrongPassword,
    Corrupted,
    NoData,
    Validation,
    Unknown,
}

impl ShareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShareError::TooLarge { .. } => ErrorKind::TooLarge,
            ShareError::WrongPassword => ErrorKind::WrongPassword,
            ShareError::Corrupted(_) => ErrorKind::Corrupted,
            ShareError::NoData => ErrorKind::NoData,
            ShareError::PasswordTooShort { .. } | ShareError::PasswordMismatch => {
                ErrorKind::Validation
            }
            ShareError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Whether the user can fix this by entering a different password.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::WrongPassword | ErrorKind::Validation
        )
    }

    pub fn corrupted(msg: impl Into<String>) -> Self {
        ShareError::Corrupted(msg.into())
    }
}
