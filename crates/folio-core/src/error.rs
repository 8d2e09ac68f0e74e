//! Errors surfaced by the collaborator boundary.

use thiserror::Error;

/// Failure of an external lookup (page metadata, item fetch, search, media
/// probe).
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The request never produced a usable response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("unexpected HTTP status {code}")]
    Status { code: u16 },

    /// The response arrived but could not be interpreted.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl LookupError {
    /// Whether retrying the same request can plausibly succeed.
    ///
    /// Transport failures and server-side statuses (5xx, 429) are transient;
    /// client errors and undecodable bodies will not improve on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code } => *code == 429 || *code >= 500,
            Self::Decode(_) => false,
        }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
