//! Error types for stagecraft modules using thiserror.

use thiserror::Error;

/// Errors from a chat exchange with the LLM provider.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("The responder produced no final message")]
    NoResponse,

    #[error("Chat request timed out after {0} seconds")]
    Timeout(u64),

    #[error("OPENAI_API_KEY is not set. Export it before running stagecraft.")]
    MissingApiKey,

    #[error("Chat request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Chat API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Chat API returned an unreadable response: {0}")]
    InvalidResponse(String),
}

impl ChatError {
    /// Whether the exchange ended without a terminal message.
    ///
    /// Timeouts count as "no response": the responder never finished its turn.
    /// Everything else is a transport or credential failure.
    pub fn is_no_response(&self) -> bool {
        matches!(self, ChatError::NoResponse | ChatError::Timeout(_))
    }
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to stage '{path}': {source}")]
    StagingFailed {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to write index: {0}")]
    IndexFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),

    #[error("Could not determine HEAD: {0}")]
    HeadUnavailable(#[source] git2::Error),

    #[error("Bare repositories are not supported")]
    BareRepository,

    #[error("HEAD is detached; check out a branch before pushing")]
    DetachedHead,

    #[error("git executable not found in PATH (required for push)")]
    GitNotInstalled,

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}
