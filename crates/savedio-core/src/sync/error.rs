//! Synchronization errors

use std::fmt;

use thiserror::Error;

/// Errors raised while talking to the remote API or applying its changes
#[derive(Debug, Error)]
pub enum SyncError {
    /// The user key is missing or was rejected
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Server error: {message} ({status})")]
    Server { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Invalid response: {0}")]
    Serialization(String),

    /// The local store failed
    #[error("Storage error: {0}")]
    Store(#[from] crate::Error),

    /// The caller cancelled the operation
    #[error("Synchronization cancelled")]
    Cancelled,
}

/// Coarse failure class recorded with a failed reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorCategory {
    Network,
    Authorization,
    Server,
    Serialization,
    Storage,
    Cancelled,
}

impl fmt::Display for SyncErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Authorization => "authorization",
            Self::Server => "server",
            Self::Serialization => "serialization",
            Self::Storage => "storage",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl SyncError {
    /// Failure class of this error
    pub const fn category(&self) -> SyncErrorCategory {
        match self {
            Self::Auth(_) => SyncErrorCategory::Authorization,
            Self::Transport(_) => SyncErrorCategory::Network,
            Self::Server { .. } => SyncErrorCategory::Server,
            Self::Serialization(_) => SyncErrorCategory::Serialization,
            Self::Store(_) => SyncErrorCategory::Storage,
            Self::Cancelled => SyncErrorCategory::Cancelled,
        }
    }
}
