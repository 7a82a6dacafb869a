//! Last synchronization outcome

use serde::{Deserialize, Serialize};

use crate::util::unix_millis_now;

/// Outcome of the most recent reconciliation attempt.
///
/// A single record exists; every attempt that reaches the remote API
/// overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Whether the attempt completed and was committed
    pub success: bool,
    /// Change summary on success, failure description otherwise
    pub message: String,
    /// When the record was written (Unix ms)
    pub updated_at: i64,
}

impl SyncResult {
    /// Record a successful reconciliation
    #[must_use]
    pub fn succeeded(summary: impl Into<String>) -> Self {
        Self {
            success: true,
            message: summary.into(),
            updated_at: unix_millis_now(),
        }
    }

    /// Record a failed reconciliation
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            updated_at: unix_millis_now(),
        }
    }
}
