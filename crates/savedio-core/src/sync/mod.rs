//! Bookmark synchronization with the saved.io API.
//!
//! [`Reconciler`] pages through the remote collection and applies the
//! differences to the local store in one transaction. [`SyncTrigger`] makes
//! sure only one reconciliation runs at a time and decides when a new one is
//! due.

mod api;
mod error;
mod reconciler;
mod report;
#[cfg(test)]
mod testing;
mod trigger;

pub use api::{
    ApiCredentials, RemoteBookmark, RemoteBookmarkSource, SavedioClient, DEFAULT_PAGE_SIZE,
};
pub use error::{SyncError, SyncErrorCategory};
pub use reconciler::{Reconciler, SyncFailure, SyncOutcome, SyncReport, SyncSummary};
pub use report::{ListChangeNotification, SyncReporter, TracingReporter};
pub use trigger::{run_periodic, SyncSchedule, SyncTrigger, TriggerOutcome};
