use std::path::Path;

use savedio_core::sync::{
    run_periodic, ListChangeNotification, Reconciler, RemoteBookmarkSource, SyncOutcome,
    SyncReporter, SyncSchedule, SyncTrigger, TriggerOutcome,
};
use tokio_util::sync::CancellationToken;

use crate::commands::common::{api_client, format_sync_timestamp, open_database};
use crate::error::CliError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncMode {
    /// Sync now
    Immediate,
    /// Sync only when the local copy is older than the schedule interval
    IfStale,
    /// Keep syncing on schedule until cancelled
    Watch,
}

/// Prints list change notifications to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl SyncReporter for StdoutReporter {
    fn lists_changed(&self, notification: &ListChangeNotification) {
        for line in notification_lines(notification) {
            println!("{line}");
        }
    }
}

pub fn notification_lines(notification: &ListChangeNotification) -> Vec<String> {
    let mut lines = vec![
        notification.headline(),
        format!("  {}", notification.body()),
    ];
    if let Some(list) = notification.target_list() {
        lines.push(format!("  Show it with: savedio list --list {list}"));
    } else {
        lines.push("  Show them with: savedio lists".to_string());
    }
    lines
}

pub async fn run_sync(
    mode: SyncMode,
    db_path: &Path,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let client = api_client(&db).await?;
    if !client.has_credentials() {
        return Err(CliError::SyncNotConfigured);
    }

    let trigger = SyncTrigger::new(Reconciler::new(client, db, StdoutReporter));
    let schedule = SyncSchedule::default();
    let outcome = match mode {
        SyncMode::Immediate => trigger.trigger_immediate(cancel).await,
        SyncMode::IfStale => trigger.trigger_if_stale(schedule.interval, cancel).await,
        SyncMode::Watch => {
            run_periodic(&trigger, schedule, cancel).await;
            return Ok(());
        }
    };

    report_outcome(&outcome)
}

pub fn report_outcome(outcome: &TriggerOutcome) -> Result<(), CliError> {
    match outcome {
        TriggerOutcome::Ran(SyncOutcome::Completed(report)) => {
            if report.summary.is_empty() {
                println!("Sync completed: no changes");
            } else {
                println!("Sync completed: {}", report.summary);
            }
            Ok(())
        }
        TriggerOutcome::Ran(SyncOutcome::Offline) => Err(CliError::SyncNotConfigured),
        TriggerOutcome::Ran(SyncOutcome::Cancelled) => Err(CliError::SyncCancelled),
        TriggerOutcome::Ran(SyncOutcome::Failed(failure)) => Err(CliError::SyncFailed {
            category: failure.category,
            message: failure.message.clone(),
        }),
        TriggerOutcome::Fresh { last_sync } => {
            println!(
                "Bookmarks are up to date (last sync {})",
                format_sync_timestamp(*last_sync)
            );
            Ok(())
        }
        TriggerOutcome::AlreadyRunning => {
            println!("A sync is already running");
            Ok(())
        }
    }
}

pub async fn run_sync_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let last_sync = db.last_sync_time().await?;
    let result = db.sync_result().await?;

    if as_json {
        let status = serde_json::json!({
            "last_sync_time": last_sync,
            "last_result": result,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Last successful sync: {}", format_sync_timestamp(last_sync));
    match result {
        Some(result) => {
            let state = if result.success { "succeeded" } else { "failed" };
            println!(
                "Last attempt {state} at {}: {}",
                format_sync_timestamp(result.updated_at),
                result.message
            );
        }
        None => println!("No sync attempted yet."),
    }
    Ok(())
}
