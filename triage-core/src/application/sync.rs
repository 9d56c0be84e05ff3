// triage-core/src/application/sync.rs
//
// Sync pass: the tracker's labels are the source of truth for cause and
// status; pull them down into the local report files.

use std::path::Path;

use tracing::info;

use crate::application::feedback::{Reconciler, bind_scope};
use crate::domain::error::DomainError;
use crate::error::TriageError;
use crate::infrastructure::config::FeedbackConfig;
use crate::infrastructure::store;
use crate::ports::tracker::Tracker;

#[derive(Debug, Default, Clone, Copy)]
pub struct SyncOutcome {
    pub files: usize,
    pub cause_changes: usize,
    pub status_changes: usize,
    pub files_written: usize,
}

/// Reconcile every report under `dir` against the tracker.
///
/// Findings without a tracker id are skipped (nothing to sync). A file
/// with zero changes is reported but not rewritten, so re-running against
/// an unchanged tracker produces no writes at all.
pub fn sync_labels(
    tracker: &dyn Tracker,
    config: &FeedbackConfig,
    data_cycle: &str,
    dir: &Path,
) -> Result<SyncOutcome, TriageError> {
    config.ensure_valid()?;

    let mut files = store::read_from_dir(dir)?;
    let scope = bind_scope(&files, data_cycle)?;
    let reconciler = Reconciler::bind(tracker, config, scope);

    let index = reconciler.fetch_all_issues()?;
    println!("📥 Fetched {} issue(s).", index.len());

    let mut outcome = SyncOutcome {
        files: files.len(),
        ..Default::default()
    };

    for (name, file) in files.iter_mut() {
        let mut cause_changes = 0usize;
        let mut status_changes = 0usize;

        for finding in file.findings.iter_mut() {
            reconciler.scope().ensure_matches(finding)?;

            let Some(id) = finding.tracker_id else {
                continue;
            };

            // A recorded id the tracker no longer returns means the issue
            // was tampered with; stop rather than drop data.
            let issue = index
                .get(&id)
                .ok_or(DomainError::UnknownTrackerIssue { id })?;

            let (cause, status) = Reconciler::cause_and_status(issue)?;

            if cause != finding.cause {
                info!(finding = %finding, from = %finding.cause, to = %cause, "changing cause");
                finding.cause = cause;
                cause_changes += 1;
            }
            if status != finding.status {
                info!(finding = %finding, from = %finding.status, to = %status, "changing status");
                finding.status = status;
                status_changes += 1;
            }
        }

        if cause_changes == 0 && status_changes == 0 {
            println!("   No changes to sync for '{name}'.");
            continue;
        }

        store::write_report(&dir.join(name), &file.findings)?;
        println!("   ✅ Synced labels to '{name}'.");

        outcome.cause_changes += cause_changes;
        outcome.status_changes += status_changes;
        outcome.files_written += 1;
    }

    Ok(outcome)
}
