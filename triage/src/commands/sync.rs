// triage/src/commands/sync.rs
//
// USE CASE: Pull Cause and Status labels down from the tracker.

use std::path::PathBuf;

use anyhow::{Context, bail};
use triage_core::application::sync_labels;
use triage_core::infrastructure::config::load_feedback_config;
use triage_core::infrastructure::tracker::GithubTracker;

pub fn execute(
    path: PathBuf,
    cycle: String,
    token: Option<String>,
    owner: Option<String>,
) -> anyhow::Result<()> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        bail!("A token is required to access the tracker (--token or TRIAGE_TOKEN).");
    };

    let config = load_feedback_config(&path)?.with_owner(owner);

    println!("🔄 Syncing labels for cycle '{cycle}'...");

    let tracker = match &config.api_url {
        Some(url) => GithubTracker::with_base(token, url)?,
        None => GithubTracker::new(token)?,
    };

    let outcome = sync_labels(&tracker, &config, &cycle, &path)
        .with_context(|| format!("Failed to sync reports in {:?}", path))?;

    println!(
        "✨ {} cause change(s), {} status change(s); {} of {} file(s) rewritten.",
        outcome.cause_changes, outcome.status_changes, outcome.files_written, outcome.files
    );

    Ok(())
}
