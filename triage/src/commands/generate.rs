// triage/src/commands/generate.rs
//
// USE CASE: Publish findings as tracker issues (or dry-run the summary).

use std::path::PathBuf;

use anyhow::{Context, bail};
use triage_core::application::{GenerateOptions, generate_feedback};
use triage_core::infrastructure::config::load_feedback_config;
use triage_core::infrastructure::tracker::GithubTracker;

pub fn execute(
    path: PathBuf,
    cycle: String,
    token: Option<String>,
    owner: Option<String>,
    post: bool,
    print_summary: bool,
) -> anyhow::Result<()> {
    let token = token.unwrap_or_default();
    if post && token.is_empty() {
        bail!("A token is required to post issues to the tracker (--token or TRIAGE_TOKEN).");
    }

    let config = load_feedback_config(&path)?.with_owner(owner);

    if post {
        println!("📣 Generating feedback for cycle '{cycle}'...");
    } else {
        println!("📝 Dry run for cycle '{cycle}' (nothing will be posted)...");
    }

    // The dry run never touches the tracker; the client only exists so
    // the engine has something to hold.
    let tracker = match &config.api_url {
        Some(url) => GithubTracker::with_base(token, url)?,
        None => GithubTracker::new(token)?,
    };

    let options = GenerateOptions {
        post,
        print_summary,
    };

    let outcome = generate_feedback(&tracker, &config, &cycle, &path, options)
        .with_context(|| format!("Failed to generate feedback for {:?}", path))?;

    if outcome.skipped > 0 {
        println!(
            "⚠️  {} finding(s) could not be synchronized; re-run to retry them.",
            outcome.skipped
        );
    }

    println!(
        "✨ {} actionable finding(s): {} posted, {} relabeled.",
        outcome.actionable, outcome.posted, outcome.labeled
    );

    Ok(())
}
