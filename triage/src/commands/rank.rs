// triage/src/commands/rank.rs
//
// USE CASE: Assign severity ranks to the findings of a report directory.

use std::path::PathBuf;

use anyhow::Context;
use triage_core::application::rank_reports;
use triage_core::domain::ranking::{RankEngine, RuleCatalog};

pub fn execute(path: PathBuf) -> anyhow::Result<()> {
    println!("🧮 Ranking findings in '{}'...", path.display());

    let engine = RankEngine::new(RuleCatalog::standard());

    let outcome = rank_reports(&engine, &path)
        .with_context(|| format!("Failed to rank reports in {:?}", path))?;

    if outcome.skipped_files > 0 {
        println!("   ⚠️  Skipped {} unreadable file(s).", outcome.skipped_files);
    }

    println!(
        "✨ {} rule match(es) across {} report(s), {} rank(s) updated.",
        outcome.matched, outcome.files, outcome.updated
    );

    Ok(())
}
