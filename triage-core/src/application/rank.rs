// triage-core/src/application/rank.rs
//
// The rank pass: classify every finding of every report in a directory
// and rewrite the files whose ranks changed.

use std::path::Path;

use tracing::warn;

use crate::domain::ranking::RankEngine;
use crate::error::TriageError;
use crate::infrastructure::store;

#[derive(Debug, Default, Clone, Copy)]
pub struct RankOutcome {
    pub files: usize,
    pub matched: usize,
    pub updated: usize,
    pub skipped_files: usize,
}

/// Classify everything under `dir`.
///
/// The pass is per-file tolerant: a report that fails to parse is logged
/// and skipped, the rest of the directory still runs. A no-match leaves
/// the stored rank untouched (an already-ranked finding keeps its prior
/// decision), and a file with no rank changes is not rewritten.
pub fn rank_reports(engine: &RankEngine, dir: &Path) -> Result<RankOutcome, TriageError> {
    let mut outcome = RankOutcome::default();

    for path in store::report_paths(dir)? {
        let mut report = match store::read_report(&path) {
            Ok(report) => report,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable report");
                outcome.skipped_files += 1;
                continue;
            }
        };

        outcome.files += 1;
        let mut changed = false;

        for (row, finding) in report.findings.iter_mut().enumerate() {
            let Some(matched) = engine.classify(finding) else {
                continue;
            };
            outcome.matched += 1;

            println!(
                "Rule matched:\n- scope: {}\n- line: {}\n- table: {}\n- field: {}\n- issue code: {}\n- prevalence: {}\n- rank: {}",
                matched.scope,
                row + 1,
                finding.table,
                finding.field,
                finding.issue_code,
                finding.prevalence,
                matched.rank,
            );

            if finding.rank == matched.rank {
                println!("- action: nothing (already set)");
            } else {
                println!(
                    "- action: set rank to {} (from '{}')",
                    matched.rank, finding.rank
                );
                finding.rank = matched.rank;
                changed = true;
                outcome.updated += 1;
            }
            println!();
        }

        if changed {
            store::write_report(&path, &report.findings)?;
        }
    }

    Ok(outcome)
}
