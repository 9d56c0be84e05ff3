// triage-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Consistency violations. Every variant here means the external state
/// (tracker labels, report rows) drifted in a way the engines must not
/// repair on their own, so they all abort the run.
#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error(
        "Finding belongs to '{found_subject}' (v{found_version}) but the run is bound to '{subject}' (v{version})"
    )]
    #[diagnostic(
        code(triage::domain::scope_mismatch),
        help("All findings in one report directory must share a single subject and pipeline version.")
    )]
    ScopeMismatch {
        subject: String,
        version: String,
        found_subject: String,
        found_version: String,
    },

    #[error("Tracker issue #{id} is recorded locally but the tracker did not return it")]
    #[diagnostic(
        code(triage::domain::unknown_issue),
        help(
            "The issue may have been relabeled or moved by hand. Restore its 'Data Quality' and 'Data Cycle' labels, then re-run."
        )
    )]
    UnknownTrackerIssue { id: u64 },

    #[error("Duplicate '{kind}' label on issue {url}")]
    #[diagnostic(
        code(triage::domain::duplicate_label),
        help("Remove the extra label on the tracker and re-run.")
    )]
    DuplicateLabel { kind: &'static str, url: String },

    #[error("Multiple summary issues match:\n{urls}")]
    #[diagnostic(
        code(triage::domain::ambiguous_summary),
        help("Close or relabel the duplicates so a single summary issue remains.")
    )]
    AmbiguousSummary { urls: String },

    #[error("Invalid rank value '{0}'")]
    #[diagnostic(code(triage::domain::rank))]
    InvalidRank(String),

    #[error("Report batch is empty, nothing to bind the run to")]
    #[diagnostic(code(triage::domain::empty_batch))]
    EmptyBatch,
}
