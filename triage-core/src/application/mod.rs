// triage-core/src/application/mod.rs

pub mod feedback;
pub mod generate;
pub mod rank;
pub mod sync;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI do:
// `use triage_core::application::{rank_reports, sync_labels, generate_feedback};`
// without knowing the internal file layout.

pub use feedback::{IssueIndex, Reconciler, bind_scope};
pub use generate::{GenerateOptions, GenerateOutcome, generate_feedback};
pub use rank::{RankOutcome, rank_reports};
pub use sync::{SyncOutcome, sync_labels};
