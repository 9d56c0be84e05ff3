// triage-core/src/ports/mod.rs

pub mod tracker;

pub use tracker::{IssueDraft, IssuePage, IssueQuery, IssueState, Tracker, TrackerIssue};
