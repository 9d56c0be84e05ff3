// triage-core/src/ports/tracker.rs

// This file defines what the reconciliation engines need from an issue
// tracker, without knowing which tracker it is. The GitHub adapter in
// infrastructure/tracker implements it; the tests drive the engines with
// an in-memory implementation instead.

use crate::error::TriageError;

/// Read-only view of a remote issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerIssue {
    pub number: u64,
    pub url: String,
    pub labels: Vec<String>,
}

/// A not-yet-posted issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueState {
    #[default]
    All,
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::All => "all",
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// Listing filter. `labels` are AND-combined by the tracker.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pub state: IssueState,
    pub labels: Vec<String>,
    pub page: u32,
    pub per_page: u32,
}

/// One page of a listing. `next_page == 0` means no further page.
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    pub issues: Vec<TrackerIssue>,
    pub next_page: u32,
}

pub trait Tracker {
    fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssueQuery,
    ) -> Result<IssuePage, TriageError>;

    fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        draft: &IssueDraft,
    ) -> Result<TrackerIssue, TriageError>;

    fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<Vec<String>, TriageError>;
}
