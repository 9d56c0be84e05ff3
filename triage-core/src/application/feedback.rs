// triage-core/src/application/feedback.rs
//
// The reconciliation engine shared by the sync and generate passes: one
// bulk fetch of the cycle's tracker issues, the label codec applied in
// both directions, and the summary issue with its dedup check.

use std::collections::{BTreeMap, HashMap};

use crate::domain::error::DomainError;
use crate::domain::labels::{DATA_QUALITY, DATA_QUALITY_SUMMARY, Fact, FactKind};
use crate::domain::report::{Finding, Rank, ReportScope};
use crate::error::TriageError;
use crate::infrastructure::config::FeedbackConfig;
use crate::infrastructure::render::SummaryRenderer;
use crate::infrastructure::store::ReportFile;
use crate::ports::tracker::{IssueDraft, IssueQuery, IssueState, Tracker, TrackerIssue};

/// In-memory index of the cycle's tracker issues, keyed by issue number.
/// Populated once per run, read-only afterwards.
pub type IssueIndex = HashMap<u64, TrackerIssue>;

/// Derive the run binding from the first finding of the batch.
pub fn bind_scope(
    files: &BTreeMap<String, ReportFile>,
    data_cycle: &str,
) -> Result<ReportScope, TriageError> {
    let first = files
        .values()
        .flat_map(|file| file.findings.first())
        .next()
        .ok_or(DomainError::EmptyBatch)?;

    Ok(ReportScope::from_finding(first, data_cycle))
}

pub struct Reconciler<'a> {
    tracker: &'a dyn Tracker,
    owner: String,
    repo: String,
    scope: ReportScope,
    renderer: SummaryRenderer,
}

impl<'a> Reconciler<'a> {
    pub fn bind(tracker: &'a dyn Tracker, config: &FeedbackConfig, scope: ReportScope) -> Self {
        let repo = config.repository_for(&scope.subject);
        Self {
            tracker,
            owner: config.owner.clone(),
            repo,
            scope,
            renderer: SummaryRenderer::new(),
        }
    }

    pub fn scope(&self) -> &ReportScope {
        &self.scope
    }

    /// Fetch every issue of this subject and data cycle, open and closed
    /// alike (resolved findings still reconcile), across all pages. A
    /// failed page aborts the fetch; a partial index would make missing
    /// issues indistinguishable from tampered ones.
    pub fn fetch_all_issues(&self) -> Result<IssueIndex, TriageError> {
        let mut query = IssueQuery {
            state: IssueState::All,
            labels: vec![
                DATA_QUALITY.to_string(),
                Fact::new(FactKind::DataCycle, &self.scope.data_cycle).encode(),
            ],
            page: 1,
            per_page: 100,
        };

        let mut index = IssueIndex::new();

        loop {
            let page = self.tracker.list_issues(&self.owner, &self.repo, &query)?;
            for issue in page.issues {
                index.insert(issue.number, issue);
            }
            if page.next_page == 0 {
                break;
            }
            query.page = page.next_page;
        }

        Ok(index)
    }

    /// Authoritative cause and status carried by an issue's labels. At
    /// most one of each; a duplicate means two competing sources of truth
    /// and nobody should guess which one wins.
    pub fn cause_and_status(issue: &TrackerIssue) -> Result<(String, String), DomainError> {
        let mut cause = String::new();
        let mut status = String::new();

        for label in &issue.labels {
            let Some(fact) = Fact::decode(label) else {
                continue;
            };
            match fact.kind {
                FactKind::Cause => {
                    if !cause.is_empty() {
                        return Err(DomainError::DuplicateLabel {
                            kind: FactKind::Cause.as_str(),
                            url: issue.url.clone(),
                        });
                    }
                    cause = fact.value;
                }
                FactKind::Status => {
                    if !status.is_empty() {
                        return Err(DomainError::DuplicateLabel {
                            kind: FactKind::Status.as_str(),
                            url: issue.url.clone(),
                        });
                    }
                    status = fact.value;
                }
                _ => {}
            }
        }

        Ok((cause, status))
    }

    /// Build the tracker-issue draft for one finding.
    pub fn build_issue(&self, finding: &Finding) -> Result<IssueDraft, TriageError> {
        self.scope.ensure_matches(finding)?;

        let title = format!(
            "Data Quality: {} ({}): {}/{}",
            self.scope.data_cycle, self.scope.pipeline_version, finding.table, finding.field
        );
        let body = format!(
            "**Description**: {}\n**Finding**: {}",
            finding.issue_description, finding.finding
        );

        let mut labels = vec![
            DATA_QUALITY.to_string(),
            Fact::new(FactKind::DataCycle, &self.scope.data_cycle).encode(),
            Fact::new(FactKind::Table, &finding.table).encode(),
        ];

        if finding.rank > Rank::None {
            labels.push(Fact::new(FactKind::Rank, finding.rank.as_str()).encode());
        }
        if !finding.cause.is_empty() {
            labels.push(Fact::new(FactKind::Cause, &finding.cause).encode());
        }
        if !finding.status.is_empty() {
            labels.push(Fact::new(FactKind::Status, &finding.status).encode());
        }

        Ok(IssueDraft {
            title,
            body,
            labels,
        })
    }

    /// Build the one summary issue for the run.
    pub fn build_summary_issue(&self, findings: &[Finding]) -> Result<IssueDraft, TriageError> {
        let body = self.renderer.render(&self.scope, findings)?;
        let title = format!(
            "Data Quality Summary: {} ({})",
            self.scope.data_cycle, self.scope.pipeline_version
        );
        let labels = vec![
            DATA_QUALITY.to_string(),
            DATA_QUALITY_SUMMARY.to_string(),
            Fact::new(FactKind::DataCycle, &self.scope.data_cycle).encode(),
        ];

        Ok(IssueDraft {
            title,
            body,
            labels,
        })
    }

    /// Look for an already-published summary carrying exactly the draft's
    /// label set. Zero is "safe to post", one is "already published", and
    /// anything more is an ambiguity a human has to resolve.
    pub fn fetch_summary_issue(
        &self,
        draft: &IssueDraft,
    ) -> Result<Option<TrackerIssue>, TriageError> {
        let query = IssueQuery {
            state: IssueState::All,
            labels: draft.labels.clone(),
            page: 1,
            per_page: 100,
        };

        let page = self.tracker.list_issues(&self.owner, &self.repo, &query)?;

        let mut issues = page.issues;
        match issues.len() {
            0 => Ok(None),
            1 => Ok(issues.pop()),
            _ => {
                let urls: Vec<String> = issues.iter().map(|i| format!("- {}", i.url)).collect();
                Err(DomainError::AmbiguousSummary {
                    urls: urls.join("\n"),
                }
                .into())
            }
        }
    }

    /// Create the issue on the tracker. Not retried here; the caller
    /// decides whether the failure is fatal (summary) or skippable
    /// (per-finding).
    pub fn post_issue(&self, draft: &IssueDraft) -> Result<TrackerIssue, TriageError> {
        self.tracker.create_issue(&self.owner, &self.repo, draft)
    }

    /// Add-only label application for findings that already have a
    /// tracker issue.
    pub fn ensure_labels(&self, number: u64, labels: &[String]) -> Result<Vec<String>, TriageError> {
        self.tracker.add_labels(&self.owner, &self.repo, number, labels)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::report::Prevalence;
    use crate::ports::tracker::IssuePage;
    use std::cell::RefCell;

    /// Pages out a fixed issue list 2 at a time and records the filters
    /// it was queried with.
    struct PagingTracker {
        issues: Vec<TrackerIssue>,
        queries: RefCell<Vec<IssueQuery>>,
    }

    impl Tracker for PagingTracker {
        fn list_issues(
            &self,
            _owner: &str,
            _repo: &str,
            query: &IssueQuery,
        ) -> Result<IssuePage, TriageError> {
            self.queries.borrow_mut().push(query.clone());

            let per_page = 2usize;
            let start = (query.page.max(1) as usize - 1) * per_page;
            let chunk: Vec<TrackerIssue> =
                self.issues.iter().skip(start).take(per_page).cloned().collect();
            let next_page = if start + chunk.len() < self.issues.len() {
                query.page.max(1) + 1
            } else {
                0
            };

            Ok(IssuePage {
                issues: chunk,
                next_page,
            })
        }

        fn create_issue(
            &self,
            _owner: &str,
            _repo: &str,
            _draft: &IssueDraft,
        ) -> Result<TrackerIssue, TriageError> {
            Err(TriageError::Internal("unexpected create".to_string()))
        }

        fn add_labels(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
            _labels: &[String],
        ) -> Result<Vec<String>, TriageError> {
            Err(TriageError::Internal("unexpected add_labels".to_string()))
        }
    }

    fn issue(number: u64) -> TrackerIssue {
        TrackerIssue {
            number,
            url: format!("https://github.example.com/acme/colorado/issues/{number}"),
            labels: vec![],
        }
    }

    fn finding() -> Finding {
        Finding {
            subject: "colorado".to_string(),
            pipeline_version: "8".to_string(),
            table: "person".to_string(),
            field: "person_id".to_string(),
            issue_code: "g4-001".to_string(),
            issue_description: "Duplicated identifiers".to_string(),
            finding: "1200 duplicate rows".to_string(),
            prevalence: Prevalence::High,
            rank: Rank::High,
            cause: String::new(),
            status: "new".to_string(),
            tracker_id: None,
        }
    }

    fn reconciler(tracker: &dyn Tracker) -> Reconciler<'_> {
        let config = FeedbackConfig {
            owner: "acme".to_string(),
            ..Default::default()
        };
        Reconciler::bind(
            tracker,
            &config,
            ReportScope::new("colorado", "8", "April 2026"),
        )
    }

    #[test]
    fn test_fetch_accumulates_every_page() {
        let tracker = PagingTracker {
            issues: (1..=5).map(issue).collect(),
            queries: RefCell::new(Vec::new()),
        };

        let index = reconciler(&tracker).fetch_all_issues().unwrap();

        assert_eq!(index.len(), 5);
        assert!(index.contains_key(&5));
        assert_eq!(tracker.queries.borrow().len(), 3);
    }

    #[test]
    fn test_fetch_filters_by_marker_and_cycle_across_all_states() {
        let tracker = PagingTracker {
            issues: vec![issue(1)],
            queries: RefCell::new(Vec::new()),
        };

        reconciler(&tracker).fetch_all_issues().unwrap();

        let queries = tracker.queries.borrow();
        assert_eq!(queries[0].state, IssueState::All);
        assert_eq!(
            queries[0].labels,
            vec!["Data Quality".to_string(), "Data Cycle: April 2026".to_string()]
        );
    }

    #[test]
    fn test_build_issue_includes_conditional_labels() {
        let tracker = PagingTracker {
            issues: vec![],
            queries: RefCell::new(Vec::new()),
        };
        let draft = reconciler(&tracker).build_issue(&finding()).unwrap();

        assert_eq!(draft.title, "Data Quality: April 2026 (8): person/person_id");
        assert!(draft.body.contains("**Description**: Duplicated identifiers"));
        assert!(draft.body.contains("**Finding**: 1200 duplicate rows"));
        assert_eq!(
            draft.labels,
            vec![
                "Data Quality".to_string(),
                "Data Cycle: April 2026".to_string(),
                "Table: person".to_string(),
                "Rank: High".to_string(),
                "Status: new".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_issue_omits_empty_facts() {
        let tracker = PagingTracker {
            issues: vec![],
            queries: RefCell::new(Vec::new()),
        };
        let mut bare = finding();
        bare.rank = Rank::None;
        bare.status = String::new();

        let draft = reconciler(&tracker).build_issue(&bare).unwrap();
        assert_eq!(
            draft.labels,
            vec![
                "Data Quality".to_string(),
                "Data Cycle: April 2026".to_string(),
                "Table: person".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_issue_rejects_foreign_subject() {
        let tracker = PagingTracker {
            issues: vec![],
            queries: RefCell::new(Vec::new()),
        };
        let mut stray = finding();
        stray.subject = "nemours".to_string();

        assert!(reconciler(&tracker).build_issue(&stray).is_err());
    }

    #[test]
    fn test_summary_draft_carries_both_markers() {
        let tracker = PagingTracker {
            issues: vec![],
            queries: RefCell::new(Vec::new()),
        };
        let draft = reconciler(&tracker)
            .build_summary_issue(&[finding()])
            .unwrap();

        assert_eq!(draft.title, "Data Quality Summary: April 2026 (8)");
        assert_eq!(
            draft.labels,
            vec![
                "Data Quality".to_string(),
                "Data Quality Summary".to_string(),
                "Data Cycle: April 2026".to_string(),
            ]
        );
    }
}
