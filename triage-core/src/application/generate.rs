// triage-core/src/application/generate.rs
//
// Generate pass: one tracker issue per actionable finding, plus the
// per-cycle summary issue. Without `post` the whole pass is offline and
// only the rendered summary is shown.

use std::io;
use std::path::Path;

use tracing::warn;

use crate::application::feedback::{Reconciler, bind_scope};
use crate::domain::report::Finding;
use crate::error::TriageError;
use crate::infrastructure::config::FeedbackConfig;
use crate::infrastructure::store;
use crate::ports::tracker::Tracker;

#[derive(Debug, Default, Clone, Copy)]
pub struct GenerateOptions {
    /// Actually post to the tracker. Off by default: a dry run contacts
    /// nothing and prints the summary body instead.
    pub post: bool,
    /// Print the summary body instead of posting it, even with `post`.
    pub print_summary: bool,
}

#[derive(Debug, Default, Clone)]
pub struct GenerateOutcome {
    pub files: usize,
    pub actionable: usize,
    pub posted: usize,
    pub labeled: usize,
    pub skipped: usize,
    pub summary_url: Option<String>,
}

/// Publish the directory's findings to the tracker.
///
/// Per-finding create/label failures are recoverable: the finding is
/// skipped and the batch continues, reported as partially synchronized.
/// A failed local save after successful posting falls back to printing
/// the affected rows, so freshly obtained tracker ids are never lost.
pub fn generate_feedback(
    tracker: &dyn Tracker,
    config: &FeedbackConfig,
    data_cycle: &str,
    dir: &Path,
    options: GenerateOptions,
) -> Result<GenerateOutcome, TriageError> {
    if options.post {
        config.ensure_valid()?;
    }

    let mut files = store::read_from_dir(dir)?;
    let scope = bind_scope(&files, data_cycle)?;
    let reconciler = Reconciler::bind(tracker, config, scope);

    let mut outcome = GenerateOutcome {
        files: files.len(),
        ..Default::default()
    };
    let mut summary_findings: Vec<Finding> = Vec::new();

    for (name, file) in files.iter_mut() {
        let mut newly_posted: Vec<Finding> = Vec::new();
        let mut actionable_in_file = 0usize;

        for finding in file.findings.iter_mut() {
            reconciler.scope().ensure_matches(finding)?;

            if !finding.is_actionable() {
                continue;
            }
            actionable_in_file += 1;

            let draft = reconciler.build_issue(finding)?;
            summary_findings.push(finding.clone());

            if !options.post {
                continue;
            }

            match finding.tracker_id {
                // New finding: post it and bind the returned id forever.
                None => match reconciler.post_issue(&draft) {
                    Ok(issue) => {
                        finding.tracker_id = Some(issue.number);
                        newly_posted.push(finding.clone());
                        outcome.posted += 1;
                    }
                    Err(e) => {
                        warn!(finding = %finding, error = %e, "error posting issue, skipping");
                        outcome.skipped += 1;
                    }
                },
                // Already tracked: re-apply the freshly computed labels.
                Some(number) => match reconciler.ensure_labels(number, &draft.labels) {
                    Ok(_) => outcome.labeled += 1,
                    Err(e) => {
                        warn!(finding = %finding, number, error = %e, "error setting labels, skipping");
                        outcome.skipped += 1;
                    }
                },
            }
        }

        if actionable_in_file == 0 {
            println!("   No issues for '{name}'.");
            continue;
        }
        println!("   {actionable_in_file} issue(s) found in '{name}'.");

        if options.post && !newly_posted.is_empty() {
            let path = dir.join(name);
            match store::write_report(&path, &file.findings) {
                Ok(()) => println!("   💾 Saved new tracker ids to '{name}'."),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not save report");
                    println!(
                        "Falling back to printing the findings so they can be copied into '{name}':"
                    );
                    store::write_findings(io::stdout(), &newly_posted)?;
                }
            }
        }
    }

    outcome.actionable = summary_findings.len();

    if summary_findings.is_empty() {
        println!("No issues to report.");
        return Ok(outcome);
    }

    let summary = reconciler.build_summary_issue(&summary_findings)?;

    if !options.post || options.print_summary {
        println!("{}", summary.body);
        return Ok(outcome);
    }

    match reconciler.fetch_summary_issue(&summary)? {
        Some(existing) => {
            println!("Summary issue already exists: {}", existing.url);
            outcome.summary_url = Some(existing.url);
        }
        None => {
            // Summary post failure is fatal, unlike per-finding posts: it
            // can be retried without duplicating anything.
            let issue = reconciler.post_issue(&summary)?;
            println!("📣 Summary issue URL: {}", issue.url);
            outcome.summary_url = Some(issue.url);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::labels::{DATA_QUALITY, DATA_QUALITY_SUMMARY};
    use crate::domain::report::{Prevalence, Rank};
    use crate::ports::tracker::{IssueDraft, IssuePage, IssueQuery, TrackerIssue};
    use anyhow::Result;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Records created issues; `fail_nth_create` makes exactly the N-th
    /// create attempt fail, to exercise the skip-and-continue path.
    struct RecordingTracker {
        created: RefCell<Vec<IssueDraft>>,
        labeled: RefCell<Vec<(u64, Vec<String>)>>,
        listed: Vec<TrackerIssue>,
        attempts: RefCell<usize>,
        fail_nth_create: Option<usize>,
    }

    impl RecordingTracker {
        fn new() -> Self {
            Self {
                created: RefCell::new(Vec::new()),
                labeled: RefCell::new(Vec::new()),
                listed: Vec::new(),
                attempts: RefCell::new(0),
                fail_nth_create: None,
            }
        }
    }

    impl Tracker for RecordingTracker {
        fn list_issues(
            &self,
            _owner: &str,
            _repo: &str,
            _query: &IssueQuery,
        ) -> Result<IssuePage, TriageError> {
            Ok(IssuePage {
                issues: self.listed.clone(),
                next_page: 0,
            })
        }

        fn create_issue(
            &self,
            _owner: &str,
            _repo: &str,
            draft: &IssueDraft,
        ) -> Result<TrackerIssue, TriageError> {
            let mut attempts = self.attempts.borrow_mut();
            *attempts += 1;
            if self.fail_nth_create == Some(*attempts) {
                return Err(TriageError::Internal("tracker unavailable".to_string()));
            }
            let mut created = self.created.borrow_mut();
            created.push(draft.clone());
            let number = created.len() as u64;
            Ok(TrackerIssue {
                number,
                url: format!("https://github.example.com/acme/colorado/issues/{number}"),
                labels: draft.labels.clone(),
            })
        }

        fn add_labels(
            &self,
            _owner: &str,
            _repo: &str,
            number: u64,
            labels: &[String],
        ) -> Result<Vec<String>, TriageError> {
            self.labeled.borrow_mut().push((number, labels.to_vec()));
            Ok(labels.to_vec())
        }
    }

    fn finding(field: &str, code: &str, tracker_id: Option<u64>) -> Finding {
        Finding {
            subject: "colorado".to_string(),
            pipeline_version: "8".to_string(),
            table: "person".to_string(),
            field: field.to_string(),
            issue_code: code.to_string(),
            issue_description: "desc".to_string(),
            finding: "text".to_string(),
            prevalence: Prevalence::High,
            rank: Rank::High,
            cause: String::new(),
            status: "new".to_string(),
            tracker_id,
        }
    }

    fn config() -> FeedbackConfig {
        FeedbackConfig {
            owner: "acme".to_string(),
            ..Default::default()
        }
    }

    fn post_options() -> GenerateOptions {
        GenerateOptions {
            post: true,
            print_summary: false,
        }
    }

    #[test]
    fn test_generate_posts_new_findings_and_saves_ids() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        store::write_report(
            &path,
            &[finding("person_id", "g4-001", None), finding("ok", "", None)],
        )?;

        let tracker = RecordingTracker::new();
        let outcome = generate_feedback(&tracker, &config(), "April 2026", dir.path(), post_options())?;

        assert_eq!(outcome.actionable, 1);
        assert_eq!(outcome.posted, 1);
        // Per-finding issue plus the summary issue.
        assert_eq!(tracker.created.borrow().len(), 2);

        let report = store::read_report(&path)?;
        assert_eq!(report.findings[0].tracker_id, Some(1));
        assert_eq!(report.findings[1].tracker_id, None);
        Ok(())
    }

    #[test]
    fn test_generate_relabels_already_tracked_findings() -> Result<()> {
        let dir = tempdir()?;
        store::write_report(
            &dir.path().join("person.csv"),
            &[finding("person_id", "g4-001", Some(12))],
        )?;

        let tracker = RecordingTracker::new();
        let outcome = generate_feedback(&tracker, &config(), "April 2026", dir.path(), post_options())?;

        assert_eq!(outcome.posted, 0);
        assert_eq!(outcome.labeled, 1);
        let labeled = tracker.labeled.borrow();
        assert_eq!(labeled[0].0, 12);
        assert!(labeled[0].1.contains(&"Rank: High".to_string()));
        Ok(())
    }

    #[test]
    fn test_generate_skips_failed_posts_and_continues() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        store::write_report(
            &path,
            &[
                finding("person_id", "g4-001", None),
                finding("provider_id", "g2-013", None),
            ],
        )?;

        let mut tracker = RecordingTracker::new();
        tracker.fail_nth_create = Some(2);

        let outcome = generate_feedback(&tracker, &config(), "April 2026", dir.path(), post_options())?;

        assert_eq!(outcome.posted, 1);
        assert_eq!(outcome.skipped, 1);
        // The successful id is still persisted.
        let report = store::read_report(&path)?;
        assert_eq!(report.findings[0].tracker_id, Some(1));
        assert_eq!(report.findings[1].tracker_id, None);
        Ok(())
    }

    #[test]
    fn test_generate_dry_run_contacts_nothing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("person.csv");
        store::write_report(&path, &[finding("person_id", "g4-001", None)])?;

        let tracker = RecordingTracker::new();
        let outcome = generate_feedback(
            &tracker,
            &FeedbackConfig::default(),
            "April 2026",
            dir.path(),
            GenerateOptions::default(),
        )?;

        assert_eq!(outcome.actionable, 1);
        assert_eq!(outcome.posted, 0);
        assert!(tracker.created.borrow().is_empty());
        // No ids appeared on disk.
        let report = store::read_report(&path)?;
        assert_eq!(report.findings[0].tracker_id, None);
        Ok(())
    }

    #[test]
    fn test_generate_reports_existing_summary_instead_of_duplicating() -> Result<()> {
        let dir = tempdir()?;
        store::write_report(
            &dir.path().join("person.csv"),
            &[finding("person_id", "g4-001", Some(3))],
        )?;

        let mut tracker = RecordingTracker::new();
        tracker.listed = vec![TrackerIssue {
            number: 40,
            url: "https://github.example.com/acme/colorado/issues/40".to_string(),
            labels: vec![DATA_QUALITY.to_string(), DATA_QUALITY_SUMMARY.to_string()],
        }];

        let outcome = generate_feedback(&tracker, &config(), "April 2026", dir.path(), post_options())?;

        assert_eq!(
            outcome.summary_url.as_deref(),
            Some("https://github.example.com/acme/colorado/issues/40")
        );
        // Only label re-application happened, no create at all.
        assert!(tracker.created.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_generate_multiple_summary_candidates_is_fatal() -> Result<()> {
        let dir = tempdir()?;
        store::write_report(
            &dir.path().join("person.csv"),
            &[finding("person_id", "g4-001", Some(3))],
        )?;

        let mut tracker = RecordingTracker::new();
        tracker.listed = vec![
            TrackerIssue {
                number: 40,
                url: "https://github.example.com/acme/colorado/issues/40".to_string(),
                labels: vec![],
            },
            TrackerIssue {
                number: 41,
                url: "https://github.example.com/acme/colorado/issues/41".to_string(),
                labels: vec![],
            },
        ];

        let err = generate_feedback(&tracker, &config(), "April 2026", dir.path(), post_options())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("issues/40"));
        assert!(message.contains("issues/41"));
        Ok(())
    }
}
