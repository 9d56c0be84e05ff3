// triage-core/src/domain/report/scope.rs

use crate::domain::error::DomainError;
use crate::domain::report::Finding;

/// The binding every finding of one batch must satisfy.
///
/// A report directory holds the output of a single analysis run: one
/// subject (the organization being audited), one pipeline version, one
/// data cycle. The caller derives the binding from the first finding it
/// loads and the reconciliation engines validate every other finding
/// against it, so a stray row from another subject aborts the run instead
/// of silently posting into the wrong repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportScope {
    pub subject: String,
    pub pipeline_version: String,
    pub data_cycle: String,
}

impl ReportScope {
    pub fn new(
        subject: impl Into<String>,
        pipeline_version: impl Into<String>,
        data_cycle: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            pipeline_version: pipeline_version.into(),
            data_cycle: data_cycle.into(),
        }
    }

    /// Bind to the first finding of a batch.
    pub fn from_finding(finding: &Finding, data_cycle: impl Into<String>) -> Self {
        Self::new(&finding.subject, &finding.pipeline_version, data_cycle)
    }

    /// Cross-subject contamination guard.
    pub fn ensure_matches(&self, finding: &Finding) -> Result<(), DomainError> {
        if finding.subject != self.subject || finding.pipeline_version != self.pipeline_version {
            return Err(DomainError::ScopeMismatch {
                subject: self.subject.clone(),
                version: self.pipeline_version.clone(),
                found_subject: finding.subject.clone(),
                found_version: finding.pipeline_version.clone(),
            });
        }
        Ok(())
    }
}
