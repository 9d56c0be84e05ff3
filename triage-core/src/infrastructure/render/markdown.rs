// triage-core/src/infrastructure/render/markdown.rs
//
// Renders the per-cycle summary issue body: one Markdown table with every
// actionable finding of the run.

use chrono::Utc;
use minijinja::{Environment, context};
use serde::Serialize;

use crate::domain::report::{Finding, ReportScope};
use crate::infrastructure::error::InfrastructureError;

const SUMMARY_TEMPLATE: &str = "\
# Data Quality Summary: {{ cycle }} ({{ version }})

{{ rows|length }} finding(s) reported for **{{ subject }}**.

| Table | Field | Issue Code | Prevalence | Rank | Description |
| ----- | ----- | ---------- | ---------- | ---- | ----------- |
{% for r in rows -%}
| {{ r.table }} | {{ r.field }} | {{ r.issue_code }} | {{ r.prevalence }} | {{ r.rank }} | {{ r.description }} |
{% endfor %}
_Generated {{ generated_at }}_
";

#[derive(Debug, Serialize)]
struct SummaryRow {
    table: String,
    field: String,
    issue_code: String,
    prevalence: String,
    rank: String,
    description: String,
}

impl SummaryRow {
    fn from_finding(finding: &Finding) -> Self {
        Self {
            table: escape_cell(&finding.table),
            field: escape_cell(&finding.field),
            issue_code: escape_cell(&finding.issue_code),
            prevalence: finding.prevalence.as_str().to_string(),
            rank: finding.rank.as_str().to_string(),
            description: escape_cell(&finding.issue_description),
        }
    }
}

// Pipes inside a cell would split the Markdown table column
fn escape_cell(raw: &str) -> String {
    raw.replace('|', "\\|")
}

#[derive(Debug, Default)]
pub struct SummaryRenderer {
    env: Environment<'static>,
}

impl SummaryRenderer {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    pub fn render(
        &self,
        scope: &ReportScope,
        findings: &[Finding],
    ) -> Result<String, InfrastructureError> {
        let rows: Vec<SummaryRow> = findings.iter().map(SummaryRow::from_finding).collect();

        let body = self.env.render_str(
            SUMMARY_TEMPLATE,
            context! {
                subject => scope.subject,
                cycle => scope.data_cycle,
                version => scope.pipeline_version,
                rows => rows,
                generated_at => Utc::now().to_rfc3339(),
            },
        )?;

        Ok(body)
    }
}
