// triage-core/src/infrastructure/tracker/github.rs
//
// GitHub REST v3 adapter for the Tracker port. Blocking requests: the
// reconciliation run is strictly sequential, one page / one issue at a
// time, so no async runtime is pulled in.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, LINK, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::error::TriageError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::tracker::{IssueDraft, IssuePage, IssueQuery, Tracker, TrackerIssue};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const AGENT: &str = concat!("triage/", env!("CARGO_PKG_VERSION"));

/// Page number of the `rel="next"` link, if any.
#[allow(clippy::unwrap_used)] // literal pattern
static NEXT_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[?&]page=(\d+)[^>]*>;\s*rel="next""#).unwrap());

pub struct GithubTracker {
    http: Client,
    token: String,
    base_url: String,
}

impl GithubTracker {
    pub fn new(token: impl Into<String>) -> Result<Self, InfrastructureError> {
        Self::with_base(token, DEFAULT_API_URL)
    }

    /// Point the adapter at a non-default API root (GitHub Enterprise, or
    /// a local stand-in under test).
    pub fn with_base(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, InfrastructureError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(InfrastructureError::Http)?;

        Ok(Self {
            http,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn issues_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, owner, repo)
    }

    fn check(&self, response: Response) -> Result<Response, InfrastructureError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(InfrastructureError::TrackerApi { status, message })
    }
}

// --- WIRE TYPES ---

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    number: u64,
    html_url: String,
    #[serde(default)]
    labels: Vec<ApiLabel>,
}

impl From<ApiIssue> for TrackerIssue {
    fn from(issue: ApiIssue) -> Self {
        TrackerIssue {
            number: issue.number,
            url: issue.html_url,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

fn next_page_from_link(header: Option<&str>) -> u32 {
    header
        .and_then(|value| NEXT_PAGE.captures(value))
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or(0)
}

impl Tracker for GithubTracker {
    fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssueQuery,
    ) -> Result<IssuePage, TriageError> {
        debug!(owner, repo, page = query.page, "listing tracker issues");

        let response = self
            .http
            .get(self.issues_url(owner, repo))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(USER_AGENT, AGENT)
            .query(&[
                ("state", query.state.as_str().to_string()),
                ("labels", query.labels.join(",")),
                ("page", query.page.max(1).to_string()),
                ("per_page", query.per_page.to_string()),
            ])
            .send()
            .map_err(InfrastructureError::Http)?;

        let next_page = next_page_from_link(
            response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok()),
        );

        let response = self.check(response)?;
        let issues: Vec<ApiIssue> = response.json().map_err(InfrastructureError::Http)?;

        Ok(IssuePage {
            issues: issues.into_iter().map(Into::into).collect(),
            next_page,
        })
    }

    fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        draft: &IssueDraft,
    ) -> Result<TrackerIssue, TriageError> {
        debug!(owner, repo, title = %draft.title, "creating tracker issue");

        let response = self
            .http
            .post(self.issues_url(owner, repo))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(USER_AGENT, AGENT)
            .json(&serde_json::json!({
                "title": draft.title,
                "body": draft.body,
                "labels": draft.labels,
            }))
            .send()
            .map_err(InfrastructureError::Http)?;

        let response = self.check(response)?;
        let issue: ApiIssue = response.json().map_err(InfrastructureError::Http)?;
        Ok(issue.into())
    }

    fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<Vec<String>, TriageError> {
        debug!(owner, repo, number, "adding labels to tracker issue");

        let url = format!("{}/{}/labels", self.issues_url(owner, repo), number);
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(USER_AGENT, AGENT)
            .json(&labels)
            .send()
            .map_err(InfrastructureError::Http)?;

        let response = self.check(response)?;
        let all: Vec<ApiLabel> = response.json().map_err(InfrastructureError::Http)?;
        Ok(all.into_iter().map(|l| l.name).collect())
    }
}
