use crate::error::{Result, SpicyError};
use crate::providers::github::{
    Issue, PageQuery, SearchIssuesPage, WorkflowRun, WorkflowRunsPage,
};
use crate::repository::RepositoryRef;

use super::types::TimeWindow;

pub const DEFAULT_BUG_LABEL: &str = "bug";

/// Page cap for the issue search endpoint (the search API stops at 1000 results).
pub const ISSUE_SEARCH_MAX_PAGES: u32 = 10;
pub const WORKFLOW_RUN_MAX_PAGES: u32 = 5;

/// Trims a user supplied label, falling back to [`DEFAULT_BUG_LABEL`].
///
/// The label is embedded in a quoted search qualifier, so labels containing a
/// double quote are rejected instead of being escaped.
pub fn normalize_label(raw: &str) -> Result<String> {
    let label = raw.trim();
    if label.is_empty() {
        return Ok(DEFAULT_BUG_LABEL.to_string());
    }
    if label.contains('"') {
        return Err(SpicyError::InvalidLabel(label.to_string()));
    }
    Ok(label.to_string())
}

/// Closed issues carrying the bug label, closed inside the window.
#[derive(Debug, Clone)]
pub struct BugIssueQuery {
    repo: RepositoryRef,
    label: String,
    window: TimeWindow,
}

impl BugIssueQuery {
    pub fn new(repo: RepositoryRef, label: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            repo,
            label: label.into(),
            window,
        }
    }

    /// Server-side search expression.
    pub fn expression(&self) -> String {
        format!(
            "repo:{} is:issue label:\"{}\" is:closed closed:>={}",
            self.repo,
            self.label,
            self.window.since_iso()
        )
    }
}

impl PageQuery for BugIssueQuery {
    type Page = SearchIssuesPage;
    type Item = Issue;

    fn path(&self) -> String {
        "search/issues".to_string()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![("q", self.expression())]
    }

    fn context(&self) -> String {
        "Issue search".to_string()
    }

    fn max_pages(&self) -> u32 {
        ISSUE_SEARCH_MAX_PAGES
    }

    fn items(page: SearchIssuesPage) -> Vec<Issue> {
        page.items
    }
}

/// Failed workflow runs of one repository. The window is applied client side.
#[derive(Debug, Clone)]
pub struct FailedRunQuery {
    repo: RepositoryRef,
    window: TimeWindow,
}

impl FailedRunQuery {
    pub fn new(repo: RepositoryRef, window: TimeWindow) -> Self {
        Self { repo, window }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }
}

impl PageQuery for FailedRunQuery {
    type Page = WorkflowRunsPage;
    type Item = WorkflowRun;

    fn path(&self) -> String {
        format!("repos/{}/{}/actions/runs", self.repo.owner(), self.repo.name())
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![("status", "failure".to_string())]
    }

    fn context(&self) -> String {
        format!("Actions runs for {}", self.repo)
    }

    fn max_pages(&self) -> u32 {
        WORKFLOW_RUN_MAX_PAGES
    }

    fn items(page: WorkflowRunsPage) -> Vec<WorkflowRun> {
        page.workflow_runs
    }

    // Actions disabled, or a private repo outside the token's scope.
    fn tolerates(&self, status: u16) -> bool {
        matches!(status, 403 | 404)
    }
}

/// One signal lookup against one repository.
#[derive(Debug, Clone)]
pub enum SignalQuery {
    BugIssues(BugIssueQuery),
    FailedRuns(FailedRunQuery),
}

impl SignalQuery {
    pub fn repo(&self) -> &RepositoryRef {
        match self {
            Self::BugIssues(query) => &query.repo,
            Self::FailedRuns(query) => &query.repo,
        }
    }
}
