use serde::Deserialize;

/// Issue returned by the issue search endpoint. Only the fields the
/// extractors read are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: Option<u64>,
    /// When the issue was closed (ISO-8601), `None` for open issues
    #[serde(default)]
    pub closed_at: Option<String>,
}

/// GitHub Actions workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    #[serde(default)]
    pub id: Option<u64>,
    /// When the run was created (ISO-8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response from GitHub API for issue search.
#[derive(Debug, Deserialize)]
pub struct SearchIssuesPage {
    #[serde(default)]
    pub items: Vec<Issue>,
}

/// Response from GitHub API for workflow runs.
#[derive(Debug, Deserialize)]
pub struct WorkflowRunsPage {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}
