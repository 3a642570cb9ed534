mod client;
mod paginator;
mod types;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use paginator::{PageQuery, Paginator, PAGE_SIZE};
pub use types::{Issue, SearchIssuesPage, WorkflowRun, WorkflowRunsPage};
