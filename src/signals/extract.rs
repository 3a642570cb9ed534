use chrono::{DateTime, Utc};
use futures::{pin_mut, TryStreamExt};
use log::{debug, info};

use crate::error::Result;
use crate::providers::github::{GitHubClient, Issue, Paginator, WorkflowRun};

use super::query::{BugIssueQuery, FailedRunQuery, SignalQuery};
use super::types::{CalendarDaySet, TimeWindow};

/// Records the closing day of an issue. Open issues are ignored.
pub fn record_bug_day(issue: &Issue, days: &mut CalendarDaySet) -> bool {
    match issue.closed_at.as_deref() {
        Some(closed_at) => days.insert_prefix(closed_at),
        None => false,
    }
}

/// Records the creation day of a failed run if it falls inside the window.
/// Runs with a missing or unparseable timestamp are skipped.
pub fn record_failure_day(run: &WorkflowRun, window: &TimeWindow, days: &mut CalendarDaySet) -> bool {
    let Some(created_at) = run.created_at.as_deref() else {
        return false;
    };

    match DateTime::parse_from_rfc3339(created_at) {
        Ok(created) if window.contains(&created.with_timezone(&Utc)) => {
            days.insert_prefix(created_at)
        }
        Ok(_) => false,
        Err(e) => {
            debug!("Skipping run {:?} with created_at {created_at:?}: {e}", run.id);
            false
        }
    }
}

/// Adds the closing days of matching bug issues to `days`.
///
/// Returns the number of new days.
pub async fn extract_bug_days(
    client: &GitHubClient,
    query: &BugIssueQuery,
    days: &mut CalendarDaySet,
) -> Result<usize> {
    let issues = Paginator::new(client, query.clone()).into_stream();
    pin_mut!(issues);

    let mut added = 0;
    while let Some(issue) = issues.try_next().await? {
        if record_bug_day(&issue, days) {
            added += 1;
        }
    }

    Ok(added)
}

/// Adds the creation days of failed workflow runs to `days`.
///
/// A repository without Actions access contributes nothing.
pub async fn extract_failure_days(
    client: &GitHubClient,
    query: &FailedRunQuery,
    days: &mut CalendarDaySet,
) -> Result<usize> {
    let runs = Paginator::new(client, query.clone()).into_stream();
    pin_mut!(runs);

    let mut added = 0;
    while let Some(run) = runs.try_next().await? {
        if record_failure_day(&run, query.window(), days) {
            added += 1;
        }
    }

    Ok(added)
}

impl SignalQuery {
    /// Runs this query and merges its days into `days`.
    pub async fn collect_into(&self, client: &GitHubClient, days: &mut CalendarDaySet) -> Result<usize> {
        let added = match self {
            Self::BugIssues(query) => extract_bug_days(client, query, days).await?,
            Self::FailedRuns(query) => extract_failure_days(client, query, days).await?,
        };

        let kind = match self {
            Self::BugIssues(_) => "bug",
            Self::FailedRuns(_) => "failure",
        };
        info!("{}: {added} new {kind} days", self.repo());

        Ok(added)
    }
}
