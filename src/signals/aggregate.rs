use log::info;

use crate::error::{Result, SpicyError};
use crate::providers::github::GitHubClient;
use crate::repository::RepositoryRef;

use super::query::{normalize_label, BugIssueQuery, FailedRunQuery, SignalQuery};
use super::types::{CalendarDaySet, SignalDates, TimeWindow};

/// Collects bug days and failure days for `repos` inside `window`.
///
/// The two signals are fetched concurrently; repositories are walked in
/// order within each signal and merged into one set per signal. Either both
/// sets are returned or the first hard failure is.
///
/// # Errors
///
/// Returns a configuration error if `repos` is empty or the label is
/// rejected (no request is sent in either case), and any non-tolerated HTTP
/// failure from the underlying endpoints.
pub async fn aggregate(
    client: &GitHubClient,
    repos: &[RepositoryRef],
    label: &str,
    window: TimeWindow,
) -> Result<SignalDates> {
    if repos.is_empty() {
        return Err(SpicyError::NoRepository);
    }
    let label = normalize_label(label)?;

    info!(
        "Collecting signals for {} repositories since {}",
        repos.len(),
        window.since_iso()
    );

    let bug_queries: Vec<SignalQuery> = repos
        .iter()
        .map(|repo| SignalQuery::BugIssues(BugIssueQuery::new(repo.clone(), label.as_str(), window)))
        .collect();
    let failure_queries: Vec<SignalQuery> = repos
        .iter()
        .map(|repo| SignalQuery::FailedRuns(FailedRunQuery::new(repo.clone(), window)))
        .collect();

    let (bug_days, failure_days) = tokio::join!(
        collect_signal(client, &bug_queries),
        collect_signal(client, &failure_queries),
    );

    let dates = SignalDates {
        bug_days: bug_days?,
        failure_days: failure_days?,
    };

    info!(
        "Found {} bug days and {} failure days",
        dates.bug_days.len(),
        dates.failure_days.len()
    );

    Ok(dates)
}

async fn collect_signal(client: &GitHubClient, queries: &[SignalQuery]) -> Result<CalendarDaySet> {
    let mut days = CalendarDaySet::new();
    for query in queries {
        query.collect_into(client, &mut days).await?;
    }
    Ok(days)
}
