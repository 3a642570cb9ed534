use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::auth::Token;
use crate::error::{Result, SpicyError};
use crate::providers::github::{GitHubClient, DEFAULT_API_URL};
use crate::repository::RepositoryRef;
use crate::signals::{self, SignalDates, TimeWindow, DEFAULT_BUG_LABEL};

/// Everything one "fetch dates" call needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub token: Option<Token>,
    /// Repositories used when no current repository is given
    pub repos: Vec<RepositoryRef>,
    pub bug_label: String,
    pub api_url: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            token: None,
            repos: Vec::new(),
            bug_label: DEFAULT_BUG_LABEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Answer to a "fetch dates" request.
///
/// Serializes as `{"ok":true,"bugDates":[..],"failDates":[..]}` or
/// `{"ok":false,"error":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDatesResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bug_dates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_dates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchDatesResponse {
    pub fn success(dates: &SignalDates) -> Self {
        Self {
            ok: true,
            bug_dates: Some(dates.bug_days.clone().into()),
            fail_dates: Some(dates.failure_days.clone().into()),
            error: None,
        }
    }

    pub fn failure(error: &SpicyError) -> Self {
        Self {
            ok: false,
            bug_dates: None,
            fail_dates: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<&Result<SignalDates>> for FetchDatesResponse {
    fn from(result: &Result<SignalDates>) -> Self {
        match result {
            Ok(dates) => Self::success(dates),
            Err(e) => Self::failure(e),
        }
    }
}

/// Entry point for overlay callers: validates settings, resolves the target
/// repositories and runs the aggregation over the trailing year.
pub struct DateFetcher {
    settings: FetchSettings,
}

impl DateFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// The current-page repository wins; otherwise every configured
    /// repository is used.
    ///
    /// # Errors
    ///
    /// Returns [`SpicyError::NoRepository`] if neither is available.
    pub fn resolve_repos(&self, current: Option<&RepositoryRef>) -> Result<Vec<RepositoryRef>> {
        match current {
            Some(repo) => Ok(vec![repo.clone()]),
            None if !self.settings.repos.is_empty() => Ok(self.settings.repos.clone()),
            None => Err(SpicyError::NoRepository),
        }
    }

    /// Fetches bug and failure days for the trailing 365 days.
    pub async fn fetch_dates(&self, current: Option<&RepositoryRef>) -> Result<SignalDates> {
        self.fetch_dates_in(current, TimeWindow::trailing_year(Utc::now()))
            .await
    }

    /// Same as [`fetch_dates`](Self::fetch_dates) with an explicit window.
    ///
    /// # Errors
    ///
    /// Configuration errors (missing token, no repository, rejected label)
    /// are returned before any request is sent.
    pub async fn fetch_dates_in(
        &self,
        current: Option<&RepositoryRef>,
        window: TimeWindow,
    ) -> Result<SignalDates> {
        let token = self
            .settings
            .token
            .as_ref()
            .filter(|token| !token.as_str().trim().is_empty())
            .ok_or(SpicyError::MissingToken)?;
        let repos = self.resolve_repos(current)?;

        debug!("Resolved repositories: {repos:?}");
        info!(
            "Fetching dates for {}",
            repos
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let client = GitHubClient::new(&self.settings.api_url, Some(token))?;
        signals::aggregate(&client, &repos, &self.settings.bug_label, window).await
    }

    /// Runs [`fetch_dates`](Self::fetch_dates) and renders the outcome as a
    /// response object. Never fails.
    pub async fn respond(&self, current: Option<&RepositoryRef>) -> FetchDatesResponse {
        FetchDatesResponse::from(&self.fetch_dates(current).await)
    }
}
