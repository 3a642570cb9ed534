use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, SpicyError};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Thin client for the GitHub REST API.
///
/// Every request carries the versioned JSON media type and, when a token is
/// configured, a bearer `Authorization` header. No retries are attempted.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: Url,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `api_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `token` - Optional GitHub personal access token
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the token
    /// cannot be sent as a header value.
    pub fn new(api_url: &str, token: Option<&Token>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPE));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| SpicyError::Config("GitHub token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("spicy-contributions/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SpicyError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut api_url = Url::parse(api_url)
            .map_err(|e| SpicyError::Config(format!("Invalid API base URL: {e}")))?;

        // Relative joins must keep any path prefix (e.g. GitHub Enterprise `/api/v3`).
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self { client, api_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SpicyError::Config(format!("Invalid endpoint '{path}': {e}")))
    }

    /// Send a request and decode the JSON body.
    ///
    /// `context` names the logical operation and is carried by
    /// [`SpicyError::Http`] when the response status is not a success.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("{method} {url} {query:?}");

        let response = self.client.request(method, url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpicyError::Http {
                status: status.as_u16(),
                context: context.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)], context: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, query, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::Value;

    #[tokio::test]
    async fn test_request_sends_accept_and_authorization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rate_limit")
            .match_header("accept", ACCEPT_MEDIA_TYPE)
            .match_header("authorization", "Bearer ghp_test")
            .with_status(200)
            .with_body(r#"{"resources":{}}"#)
            .create_async()
            .await;

        let token = Token::from("ghp_test");
        let client = GitHubClient::new(&server.url(), Some(&token)).unwrap();
        let body: Value = client.get("rate_limit", &[], "Rate limit").await.unwrap();

        assert!(body.get("resources").is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_without_token_omits_authorization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rate_limit")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let _: Value = client.get("/rate_limit", &[], "Rate limit").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::Any)
            .with_status(422)
            .with_body(r#"{"message":"Validation Failed"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let err = client
            .get::<Value>("search/issues", &[("q", "x".to_string())], "Issue search")
            .await
            .unwrap_err();

        match err {
            SpicyError::Http { status, context } => {
                assert_eq!(status, 422);
                assert_eq!(context, "Issue search");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_path_prefix_is_preserved() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3", None).unwrap();
        assert_eq!(
            client.endpoint("search/issues").unwrap().as_str(),
            "https://ghe.example.com/api/v3/search/issues"
        );
    }

    #[test]
    fn test_invalid_api_url_is_config_error() {
        let err = GitHubClient::new("not a url", None).err().unwrap();
        assert!(err.is_configuration());
    }
}
