use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SpicyError};

/// A GitHub repository identified by owner and name.
///
/// Both parts are always non-empty. The string form is `owner/name`, and
/// parsing that string again yields the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Parses `owner/name` or a repository URL such as
    /// `https://github.com/owner/name/issues`.
    ///
    /// # Errors
    ///
    /// Returns [`SpicyError::InvalidRepository`] if the input does not name
    /// exactly one owner and one repository.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || SpicyError::InvalidRepository(trimmed.to_string());

        // Owners such as `httpie` are short form, not URLs.
        if let Some(url) = Self::as_url(trimmed) {
            let mut segments = url
                .path_segments()
                .into_iter()
                .flatten()
                .filter(|segment| !segment.is_empty());

            return match (segments.next(), segments.next()) {
                (Some(owner), Some(name)) => Ok(Self::from_parts(owner, name)),
                _ => Err(invalid()),
            };
        }

        let parts: Vec<&str> = trimmed.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::from_parts(owner, name))
            }
            _ => Err(invalid()),
        }
    }

    /// Parses a comma-separated repository list, skipping blank and invalid
    /// entries.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match Self::parse(entry) {
                Ok(repo) => Some(repo),
                Err(e) => {
                    warn!("Skipping repository entry: {e}");
                    None
                }
            })
            .collect()
    }

    fn as_url(input: &str) -> Option<Url> {
        let lower = input.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return None;
        }
        Url::parse(input).ok()
    }

    fn from_parts(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl TryFrom<String> for RepositoryRef {
    type Error = SpicyError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RepositoryRef> for String {
    fn from(value: RepositoryRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo() {
        let repo = RepositoryRef::parse("octocat/hello-world").unwrap();
        assert_eq!(repo.owner(), "octocat");
        assert_eq!(repo.name(), "hello-world");
        assert_eq!(repo.to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_url_and_short_form_normalize_identically() {
        let inputs = [
            "octocat/hello-world",
            " octocat/hello-world ",
            "/octocat/hello-world/",
            "https://github.com/octocat/hello-world",
            "https://github.com/octocat/hello-world/",
            "https://github.com/octocat/hello-world/actions/runs/42",
            "http://github.com/octocat/hello-world?tab=readme",
        ];

        for input in inputs {
            let repo = RepositoryRef::parse(input).unwrap();
            assert_eq!(repo.to_string(), "octocat/hello-world", "input: {input}");
        }
    }

    #[test]
    fn test_owners_starting_with_http_are_short_form() {
        for input in ["httpie/cli", "http-rs/tide", "https-portal/proxy"] {
            let repo = RepositoryRef::parse(input).unwrap();
            assert_eq!(repo.to_string(), input);
        }

        let repos = RepositoryRef::parse_list("httpie/cli,http-rs/tide");
        assert_eq!(repos.len(), 2);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = RepositoryRef::parse("https://github.com/rust-lang/cargo/pulls").unwrap();
        let twice = RepositoryRef::parse(&once.to_string()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_rejects_incomplete_refs() {
        for input in ["", "owner", "owner/", "/repo", "a/b/c", "https://github.com/owner"] {
            let err = RepositoryRef::parse(input).unwrap_err();
            assert!(
                matches!(err, SpicyError::InvalidRepository(_)),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_parse_list_skips_blank_and_invalid_entries() {
        let repos = RepositoryRef::parse_list(
            "octocat/hello-world, ,https://github.com/rust-lang/rust,not-a-repo,",
        );

        let names: Vec<String> = repos.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["octocat/hello-world", "rust-lang/rust"]);
    }

    #[test]
    fn test_serde_uses_string_form() {
        let repo: RepositoryRef =
            serde_json::from_str("\"https://github.com/octocat/hello-world\"").unwrap();
        assert_eq!(serde_json::to_string(&repo).unwrap(), "\"octocat/hello-world\"");
        assert!(serde_json::from_str::<RepositoryRef>("\"nope\"").is_err());
    }
}
