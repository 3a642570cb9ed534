use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpicyError {
    #[error("Missing GitHub token in options.")]
    MissingToken,

    #[error(
        "No repository detected on current page and no repositories configured in options."
    )]
    NoRepository,

    #[error("Invalid repository '{0}': expected 'owner/repo' or a repository URL")]
    InvalidRepository(String),

    #[error("Invalid bug label '{0}': labels containing '\"' are not supported")]
    InvalidLabel(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{context} failed ({status})")]
    Http { status: u16, context: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl SpicyError {
    /// True for failures detected before any request is sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingToken
                | Self::NoRepository
                | Self::InvalidRepository(_)
                | Self::InvalidLabel(_)
                | Self::Config(_)
        )
    }

    /// HTTP status of a rejected request, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_messages_are_distinct() {
        assert_eq!(
            SpicyError::MissingToken.to_string(),
            "Missing GitHub token in options."
        );
        assert!(SpicyError::NoRepository.to_string().contains("No repository"));
        assert!(SpicyError::MissingToken.is_configuration());
        assert!(SpicyError::NoRepository.is_configuration());
    }

    #[test]
    fn test_http_error_carries_status_and_context() {
        let err = SpicyError::Http {
            status: 422,
            context: "Issue search".to_string(),
        };

        assert_eq!(err.to_string(), "Issue search failed (422)");
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_configuration());
    }
}
