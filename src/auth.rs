use std::fmt;

/// GitHub personal access token.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `None` for blank input, mirroring an unset options field.
    pub fn non_empty(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_none() {
        assert!(Token::non_empty("   ").is_none());
        assert_eq!(Token::non_empty(" ghp_x ").unwrap().as_str(), "ghp_x");
    }

    #[test]
    fn test_debug_hides_secret() {
        let token = Token::from("ghp_secret");
        assert!(!format!("{token:?}").contains("ghp_secret"));
    }
}
