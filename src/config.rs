use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::Token;
use crate::dates::FetchSettings;
use crate::providers::github::DEFAULT_API_URL;
use crate::repository::RepositoryRef;
use crate::signals::DEFAULT_BUG_LABEL;

/// Configuration file structure.
///
/// Holds the same settings the extension's options page stores: a token, the
/// fallback repository list and the bug label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitHub personal access token
    pub token: Option<String>,

    /// Repositories checked when no repository is given on the command line.
    /// Entries may be `owner/repo`, URLs, or comma-separated lists of either.
    #[serde(default)]
    pub repos: Vec<String>,

    /// Label identifying bug issues
    #[serde(default = "default_bug_label")]
    pub bug_label: String,

    /// GitHub API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Summary,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            repos: Vec::new(),
            bug_label: default_bug_label(),
            api_url: default_api_url(),
            output: OutputConfig::default(),
        }
    }
}

fn default_bug_label() -> String {
    DEFAULT_BUG_LABEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const CANDIDATES: [&str; 4] = ["spicy.toml", "spicy.json", "spicy.yaml", "spicy.yml"];

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./spicy.toml, ./spicy.json, ./spicy.yaml, ./spicy.yml
    /// 3. `<config dir>/spicy/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        for candidate in &CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            return Self::load_from_path(&path);
        }

        Ok(Self::default())
    }

    /// Platform config location, e.g. `~/.config/spicy/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("spicy").join("config.toml"))
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Fetch settings described by this file. Invalid repository entries are
    /// skipped.
    pub fn to_settings(&self) -> FetchSettings {
        FetchSettings {
            token: self.token.as_deref().and_then(Token::non_empty),
            repos: self
                .repos
                .iter()
                .flat_map(|entry| RepositoryRef::parse_list(entry))
                .collect(),
            bug_label: self.bug_label.clone(),
            api_url: self.api_url.clone(),
        }
    }
}
