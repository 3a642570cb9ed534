use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use spicy_contributions::auth::Token;
use spicy_contributions::config::{Config, OutputFormat};
use spicy_contributions::dates::{DateFetcher, FetchDatesResponse, FetchSettings};
use spicy_contributions::error::Result as SpicyResult;
use spicy_contributions::output::{self, FetchProgress};
use spicy_contributions::repository::RepositoryRef;
use spicy_contributions::signals::{SignalDates, TimeWindow};

#[derive(Parser)]
#[command(name = "spicy")]
#[command(author, version, about = "Bug and CI failure days for GitHub contribution graphs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the result to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Configuration file (defaults to ./spicy.toml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch bug days and CI failure days for the last 365 days
    Dates {
        /// Repository of the current page (`owner/repo` or URL); overrides --repos
        repo: Option<String>,

        #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Comma-separated fallback repositories
        #[arg(short, long, value_delimiter = ',')]
        repos: Vec<String>,

        /// Label marking bug issues
        #[arg(short, long)]
        label: Option<String>,

        #[arg(long)]
        api_url: Option<String>,
    },
    /// Write a configuration template
    Init {
        #[arg(default_value = "spicy.toml")]
        path: PathBuf,
    },
}

impl Cli {
    fn settings(
        config: &Config,
        token: Option<&str>,
        repos: &[String],
        label: Option<&str>,
        api_url: Option<&str>,
    ) -> FetchSettings {
        let mut settings = config.to_settings();

        if let Some(token) = token.and_then(Token::non_empty) {
            settings.token = Some(token);
        }
        if !repos.is_empty() {
            settings.repos = RepositoryRef::parse_list(&repos.join(","));
        }
        if let Some(label) = label {
            settings.bug_label = label.to_string();
        }
        if let Some(api_url) = api_url {
            settings.api_url = api_url.to_string();
        }

        settings
    }

    async fn execute_dates(
        &self,
        repo: Option<&str>,
        token: Option<&str>,
        repos: &[String],
        label: Option<&str>,
        api_url: Option<&str>,
    ) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let format = self.format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        let fetcher = DateFetcher::new(Self::settings(&config, token, repos, label, api_url));
        let window = TimeWindow::trailing_year(Utc::now());

        let result = match repo.map(RepositoryRef::parse).transpose() {
            Ok(current) => Self::fetch_with_progress(&fetcher, current.as_ref(), window).await,
            Err(e) => Err(e),
        };

        let response = FetchDatesResponse::from(&result);

        match (format, &result) {
            (OutputFormat::Summary, Ok(dates)) => {
                if let Some(output_path) = &self.output {
                    std::fs::write(output_path, serde_json::to_string_pretty(&response)?)?;
                    info!("Dates written to: {}", output_path.display());
                }
                output::print_summary(dates, &window.since_iso());
            }
            _ => {
                let json_output = if pretty {
                    serde_json::to_string_pretty(&response)?
                } else {
                    serde_json::to_string(&response)?
                };

                if let Some(output_path) = &self.output {
                    std::fs::write(output_path, json_output)?;
                    info!("Dates written to: {}", output_path.display());
                } else {
                    println!("{}", json_output);
                }
            }
        }

        if let Some(error) = response.error {
            bail!(error);
        }

        Ok(())
    }

    async fn fetch_with_progress(
        fetcher: &DateFetcher,
        current: Option<&RepositoryRef>,
        window: TimeWindow,
    ) -> SpicyResult<SignalDates> {
        let target = current.map_or_else(
            || "configured repositories".to_string(),
            ToString::to_string,
        );
        info!("Collecting signal days for {target}");

        let progress = FetchProgress::start(&target);
        let result = fetcher.fetch_dates_in(current, window).await;
        match &result {
            Ok(dates) => progress.finish(dates.bug_days.len(), dates.failure_days.len()),
            Err(e) => progress.fail(&e.to_string()),
        }
        result
    }

    fn execute_init(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            bail!("Refusing to overwrite existing file: {}", path.display());
        }

        Config::default().save(path)?;
        info!("Configuration template written to: {}", path.display());
        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Dates {
                repo,
                token,
                repos,
                label,
                api_url,
            } => {
                self.execute_dates(
                    repo.as_deref(),
                    token.as_deref(),
                    repos,
                    label.as_deref(),
                    api_url.as_deref(),
                )
                .await
            }
            Commands::Init { path } => Self::execute_init(path),
        }
    }
}
