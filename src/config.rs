use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::JirafaError;
use crate::fetch::DEFAULT_BATCH_SIZE;

/// Looked up in the working directory before the per-user config.
pub const LOCAL_CONFIG_FILE: &str = "jirafa.toml";

/// Contents of `jirafa.toml`. Keys match the environment variable names.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(rename = "JIRA_URL")]
    pub jira_url: Option<String>,
    #[serde(rename = "JIRA_USERNAME")]
    pub username: Option<String>,
    #[serde(rename = "JIRA_API_TOKEN")]
    pub api_token: Option<String>,
    #[serde(rename = "JIRA_PROJECT_KEY")]
    pub project_key: Option<String>,
    #[serde(rename = "DEFAULT_MAX_RESULTS")]
    pub default_max_results: Option<usize>,
    #[serde(rename = "ITEMS_PER_BATCH")]
    pub items_per_batch: Option<usize>,
}

/// Fully resolved settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub jira_url: Option<String>,
    pub username: Option<String>,
    pub api_token: Option<String>,
    pub project_key: Option<String>,
    /// 0 means no cap.
    pub max_results: usize,
    pub items_per_batch: usize,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub url: String,
    pub username: String,
    pub api_token: String,
}

impl Settings {
    /// Merge the config file over the environment over built-in defaults.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        let env_number = |name: &str| -> Result<Option<usize>> {
            env(name)
                .map(|v| {
                    v.trim()
                        .parse::<usize>()
                        .with_context(|| format!("{name} must be a non-negative integer, got '{v}'"))
                })
                .transpose()
        };

        Ok(Self {
            jira_url: file.jira_url.or_else(|| env("JIRA_URL")),
            username: file.username.or_else(|| env("JIRA_USERNAME")),
            api_token: file.api_token.or_else(|| env("JIRA_API_TOKEN")),
            project_key: file.project_key.or_else(|| env("JIRA_PROJECT_KEY")),
            max_results: match file.default_max_results {
                Some(n) => n,
                None => env_number("DEFAULT_MAX_RESULTS")?.unwrap_or(0),
            },
            items_per_batch: match file.items_per_batch {
                Some(n) => n,
                None => env_number("ITEMS_PER_BATCH")?.unwrap_or(DEFAULT_BATCH_SIZE),
            },
        })
    }

    pub fn credentials(&self) -> Result<Credentials, JirafaError> {
        let mut missing = Vec::new();
        if self.jira_url.is_none() {
            missing.push("JIRA_URL");
        }
        if self.username.is_none() {
            missing.push("JIRA_USERNAME");
        }
        if self.api_token.is_none() {
            missing.push("JIRA_API_TOKEN");
        }
        match (&self.jira_url, &self.username, &self.api_token) {
            (Some(url), Some(username), Some(api_token)) => Ok(Credentials {
                url: url.clone(),
                username: username.clone(),
                api_token: api_token.clone(),
            }),
            _ => Err(JirafaError::MissingCredentials {
                missing: missing.join(", "),
            }),
        }
    }

    /// Batch size from a command-line override or the configured default.
    pub fn batch_size(&self, cli: Option<usize>) -> Result<NonZeroUsize, JirafaError> {
        NonZeroUsize::new(cli.unwrap_or(self.items_per_batch)).ok_or(JirafaError::ZeroBatchSize {
            name: "ITEMS_PER_BATCH",
        })
    }

    pub fn project_key(&self, cli: Option<&str>) -> Result<String, JirafaError> {
        cli.map(str::to_string)
            .or_else(|| self.project_key.clone())
            .ok_or(JirafaError::MissingProjectKey)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jirafa").join("config.toml"))
}

/// An explicit path must exist; otherwise `./jirafa.toml`, then the
/// per-user file, then nothing.
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    user_config_path().filter(|p| p.exists())
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// A missing `.env` is fine; one that exists but doesn't parse is not.
fn allow_missing_env_file<T>(result: dotenvy::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("Failed to load .env"),
    }
}

pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    // A .env file only fills in variables that aren't already set.
    allow_missing_env_file(dotenvy::dotenv())?;

    let file = match config_path(explicit) {
        Some(path) => load_file(&path)?,
        None => FileConfig::default(),
    };
    Settings::resolve(file, |name| std::env::var(name).ok())
}
