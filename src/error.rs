use std::path::PathBuf;

use thiserror::Error;

/// Failures the user is expected to act on. Everything else travels as a
/// plain `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum JirafaError {
    #[error("Jira URL, username, and API token must be provided via config or environment (missing: {missing})")]
    MissingCredentials { missing: String },

    #[error("No project key provided. Pass --project-key or set JIRA_PROJECT_KEY")]
    MissingProjectKey,

    #[error("{name} must be at least 1")]
    ZeroBatchSize { name: &'static str },

    #[error("Markdown file {} not found", .0.display())]
    DescriptionNotFound(PathBuf),

    #[error("Invalid filter '{0}': expected key:value")]
    InvalidListFilter(String),

    #[error("Jira {operation} request returned {status} ({url}): {body}")]
    Remote {
        operation: String,
        url: String,
        status: u16,
        body: String,
    },
}
