pub mod jira;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::model::record::{Comment, CreatedIssue, Issue, Project, SearchPage};

/// The remote ticket service. Every call is attempted once; errors are
/// handed back to the caller untouched.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Run a query and return one page of matches plus the total match count.
    /// `max_results == 0` asks for the count only.
    async fn search(
        &self,
        jql: &str,
        fields: &[String],
        start_at: usize,
        max_results: usize,
    ) -> Result<SearchPage>;

    async fn issue(&self, key: &str, fields: &[String]) -> Result<Issue>;

    async fn create_issue(&self, fields: Map<String, Value>) -> Result<CreatedIssue>;

    /// Partial update: only the given fields change.
    async fn update_issue(&self, key: &str, fields: Map<String, Value>) -> Result<()>;

    async fn add_comment(&self, key: &str, body: &str) -> Result<()>;

    /// Every comment on the issue, oldest first.
    async fn comments(&self, key: &str) -> Result<Vec<Comment>>;

    async fn add_issues_to_epic(&self, epic_key: &str, issue_keys: &[String]) -> Result<()>;

    async fn projects(&self) -> Result<Vec<Project>>;
}
