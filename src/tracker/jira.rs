use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::Tracker;
use crate::config::Credentials;
use crate::error::JirafaError;
use crate::model::record::{Comment, CommentPage, CreatedIssue, Issue, Project, SearchPage};

const API: &str = "/rest/api/2";
const AGILE_API: &str = "/rest/agile/1.0";
const COMMENT_PAGE_SIZE: usize = 100;

pub struct JiraClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            base_url: credentials.url.trim_end_matches('/').to_string(),
            auth_header: basic_auth(&credentials.username, &credentials.api_token),
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!("{method} {url}");
        self.client
            .request(method, url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
    }

    async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("Jira {what} request failed"))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        Err(JirafaError::Remote {
            operation: what.to_string(),
            url,
            status: status.as_u16(),
            body,
        }
        .into())
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
        self.send(req, what)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse Jira {what} response"))
    }
}

fn basic_auth(username: &str, api_token: &str) -> String {
    let creds = format!("{username}:{api_token}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
    format!("Basic {encoded}")
}

fn search_path(jql: &str, fields: &[String], start_at: usize, max_results: usize) -> String {
    let mut path = format!(
        "{API}/search?jql={}&startAt={start_at}&maxResults={max_results}",
        urlencoding::encode(jql)
    );
    if !fields.is_empty() {
        path.push_str("&fields=");
        path.push_str(&urlencoding::encode(&fields.join(",")));
    }
    path
}

#[async_trait]
impl Tracker for JiraClient {
    async fn search(
        &self,
        jql: &str,
        fields: &[String],
        start_at: usize,
        max_results: usize,
    ) -> Result<SearchPage> {
        let path = search_path(jql, fields, start_at, max_results);
        self.fetch(self.request(Method::GET, &path), "search").await
    }

    async fn issue(&self, key: &str, fields: &[String]) -> Result<Issue> {
        let mut path = format!("{API}/issue/{}", urlencoding::encode(key));
        if !fields.is_empty() {
            path.push_str("?fields=");
            path.push_str(&urlencoding::encode(&fields.join(",")));
        }
        self.fetch(self.request(Method::GET, &path), "issue").await
    }

    async fn create_issue(&self, fields: Map<String, Value>) -> Result<CreatedIssue> {
        let req = self
            .request(Method::POST, &format!("{API}/issue"))
            .json(&json!({ "fields": fields }));
        self.fetch(req, "create issue").await
    }

    async fn update_issue(&self, key: &str, fields: Map<String, Value>) -> Result<()> {
        let req = self
            .request(Method::PUT, &format!("{API}/issue/{}", urlencoding::encode(key)))
            .json(&json!({ "fields": fields }));
        self.send(req, "update issue").await?;
        Ok(())
    }

    async fn add_comment(&self, key: &str, body: &str) -> Result<()> {
        let req = self
            .request(
                Method::POST,
                &format!("{API}/issue/{}/comment", urlencoding::encode(key)),
            )
            .json(&json!({ "body": body }));
        self.send(req, "add comment").await?;
        Ok(())
    }

    async fn comments(&self, key: &str) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();
        loop {
            let path = format!(
                "{API}/issue/{}/comment?startAt={}&maxResults={COMMENT_PAGE_SIZE}",
                urlencoding::encode(key),
                comments.len()
            );
            let page: CommentPage = self.fetch(self.request(Method::GET, &path), "comments").await?;
            if page.comments.is_empty() {
                break;
            }
            comments.extend(page.comments);
            if comments.len() >= page.total {
                break;
            }
        }
        Ok(comments)
    }

    async fn add_issues_to_epic(&self, epic_key: &str, issue_keys: &[String]) -> Result<()> {
        let req = self
            .request(
                Method::POST,
                &format!("{AGILE_API}/epic/{}/issue", urlencoding::encode(epic_key)),
            )
            .json(&json!({ "issues": issue_keys }));
        self.send(req, "link to epic").await?;
        Ok(())
    }

    async fn projects(&self) -> Result<Vec<Project>> {
        self.fetch(self.request(Method::GET, &format!("{API}/project")), "projects")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_is_basic_base64() {
        assert_eq!(basic_auth("ada@example.com", "t0ken"), "Basic YWRhQGV4YW1wbGUuY29tOnQwa2Vu");
    }

    #[test]
    fn search_path_encodes_query_and_fields() {
        let fields = vec!["summary".to_string(), "status".to_string()];
        assert_eq!(
            search_path("project = ABC AND status = 'Done'", &fields, 50, 25),
            "/rest/api/2/search?jql=project%20%3D%20ABC%20AND%20status%20%3D%20%27Done%27&startAt=50&maxResults=25&fields=summary%2Cstatus"
        );
    }

    #[test]
    fn search_path_omits_empty_field_list() {
        assert_eq!(search_path("x", &[], 0, 0), "/rest/api/2/search?jql=x&startAt=0&maxResults=0");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = JiraClient::new(&Credentials {
            url: "https://acme.atlassian.net/".into(),
            username: "u".into(),
            api_token: "t".into(),
        });
        assert_eq!(client.base_url, "https://acme.atlassian.net");
    }
}
