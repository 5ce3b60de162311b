use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::adf::extract_text_from_adf;

/// A ticket as the tracker returns it. The field set is whatever the
/// service's schema says it is, so it stays an open map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawComment")]
pub struct Comment {
    pub id: String,
    pub author: Option<String>,
    /// ISO-8601 creation timestamp, untouched.
    pub created: String,
    pub body: String,
}

impl Comment {
    /// Calendar day of the creation timestamp (`YYYY-MM-DD`).
    pub fn day(&self) -> &str {
        self.created.get(..10).unwrap_or(&self.created)
    }

    /// Creation timestamp to the second (`YYYY-MM-DDTHH:MM:SS`).
    pub fn timestamp(&self) -> &str {
        self.created.get(..19).unwrap_or(&self.created)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    id: String,
    author: Option<RawUser>,
    #[serde(default)]
    created: String,
    #[serde(default)]
    body: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    display_name: Option<String>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Self {
            id: raw.id,
            author: raw.author.and_then(|a| a.display_name),
            created: raw.created,
            // REST v3 hands bodies back as ADF documents
            body: extract_text_from_adf(&raw.body).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comment_from_v2_payload() {
        let c: Comment = serde_json::from_value(json!({
            "id": "10001",
            "author": {"displayName": "Grace Hopper", "accountId": "x"},
            "created": "2023-01-15T10:20:30.000+0000",
            "body": "Looks good"
        }))
        .unwrap();
        assert_eq!(c.author.as_deref(), Some("Grace Hopper"));
        assert_eq!(c.day(), "2023-01-15");
        assert_eq!(c.timestamp(), "2023-01-15T10:20:30");
        assert_eq!(c.body, "Looks good");
    }

    #[test]
    fn comment_body_from_adf() {
        let c: Comment = serde_json::from_value(json!({
            "id": "1",
            "created": "2023-01-15",
            "body": {"type": "doc", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "hi"}]}]}
        }))
        .unwrap();
        assert_eq!(c.author, None);
        assert_eq!(c.body, "hi");
        // shorter than the display precision
        assert_eq!(c.timestamp(), "2023-01-15");
    }

    #[test]
    fn search_page_tolerates_missing_issues() {
        let page: SearchPage = serde_json::from_value(json!({"total": 7})).unwrap();
        assert!(page.issues.is_empty());
        assert_eq!(page.total, 7);
    }
}
