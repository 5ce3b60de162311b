use serde_json::{Map, Value};

use crate::model::field;
use crate::model::record::Issue;

/// Synthetic field that reads the issue key instead of an attribute.
pub const KEY_FIELD: &str = "key";

/// Ordered set of fields to fetch and display. Always contains `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
    /// Per-field text used when the value is missing or null.
    defaults: Vec<(String, String)>,
}

impl Projection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for f in fields {
            let f = f.as_ref().trim();
            if !f.is_empty() && !out.iter().any(|existing| existing == f) {
                out.push(f.to_string());
            }
        }
        if !out.iter().any(|f| f == KEY_FIELD) {
            out.push(KEY_FIELD.to_string());
        }
        Self {
            fields: out,
            defaults: Vec::new(),
        }
    }

    /// Parse a comma-separated list such as `summary,status,key`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Show `text` for `field` when the ticket has no value for it, null
    /// included (e.g. `Unassigned` for `assignee`).
    pub fn with_default(mut self, field: &str, text: &str) -> Self {
        self.defaults.push((field.to_string(), text.to_string()));
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field names to ask the tracker for: top-level attribute of each path,
    /// without the synthetic key.
    pub fn fetch_fields(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for f in &self.fields {
            if f == KEY_FIELD {
                continue;
            }
            let top = f.split('.').next().unwrap_or(f);
            if !out.iter().any(|existing| existing == top) {
                out.push(top.to_string());
            }
        }
        out
    }

    fn value(&self, issue: &Issue, name: &str, default: &str) -> Value {
        if name == KEY_FIELD {
            return Value::String(issue.key.clone());
        }
        let fallback = self
            .defaults
            .iter()
            .find(|(f, _)| f == name)
            .map(|(_, text)| text.as_str());
        match fallback {
            Some(text) => match field::get_or(&issue.fields, name, text) {
                Value::Null => Value::String(text.to_string()),
                found => field::flatten(&found),
            },
            None => field::flatten(&field::get_or(&issue.fields, name, default)),
        }
    }

    /// One primitive value per field, in projection order.
    pub fn row(&self, issue: &Issue, default: &str) -> Vec<Value> {
        self.fields
            .iter()
            .map(|name| self.value(issue, name, default))
            .collect()
    }

    /// Field name to primitive value, keys in projection order.
    pub fn record(&self, issue: &Issue, default: &str) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|name| (name.clone(), self.value(issue, name, default)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue() -> Issue {
        serde_json::from_value(json!({
            "key": "PROJ-7",
            "fields": {
                "summary": "Fix login",
                "status": {"name": "Done", "id": "3"},
                "key": "not-the-key",
                "assignee": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn key_is_appended_once() {
        assert_eq!(Projection::parse("summary,status").fields(), ["summary", "status", "key"]);
        assert_eq!(Projection::parse("key, summary,summary").fields(), ["key", "summary"]);
    }

    #[test]
    fn fetch_fields_skip_key_and_nested_parts() {
        let p = Projection::parse("summary,status.name,status,key,assignee.displayName");
        assert_eq!(p.fetch_fields(), ["summary", "status", "assignee"]);
    }

    #[test]
    fn key_reads_issue_identifier() {
        let p = Projection::parse("key");
        assert_eq!(p.row(&issue(), "N/A"), vec![json!("PROJ-7")]);
    }

    #[test]
    fn row_flattens_structured_values() {
        let p = Projection::parse("summary,status,assignee,priority");
        assert_eq!(
            p.row(&issue(), "N/A"),
            vec![json!("Fix login"), json!("Done"), Value::Null, json!("N/A"), json!("PROJ-7")]
        );
    }

    #[test]
    fn structured_fields_never_project_blank() {
        let issue: Issue = serde_json::from_value(json!({
            "key": "PROJ-1",
            "fields": {
                "assignee": {"displayName": "", "accountId": "abc123"},
                "labels": [null],
                "components": [""]
            }
        }))
        .unwrap();
        let row = Projection::parse("assignee,labels,components").row(&issue, "N/A");
        assert_eq!(row[0], json!("abc123"));
        for cell in &row {
            assert!(cell.as_str().is_some_and(|s| !s.is_empty()), "blank cell in {row:?}");
        }
    }

    #[test]
    fn field_default_covers_null_and_missing() {
        let p = Projection::parse("assignee,assignee.displayName,reporter")
            .with_default("assignee", "Unassigned")
            .with_default("assignee.displayName", "Unassigned");
        assert_eq!(
            p.row(&issue(), "N/A"),
            vec![json!("Unassigned"), json!("Unassigned"), json!("N/A"), json!("PROJ-7")]
        );
    }

    #[test]
    fn record_keeps_projection_order() {
        let p = Projection::parse("status,summary");
        let record = p.record(&issue(), "Field not found");
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["status", "summary", "key"]);
        assert_eq!(record["status"], json!("Done"));
    }
}
