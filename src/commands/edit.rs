use anyhow::Result;
use serde_json::{Map, Value};

use crate::cli::EditArgs;
use crate::tracker::Tracker;

/// JSON objects and arrays are sent as structured values (`{"name":"High"}`
/// for priority); everything else is a plain string.
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Object(_) | Value::Array(_))) => v,
        _ => Value::String(raw.to_string()),
    }
}

pub async fn edit_ticket(tracker: &dyn Tracker, issue_key: &str, field: &str, raw_value: &str) -> Result<()> {
    let mut fields = Map::new();
    fields.insert(field.to_string(), parse_value(raw_value));
    tracker.update_issue(issue_key, fields).await?;
    println!("Updated {field} of {issue_key} to {raw_value}");
    Ok(())
}

pub async fn run(tracker: &dyn Tracker, args: &EditArgs) -> Result<()> {
    edit_ticket(tracker, &args.issue_key, &args.field_name, &args.new_value).await
}
