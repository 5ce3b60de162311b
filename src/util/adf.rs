use serde_json::Value;

/// Node types that end a line of text.
const BLOCKS: &[&str] = &[
    "paragraph",
    "heading",
    "listItem",
    "codeBlock",
    "blockquote",
    "rule",
    "tableRow",
];

/// Flatten Jira's Atlassian Document Format (ADF) into plain text.
///
/// Plain strings pass through untouched, so callers can feed it whatever the
/// REST API version in use returns for a rich-text field.
pub fn extract_text_from_adf(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        _ => {
            let mut out = String::new();
            write_node(value, &mut out);
            let text = out.trim_end();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }
    }
}

fn write_node(node: &Value, out: &mut String) {
    match node {
        Value::Array(nodes) => nodes.iter().for_each(|n| write_node(n, out)),
        Value::Object(obj) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();
            match kind {
                "text" => out.push_str(obj.get("text").and_then(Value::as_str).unwrap_or_default()),
                "hardBreak" => out.push('\n'),
                "mention" | "emoji" => {
                    let label = obj
                        .get("attrs")
                        .and_then(|attrs| attrs.get("text"))
                        .and_then(Value::as_str);
                    if let Some(label) = label {
                        out.push_str(label);
                    }
                }
                _ => {
                    if let Some(content) = obj.get("content") {
                        write_node(content, out);
                    }
                    if BLOCKS.contains(&kind) && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
        _ => {}
    }
}
