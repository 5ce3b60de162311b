//! Rendering of projected rows: console table, CSV file or JSON file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use crate::model::field::to_text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Plain, space-aligned table with a header row.
pub fn render_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<Value>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.as_ref().to_string()));
    for row in rows {
        builder.push_record(row.iter().map(to_text));
    }
    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

/// Quote a CSV field when it holds a delimiter, quote or line break.
fn escape_csv(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cells: Vec<String> = fields.into_iter().map(|f| escape_csv(f.as_ref())).collect();
    cells.join(",")
}

pub fn write_csv<S: AsRef<str>>(path: &Path, headers: &[S], rows: &[Vec<Value>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write!(writer, "{}\r\n", csv_line(headers))?;
    for row in rows {
        write!(writer, "{}\r\n", csv_line(row.iter().map(to_text)))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Pretty JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    write_pretty_json(&mut buf, value)?;
    Ok(String::from_utf8(buf)?)
}

fn write_pretty_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut ser)?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_pretty_json(&mut writer, value)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_columns_line_up() {
        let table = render_table(
            &["summary", "status", "key"],
            &[
                vec![json!("Fix the login bug"), json!("Done"), json!("PROJ-1")],
                vec![json!("Docs"), json!("In Progress"), json!("PROJ-22")],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        let col = lines[0].find("status").unwrap();
        assert_eq!(lines[1].find("Done"), Some(col));
        assert_eq!(lines[2].find("In Progress"), Some(col));
        assert!(!table.contains('|'));
    }

    #[test]
    fn table_renders_null_as_blank() {
        let table = render_table(&["assignee", "key"], &[vec![Value::Null, json!("PROJ-1")]]);
        assert!(table.contains("PROJ-1"));
        assert!(!table.contains("null"));
    }

    #[test]
    fn csv_escapes_special_characters() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn csv_file_has_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PROJ_tickets.csv");
        write_csv(
            &path,
            &["summary", "key"],
            &[vec![json!("Fix, then ship"), json!("PROJ-1")], vec![json!(3), json!("PROJ-2")]],
        )
        .unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "summary,key\r\n\"Fix, then ship\",PROJ-1\r\n3,PROJ-2\r\n");
    }

    #[test]
    fn json_uses_four_space_indent() {
        let text = to_pretty_json(&json!([{"key": "PROJ-1"}])).unwrap();
        assert_eq!(text, "[\n    {\n        \"key\": \"PROJ-1\"\n    }\n]");
    }

    #[test]
    fn json_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let rows = vec![json!({"summary": "x", "key": "PROJ-1"})];
        write_json(&path, &rows).unwrap();
        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, json!(rows));
    }
}
