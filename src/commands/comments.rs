use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::CommentsArgs;
use crate::filter::{CommentFilter, FilterWarning};
use crate::model::record::Comment;
use crate::output::{self, OutputFormat};
use crate::tracker::Tracker;

const HEADERS: [&str; 4] = ["ID", "Author", "Date", "Comment"];
const PREVIEW_CHARS: usize = 50;

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

fn row(comment: &Comment, body: String) -> Vec<Value> {
    vec![
        json!(comment.id),
        json!(comment.author),
        json!(comment.timestamp()),
        json!(body),
    ]
}

fn record(comment: &Comment) -> Value {
    json!({
        "id": comment.id,
        "author": comment.author,
        "date": comment.timestamp(),
        "body": comment.body,
    })
}

/// User-facing lines for dropped filter tokens. These go to stderr
/// regardless of the log level.
fn warning_lines(warnings: &[FilterWarning]) -> Vec<String> {
    warnings.iter().map(|w| format!("Warning: {w}")).collect()
}

/// Fetch a ticket's comments and keep those passing every filter token,
/// capped at `max_results` when it's non-zero.
pub async fn matching_comments(
    tracker: &dyn Tracker,
    issue_key: &str,
    filters: &[String],
    max_results: usize,
) -> Result<Vec<Comment>> {
    let (filter, warnings) = CommentFilter::parse(filters);
    for line in warning_lines(&warnings) {
        eprintln!("{line}");
    }
    let comments = tracker.comments(issue_key).await?;
    let fetched = comments.len();
    let mut kept = filter.apply(comments);
    debug!(fetched, kept = kept.len(), tokens = filter.tokens().len(), "filtered comments");
    if max_results > 0 {
        kept.truncate(max_results);
    }
    Ok(kept)
}

pub async fn run(tracker: &dyn Tracker, args: &CommentsArgs, out_dir: &Path) -> Result<()> {
    let comments = matching_comments(tracker, &args.issue_key, &args.filters, args.max_results).await?;

    match args.output {
        OutputFormat::Table => {
            let rows: Vec<Vec<Value>> = comments.iter().map(|c| row(c, preview(&c.body))).collect();
            println!("{}", output::render_table(&HEADERS[..], &rows));
        }
        OutputFormat::Csv => {
            let rows: Vec<Vec<Value>> = comments.iter().map(|c| row(c, c.body.clone())).collect();
            let path = out_dir.join(format!("{}_comments.csv", args.issue_key));
            output::write_csv(&path, &HEADERS[..], &rows)?;
            println!("Comments written to {}", path.display());
        }
        OutputFormat::Json => {
            let records: Vec<Value> = comments.iter().map(record).collect();
            let path = out_dir.join(format!("{}_comments.json", args.issue_key));
            output::write_json(&path, &records)?;
            println!("Comments written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::tests::MockTracker;

    fn comment(id: &str, author: &str, created: &str, body: &str) -> Comment {
        Comment {
            id: id.into(),
            author: Some(author.into()),
            created: created.into(),
            body: body.into(),
        }
    }

    fn tracker() -> MockTracker {
        MockTracker::with_comments(vec![
            comment("1", "Ada Lovelace", "2023-01-05T09:00:00.000+0000", "Kickoff notes"),
            comment("2", "Grace Hopper", "2023-01-15T10:20:30.000+0000", "Found the bug"),
            comment("3", "Ada Lovelace", "2023-02-01T08:00:00.000+0000", "Fixed the bug"),
        ])
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(60);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(50)));
        assert_eq!(preview(&"y".repeat(50)), "y".repeat(50));
    }

    #[tokio::test]
    async fn filters_by_date_range_and_author() {
        let tracker = tracker();
        let kept = matching_comments(
            &tracker,
            "PROJ-1",
            &["date:2023-01-01 to 2023-01-31".into()],
            0,
        )
        .await
        .unwrap();
        assert_eq!(ids(&kept), ["1", "2"]);

        let kept = matching_comments(&tracker, "PROJ-1", &["author:ada".into(), "text:bug".into()], 0)
            .await
            .unwrap();
        assert_eq!(ids(&kept), ["3"]);
    }

    #[test]
    fn dropped_tokens_become_warning_lines() {
        let (_, warnings) = CommentFilter::parse(["oops", "mood:happy", "text:bug"]);
        let lines = warning_lines(&warnings);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Warning: Invalid filter format: oops. Expected field:value");
        assert!(lines[1].starts_with("Warning: Invalid filter field 'mood'"));
    }

    #[tokio::test]
    async fn bad_tokens_do_not_drop_comments() {
        let kept = matching_comments(&tracker(), "PROJ-1", &["oops".into(), "mood:happy".into()], 0)
            .await
            .unwrap();
        assert_eq!(kept.len(), 3);
    }

    #[tokio::test]
    async fn cap_applies_after_filtering() {
        let kept = matching_comments(&tracker(), "PROJ-1", &["text:bug".into()], 1)
            .await
            .unwrap();
        assert_eq!(ids(&kept), ["2"]);
    }

    #[tokio::test]
    async fn csv_export_uses_fixed_headers_and_full_body() {
        let dir = tempfile::tempdir().unwrap();
        let args = CommentsArgs {
            issue_key: "PROJ-1".into(),
            filters: vec!["author:grace".into()],
            max_results: 0,
            output: OutputFormat::Csv,
        };
        run(&tracker(), &args, dir.path()).await.unwrap();

        let csv = std::fs::read_to_string(dir.path().join("PROJ-1_comments.csv")).unwrap();
        assert_eq!(
            csv,
            "ID,Author,Date,Comment\r\n2,Grace Hopper,2023-01-15T10:20:30,Found the bug\r\n"
        );
    }

    #[tokio::test]
    async fn json_export_has_named_keys() {
        let dir = tempfile::tempdir().unwrap();
        let args = CommentsArgs {
            issue_key: "PROJ-1".into(),
            filters: vec![],
            max_results: 0,
            output: OutputFormat::Json,
        };
        run(&tracker(), &args, dir.path()).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("PROJ-1_comments.json")).unwrap();
        let rows: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["author"], "Ada Lovelace");
        assert_eq!(rows[0]["date"], "2023-01-05T09:00:00");
        assert_eq!(rows[0]["body"], "Kickoff notes");
    }
}
