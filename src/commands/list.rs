use std::path::Path;

use anyhow::Result;

use super::{export_issues, fetch_reporting};
use crate::cli::ListArgs;
use crate::config::Settings;
use crate::error::JirafaError;
use crate::fetch::Query;
use crate::projection::Projection;
use crate::tracker::Tracker;

/// Turn `status:Done` into the JQL clause `status = 'Done'`.
pub fn filter_clause(filter: &str) -> Result<String, JirafaError> {
    let (key, value) = filter
        .split_once(':')
        .ok_or_else(|| JirafaError::InvalidListFilter(filter.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(JirafaError::InvalidListFilter(filter.to_string()));
    }
    let value = value.trim().trim_matches('"');
    Ok(format!("{key} = '{value}'"))
}

pub fn project_jql(project_key: &str, clauses: &[String]) -> String {
    let mut jql = format!("project = {project_key}");
    if !clauses.is_empty() {
        jql.push_str(" AND ");
        jql.push_str(&clauses.join(" AND "));
    }
    jql
}

pub async fn run(tracker: &dyn Tracker, settings: &Settings, args: &ListArgs, out_dir: &Path) -> Result<()> {
    let clauses = args
        .filters
        .iter()
        .map(|f| filter_clause(f))
        .collect::<Result<Vec<_>, _>>()?;

    let query = Query::new(
        project_jql(&args.project_key, &clauses),
        Projection::parse(&args.fields),
        settings.batch_size(args.items_per_batch)?,
        args.max_results.unwrap_or(settings.max_results),
    );

    let issues = fetch_reporting(tracker, &query).await?;
    export_issues(
        &query.projection,
        &issues,
        args.output,
        out_dir,
        &format!("{}_tickets", args.project_key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::output::OutputFormat;
    use crate::tracker::tests::MockTracker;

    #[test]
    fn filter_becomes_quoted_equality() {
        assert_eq!(filter_clause("status:Done").unwrap(), "status = 'Done'");
        assert_eq!(filter_clause("summary:\"a b\"").unwrap(), "summary = 'a b'");
        assert_eq!(filter_clause("labels:x:y").unwrap(), "labels = 'x:y'");
    }

    #[test]
    fn filter_without_separator_is_rejected() {
        assert!(matches!(filter_clause("status"), Err(JirafaError::InvalidListFilter(_))));
        assert!(filter_clause(":Done").is_err());
    }

    #[test]
    fn project_query_joins_clauses() {
        assert_eq!(project_jql("PROJ", &[]), "project = PROJ");
        assert_eq!(
            project_jql("PROJ", &["status = 'Done'".into(), "assignee = 'ada'".into()]),
            "project = PROJ AND status = 'Done' AND assignee = 'ada'"
        );
    }

    #[tokio::test]
    async fn list_writes_project_named_json() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = MockTracker::with_issues(3);
        let settings = Settings::resolve(FileConfig::default(), |_| None).unwrap();
        let args = ListArgs {
            project_key: "PROJ".into(),
            fields: "summary,status".into(),
            filters: vec!["status:Open".into()],
            output: OutputFormat::Json,
            max_results: Some(2),
            items_per_batch: None,
        };

        run(&tracker, &settings, &args, dir.path()).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("PROJ_tickets.json")).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["status"], "Open");
        assert_eq!(rows[1]["key"], "PROJ-2");
    }
}
