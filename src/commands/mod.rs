pub mod comment;
pub mod comments;
pub mod create;
pub mod edit;
pub mod jql;
pub mod list;
pub mod projects;
pub mod retrieve;

use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::cli::Command;
use crate::config::Settings;
use crate::fetch::{self, Query};
use crate::model::record::Issue;
use crate::output::{self, OutputFormat};
use crate::projection::Projection;
use crate::tracker::jira::JiraClient;
use crate::tracker::Tracker;

/// Shown for fields a ticket doesn't have.
pub const MISSING_FIELD: &str = "N/A";

pub async fn dispatch(command: &Command, settings: &Settings, out_dir: &Path) -> Result<()> {
    let tracker = JiraClient::new(&settings.credentials()?);
    match command {
        Command::List(args) => list::run(&tracker, settings, args, out_dir).await,
        Command::Jql(args) => jql::run(&tracker, settings, args, out_dir).await,
        Command::Create(args) => create::run(&tracker, settings, args).await,
        Command::Edit(args) => edit::run(&tracker, args).await,
        Command::Retrieve(args) => retrieve::run(&tracker, args).await,
        Command::Comment(args) => comment::run(&tracker, args).await,
        Command::Comments(args) => comments::run(&tracker, args, out_dir).await,
        Command::Projects => projects::run(&tracker).await,
    }
}

/// Announce the batch plan, then fetch with a progress bar.
pub async fn fetch_reporting(tracker: &dyn Tracker, query: &Query) -> Result<Vec<Issue>> {
    let plan = fetch::plan(tracker, query).await?;
    for line in plan.summary() {
        println!("{line}");
    }
    let progress = fetch::progress_bar(plan.total);
    let issues = fetch::fetch(tracker, query, &plan, &progress).await;
    progress.finish_and_clear();
    issues
}

/// Console table of issues, one column per projected field.
pub fn issue_table(projection: &Projection, issues: &[Issue]) -> String {
    let rows: Vec<Vec<Value>> = issues
        .iter()
        .map(|i| projection.row(i, MISSING_FIELD))
        .collect();
    output::render_table(projection.fields(), &rows)
}

/// Print or write issues in the requested format. Files are named
/// `<stem>.csv` / `<stem>.json` inside `out_dir`.
pub fn export_issues(
    projection: &Projection,
    issues: &[Issue],
    format: OutputFormat,
    out_dir: &Path,
    stem: &str,
) -> Result<()> {
    let headers = projection.fields();
    match format {
        OutputFormat::Table => println!("{}", issue_table(projection, issues)),
        OutputFormat::Csv => {
            let rows: Vec<Vec<Value>> = issues
                .iter()
                .map(|i| projection.row(i, MISSING_FIELD))
                .collect();
            let path = out_dir.join(format!("{stem}.csv"));
            output::write_csv(&path, headers, &rows)?;
            println!("Data written to {}", path.display());
        }
        OutputFormat::Json => {
            let records: Vec<Map<String, Value>> = issues
                .iter()
                .map(|i| projection.record(i, MISSING_FIELD))
                .collect();
            let path = out_dir.join(format!("{stem}.json"));
            output::write_json(&path, &records)?;
            println!("Data written to {}", path.display());
        }
    }
    Ok(())
}
