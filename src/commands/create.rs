use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::cli::CreateArgs;
use crate::config::Settings;
use crate::error::JirafaError;
use crate::model::record::CreatedIssue;
use crate::tracker::Tracker;

pub struct NewTicket<'a> {
    pub project_key: &'a str,
    pub summary: &'a str,
    pub description_file: &'a Path,
    pub priority: &'a str,
    pub issue_type: &'a str,
    pub epic_key: Option<&'a str>,
}

fn read_description(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(JirafaError::DescriptionNotFound(path.to_path_buf()).into())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn issue_fields(ticket: &NewTicket<'_>, description: String) -> Map<String, Value> {
    let fields = json!({
        "project": {"key": ticket.project_key},
        "summary": ticket.summary,
        "description": description,
        "issuetype": {"name": ticket.issue_type},
        "priority": {"name": ticket.priority},
    });
    match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Create the ticket, then link it to the epic if one was given.
///
/// The two steps are independent: when linking fails the new ticket stays
/// in place, unlinked, and the error names it.
pub async fn create_ticket(tracker: &dyn Tracker, ticket: &NewTicket<'_>) -> Result<CreatedIssue> {
    let description = read_description(ticket.description_file)?;

    let created = tracker
        .create_issue(issue_fields(ticket, description))
        .await?;
    println!("Created issue {}", created.key);

    if let Some(epic_key) = ticket.epic_key {
        tracker
            .add_issues_to_epic(epic_key, &[created.key.clone()])
            .await
            .with_context(|| {
                format!(
                    "Issue {} was created but could not be linked to epic {epic_key}",
                    created.key
                )
            })?;
        println!("Issue {} linked to epic {epic_key}", created.key);
    }

    Ok(created)
}

pub async fn run(tracker: &dyn Tracker, settings: &Settings, args: &CreateArgs) -> Result<()> {
    let project_key = settings.project_key(args.project_key.as_deref())?;
    let ticket = NewTicket {
        project_key: &project_key,
        summary: &args.summary,
        description_file: &args.description_file,
        priority: &args.priority,
        issue_type: &args.issue_type,
        epic_key: args.epic_key.as_deref(),
    };
    create_ticket(tracker, &ticket).await?;
    Ok(())
}
