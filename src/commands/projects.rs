use anyhow::Result;

use crate::model::record::Project;
use crate::tracker::Tracker;

pub fn render_projects(projects: &[Project]) -> String {
    let mut out = String::from("Available JIRA Projects:");
    for project in projects {
        out.push('\n');
        out.push_str(&format!("{} - {}", project.key, project.name));
    }
    out
}

pub async fn run(tracker: &dyn Tracker) -> Result<()> {
    let projects = tracker.projects().await?;
    println!("{}", render_projects(&projects));
    Ok(())
}
