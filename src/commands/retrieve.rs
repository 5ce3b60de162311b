use anyhow::Result;
use serde_json::{Map, Value};

use crate::cli::RetrieveArgs;
use crate::output::to_pretty_json;
use crate::projection::Projection;
use crate::tracker::Tracker;

const NOT_FOUND: &str = "Field not found";

pub async fn retrieve_fields(
    tracker: &dyn Tracker,
    issue_key: &str,
    fields: &[String],
) -> Result<Map<String, Value>> {
    let projection = Projection::new(fields);
    let issue = tracker.issue(issue_key, &projection.fetch_fields()).await?;
    Ok(projection.record(&issue, NOT_FOUND))
}

pub async fn run(tracker: &dyn Tracker, args: &RetrieveArgs) -> Result<()> {
    let record = retrieve_fields(tracker, &args.issue_key, &args.fields).await?;
    println!("{}", to_pretty_json(&record)?);
    Ok(())
}
