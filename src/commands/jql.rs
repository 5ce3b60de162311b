use std::path::Path;

use anyhow::Result;

use super::{export_issues, fetch_reporting};
use crate::cli::JqlArgs;
use crate::config::Settings;
use crate::fetch::Query;
use crate::projection::Projection;
use crate::tracker::Tracker;

const EXPORT_STEM: &str = "jql_query_tickets";
const UNASSIGNED: &str = "Unassigned";

pub async fn run(tracker: &dyn Tracker, settings: &Settings, args: &JqlArgs, out_dir: &Path) -> Result<()> {
    let query = Query::new(
        args.query.clone(),
        Projection::parse(&args.fields)
            .with_default("assignee", UNASSIGNED)
            .with_default("assignee.displayName", UNASSIGNED),
        settings.batch_size(args.items_per_batch)?,
        args.max_results.unwrap_or(settings.max_results),
    );
    let issues = fetch_reporting(tracker, &query).await?;
    export_issues(&query.projection, &issues, args.output, out_dir, EXPORT_STEM)
}
