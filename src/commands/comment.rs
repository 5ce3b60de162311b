use anyhow::Result;

use crate::cli::CommentArgs;
use crate::tracker::Tracker;

pub async fn run(tracker: &dyn Tracker, args: &CommentArgs) -> Result<()> {
    tracker.add_comment(&args.issue_key, &args.comment).await?;
    println!("Added comment to {}", args.issue_key);
    Ok(())
}
