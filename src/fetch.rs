//! Batched retrieval of query results.
//!
//! A count-only request sizes the job, then pages are requested in order
//! until the total is reached or the service runs dry. Nothing is retried;
//! a failed request ends the whole fetch with that error.

use std::io::IsTerminal;
use std::num::NonZeroUsize;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::model::record::Issue;
use crate::projection::Projection;
use crate::tracker::Tracker;

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Cheapest field to ask for when only the match count matters.
const COUNT_FIELD: &str = "id";

#[derive(Debug, Clone)]
pub struct Query {
    pub jql: String,
    pub projection: Projection,
    pub batch_size: NonZeroUsize,
    /// `None` fetches every match.
    pub max_results: Option<usize>,
}

impl Query {
    /// `max_results == 0` means no cap.
    pub fn new(
        jql: impl Into<String>,
        projection: Projection,
        batch_size: NonZeroUsize,
        max_results: usize,
    ) -> Self {
        Self {
            jql: jql.into(),
            projection,
            batch_size,
            max_results: (max_results > 0).then_some(max_results),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Matches the service reported.
    pub remote_total: usize,
    /// Records this fetch will try to collect.
    pub total: usize,
    pub batch_size: usize,
    pub max_results: Option<usize>,
}

impl FetchPlan {
    pub fn batches(&self) -> usize {
        self.total.div_ceil(self.batch_size)
    }

    /// Lines announcing the plan before any page is requested.
    pub fn summary(&self) -> Vec<String> {
        let headline = match self.max_results {
            None => format!("Total tickets found: {}", self.remote_total),
            Some(max) => format!(
                "Fetching a maximum of {max} tickets (out of {} found).",
                self.remote_total
            ),
        };
        vec![
            headline,
            format!(
                "Will fetch in {} batch(es) of {} items.",
                self.batches(),
                self.batch_size
            ),
        ]
    }
}

/// Ask the tracker how many issues match and size the fetch accordingly.
pub async fn plan(tracker: &dyn Tracker, query: &Query) -> Result<FetchPlan> {
    let count = tracker
        .search(&query.jql, &[COUNT_FIELD.to_string()], 0, 0)
        .await?;
    let total = match query.max_results {
        Some(max) => max.min(count.total),
        None => count.total,
    };
    debug!(remote_total = count.total, total, "planned fetch");
    Ok(FetchPlan {
        remote_total: count.total,
        total,
        batch_size: query.batch_size.get(),
        max_results: query.max_results,
    })
}

/// Collect up to `plan.total` issues in pages of `plan.batch_size`.
///
/// An empty or short page ends the loop early, since the reported total
/// may already be stale. The result never exceeds `plan.total`.
pub async fn fetch(
    tracker: &dyn Tracker,
    query: &Query,
    plan: &FetchPlan,
    progress: &ProgressBar,
) -> Result<Vec<Issue>> {
    let fields = query.projection.fetch_fields();
    let mut issues: Vec<Issue> = Vec::with_capacity(plan.total);
    let mut start_at = 0;

    while start_at < plan.total {
        let requested = plan.batch_size.min(plan.total - start_at);
        let page = tracker
            .search(&query.jql, &fields, start_at, requested)
            .await?;
        let received = page.issues.len();
        if received == 0 {
            debug!(start_at, "empty batch, stopping");
            break;
        }

        let accepted = received.min(plan.total - issues.len());
        issues.extend(page.issues.into_iter().take(accepted));
        progress.inc(accepted as u64);
        info!(start_at, received, "fetched batch");

        start_at += received;
        if received < requested {
            debug!(start_at, requested, received, "short batch, stopping");
            break;
        }
    }

    Ok(issues)
}

/// Progress bar for `total` tickets; hidden when stderr is not a terminal.
pub fn progress_bar(total: usize) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} tickets ({percent:>3}%)")
    {
        pb.set_style(style);
    }
    pb.set_prefix("Fetching tickets");
    pb
}
