//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "jirafa",
    version,
    about = "Create, edit, query and export Jira tickets from the command line"
)]
pub struct Cli {
    /// Config file (defaults to ./jirafa.toml, then the per-user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory CSV and JSON exports are written to
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Log requests and batches to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tickets in a project
    List(ListArgs),
    /// Run an arbitrary JQL query
    Jql(JqlArgs),
    /// Create a ticket from a description file
    Create(CreateArgs),
    /// Set one field of a ticket
    Edit(EditArgs),
    /// Print selected fields of a ticket as JSON
    Retrieve(RetrieveArgs),
    /// Add a comment to a ticket
    Comment(CommentArgs),
    /// Show a ticket's comments, optionally filtered
    Comments(CommentsArgs),
    /// List available projects
    Projects,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub project_key: String,

    /// Comma-separated fields to display
    #[arg(long, default_value = "summary,status,key")]
    pub fields: String,

    /// Field filter in key:value form, e.g. 'status:Done'
    #[arg(short = 'f', long = "filter")]
    pub filters: Vec<String>,

    #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Maximum number of tickets (0 for all)
    #[arg(long, alias = "max_results")]
    pub max_results: Option<usize>,

    /// Tickets requested per batch
    #[arg(long, alias = "items_per_batch")]
    pub items_per_batch: Option<usize>,
}

#[derive(Debug, Args)]
pub struct JqlArgs {
    pub query: String,

    /// Comma-separated fields to display
    #[arg(long, default_value = "summary,status,assignee,key")]
    pub fields: String,

    /// Maximum number of tickets (0 for all)
    #[arg(long, alias = "max_results")]
    pub max_results: Option<usize>,

    /// Tickets requested per batch
    #[arg(long, alias = "items_per_batch")]
    pub items_per_batch: Option<usize>,

    #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub summary: String,

    /// File holding the ticket description
    pub description_file: PathBuf,

    #[arg(long, default_value = "Medium")]
    pub priority: String,

    /// Epic to link the new ticket to
    #[arg(long, alias = "epic_key")]
    pub epic_key: Option<String>,

    /// Defaults to JIRA_PROJECT_KEY
    #[arg(long, alias = "project_key")]
    pub project_key: Option<String>,

    /// Task, Story, Bug, ...
    #[arg(long, alias = "issue_type", default_value = "Task")]
    pub issue_type: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub issue_key: String,
    pub field_name: String,
    /// Plain text, or a JSON object/array for structured fields
    pub new_value: String,
}

#[derive(Debug, Args)]
pub struct RetrieveArgs {
    pub issue_key: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Args)]
pub struct CommentArgs {
    pub issue_key: String,
    pub comment: String,
}

#[derive(Debug, Args)]
pub struct CommentsArgs {
    pub issue_key: String,

    /// author:<name>, text:<words>, date:<YYYY-MM-DD> or date:<start> to <end>
    #[arg(short = 'f', long = "filter")]
    pub filters: Vec<String>,

    /// Maximum number of comments (0 for all)
    #[arg(long, alias = "max_results", default_value_t = 0)]
    pub max_results: usize,

    #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}
