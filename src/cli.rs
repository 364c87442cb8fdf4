use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::unit::Category;

/// Sweep - Reclaim disk space from caches, trash and old system files
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cleaner units and their state
    List(ListArgs),

    /// Show details of one unit
    Info(InfoArgs),

    /// Find reclaimable space without deleting anything
    Scan(ScanArgs),

    /// Scan, then remove what was found
    Clean(CleanArgs),

    /// Clean a batch read from stdin with root privileges
    #[command(name = "clean-as-root", hide = true)]
    CleanAsRoot,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list units in this category
    #[arg(short = 'C', long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Unit id (see `sweep list`)
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Unit ids to scan (default: every available unit)
    #[arg(value_name = "UNIT")]
    pub ids: Vec<String>,

    /// Only scan units in this category
    #[arg(short = 'C', long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Unit ids to clean (default: every available unit)
    #[arg(value_name = "UNIT")]
    pub ids: Vec<String>,

    /// Only clean units in this category
    #[arg(short = 'C', long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Show what would be cleaned without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
