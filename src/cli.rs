// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines global options and the delete subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DELETE_EXAMPLE: &str = "\
EXAMPLE:
   If the container id is \"ubuntu01\" and it is stopped, the following
   deletes the resources held for \"ubuntu01\" and removes it from the
   managed containers:

       # reclaim delete ubuntu01";

#[derive(Parser)]
#[command(name = "reclaim")]
#[command(about = "Delete OCI containers and reclaim their cgroups")]
#[command(version)]
pub struct Cli {
    /// State directory holding the managed containers
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to $RECLAIM_CONFIG, then /etc/reclaim/config.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete any resources held by one or more containers
    #[command(after_help = DELETE_EXAMPLE)]
    Delete {
        /// Forcibly delete the container if it is still running (uses SIGKILL)
        #[arg(short, long)]
        force: bool,

        /// Containers to delete, processed in order until one fails
        #[arg(value_name = "CONTAINER_ID")]
        container_ids: Vec<String>,
    },
}
