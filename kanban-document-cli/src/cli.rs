//! Command-line definition for `kanban-doc`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kanban-doc - inspect and repair kanban board documents.
///
/// Board files are the JSON document itself, or a stored board envelope
/// (`{"id", "name", "data"}`) whose `data` holds the document.
#[derive(Parser, Debug)]
#[command(name = "kanban-doc")]
#[command(version)]
#[command(about = "Inspect and repair kanban board documents")]
pub struct Cli {
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with_all = ["debug", "verbose"])]
    pub quiet: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Log everything, including resolver traversals
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (defaults to ./kanban-document.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report repairs a board file needs; exits 1 if it is not clean
    Check {
        /// Board JSON file
        file: PathBuf,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the repaired document
    Normalize {
        /// Board JSON file
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print a new board built from a column template
    Template {
        /// Template name, e.g. "Standard 3 columns"
        #[arg(required_unless_present = "list")]
        name: Option<String>,
        /// List the known template names
        #[arg(long)]
        list: bool,
    },

    /// Show ancestors, descendants and subtask candidates of a task
    Relatives {
        /// Board JSON file
        file: PathBuf,
        /// Task id
        task_id: String,
    },
}
