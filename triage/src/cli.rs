// triage/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "The Data Quality Triage & Feedback Loop Tool", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🧮 Assigns severity ranks to the findings in a report directory
    Rank {
        /// Directory holding the report CSV files
        path: PathBuf,
    },

    /// 🔄 Syncs Cause and Status labels from the tracker into the local files
    Sync {
        /// Directory holding the report CSV files
        path: PathBuf,

        /// The data cycle this report belongs to (ex: "April 2026")
        #[arg(long, env = "TRIAGE_CYCLE")]
        cycle: String,

        /// Token used to authenticate with the tracker
        #[arg(long, env = "TRIAGE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Tracker organization (overrides triage.yaml and TRIAGE_OWNER)
        #[arg(long)]
        owner: Option<String>,
    },

    /// 📣 Generates and posts one tracker issue per finding, plus a summary
    Generate {
        /// Directory holding the report CSV files
        path: PathBuf,

        /// The data cycle this report belongs to (ex: "April 2026")
        #[arg(long, env = "TRIAGE_CYCLE")]
        cycle: String,

        /// Token used to authenticate with the tracker
        #[arg(long, env = "TRIAGE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Tracker organization (overrides triage.yaml and TRIAGE_OWNER)
        #[arg(long)]
        owner: Option<String>,

        /// Post the issues to the tracker (default is an offline dry run)
        #[arg(long, default_value = "false")]
        post: bool,

        /// Print the summary to stdout rather than posting it
        #[arg(long, default_value = "false")]
        print_summary: bool,
    },
}
