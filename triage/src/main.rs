// triage/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { path } => commands::rank::execute(path),

        Commands::Sync {
            path,
            cycle,
            token,
            owner,
        } => commands::sync::execute(path, cycle, token, owner),

        Commands::Generate {
            path,
            cycle,
            token,
            owner,
            post,
            print_summary,
        } => commands::generate::execute(path, cycle, token, owner, post, print_summary),
    }
}

// RUST_LOG=debug triage rank ... to see the details
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
