//! paramtree CLI
//!
//! Command-line tools for inspecting checkpoint directories

use clap::{Parser, Subcommand};
use paramtree_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "paramtree")]
#[command(about = "paramtree - Inspect parameter tree checkpoints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the files of a checkpoint directory with their entries
    Inspect(commands::inspect::InspectArgs),
    /// Print the log action table of a checkpoint directory
    Logopts(commands::logopts::LogoptsArgs),
}

fn main() {
    init(Profile::Development);
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Logopts(args) => commands::logopts::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
