//! Inspect command
//!
//! Usage: paramtree inspect <DIR> [--json]

use clap::Args;
use paramtree_store::outline::{inspect_dir, FileKind, FileOutline};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Checkpoint directory
    pub dir: PathBuf,

    /// Print the outline as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute inspect command
pub fn execute(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let files = inspect_dir(&args.dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        for file in &files {
            print_file(file);
        }
    }
    Ok(())
}

fn print_file(file: &FileOutline) {
    let kind = match file.kind {
        FileKind::Config => "config",
        FileKind::Logopts => "logopts",
        FileKind::State => "state",
        FileKind::Sidecar => "sidecar",
    };
    println!("{} ({}, {} bytes)", file.name, kind, file.size);
    for entry in &file.entries {
        println!("  {} = {}", entry.path, entry.value);
    }
}
