//! Logopts command
//!
//! Usage: paramtree logopts <DIR>

use clap::Args;
use paramtree_core::{LogLevel, LogModule, LogModules};
use paramtree_store::checkpoint::LOGOPTS_FILE;
use paramtree_store::logopts::read_logopts;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LogoptsArgs {
    /// Checkpoint directory
    pub dir: PathBuf,
}

/// Execute logopts command
pub fn execute(args: LogoptsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.dir.join(LOGOPTS_FILE);
    let text = fs::read_to_string(&path)?;

    // No device table here: one module per name found in the file
    let mut logs = LogModules::new();
    for line in text.lines() {
        if let Some((name, _)) = line.split_once(':') {
            let name = name.trim();
            if !name.is_empty() {
                logs.add(LogModule::new(name));
            }
        }
    }

    let report = read_logopts(text.as_bytes(), &mut logs).map_err(|e| e.with_file(&path))?;

    let header: Vec<&str> = LogLevel::ALL.iter().map(|level| level.name()).collect();
    println!("{:<8}{}", "MODULE", format_row(&header));
    for module in &logs {
        let actions: Vec<&str> = module.actions().iter().map(|a| a.name()).collect();
        println!("{:<8}{}", module.short_name(), format_row(&actions));
    }
    for problem in &report.problems {
        eprintln!("line {}: {}", problem.line, problem.error);
    }
    Ok(())
}

fn format_row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| format!("{:<8}", cell))
        .collect::<String>()
        .trim_end()
        .to_string()
}
