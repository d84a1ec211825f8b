//! The `logopts` checkpoint file
//!
//! One line per log module: `NAME: DEBUG=ignore, INFO=report, ERROR=report, PANIC=fatal`.

use crate::errors::{format_error, io_error, stream_error, Result};
use crate::restore::RestoreReport;
use paramtree_core::log_modules::padded_prefix;
use paramtree_core::{ExError, ExErrorKind, LogAction, LogLevel, LogModules};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const OP_WRITE: &str = "save_logopts";
const OP_READ: &str = "restore_logopts";

/// Write one line per module with a non-empty name
///
/// # Errors
///
/// Returns `Io` if writing fails.
pub fn write_logopts<W: Write + ?Sized>(out: &mut W, logs: &LogModules) -> Result<()> {
    for module in logs {
        let name = module.short_name();
        if name.is_empty() {
            continue;
        }
        let actions: Vec<String> = LogLevel::ALL
            .iter()
            .map(|&level| format!("{}={}", level.name(), module.action(level).name()))
            .collect();
        writeln!(out, "{}: {}", name, actions.join(", ")).map_err(|e| stream_error(OP_WRITE, e))?;
    }
    Ok(())
}

/// Apply a logopts listing to `logs`
///
/// Lines naming an unknown module, and pairs naming an unknown level or
/// action, are skipped and reported.
///
/// # Errors
///
/// Returns `Io` if reading fails.
pub fn read_logopts<R: BufRead>(input: R, logs: &mut LogModules) -> Result<RestoreReport> {
    let mut report = RestoreReport::default();
    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(|e| stream_error(OP_READ, e))?;
        let line_no = index + 1;
        let line = line.trim_end_matches(|c: char| c < ' ');
        if line.trim().is_empty() {
            continue;
        }

        let (name, pairs) = line.split_once(':').unwrap_or((line, ""));
        let name = name.trim();
        let Some(module) = logs.find_by_prefix(&padded_prefix(name)) else {
            let err = ExError::new(ExErrorKind::NotFound)
                .with_op(OP_READ)
                .with_message(format!("log module '{}' not found", name));
            record(&mut report, line_no, name, err);
            continue;
        };

        for pair in pairs.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            match parse_pair(pair) {
                Some((level, action)) => {
                    logs.set_action(Some(module), level, action);
                    report.applied += 1;
                }
                None => {
                    let err = format_error(OP_READ, format!("bad log action {:?}", pair));
                    record(&mut report, line_no, name, err);
                }
            }
        }
    }
    Ok(report)
}

fn parse_pair(pair: &str) -> Option<(LogLevel, LogAction)> {
    let (level, action) = pair.split_once('=')?;
    Some((
        LogLevel::from_name(level.trim())?,
        LogAction::from_name(action.trim())?,
    ))
}

fn record(report: &mut RestoreReport, line: usize, name: &str, error: ExError) {
    tracing::warn!(line, module = name, error = %error, "could not restore log options");
    report.problems.push(crate::restore::RestoreProblem {
        line,
        name: name.to_string(),
        error,
    });
}

/// Write `logs` to `path`
///
/// # Errors
///
/// Returns `Io` if the file cannot be created or written.
pub fn save_logopts(path: &Path, logs: &LogModules) -> Result<()> {
    let file = File::create(path).map_err(|e| io_error(OP_WRITE, path, e))?;
    let mut out = BufWriter::new(file);
    write_logopts(&mut out, logs).map_err(|e| e.with_file(path))?;
    out.flush().map_err(|e| io_error(OP_WRITE, path, e))
}

/// Read `path` into `logs`
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened or read.
pub fn restore_logopts(path: &Path, logs: &mut LogModules) -> Result<RestoreReport> {
    tracing::info!(checkpoint_file = %path.display(), "restoring");
    let file = File::open(path).map_err(|e| io_error(OP_READ, path, e))?;
    read_logopts(BufReader::new(file), logs).map_err(|e| e.with_file(path))
}
