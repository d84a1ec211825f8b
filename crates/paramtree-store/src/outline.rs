//! Schema-less view of a checkpoint directory
//!
//! Parses the checkpoint grammar without a target tree, so a directory can
//! be inspected by tools that do not know the device layout.

use crate::checkpoint::{CONFIG_FILE, LOGOPTS_FILE};
use crate::errors::{format_error, io_error, stream_error, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One `NAME = value` line with its full dotted path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub line: usize,
    pub path: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Config,
    Logopts,
    State,
    Sidecar,
}

/// A file in a checkpoint directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutline {
    pub name: String,
    pub kind: FileKind,
    pub size: u64,
    /// Leaf entries, for state files only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<OutlineEntry>,
}

/// Parse checkpoint text into its leaf entries
///
/// # Errors
///
/// Returns `Format` for a malformed line or unbalanced braces, and `Io` if
/// reading fails.
pub fn read_outline<R: BufRead>(reader: R) -> Result<Vec<OutlineEntry>> {
    let mut entries = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| stream_error("read_outline", e))?;
        let line_no = index + 1;
        let body = line.trim_end_matches(|c: char| c < ' ').trim_start();
        if body.is_empty() {
            continue;
        }
        if body == "}" {
            stack.pop().ok_or_else(|| {
                format_error("read_outline", format!("line {}: unbalanced }}", line_no))
            })?;
            continue;
        }

        let (name, value) = match body.split_once(" = ") {
            Some(pair) => pair,
            None => match body.strip_suffix(" =") {
                Some(name) => (name, ""),
                None => {
                    return Err(format_error(
                        "read_outline",
                        format!("line {}: expected NAME = VALUE", line_no),
                    ))
                }
            },
        };

        if value.trim() == "{" {
            stack.push(name.to_string());
            continue;
        }
        let path = stack
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(".");
        entries.push(OutlineEntry {
            line: line_no,
            path,
            value: value.to_string(),
        });
    }

    if !stack.is_empty() {
        return Err(format_error(
            "read_outline",
            format!("{} list(s) left open", stack.len()),
        ));
    }
    Ok(entries)
}

/// Describe every file in a checkpoint directory, sorted by name
///
/// # Errors
///
/// Returns `Io` if the directory or a state file cannot be read, and
/// `Format` if a state file is malformed.
pub fn inspect_dir(dir: &Path) -> Result<Vec<FileOutline>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| io_error("inspect_dir", dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let size = fs::metadata(&path)
            .map_err(|e| io_error("inspect_dir", &path, e))?
            .len();
        let kind = classify(&name);
        let entries = if kind == FileKind::State {
            let file = File::open(&path).map_err(|e| io_error("inspect_dir", &path, e))?;
            read_outline(BufReader::new(file)).map_err(|e| e.with_file(&path))?
        } else {
            Vec::new()
        };
        files.push(FileOutline {
            name,
            kind,
            size,
            entries,
        });
    }
    Ok(files)
}

fn classify(name: &str) -> FileKind {
    match name {
        CONFIG_FILE => FileKind::Config,
        LOGOPTS_FILE => FileKind::Logopts,
        _ if name.contains('.') => FileKind::Sidecar,
        _ => FileKind::State,
    }
}
