//! Tree deserializer
//!
//! Reads the indented `NAME = value` format back into an existing tree. The
//! tree's shape is never changed: every name is resolved against the list
//! currently being filled, and lines that do not resolve are recorded as
//! problems while parsing continues.

use crate::errors::{format_error, io_error, restore_target_missing, Result};
use crate::save::copy_chunked;
use paramtree_core::{ExError, NodeId, Param, ParamError, ParamKind, ParamTree, ParamValue};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

const OP: &str = "restore_param";

/// A line that could not be applied
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreProblem {
    /// 1-based line number in the checkpoint file
    pub line: usize,
    /// Name token from the line (may be empty)
    pub name: String,
    pub error: ExError,
}

/// Outcome of restoring one checkpoint file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Leaf values written into the tree
    pub applied: usize,
    pub problems: Vec<RestoreProblem>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: RestoreReport) {
        self.applied += other.applied;
        self.problems.extend(other.problems);
    }

    fn problem(&mut self, line: usize, name: &str, error: ExError) {
        tracing::warn!(
            line,
            param_path = name,
            error = %error,
            "could not restore checkpoint line"
        );
        self.problems.push(RestoreProblem {
            line,
            name: name.to_string(),
            error,
        });
    }
}

/// Restore the file `<dir>/<name>` into the child `name` of `root`
///
/// # Errors
///
/// Returns `NotFound` if `name` is not a child of `root` and `Io` if the
/// file cannot be opened or read. Individual bad lines are reported in the
/// returned [`RestoreReport`] instead.
pub fn restore_param(
    tree: &mut ParamTree,
    root: NodeId,
    dir: &Path,
    name: &str,
) -> Result<RestoreReport> {
    if tree.child_by_name(root, name).is_none() {
        return Err(restore_target_missing(name));
    }
    let file_path = dir.join(name);
    tracing::info!(checkpoint_file = %file_path.display(), "restoring");
    let file = File::open(&file_path).map_err(|e| io_error(OP, &file_path, e))?;
    restore_from_reader(tree, root, dir, BufReader::new(file))
        .map_err(|e| io_error(OP, &file_path, e))
}

/// Apply checkpoint text read from `reader`, resolving names from `base`
///
/// Sidecar references are opened relative to `dir`.
///
/// # Errors
///
/// Returns the underlying error if reading from `reader` fails.
pub fn restore_from_reader<R: BufRead>(
    tree: &mut ParamTree,
    base: NodeId,
    dir: &Path,
    mut reader: R,
) -> io::Result<RestoreReport> {
    let mut report = RestoreReport::default();
    let mut current = base;
    let mut open_lists: Vec<NodeId> = Vec::new();
    // Depth inside a list whose name did not resolve
    let mut skipping = 0usize;
    let mut raw = Vec::new();
    let mut line_no = 0usize;

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        line_no += 1;
        let text = String::from_utf8_lossy(&raw);
        let line = strip_line_ending(&text);
        let body = line.trim_start();
        if body.is_empty() {
            continue;
        }

        let (name, rest) = body.split_once(' ').unwrap_or((body, ""));
        if name.trim_end() == "}" {
            if skipping > 0 {
                skipping -= 1;
            } else if let Some(parent) = open_lists.pop() {
                current = parent;
            } else {
                report.problem(line_no, name, format_error(OP, "unbalanced closing brace"));
            }
            continue;
        }

        let value = match rest.strip_prefix("= ") {
            Some(value) => value,
            None if rest == "=" => "",
            None => {
                report.problem(line_no, name, format_error(OP, "expected NAME = VALUE"));
                continue;
            }
        };
        let opens_list = value.trim() == "{";

        if skipping > 0 {
            if opens_list {
                skipping += 1;
            }
            continue;
        }

        let id = match tree.resolve(name, Some(current)) {
            Ok(id) => id,
            Err(err) => {
                report.problem(line_no, name, ExError::from(err).with_op(OP));
                if opens_list {
                    skipping = 1;
                }
                continue;
            }
        };

        let Some(kind) = tree.get(id).map(Param::kind) else {
            continue;
        };
        if kind == ParamKind::List {
            if opens_list {
                open_lists.push(current);
                current = id;
            } else {
                report.problem(line_no, name, format_error(OP, "list value must be {"));
            }
            continue;
        }

        tracing::debug!(param_path = %tree.path_of(id), "restoring parameter");
        match apply_value(tree, id, value, dir) {
            Ok(()) => report.applied += 1,
            Err(err) => report.problem(line_no, name, err),
        }
    }

    if !open_lists.is_empty() {
        report.problem(line_no, "", format_error(OP, "file ends inside a list"));
    }
    Ok(report)
}

fn apply_value(tree: &mut ParamTree, id: NodeId, value: &str, dir: &Path) -> Result<()> {
    let path = tree.path_of(id);
    let token = value.trim();
    let param = tree.node_mut(id).map_err(ExError::from)?;

    match param.value_mut() {
        ParamValue::Num(num) => {
            let parsed = parse_num(token)
                .ok_or_else(|| invalid(&path, format!("{:?} is not a number", token)))?;
            num.set(narrow_num(parsed, num.min(), num.max()));
        }
        ParamValue::Bool(b) => b.set(token == "true"),
        ParamValue::Enum(e) => {
            e.set_by_name(token).map_err(|source| {
                ExError::from(ParamError::InvalidValue {
                    path: path.clone(),
                    source,
                })
                .with_op(OP)
            })?;
        }
        ParamValue::String(s) => {
            if s.is_raw() {
                let bytes = parse_raw(token, s.max_len(), s.separator()).ok_or_else(|| {
                    invalid(&path, format!("{:?} is not {} hex bytes", token, s.max_len()))
                })?;
                s.set_raw_bytes(&bytes)
                    .map_err(|e| invalid(&path, e.to_string()))?;
            } else {
                s.set_text(value);
            }
        }
        ParamValue::Data(data) => {
            let sidecar = dir.join(token);
            let mut buf = vec![0u8; data.len()];
            File::open(&sidecar)
                .and_then(|mut f| f.read_exact(&mut buf))
                .map_err(|e| io_error(OP, &sidecar, e).with_path(path.clone()))?;
            data.as_mut_slice().copy_from_slice(&buf);
        }
        ParamValue::FileData(file_data) => {
            let sidecar_path = dir.join(token);
            let io_err = |e: io::Error| io_error(OP, &sidecar_path, e).with_path(path.clone());
            let mut sidecar = File::open(&sidecar_path).map_err(io_err)?;
            {
                let backing = file_data.open_or_create_backing().map_err(io_err)?;
                copy_chunked(&mut sidecar, backing).map_err(io_err)?;
                backing.flush().map_err(io_err)?;
            }
            if let Some(hooks) = file_data.hooks_mut() {
                hooks.restore(&mut sidecar).map_err(io_err)?;
            }
        }
        ParamValue::List(_) => {
            return Err(invalid(&path, "list cannot take a value".to_string()));
        }
    }
    Ok(())
}

fn invalid(path: &str, reason: String) -> ExError {
    format_error(OP, reason).with_path(path.to_string())
}

/// `0x` prefix parses as hex, a leading `-` as signed decimal, anything else
/// as unsigned decimal; the result is the 64-bit pattern
fn parse_num(token: &str) -> Option<i64> {
    if let Some(hex) = token.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok().map(|v| v as i64)
    } else if token.starts_with('-') {
        token.parse::<i64>().ok()
    } else {
        token.parse::<u64>().ok().map(|v| v as i64)
    }
}

/// Remove one trailing `\n` and then one `\r`, keeping any other control
/// characters that belong to the value
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Narrow a parsed 64-bit pattern to the width the serializer used
///
/// Nodes whose `max` fits in 32 bits are printed as `u32`/`i32`, so the
/// value is re-extended from its low 32 bits.
fn narrow_num(parsed: i64, min: i64, max: i64) -> i64 {
    if (max as u64) > u64::from(u32::MAX) {
        parsed
    } else if min < 0 {
        i64::from(parsed as i32)
    } else {
        i64::from(parsed as u32)
    }
}

/// Exactly `len` hex pairs, joined by `separator` when one is set
fn parse_raw(token: &str, len: usize, separator: Option<char>) -> Option<Vec<u8>> {
    let bytes = match separator {
        _ if len == 0 => {
            return token.is_empty().then(Vec::new);
        }
        None => hex::decode(token).ok()?,
        Some(sep) => token
            .split(sep)
            .map(|pair| match hex::decode(pair) {
                Ok(b) if b.len() == 1 => Some(b[0]),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()?,
    };
    (bytes.len() == len).then_some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_num_bases() {
        assert_eq!(parse_num("0x1f0"), Some(0x1f0));
        assert_eq!(parse_num("-12"), Some(-12));
        assert_eq!(parse_num("18446744073709551615"), Some(-1));
        assert_eq!(parse_num("12abc"), None);
        assert_eq!(parse_num(""), None);
    }

    #[test]
    fn test_narrow_num_follows_print_width() {
        assert_eq!(narrow_num(0xffff_ffff, -128, 127), -1);
        assert_eq!(narrow_num(0xffff_ff80, -128, 127), -128);
        assert_eq!(narrow_num(0x1_0000_0005, 0, i64::from(u32::MAX)), 5);
        assert_eq!(narrow_num(-1, 0, -1), -1);
        assert_eq!(narrow_num(-5, -10, i64::MAX), -5);
    }

    #[test]
    fn test_strip_line_ending_keeps_value_controls() {
        assert_eq!(strip_line_ending("a\t\n"), "a\t");
        assert_eq!(strip_line_ending("a\r\n"), "a");
        assert_eq!(strip_line_ending("a\t\r"), "a\t");
        assert_eq!(strip_line_ending("a\r\r\n"), "a\r");
        assert_eq!(strip_line_ending("a"), "a");
    }

    #[test]
    fn test_parse_raw_strict() {
        assert_eq!(parse_raw("00:ff:10", 3, Some(':')), Some(vec![0x00, 0xff, 0x10]));
        assert_eq!(parse_raw("00ff10", 3, None), Some(vec![0x00, 0xff, 0x10]));
        assert_eq!(parse_raw("00ff10", 3, Some(':')), None);
        assert_eq!(parse_raw("00:ff", 3, Some(':')), None);
        assert_eq!(parse_raw("00:fg:10", 3, Some(':')), None);
        assert_eq!(parse_raw("", 0, Some(':')), Some(vec![]));
    }

    #[test]
    fn test_report_merge() {
        let mut a = RestoreReport {
            applied: 2,
            problems: vec![],
        };
        let b = RestoreReport {
            applied: 1,
            problems: vec![RestoreProblem {
                line: 4,
                name: "x".to_string(),
                error: format_error(OP, "bad"),
            }],
        };
        a.merge(b);
        assert_eq!(a.applied, 3);
        assert!(!a.is_clean());
    }
}
