//! Tree serializer
//!
//! Writes a subtree in the indented `NAME = value` text format. Lists open
//! with `{` and close with `}` at their own indentation; Data and FileData
//! leaves write a reference line and put their payload in a sidecar file.

use crate::errors::{serialization_error, stream_error, Result};
use crate::format::format_num;
use paramtree_core::{
    DataParam, ExError, FileDataParam, NodeId, NumBase, NumParam, Param, ParamTree, ParamValue,
    StringParam, StringValue,
};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Buffer size for sidecar copies
pub const COPY_CHUNK: usize = 4096;

const INDENT: &str = "  ";

/// Serialize `node` and its descendants to `out`
///
/// `dir` is where sidecar files are created; without it they are created
/// relative to the working directory.
///
/// # Errors
///
/// Returns `Serialization` if `node` is not live or an enum holds a value
/// outside its choices, and `Io` if writing to `out` fails. Inside a list,
/// a child that cannot be serialized is logged and skipped; its siblings
/// and the closing brace are still written. Sidecar files that cannot be
/// written are logged and skipped.
pub fn save_param<W: Write + ?Sized>(
    out: &mut W,
    tree: &ParamTree,
    node: NodeId,
    dir: Option<&Path>,
    level: usize,
) -> Result<()> {
    let param = tree.node(node).map_err(|e| {
        ExError::from(e)
            .with_op("save_param")
            .with_message("dangling parameter id")
    })?;
    let path = tree.path_of(node);
    tracing::trace!(param_path = %path, kind = %param.kind(), "saving parameter");

    let indent = INDENT.repeat(level);
    let w = |e: io::Error| stream_error("save_param", e);

    match param.value() {
        ParamValue::List(list) => {
            writeln!(out, "{}{} = {{", indent, param.name()).map_err(w)?;
            for &child in list.children() {
                if tree.get(child).is_none() {
                    let err = serialization_error(&path, "list holds a dangling child id");
                    tracing::error!(
                        param_path = %path,
                        child = child.index(),
                        error = %err,
                        "skipping child"
                    );
                    continue;
                }
                // A failed child leaves no partial lines behind
                let mut scratch = Vec::new();
                match save_param(&mut scratch, tree, child, dir, level + 1) {
                    Ok(()) => out.write_all(&scratch).map_err(w)?,
                    Err(err) => {
                        tracing::error!(
                            param_path = %tree.path_of(child),
                            error = %err,
                            "skipping parameter that could not be saved"
                        );
                    }
                }
            }
            writeln!(out, "{}}}", indent).map_err(w)?;
        }
        ParamValue::Data(data) => {
            let reference = sidecar_name(tree, param);
            writeln!(out, "{}{} = {}", indent, param.name(), reference).map_err(w)?;
            let target = sidecar_path(dir, &reference);
            if let Err(err) = write_data_sidecar(&target, data) {
                warn_sidecar(&path, &target, &err);
            }
        }
        ParamValue::FileData(file_data) => {
            let reference = sidecar_name(tree, param);
            writeln!(out, "{}{} = {}", indent, param.name(), reference).map_err(w)?;
            let target = sidecar_path(dir, &reference);
            if let Err(err) = write_file_data_sidecar(&target, file_data) {
                warn_sidecar(&path, &target, &err);
            }
        }
        value => {
            let text = encode_leaf(value, &path)?;
            writeln!(out, "{}{} = {}", indent, param.name(), text).map_err(w)?;
        }
    }
    Ok(())
}

/// `<parent>.<name>`, or the bare name for a node without a parent
pub fn sidecar_name(tree: &ParamTree, param: &Param) -> String {
    match param.parent().and_then(|p| tree.get(p)) {
        Some(parent) => format!("{}.{}", parent.name(), param.name()),
        None => param.name().to_string(),
    }
}

fn sidecar_path(dir: Option<&Path>, reference: &str) -> PathBuf {
    match dir {
        Some(dir) => dir.join(reference),
        None => PathBuf::from(reference),
    }
}

fn encode_leaf(value: &ParamValue, path: &str) -> Result<String> {
    match value {
        ParamValue::Num(num) => Ok(encode_num(num, path)),
        ParamValue::Bool(b) => Ok(if b.get() { "true" } else { "false" }.to_string()),
        ParamValue::Enum(e) => e.selected().map(str::to_string).ok_or_else(|| {
            serialization_error(path, &format!("enum value {} has no choice", e.get()))
        }),
        ParamValue::String(s) => Ok(encode_string(s)),
        ParamValue::List(_) | ParamValue::Data(_) | ParamValue::FileData(_) => Err(
            serialization_error(path, "not a leaf value"),
        ),
    }
}

/// Decimal or hex text for a Num, at 32- or 64-bit width depending on `max`
fn encode_num(num: &NumParam, path: &str) -> String {
    let value = num.get();
    let wide = (num.max() as u64) > u64::from(u32::MAX);
    match num.base() {
        NumBase::Dec => match (num.min() >= 0, wide) {
            (true, true) => (value as u64).to_string(),
            (true, false) => (value as u32).to_string(),
            (false, true) => value.to_string(),
            (false, false) => (value as i32).to_string(),
        },
        NumBase::Hex => {
            if let Some(format) = num.format() {
                match format_num(format, value) {
                    Ok(text) => return text,
                    Err(err) => {
                        tracing::warn!(
                            param_path = path,
                            format,
                            error = %err,
                            "ignoring custom number format"
                        );
                    }
                }
            }
            if wide {
                format!("0x{:x}", value as u64)
            } else {
                format!("0x{:x}", value as u32)
            }
        }
    }
}

fn encode_string(s: &StringParam) -> String {
    match s.value() {
        StringValue::Text(text) => text.clone(),
        StringValue::Raw { bytes, separator } => match separator {
            None => hex::encode(bytes),
            Some(sep) => bytes
                .iter()
                .map(|b| hex::encode([*b]))
                .collect::<Vec<_>>()
                .join(&sep.to_string()),
        },
    }
}

fn write_data_sidecar(target: &Path, data: &DataParam) -> io::Result<()> {
    let mut file = File::create(target)?;
    file.write_all(data.as_slice())?;
    file.flush()
}

fn write_file_data_sidecar(target: &Path, file_data: &FileDataParam) -> io::Result<()> {
    let mut sidecar = File::create(target)?;
    // No backing store yet: leave an empty placeholder
    if let Some(mut backing) = file_data.backing() {
        copy_chunked(&mut backing, &mut sidecar)?;
        backing.flush()?;
    }
    if let Some(hooks) = file_data.hooks() {
        hooks.save(&mut sidecar)?;
    }
    sidecar.flush()
}

/// Copy `from` to EOF into `to` through a `COPY_CHUNK` buffer
pub(crate) fn copy_chunked<R: Read + ?Sized, W: Write + ?Sized>(
    from: &mut R,
    to: &mut W,
) -> io::Result<u64> {
    let mut buf = [0u8; COPY_CHUNK];
    let mut total = 0u64;
    loop {
        let n = match from.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        to.write_all(&buf[..n])?;
        total += n as u64;
    }
}

fn warn_sidecar(path: &str, target: &Path, err: &io::Error) {
    tracing::warn!(
        param_path = path,
        checkpoint_file = %target.display(),
        error = %err,
        "could not write sidecar file"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramtree_core::{EnumParam, ROOT_NAME};

    fn save_to_string(tree: &ParamTree, node: NodeId) -> String {
        let mut out = Vec::new();
        save_param(&mut out, tree, node, None, 0).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn single(num: NumParam) -> String {
        let mut tree = ParamTree::new();
        let root = tree.create_root(ROOT_NAME, None, 1).unwrap();
        let id = tree.add_num(root, "n", num).unwrap();
        save_to_string(&tree, id)
    }

    #[test]
    fn test_decimal_width_threshold() {
        let mut narrow = NumParam::new(0, i64::from(u32::MAX), 0);
        narrow.set(0x1_0000_0005);
        assert_eq!(single(narrow), "n = 5\n");

        let mut wide = NumParam::new(0, i64::from(u32::MAX) + 1, 0);
        wide.set(0x1_0000_0005);
        assert_eq!(single(wide), "n = 4294967301\n");

        assert_eq!(single(NumParam::u64(u64::MAX)), "n = 18446744073709551615\n");
    }

    #[test]
    fn test_signed_decimal() {
        assert_eq!(single(NumParam::new(-10, 10, -7)), "n = -7\n");
        assert_eq!(
            single(NumParam::new(i64::MIN, i64::MAX, i64::MIN)),
            "n = -9223372036854775808\n"
        );
    }

    #[test]
    fn test_hex_width_threshold_and_format() {
        let narrow = NumParam::u32(0xdead_beef).with_base(NumBase::Hex);
        assert_eq!(single(narrow), "n = 0xdeadbeef\n");

        let wide = NumParam::u64(0x1_dead_beef).with_base(NumBase::Hex);
        assert_eq!(single(wide), "n = 0x1deadbeef\n");

        let custom = NumParam::u32(0x1f0)
            .with_base(NumBase::Hex)
            .with_format("0x%04x");
        assert_eq!(single(custom), "n = 0x01f0\n");

        let broken = NumParam::u32(0x1f0)
            .with_base(NumBase::Hex)
            .with_format("%s");
        assert_eq!(single(broken), "n = 0x1f0\n");
    }

    #[test]
    fn test_raw_string_with_separator() {
        let mut tree = ParamTree::new();
        let root = tree.create_root(ROOT_NAME, None, 2).unwrap();
        let mac = tree.add_raw_string(root, "mac", 3, Some(':')).unwrap();
        tree.node_mut(mac)
            .unwrap()
            .as_string_mut()
            .unwrap()
            .set_raw_bytes(&[0x00, 0xff, 0x10])
            .unwrap();
        let plain = tree.add_raw_string(root, "id", 2, None).unwrap();

        assert_eq!(save_to_string(&tree, mac), "mac = 00:ff:10\n");
        assert_eq!(save_to_string(&tree, plain), "id = 0000\n");
    }

    #[test]
    fn test_nested_list_indentation() {
        let mut tree = ParamTree::new();
        let root = tree.create_root(ROOT_NAME, None, 1).unwrap();
        let ata = tree.add_list(root, "ata", 2).unwrap();
        tree.add_bool(ata, "present", true).unwrap();
        let master = tree.add_list(ata, "master", 1).unwrap();
        tree.add_enum(master, "type", ["disk", "cdrom"], 1).unwrap();

        assert_eq!(
            save_to_string(&tree, ata),
            "ata = {\n  present = true\n  master = {\n    type = cdrom\n  }\n}\n"
        );
    }

    #[test]
    fn test_enum_out_of_range_is_error() {
        let mut tree = ParamTree::new();
        let root = tree.create_root(ROOT_NAME, None, 1).unwrap();
        let id = tree
            .add(root, "bad", EnumParam::with_min(["a"], 0, 5))
            .unwrap();
        let mut out = Vec::new();
        let err = save_param(&mut out, &tree, id, None, 0).unwrap_err();
        assert_eq!(err.code(), "ERR_SERIALIZATION");
        assert!(out.is_empty());
    }

    #[test]
    fn test_bad_child_is_skipped_and_list_still_closes() {
        // Given a list holding an unprintable enum between two good leaves
        let mut tree = ParamTree::new();
        let root = tree.create_root(ROOT_NAME, None, 1).unwrap();
        let dev = tree.add_list(root, "dev", 3).unwrap();
        tree.add_bool(dev, "first", true).unwrap();
        tree.add(dev, "bad", EnumParam::with_min(["x"], 0, 5))
            .unwrap();
        let nested = tree.add_list(dev, "nested", 1).unwrap();
        tree.add(nested, "worse", EnumParam::with_min(["y"], 0, 9))
            .unwrap();

        // When the list is saved
        let text = save_to_string(&tree, dev);

        // Then only the bad leaves are missing
        assert_eq!(text, "dev = {\n  first = true\n  nested = {\n  }\n}\n");
    }

    #[test]
    fn test_copy_chunked_spans_several_chunks() {
        let data: Vec<u8> = (0..COPY_CHUNK * 2 + 17).map(|i| i as u8).collect();
        let mut out = Vec::new();
        let copied = copy_chunked(&mut data.as_slice(), &mut out).unwrap();
        assert_eq!(copied as usize, data.len());
        assert_eq!(out, data);
    }
}
