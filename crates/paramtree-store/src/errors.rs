//! Error handling for paramtree-store
//!
//! Wraps paramtree-core ExError with checkpoint-specific helpers

use paramtree_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a checkpoint file
pub fn io_error(operation: &str, file: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_file(file)
        .with_message(err.to_string())
}

/// Create an IO error for the caller's input or output stream
pub fn stream_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a checkpoint format error
pub fn format_error(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Format)
        .with_op(operation.to_string())
        .with_message(reason)
}

/// Create an error for a node that cannot be serialized
pub fn serialization_error(path: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("save_param")
        .with_path(path.to_string())
        .with_message(reason.to_string())
}

/// Create an error for a restore target missing from the tree
pub fn restore_target_missing(name: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("restore_param")
        .with_path(name.to_string())
        .with_message(format!("restore target {} is not a child of the root", name))
}

/// Create an error for a strict restore that hit problems
pub fn restore_problems(file: &Path, count: usize) -> ExError {
    ExError::new(ExErrorKind::Format)
        .with_op("restore_hardware")
        .with_file(file)
        .with_message(format!("{} line(s) could not be applied", count))
}
