//! paramtree Core - hierarchical configuration parameter tree
//!
//! This crate provides the in-memory side of the emulator's settings and
//! device state, including:
//! - Seven parameter kinds (list, num, bool, enum, string, data, filedata)
//! - An arena-backed tree with stable node ids and parent back-links
//! - Dotted-path resolution with typed accessors
//! - The per-module log action table saved alongside checkpoints
//! - Runtime config and user option registries
//!
//! Serialization to checkpoint directories lives in `paramtree-store`.

pub mod errors;
pub mod log_modules;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod tree;

pub use paramtree_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ParamError, Result};
pub use log_modules::{LogAction, LogLevel, LogModule, LogModules};
pub use model::{
    BoolParam, DataParam, EnumParam, FileDataHooks, FileDataParam, ListParam, NodeId, NumBase,
    NumParam, NumericParam, Param, ParamKind, ParamValue, StringParam, StringValue, ValueError,
};
pub use registry::{RuntimeConfigRegistry, UserOption, UserOptionRegistry};
pub use tree::{ParamTree, ROOT_NAME, SAVE_RESTORE_CAPACITY};
