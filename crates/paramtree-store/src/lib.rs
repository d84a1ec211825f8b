//! paramtree Store - checkpoint directories on disk
//!
//! Provides:
//! - Tree serializer and deserializer for the indented `NAME = value` format
//! - Sidecar files for Data and FileData parameters
//! - The `logopts` log action listing
//! - Save/restore orchestration over a whole checkpoint directory
//! - A schema-less outline reader for inspection tools

pub mod checkpoint;
pub mod errors;
pub mod format;
pub mod logopts;
pub mod outline;
pub mod restore;
pub mod save;

// Re-export key types
pub use checkpoint::{Checkpoint, CheckpointOptions, ConfigFile, NoopConfigFile};
pub use errors::Result;
pub use restore::{restore_from_reader, restore_param, RestoreProblem, RestoreReport};
pub use save::{save_param, COPY_CHUNK};
