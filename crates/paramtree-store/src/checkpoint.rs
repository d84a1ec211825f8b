//! Checkpoint orchestration
//!
//! A checkpoint directory holds:
//! - `config`: the configuration, written by a [`ConfigFile`] collaborator
//! - `logopts`: the log action table
//! - one file per child of the save/restore root, named after the child
//! - `<parent>.<name>` sidecar files for Data and FileData leaves

use crate::errors::{io_error, restore_problems, Result};
use crate::logopts::{restore_logopts, save_logopts};
use crate::restore::{restore_param, RestoreReport};
use crate::save::save_param;
use paramtree_core::{log_op_end, log_op_error, log_op_start};
use paramtree_core::{ExError, ExErrorKind, LogModules, NodeId, ParamTree};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// File holding the configuration
pub const CONFIG_FILE: &str = "config";

/// File holding the log action table
pub const LOGOPTS_FILE: &str = "logopts";

/// Reads and writes the configuration file of a checkpoint
pub trait ConfigFile {
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_config(&self, tree: &ParamTree, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or applied.
    fn read_config(&mut self, tree: &mut ParamTree, path: &Path) -> Result<()>;
}

/// Writes an empty configuration; reading only checks that the file exists
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConfigFile;

impl ConfigFile for NoopConfigFile {
    fn write_config(&self, _tree: &ParamTree, path: &Path) -> Result<()> {
        File::create(path)
            .map(|_| ())
            .map_err(|e| io_error("write_config", path, e))
    }

    fn read_config(&mut self, _tree: &mut ParamTree, path: &Path) -> Result<()> {
        fs::metadata(path)
            .map(|_| ())
            .map_err(|e| io_error("read_config", path, e))
    }
}

/// Options for save/restore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckpointOptions {
    /// Create the checkpoint directory (and parents) before saving
    pub create_dir: bool,
    /// Fail a restore when any line could not be applied
    pub strict: bool,
}

/// Saves and restores whole checkpoint directories
pub struct Checkpoint<'a> {
    config: &'a mut dyn ConfigFile,
    options: CheckpointOptions,
}

impl<'a> Checkpoint<'a> {
    pub fn new(config: &'a mut dyn ConfigFile, options: CheckpointOptions) -> Self {
        Self { config, options }
    }

    pub fn options(&self) -> CheckpointOptions {
        self.options
    }

    /// Write config, logopts and one file per child of `root` into `dir`
    ///
    /// A top-level leaf that cannot be serialized gets no file and is logged.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be written.
    pub fn save_state(
        &self,
        tree: &ParamTree,
        root: NodeId,
        logs: &LogModules,
        dir: &Path,
    ) -> Result<()> {
        log_op_start!("save_state", checkpoint_dir = %dir.display());
        let start = std::time::Instant::now();

        self.save_state_impl(tree, root, logs, dir).map_err(|e| {
            log_op_error!(
                "save_state",
                e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "save_state",
            duration_ms = start.elapsed().as_millis() as u64,
            files = tree.children(root).len() + 2
        );
        Ok(())
    }

    fn save_state_impl(
        &self,
        tree: &ParamTree,
        root: NodeId,
        logs: &LogModules,
        dir: &Path,
    ) -> Result<()> {
        if self.options.create_dir {
            fs::create_dir_all(dir).map_err(|e| io_error("save_state", dir, e))?;
        }
        self.config.write_config(tree, &dir.join(CONFIG_FILE))?;
        save_logopts(&dir.join(LOGOPTS_FILE), logs)?;

        for &child in tree.children(root) {
            let name = tree.node(child).map_err(ExError::from)?.name();
            let path = dir.join(name);
            let mut text = Vec::new();
            match save_param(&mut text, tree, child, Some(dir), 0) {
                Ok(()) => {}
                Err(err) if err.kind() == ExErrorKind::Serialization => {
                    tracing::error!(
                        checkpoint_file = %path.display(),
                        error = %err,
                        "skipping checkpoint file"
                    );
                    continue;
                }
                Err(err) => return Err(err.with_file(&path)),
            }
            let file = File::create(&path).map_err(|e| io_error("save_state", &path, e))?;
            let mut out = BufWriter::new(file);
            out.write_all(&text)
                .and_then(|()| out.flush())
                .map_err(|e| io_error("save_state", &path, e))?;
        }
        Ok(())
    }

    /// Read `<dir>/config` through the collaborator
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's error.
    pub fn restore_config(&mut self, tree: &mut ParamTree, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        tracing::info!(checkpoint_file = %path.display(), "restoring");
        self.config.read_config(tree, &path)
    }

    /// Read `<dir>/logopts` into `logs`
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, or `Format` in strict mode
    /// when a line could not be applied.
    pub fn restore_logopts(&self, logs: &mut LogModules, dir: &Path) -> Result<RestoreReport> {
        let path = dir.join(LOGOPTS_FILE);
        let report = restore_logopts(&path, logs)?;
        self.check_strict(&path, report)
    }

    /// Restore every child of `root` from its file in `dir`
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be read, or in strict mode at the
    /// first file with problems.
    pub fn restore_hardware(
        &self,
        tree: &mut ParamTree,
        root: NodeId,
        dir: &Path,
    ) -> Result<RestoreReport> {
        let names: Vec<String> = tree
            .children(root)
            .iter()
            .filter_map(|&id| tree.get(id).map(|p| p.name().to_string()))
            .collect();

        let mut total = RestoreReport::default();
        for name in names {
            let report = restore_param(tree, root, dir, &name)?;
            total.merge(self.check_strict(&dir.join(&name), report)?);
        }
        Ok(total)
    }

    /// Config, then log options, then hardware state
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub fn restore_state(
        &mut self,
        tree: &mut ParamTree,
        root: NodeId,
        logs: &mut LogModules,
        dir: &Path,
    ) -> Result<RestoreReport> {
        log_op_start!("restore_state", checkpoint_dir = %dir.display());
        let start = std::time::Instant::now();

        let report = self
            .restore_state_impl(tree, root, logs, dir)
            .map_err(|e| {
                log_op_error!(
                    "restore_state",
                    e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "restore_state",
            duration_ms = start.elapsed().as_millis() as u64,
            applied = report.applied,
            problems = report.problems.len()
        );
        Ok(report)
    }

    fn restore_state_impl(
        &mut self,
        tree: &mut ParamTree,
        root: NodeId,
        logs: &mut LogModules,
        dir: &Path,
    ) -> Result<RestoreReport> {
        self.restore_config(tree, dir)?;
        let mut report = self.restore_logopts(logs, dir)?;
        report.merge(self.restore_hardware(tree, root, dir)?);
        Ok(report)
    }

    fn check_strict(&self, path: &Path, report: RestoreReport) -> Result<RestoreReport> {
        if self.options.strict && !report.is_clean() {
            let mut err = restore_problems(path, report.problems.len());
            if let Some(first) = report.problems.first() {
                err = err.with_source(first.error.clone());
            }
            return Err(err);
        }
        Ok(report)
    }
}

impl std::fmt::Debug for Checkpoint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkpoint")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
