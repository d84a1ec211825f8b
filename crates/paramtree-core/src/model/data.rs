//! Binary blob parameters: in-memory Data and file-backed FileData

use super::ValueError;
use std::fs::File;
use std::io::{self, Seek, SeekFrom};

/// Fixed-size in-memory blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataParam {
    bytes: Vec<u8>,
}

impl DataParam {
    /// Zero-filled blob of `len` bytes
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Overwrite the whole blob; `data` must match the declared size
    pub fn copy_from(&mut self, data: &[u8]) -> Result<(), ValueError> {
        if data.len() != self.bytes.len() {
            return Err(ValueError::LengthMismatch {
                expected: self.bytes.len(),
                actual: data.len(),
            });
        }
        self.bytes.copy_from_slice(data);
        Ok(())
    }
}

/// Kind-specific bookkeeping run after a FileData sidecar is written or read
///
/// Both hooks receive the open sidecar handle positioned after the payload.
pub trait FileDataHooks {
    fn save(&self, _sidecar: &mut File) -> io::Result<()> {
        Ok(())
    }

    fn restore(&mut self, _sidecar: &mut File) -> io::Result<()> {
        Ok(())
    }
}

/// Blob backed by an owned file stream instead of memory
///
/// The backing file is created lazily and, once present, is never replaced.
#[derive(Default)]
pub struct FileDataParam {
    backing: Option<File>,
    hooks: Option<Box<dyn FileDataHooks>>,
}

impl FileDataParam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hooks(mut self, hooks: Box<dyn FileDataHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn has_backing(&self) -> bool {
        self.backing.is_some()
    }

    pub fn backing(&self) -> Option<&File> {
        self.backing.as_ref()
    }

    pub fn backing_mut(&mut self) -> Option<&mut File> {
        self.backing.as_mut()
    }

    /// Return the backing file, creating an anonymous temp file if absent
    pub fn open_or_create_backing(&mut self) -> io::Result<&mut File> {
        let file = match self.backing.take() {
            Some(file) => file,
            None => tempfile::tempfile()?,
        };
        Ok(self.backing.insert(file))
    }

    /// Install an existing file as the backing store; fails if one exists
    pub fn attach_backing(&mut self, file: File) -> Result<(), ValueError> {
        if self.backing.is_some() {
            return Err(ValueError::BackingExists);
        }
        self.backing = Some(file);
        Ok(())
    }

    /// Seek the backing store to its start; no-op when absent
    pub fn rewind(&mut self) -> io::Result<()> {
        if let Some(file) = self.backing.as_mut() {
            file.seek(SeekFrom::Start(0))?;
        }
        Ok(())
    }

    pub fn hooks(&self) -> Option<&dyn FileDataHooks> {
        self.hooks.as_deref()
    }

    pub fn hooks_mut(&mut self) -> Option<&mut (dyn FileDataHooks + 'static)> {
        self.hooks.as_deref_mut()
    }
}

impl std::fmt::Debug for FileDataParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDataParam")
            .field("backing", &self.backing)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}
