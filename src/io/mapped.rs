//! Memory-mapped raw pixel file.

use memmap2::{Mmap, MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StackError;

use super::mode::AccessMode;

/// The live mapping behind a [`MappedRaw`].
enum Mapping {
    ReadOnly(Mmap),
    Writable(MmapMut),
    /// Zero-length shapes map nothing
    Empty,
}

/// A raw pixel file mapped into memory.
///
/// Only the first `len` bytes of the file are mapped, where `len` is the
/// length implied by the stack shape. Trailing bytes are left unmapped.
pub struct MappedRaw {
    _file: File,
    mapping: Mapping,
    mode: AccessMode,
    path: PathBuf,
    on_disk_len: u64,
}

impl MappedRaw {
    /// Open `path` in `mode` and map `len` bytes from offset 0.
    ///
    /// Modes that cannot grow the file fail with
    /// [`StackError::InsufficientData`] when it is shorter than `len`.
    /// [`AccessMode::ReadWrite`] zero-extends a short file and
    /// [`AccessMode::Create`] truncates and re-sizes it.
    pub fn open(path: &Path, mode: AccessMode, len: u64) -> Result<Self, StackError> {
        let file = match mode {
            AccessMode::ReadOnly | AccessMode::CopyOnWrite => File::open(path)?,
            AccessMode::ReadWrite => OpenOptions::new().read(true).write(true).open(path)?,
            AccessMode::Create => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
        };

        let on_disk_len = file.metadata()?.len();

        if on_disk_len < len {
            if !mode.can_grow() {
                return Err(StackError::InsufficientData {
                    path: path.to_path_buf(),
                    expected: len,
                    actual: on_disk_len,
                });
            }
            info!(
                path = %path.display(),
                from = on_disk_len,
                to = len,
                "extending raw file"
            );
            file.set_len(len)?;
        }

        let map_len = usize::try_from(len).map_err(|_| StackError::InsufficientData {
            path: path.to_path_buf(),
            expected: len,
            actual: on_disk_len,
        })?;

        let mapping = if map_len == 0 {
            Mapping::Empty
        } else {
            let mut options = MmapOptions::new();
            options.len(map_len);
            // SAFETY: the File is kept alive in `_file` for as long as the
            // mapping exists, and at least `map_len` bytes are on disk (checked
            // or extended above). External modification of the file while it is
            // mapped is the caller's responsibility.
            unsafe {
                match mode {
                    AccessMode::ReadOnly => Mapping::ReadOnly(options.map(&file)?),
                    AccessMode::CopyOnWrite => Mapping::Writable(options.map_copy(&file)?),
                    AccessMode::ReadWrite | AccessMode::Create => {
                        Mapping::Writable(options.map_mut(&file)?)
                    }
                }
            }
        };

        debug!(path = %path.display(), mode = %mode, bytes = map_len, "mapped raw file");

        Ok(Self {
            _file: file,
            mapping,
            mode,
            path: path.to_path_buf(),
            on_disk_len,
        })
    }

    /// Mapped bytes.
    pub fn as_slice(&self) -> &[u8] {
        match &self.mapping {
            Mapping::ReadOnly(m) => &m[..],
            Mapping::Writable(m) => &m[..],
            Mapping::Empty => &[],
        }
    }

    /// Mutable mapped bytes, or `None` for read-only mappings.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match &mut self.mapping {
            Mapping::Writable(m) => Some(&mut m[..]),
            Mapping::Empty if self.mode.is_writable() => Some(&mut []),
            _ => None,
        }
    }

    /// Number of mapped bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File length observed when it was opened, before any growth.
    pub fn on_disk_len(&self) -> u64 {
        self.on_disk_len
    }

    /// Write modified pages back to disk.
    ///
    /// A no-op for read-only and copy-on-write mappings.
    pub fn flush(&self) -> Result<(), StackError> {
        match (&self.mapping, self.mode) {
            (Mapping::Writable(m), AccessMode::ReadWrite | AccessMode::Create) => {
                m.flush()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for MappedRaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRaw")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("len", &self.len())
            .field("on_disk_len", &self.on_disk_len)
            .finish()
    }
}
