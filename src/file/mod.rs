//! Byte access layer.
//!
//! Everything above this module works on plain byte slices. This module supplies them:
//!
//! - [`crate::file::io`] - bounds-checked little-endian integer access
//! - [`crate::file::parser::Parser`] - a cursor used by the entry point codec and table walker
//! - [`crate::file::Backend`] with [`crate::file::Memory`] and [`crate::file::Physical`]
//!   implementations, the two ways a table dump reaches the decoder
//! - [`crate::file::SysfsPaths`] - the Linux sysfs snapshot of the live tables

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::{Path, PathBuf};

pub use memory::Memory;
pub use physical::Physical;

use crate::Result;

/// Size of the entry point area at the start of a combined dump.
pub const DUMP_ENTRY_POINT_SIZE: usize = 0x20;

/// Backend trait for raw table data.
///
/// Implementations provide bounds-checked access to a dump regardless of whether it lives
/// in a file on disk or in a buffer. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the backend holds no data.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits a combined dump into its entry point and table stream.
///
/// The first 32 bytes hold the entry point (padded when the structure is shorter); the
/// table stream follows immediately.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the dump is shorter than the entry point area.
pub fn split_dump(backend: &dyn Backend) -> Result<(&[u8], &[u8])> {
    let entry = backend.data_slice(0, DUMP_ENTRY_POINT_SIZE)?;
    let tables = backend.data_slice(DUMP_ENTRY_POINT_SIZE, backend.len() - DUMP_ENTRY_POINT_SIZE)?;
    Ok((entry, tables))
}

/// Location of the kernel's snapshot of the firmware tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsPaths {
    /// Directory holding `smbios_entry_point` and `DMI`
    pub directory: PathBuf,
}

impl Default for SysfsPaths {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/sys/firmware/dmi/tables"),
        }
    }
}

impl SysfsPaths {
    /// Snapshot rooted at `directory` instead of the default sysfs location.
    #[must_use]
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Path of the entry point file
    #[must_use]
    pub fn entry_point(&self) -> PathBuf {
        self.directory.join("smbios_entry_point")
    }

    /// Path of the table stream file
    #[must_use]
    pub fn tables(&self) -> PathBuf {
        self.directory.join("DMI")
    }

    /// Read both files.
    ///
    /// Sysfs binary attributes cannot be mapped, so these are read into owned buffers.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if either file cannot be read.
    pub fn read(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let entry = std::fs::read(self.entry_point())?;
        let tables = std::fs::read(self.tables())?;
        log::debug!(
            "read {} entry point bytes and {} table bytes from {}",
            entry.len(),
            tables.len(),
            self.directory.display()
        );
        Ok((entry, tables))
    }
}
