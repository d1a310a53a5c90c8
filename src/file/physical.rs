//! Memory-mapped file backend for SMBIOS dumps stored on disk.
//!
//! [`crate::file::Physical`] maps a dump file (for example one written by
//! `dmidecode --dump-bin`) into the address space with `memmap2`, so decoding reads the
//! file without copying it first.

use memmap2::Mmap;
use std::{fs, path::Path};

use super::Backend;
use crate::Result;

/// Dump data backed by a memory-mapped file
///
/// # Examples
///
/// ```rust,no_run
/// use dmiscope::file::{Backend, Physical};
///
/// let dump = Physical::new("dmi.bin")?;
/// let anchor = dump.data_slice(0, 4)?;
/// println!("{} bytes, anchor {:?}", dump.len(), anchor);
/// # Ok::<(), dmiscope::Error>(())
/// ```
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Open and map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;
        Self::from_std_file(&file)
    }

    /// Map an already opened file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if mapping fails.
    pub fn from_std_file(file: &fs::File) -> Result<Physical> {
        // The mapping stays valid after the handle is dropped.
        let mmap = unsafe { Mmap::map(file) }?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };

        if offset_end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn physical() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_SM3_\x00\x18").unwrap();
        file.flush().unwrap();

        let physical = Physical::new(file.path()).unwrap();
        assert_eq!(physical.len(), 7);
        assert_eq!(physical.data_slice(0, 5).unwrap(), b"_SM3_");
        assert_eq!(physical.data()[6], 0x18);
    }

    #[test]
    fn physical_invalid_file_path() {
        let result = Physical::new("/nonexistent/path/to/dump.bin");
        assert!(matches!(result, Err(crate::Error::FileError(_))));
    }

    #[test]
    fn physical_boundary_conditions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xAA; 16]).unwrap();
        file.flush().unwrap();

        let physical = Physical::new(file.path()).unwrap();
        assert!(matches!(
            physical.data_slice(usize::MAX, 1),
            Err(crate::Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            physical.data_slice(16, 1),
            Err(crate::Error::OutOfBounds { .. })
        ));
        assert!(physical.data_slice(15, 2).is_err());
        assert_eq!(physical.data_slice(15, 1).unwrap(), &[0xAA]);
    }
}
