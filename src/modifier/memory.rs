//! Physical memory access.

use std::{fs, os::unix::fs::FileExt, path::Path};

use crate::Result;

/// Byte-addressed read/write access to physical memory.
///
/// Offsets are physical addresses. Errors of the underlying device are returned as they are;
/// nothing is retried.
pub trait PhysicalMemory {
    /// Fill `buf` from `address`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the range cannot be read completely.
    fn read_at(&self, address: u64, buf: &mut [u8]) -> Result<()>;

    /// Write all of `data` at `address`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the range cannot be written completely.
    fn write_at(&mut self, address: u64, data: &[u8]) -> Result<()>;

    /// Flush pending writes to the device.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the flush fails.
    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    /// Read `len` bytes at `address` into a new buffer.
    ///
    /// # Errors
    /// See [`PhysicalMemory::read_at`].
    fn read_vec(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_at(address, &mut buf)?;
        Ok(buf)
    }
}

/// Physical memory through a device file such as `/dev/mem`
///
/// The file handle is released when the value is dropped.
#[derive(Debug)]
pub struct DevMem {
    file: fs::File,
}

impl DevMem {
    /// Open `path` for reading and writing.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the device cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::OpenOptions::new().read(true).write(true).open(path)?;
        Ok(DevMem { file })
    }

    /// Wrap an already opened file.
    #[must_use]
    pub fn from_file(file: fs::File) -> Self {
        DevMem { file }
    }
}

impl PhysicalMemory for DevMem {
    fn read_at(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        self.file.read_exact_at(buf, address)?;
        Ok(())
    }

    fn write_at(&mut self, address: u64, data: &[u8]) -> Result<()> {
        self.file.write_all_at(data, address)?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

impl<M: PhysicalMemory + ?Sized> PhysicalMemory for Box<M> {
    fn read_at(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        (**self).read_at(address, buf)
    }

    fn write_at(&mut self, address: u64, data: &[u8]) -> Result<()> {
        (**self).write_at(address, data)
    }

    fn sync(&mut self) -> Result<()> {
        (**self).sync()
    }
}
