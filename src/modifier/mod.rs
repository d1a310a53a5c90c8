//! Live-memory modifier.
//!
//! [`Modifier`] patches the SMBIOS tables the firmware left in physical memory. A patch
//! session runs strictly in sequence:
//!
//! 1. locate the entry point ([`discover`], done once when the modifier is created)
//! 2. read and decode the entry point
//! 3. read the table stream at the address and size the entry point declares
//! 4. decode all tables
//! 5. apply each [`OverrideOpt`] in order, stopping at the first failure
//! 6. re-encode the tables into one contiguous buffer
//! 7. record the new table length (and for 32-bit entry points the structure count and the
//!    largest structure) in the entry point
//! 8. re-encode the entry point with fresh checksums
//! 9. write the entry point, then the tables, back to their original addresses
//!
//! Nothing is written unless every step before the write succeeds. The read-modify-write
//! cycle is not atomic and the modifier holds no lock: callers must make sure only one
//! session patches a machine at a time.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dmiscope::modifier::{replace_system_information, Modifier, SystemInformationOverride};
//!
//! let mut modifier = Modifier::new()?;
//! modifier.modify([replace_system_information(SystemInformationOverride {
//!     manufacturer: Some("Example Corp".into()),
//!     ..Default::default()
//! })])?;
//! modifier.close()?;
//! # Ok::<(), dmiscope::Error>(())
//! ```

mod discovery;
mod memory;
mod overrides;

pub use discovery::{discover, parse_systab, scan_legacy, EntryPointLocation};
pub use memory::{DevMem, PhysicalMemory};
pub use overrides::{
    remove_baseboard_information, replace_baseboard_information,
    replace_motherboard_information, replace_system_information, BaseboardOverride,
    OverrideOpt, SystemInformationOverride,
};

use crate::{
    config::ModifierConfig,
    smbios::{decode_tables, encode_tables, EntryPoint, Info, Table, TableType},
    Error, Result,
};

/// Patches the SMBIOS tables in physical memory
pub struct Modifier<M: PhysicalMemory = DevMem> {
    memory: M,
    location: EntryPointLocation,
    info: Info,
}

impl Modifier<DevMem> {
    /// Open `/dev/mem` and locate the tables with the default configuration.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the device cannot be opened, [`Error::Discovery`] if
    /// no entry point is found, or any decode error of the live tables.
    pub fn new() -> Result<Self> {
        Self::with_config(&ModifierConfig::default())
    }

    /// Open the device and locate the tables as `config` describes.
    ///
    /// # Errors
    /// See [`Modifier::new`].
    pub fn with_config(config: &ModifierConfig) -> Result<Self> {
        let memory = DevMem::open(&config.memory_device)?;
        let location = discover(config, &memory)?;
        Self::with_memory(memory, location)
    }
}

impl<M: PhysicalMemory> Modifier<M> {
    /// Patch `memory`, whose entry point is at `location`.
    ///
    /// # Errors
    /// Returns the read error of `memory` or any decode error of the tables it holds.
    pub fn with_memory(memory: M, location: EntryPointLocation) -> Result<Self> {
        let info = load(&memory, location)?;
        Ok(Modifier {
            memory,
            location,
            info,
        })
    }

    /// The tables as last read or written
    #[must_use]
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Where the entry point lives
    #[must_use]
    pub fn location(&self) -> EntryPointLocation {
        self.location
    }

    /// The memory being patched
    #[must_use]
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Apply `opts` to the live tables and write the result back.
    ///
    /// The tables are read again first, so changes made by others since the modifier was
    /// created are kept.
    ///
    /// # Errors
    /// - any read or decode error of the live data
    /// - [`Error::Transform`] if an override fails or the End-of-Table record does not end
    ///   the result
    /// - any encode error of the result
    /// - [`Error::FileError`] if writing fails
    pub fn modify<I>(&mut self, opts: I) -> Result<()>
    where
        I: IntoIterator<Item = OverrideOpt>,
    {
        let (mut entry_point, mut tables) = load(&self.memory, self.location)?.into_parts();
        let original_size = entry_point.table_max_size();

        for opt in opts {
            tables = opt(tables)?;
        }
        if tables.last().map(Table::table_type) != Some(TableType::EndOfTable.code()) {
            return Err(Error::Transform(
                "End-of-Table is not the last record".to_string(),
            ));
        }

        let table_bytes = encode_tables(&tables)?;
        let largest = tables.iter().map(Table::encoded_len).max();
        entry_point.set_table_length(table_bytes.len(), tables.len(), largest)?;
        let entry_bytes = entry_point.encode();

        if table_bytes.len() > original_size {
            log::warn!(
                "table stream grows from {} to {} bytes",
                original_size,
                table_bytes.len()
            );
        }

        self.memory.write_at(self.location.address, &entry_bytes)?;
        self.memory
            .write_at(entry_point.table_address(), &table_bytes)?;
        self.memory.sync()?;
        log::info!(
            "wrote {} tables, {} bytes at {:#x}",
            tables.len(),
            table_bytes.len(),
            entry_point.table_address()
        );

        self.info = Info::from_parts(entry_point, tables);
        Ok(())
    }

    /// Flush and release the memory device.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the final flush fails.
    pub fn close(mut self) -> Result<()> {
        self.memory.sync()
    }
}

fn load<M: PhysicalMemory + ?Sized>(memory: &M, location: EntryPointLocation) -> Result<Info> {
    let entry = memory.read_vec(location.address, location.size)?;
    let entry_point = EntryPoint::decode(&entry)?;
    log::debug!("{} at {:#x}", entry_point, location.address);

    let tables = memory.read_vec(entry_point.table_address(), entry_point.table_max_size())?;
    let tables = decode_tables(&tables)?;
    Ok(Info::from_parts(entry_point, tables))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::test::{entry32_bytes, entry64_bytes, mock_tables_bytes};

    fn memory_file(data: &[u8]) -> (tempfile::NamedTempFile, DevMem) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        let memory = DevMem::open(file.path()).unwrap();
        (file, memory)
    }

    fn mock64() -> Vec<u8> {
        let tables = mock_tables_bytes();
        let mut data = entry64_bytes(tables.len() as u32, 24);
        data.extend(tables);
        data
    }

    #[test]
    fn load_64() {
        let (_file, memory) = memory_file(&mock64());
        let location = EntryPointLocation {
            address: 0,
            size: 24,
        };
        let modifier = Modifier::with_memory(memory, location).unwrap();

        assert_eq!(modifier.info().tables().len(), 3);
        assert_eq!(modifier.location(), location);
        assert!(modifier.info().entry_point().is_64bit());
    }

    #[test]
    fn load_32() {
        let tables = mock_tables_bytes();
        let mut data = entry32_bytes(100, tables.len() as u16, 31, 3);
        data.extend(&tables);
        let (_file, memory) = memory_file(&data);

        let modifier = Modifier::with_memory(
            memory,
            EntryPointLocation {
                address: 0,
                size: 31,
            },
        )
        .unwrap();
        assert!(!modifier.info().entry_point().is_64bit());
        assert_eq!(modifier.info().encode_tables().unwrap(), tables);
    }

    #[test]
    fn modify_without_overrides_is_stable() {
        let data = mock64();
        let (file, memory) = memory_file(&data);
        let mut modifier = Modifier::with_memory(
            memory,
            EntryPointLocation {
                address: 0,
                size: 24,
            },
        )
        .unwrap();

        modifier.modify(Vec::<OverrideOpt>::new()).unwrap();
        modifier.close().unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), data);
    }

    #[test]
    fn dropping_end_of_table_aborts() {
        let data = mock64();
        let (file, memory) = memory_file(&data);
        let mut modifier = Modifier::with_memory(
            memory,
            EntryPointLocation {
                address: 0,
                size: 24,
            },
        )
        .unwrap();

        let drop_last: OverrideOpt = Box::new(|mut tables: Vec<Table>| {
            tables.pop();
            Ok(tables)
        });
        assert!(matches!(
            modifier.modify([drop_last]),
            Err(Error::Transform(_))
        ));
        assert_eq!(std::fs::read(file.path()).unwrap(), data);
    }

    #[test]
    fn bad_entry_point() {
        let (_file, memory) = memory_file(&[0u8; 64]);
        assert!(Modifier::with_memory(
            memory,
            EntryPointLocation {
                address: 0,
                size: 24
            }
        )
        .is_err());
    }
}
