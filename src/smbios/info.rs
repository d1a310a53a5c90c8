//! Decoded view of a complete SMBIOS table set.
//!
//! [`Info`] pairs the entry point with every record of its table stream. It is built from
//! caller-owned buffers ([`Info::decode`]), from a combined dump file ([`Info::from_dump_file`])
//! or from the kernel's sysfs snapshot ([`Info::from_sysfs`]).
//!
//! Records reference each other by handle only. [`Info::by_handle`] resolves a handle
//! within this instance; nothing else links records together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dmiscope::Info;
//!
//! let info = Info::from_sysfs_default()?;
//! println!("{}", info.entry_point());
//!
//! let bios = info.bios_information()?;
//! println!("BIOS vendor: {}", bios.vendor);
//!
//! for device in info.memory_devices()? {
//!     println!("{}: {} bytes", device.device_locator, device.size_bytes());
//! }
//! # Ok::<(), dmiscope::Error>(())
//! ```

use std::path::Path;

use crate::{
    file::{split_dump, Backend, Memory, Physical, SysfsPaths},
    smbios::{
        decode_tables, encode_tables, project, types::*, EntryPoint, Table, TableType,
        TypedRecord, TypedTable,
    },
    Error, Result,
};

/// Entry point and records of one SMBIOS table set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    entry_point: EntryPoint,
    tables: Vec<Table>,
}

impl Info {
    /// Decode an entry point and its table stream.
    ///
    /// # Errors
    /// Returns the entry point or table stream format error.
    pub fn decode(entry: &[u8], tables: &[u8]) -> Result<Self> {
        let entry_point = EntryPoint::decode(entry)?;
        log::debug!("decoded {}", entry_point);

        let tables = decode_tables(tables)?;
        log::debug!("decoded {} tables", tables.len());

        Ok(Info {
            entry_point,
            tables,
        })
    }

    /// Build from already decoded parts.
    #[must_use]
    pub fn from_parts(entry_point: EntryPoint, tables: Vec<Table>) -> Self {
        Info {
            entry_point,
            tables,
        }
    }

    /// Decode a combined dump: the entry point area followed by the table stream.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] for dumps shorter than the entry point area, or any
    /// decode error.
    pub fn from_dump(data: &[u8]) -> Result<Self> {
        let backend = Memory::new(data.to_vec());
        Self::from_backend(&backend)
    }

    /// Decode a combined dump file, mapped read-only.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file cannot be opened or mapped, or any decode error.
    pub fn from_dump_file(path: impl AsRef<Path>) -> Result<Self> {
        let backend = Physical::new(path)?;
        Self::from_backend(&backend)
    }

    fn from_backend(backend: &dyn Backend) -> Result<Self> {
        let (entry, tables) = split_dump(backend)?;
        Self::decode(entry, tables)
    }

    /// Decode the kernel's snapshot of the firmware tables.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if either sysfs file cannot be read, or any decode error.
    pub fn from_sysfs(paths: &SysfsPaths) -> Result<Self> {
        let (entry, tables) = paths.read()?;
        Self::decode(&entry, &tables)
    }

    /// Decode the snapshot at the default sysfs location.
    ///
    /// # Errors
    /// See [`Info::from_sysfs`].
    pub fn from_sysfs_default() -> Result<Self> {
        Self::from_sysfs(&SysfsPaths::default())
    }

    /// The decoded entry point
    #[must_use]
    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    /// Mutable access to the entry point
    pub fn entry_point_mut(&mut self) -> &mut EntryPoint {
        &mut self.entry_point
    }

    /// All records, in stream order
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Mutable access to the record list
    pub fn tables_mut(&mut self) -> &mut Vec<Table> {
        &mut self.tables
    }

    /// Consume the view, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (EntryPoint, Vec<Table>) {
        (self.entry_point, self.tables)
    }

    /// Every record with type code `code`, in stream order.
    pub fn by_type(&self, code: u8) -> impl Iterator<Item = &Table> + '_ {
        self.tables
            .iter()
            .filter(move |table| table.table_type() == code)
    }

    /// The record with handle `handle`.
    #[must_use]
    pub fn by_handle(&self, handle: u16) -> Option<&Table> {
        self.tables.iter().find(|table| table.handle() == handle)
    }

    /// Every record projected through the registry, unsupported codes included as errors.
    pub fn typed(&self) -> impl Iterator<Item = (&Table, Result<TypedTable>)> + '_ {
        self.tables.iter().map(|table| (table, project(table)))
    }

    /// Project every record of type `T`.
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn records<T: TypedRecord>(&self) -> Result<Vec<T>> {
        self.by_type(T::TABLE_TYPE.code()).map(T::decode).collect()
    }

    /// Project the only record of type `T`.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if there is no such record
    /// - [`Error::NotUnique`] if there are several
    /// - any projection error
    pub fn single<T: TypedRecord>(&self) -> Result<T> {
        let code = T::TABLE_TYPE.code();
        let mut matches = self.by_type(code);
        let first = matches.next().ok_or(Error::NotFound(code))?;
        let rest = matches.count();
        if rest > 0 {
            return Err(Error::NotUnique {
                table_type: code,
                count: rest + 1,
            });
        }
        T::decode(first)
    }

    /// The BIOS Information record, which must be unique.
    ///
    /// # Errors
    /// See [`Info::single`].
    pub fn bios_information(&self) -> Result<BiosInformation> {
        self.single()
    }

    /// The System Information record, which must be unique.
    ///
    /// # Errors
    /// See [`Info::single`].
    pub fn system_information(&self) -> Result<SystemInformation> {
        self.single()
    }

    /// Baseboard Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn baseboard_information(&self) -> Result<Vec<BaseboardInformation>> {
        self.records()
    }

    /// Chassis Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn chassis_information(&self) -> Result<Vec<ChassisInformation>> {
        self.records()
    }

    /// Processor Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn processor_information(&self) -> Result<Vec<ProcessorInformation>> {
        self.records()
    }

    /// Cache Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn cache_information(&self) -> Result<Vec<CacheInformation>> {
        self.records()
    }

    /// Port Connector Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn port_connectors(&self) -> Result<Vec<PortConnectorInformation>> {
        self.records()
    }

    /// System Slots records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn system_slots(&self) -> Result<Vec<SystemSlots>> {
        self.records()
    }

    /// Group Associations records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn group_associations(&self) -> Result<Vec<GroupAssociation>> {
        self.records()
    }

    /// Physical Memory Array records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn physical_memory_arrays(&self) -> Result<Vec<PhysicalMemoryArray>> {
        self.records()
    }

    /// Memory Device records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn memory_devices(&self) -> Result<Vec<MemoryDevice>> {
        self.records()
    }

    /// System Boot Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn system_boot_information(&self) -> Result<Vec<SystemBootInformation>> {
        self.records()
    }

    /// IPMI Device Information records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn ipmi_devices(&self) -> Result<Vec<IpmiDeviceInformation>> {
        self.records()
    }

    /// TPM Device records
    ///
    /// # Errors
    /// Returns the first projection error.
    pub fn tpm_devices(&self) -> Result<Vec<TpmDevice>> {
        self.records()
    }

    /// `true` if the stream ends with an End-of-Table record.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.tables
            .last()
            .is_some_and(|table| table.table_type() == TableType::EndOfTable.code())
    }

    /// Serialize all records back to back.
    ///
    /// # Errors
    /// Returns the first error a record reports while encoding.
    pub fn encode_tables(&self) -> Result<Vec<u8>> {
        encode_tables(&self.tables)
    }
}
