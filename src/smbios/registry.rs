//! Type-code dispatch from generic tables to typed records.
//!
//! [`project`] looks the table's type code up in [`REGISTRY`] and runs the matching decoder.
//! Codes without a decoder yield [`Error::UnsupportedType`], which callers treat as a cue to
//! fall back to the generic [`Table`] view.
//!
//! # Examples
//!
//! ```rust
//! use dmiscope::smbios::{project, Table, TypedTable};
//!
//! let end = Table::new(127, 0x7F00, vec![], vec![])?;
//! assert!(matches!(project(&end)?, TypedTable::EndOfTable(_)));
//!
//! let oem = Table::new(0xC0, 0x10, vec![1, 2], vec![])?;
//! assert!(project(&oem).unwrap_err().is_lookup_miss());
//! # Ok::<(), dmiscope::Error>(())
//! ```

use std::fmt;

use crate::{
    smbios::{types::*, Header, Table, TableType, TypedRecord},
    Error, Result,
};

/// Decoder entry of the registry
pub type DecodeFn = fn(&Table) -> Result<TypedTable>;

macro_rules! typed_tables {
    ($($variant:ident($record:ty)),* $(,)?) => {
        /// A table projected into its typed record
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[allow(missing_docs)]
        pub enum TypedTable {
            $($variant($record),)*
        }

        /// Every registered type code with its decoder, in type-code order
        pub static REGISTRY: &[(TableType, DecodeFn)] = &[
            $((<$record as TypedRecord>::TABLE_TYPE, |table: &Table| {
                <$record as TypedRecord>::decode(table).map(TypedTable::$variant)
            }),)*
        ];

        impl TypedTable {
            /// Header of the underlying record
            #[must_use]
            pub fn header(&self) -> &Header {
                match self {
                    $(TypedTable::$variant(record) => &record.header,)*
                }
            }

            /// Type of the underlying record
            #[must_use]
            pub fn table_type(&self) -> TableType {
                match self {
                    $(TypedTable::$variant(_) => <$record as TypedRecord>::TABLE_TYPE,)*
                }
            }

            /// Encode the record back into a generic table.
            ///
            /// # Errors
            /// Returns the error of the record's encoder.
            pub fn encode(&self) -> Result<Table> {
                match self {
                    $(TypedTable::$variant(record) => record.encode(),)*
                }
            }
        }
    };
}

typed_tables! {
    BiosInformation(BiosInformation),
    SystemInformation(SystemInformation),
    BaseboardInformation(BaseboardInformation),
    ChassisInformation(ChassisInformation),
    ProcessorInformation(ProcessorInformation),
    CacheInformation(CacheInformation),
    PortConnectorInformation(PortConnectorInformation),
    SystemSlots(SystemSlots),
    GroupAssociation(GroupAssociation),
    PhysicalMemoryArray(PhysicalMemoryArray),
    MemoryDevice(MemoryDevice),
    SystemBootInformation(SystemBootInformation),
    IpmiDeviceInformation(IpmiDeviceInformation),
    TpmDevice(TpmDevice),
    EndOfTable(EndOfTable),
}

/// Decoder registered for `code`, if any.
#[must_use]
pub fn decoder(code: u8) -> Option<DecodeFn> {
    REGISTRY
        .iter()
        .find(|(kind, _)| kind.code() == code)
        .map(|(_, decode)| *decode)
}

/// Project a generic table into its typed record.
///
/// # Errors
/// - [`Error::UnsupportedType`] if no decoder is registered for the type code
/// - any format error of the type's decoder
pub fn project(table: &Table) -> Result<TypedTable> {
    let decode = decoder(table.table_type()).ok_or(Error::UnsupportedType(table.table_type()))?;
    decode(table)
}

impl fmt::Display for TypedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedTable::BiosInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::SystemInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::BaseboardInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::ChassisInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::ProcessorInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::CacheInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::MemoryDevice(record) => fmt::Display::fmt(record, f),
            TypedTable::PortConnectorInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::SystemSlots(record) => fmt::Display::fmt(record, f),
            TypedTable::GroupAssociation(record) => fmt::Display::fmt(record, f),
            TypedTable::PhysicalMemoryArray(record) => fmt::Display::fmt(record, f),
            TypedTable::SystemBootInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::IpmiDeviceInformation(record) => fmt::Display::fmt(record, f),
            TypedTable::TpmDevice(record) => fmt::Display::fmt(record, f),
            TypedTable::EndOfTable(record) => write!(f, "{}", record.header),
        }
    }
}
