//! Physical Memory Array (type 16), DSP0134 7.17.

use std::fmt;

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::format_size,
    Header, TableType, TypedRecord,
};

/// `error_information_handle` value for an array without error information
const NO_ERROR_INFORMATION: u16 = 0xFFFE;

/// `maximum_capacity` value deferring to `extended_maximum_capacity`
const CAPACITY_EXTENDED: u32 = 0x8000_0000;

/// Physical Memory Array record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhysicalMemoryArray {
    /// Record header
    pub header: Header,
    /// Physical location, e.g. system board
    pub location: u8,
    /// Function of the array, e.g. system memory
    pub memory_use: u8,
    /// Error correction scheme
    pub error_correction: u8,
    /// Maximum capacity in KiB; 0x8000_0000 defers to `extended_maximum_capacity`
    pub maximum_capacity: u32,
    /// Handle of the error information record, 0xFFFE when none
    pub error_information_handle: u16,
    /// Number of memory device slots
    pub number_of_memory_devices: u16,
    /// Maximum capacity in bytes (SMBIOS 2.7+)
    pub extended_maximum_capacity: u64,
}

field_layout!(record PhysicalMemoryArray {
    location => FieldKind::Uint(1),
    memory_use => FieldKind::Uint(1),
    error_correction => FieldKind::Uint(1),
    maximum_capacity => FieldKind::Uint(4),
    error_information_handle => FieldKind::Uint(2),
    number_of_memory_devices => FieldKind::Uint(2),
    extended_maximum_capacity => FieldKind::Uint(8),
});

impl TypedRecord for PhysicalMemoryArray {
    const TABLE_TYPE: TableType = TableType::PhysicalMemoryArray;
    const MIN_LENGTH: u8 = 0x0F;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl PhysicalMemoryArray {
    /// Maximum capacity in bytes
    #[must_use]
    pub fn capacity_bytes(&self) -> u64 {
        if self.maximum_capacity == CAPACITY_EXTENDED && self.header.length >= 0x17 {
            self.extended_maximum_capacity
        } else {
            u64::from(self.maximum_capacity) * 1024
        }
    }
}

impl fmt::Display for PhysicalMemoryArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tLocation: 0x{:02X}", self.location)?;
        writeln!(f, "\tUse: 0x{:02X}", self.memory_use)?;
        writeln!(f, "\tError Correction Type: 0x{:02X}", self.error_correction)?;
        writeln!(f, "\tMaximum Capacity: {}", format_size(self.capacity_bytes()))?;
        if self.error_information_handle == NO_ERROR_INFORMATION {
            writeln!(f, "\tError Information Handle: Not Provided")?;
        } else {
            writeln!(
                f,
                "\tError Information Handle: 0x{:04X}",
                self.error_information_handle
            )?;
        }
        write!(f, "\tNumber Of Devices: {}", self.number_of_memory_devices)
    }
}
