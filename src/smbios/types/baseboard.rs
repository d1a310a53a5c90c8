//! Baseboard (or Module) Information (type 2), DSP0134 7.3.

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter, FromRepr};

use crate::smbios::{
    layout::{DecodeMode, ElementKind, FieldKind},
    types::describe,
    Header, TableType, TypedRecord,
};

bitflags! {
    /// Baseboard feature flags, DSP0134 7.3.1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BoardFeatures: u8 {
        /// The board is a hosting board, for example a motherboard
        const HOSTING_BOARD = 1 << 0;
        /// The board requires at least one daughter board or auxiliary card
        const REQUIRES_DAUGHTER_BOARD = 1 << 1;
        /// The board is removable
        const REMOVABLE = 1 << 2;
        /// The board is replaceable
        const REPLACEABLE = 1 << 3;
        /// The board is hot swappable
        const HOT_SWAPPABLE = 1 << 4;
    }
}

/// Board type, DSP0134 7.3.2
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum BoardType {
    Unknown = 0x01,
    Other = 0x02,
    #[strum(to_string = "Server Blade")]
    ServerBlade = 0x03,
    #[strum(to_string = "Connectivity Switch")]
    ConnectivitySwitch = 0x04,
    #[strum(to_string = "System Management Module")]
    SystemManagementModule = 0x05,
    #[strum(to_string = "Processor Module")]
    ProcessorModule = 0x06,
    #[strum(to_string = "I/O Module")]
    IoModule = 0x07,
    #[strum(to_string = "Memory Module")]
    MemoryModule = 0x08,
    #[strum(to_string = "Daughter board")]
    DaughterBoard = 0x09,
    /// Motherboard, including processor, memory and I/O
    Motherboard = 0x0A,
    #[strum(to_string = "Processor/Memory Module")]
    ProcessorMemoryModule = 0x0B,
    #[strum(to_string = "Processor/IO Module")]
    ProcessorIoModule = 0x0C,
    #[strum(to_string = "Interconnect board")]
    InterconnectBoard = 0x0D,
}

/// Baseboard Information record
///
/// The contained object handles trail the fixed fields; their count must account for the
/// declared length exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseboardInformation {
    /// Record header
    pub header: Header,
    /// Board manufacturer
    pub manufacturer: String,
    /// Board product name
    pub product: String,
    /// Board version
    pub version: String,
    /// Board serial number
    pub serial_number: String,
    /// Board asset tag
    pub asset_tag: String,
    /// Raw [`BoardFeatures`]
    pub board_features: u8,
    /// Location of the board within the chassis
    pub location_in_chassis: String,
    /// Handle of the chassis the board is in
    pub chassis_handle: u16,
    /// Raw [`BoardType`]
    pub board_type: u8,
    /// Number of entries in `contained_object_handles`
    pub number_of_contained_objects: u8,
    /// Handles of the records contained in this board
    pub contained_object_handles: Vec<u16>,
}

field_layout!(record BaseboardInformation {
    manufacturer => FieldKind::Str,
    product => FieldKind::Str,
    version => FieldKind::Str,
    serial_number => FieldKind::Str,
    asset_tag => FieldKind::Str,
    board_features => FieldKind::Uint(1),
    location_in_chassis => FieldKind::Str,
    chassis_handle => FieldKind::Uint(2),
    board_type => FieldKind::Uint(1),
    number_of_contained_objects => FieldKind::Uint(1),
    contained_object_handles => FieldKind::counted_by("number_of_contained_objects", ElementKind::Uint(2)),
});

impl TypedRecord for BaseboardInformation {
    const TABLE_TYPE: TableType = TableType::BaseboardInformation;
    const MIN_LENGTH: u8 = 0x08;
    const MODE: DecodeMode = DecodeMode::Tolerant;
    const EXACT: bool = true;
}

impl BaseboardInformation {
    /// Typed view of `board_type`
    #[must_use]
    pub fn kind(&self) -> Option<BoardType> {
        BoardType::from_repr(self.board_type)
    }

    /// Typed view of `board_features`
    #[must_use]
    pub fn features(&self) -> BoardFeatures {
        BoardFeatures::from_bits_retain(self.board_features)
    }
}

impl fmt::Display for BaseboardInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tManufacturer: {}", self.manufacturer)?;
        writeln!(f, "\tProduct Name: {}", self.product)?;
        writeln!(f, "\tVersion: {}", self.version)?;
        writeln!(f, "\tSerial Number: {}", self.serial_number)?;
        writeln!(f, "\tAsset Tag: {}", self.asset_tag)?;
        writeln!(f, "\tFeatures: {:?}", self.features())?;
        writeln!(f, "\tLocation In Chassis: {}", self.location_in_chassis)?;
        writeln!(f, "\tChassis Handle: 0x{:04X}", self.chassis_handle)?;
        write!(f, "\tType: {}", describe(self.kind(), self.board_type))?;
        if !self.contained_object_handles.is_empty() {
            write!(
                f,
                "\n\tContained Object Handles: {}",
                self.contained_object_handles.len()
            )?;
            for handle in &self.contained_object_handles {
                write!(f, "\n\t\t0x{handle:04X}")?;
            }
        }
        Ok(())
    }
}
