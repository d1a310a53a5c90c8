//! System Slots (type 9), DSP0134 7.10.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use crate::smbios::{
    layout::{DecodeMode, ElementKind, FieldKind},
    types::describe,
    Header, TableType, TypedRecord,
};

/// Slot type, DSP0134 7.10.1
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum SlotType {
    Other = 0x01,
    Unknown = 0x02,
    #[strum(to_string = "ISA")]
    Isa = 0x03,
    #[strum(to_string = "MCA")]
    Mca = 0x04,
    #[strum(to_string = "EISA")]
    Eisa = 0x05,
    #[strum(to_string = "PCI")]
    Pci = 0x06,
    #[strum(to_string = "PC Card (PCMCIA)")]
    PcCard = 0x07,
    #[strum(to_string = "VL-VESA")]
    VlVesa = 0x08,
    Proprietary = 0x09,
    #[strum(to_string = "Processor Card Slot")]
    ProcessorCard = 0x0A,
    #[strum(to_string = "Proprietary Memory Card Slot")]
    ProprietaryMemoryCard = 0x0B,
    #[strum(to_string = "I/O Riser Card Slot")]
    IoRiserCard = 0x0C,
    #[strum(to_string = "NuBus")]
    NuBus = 0x0D,
    #[strum(to_string = "PCI - 66MHz Capable")]
    Pci66 = 0x0E,
    #[strum(to_string = "AGP")]
    Agp = 0x0F,
    #[strum(to_string = "AGP 2X")]
    Agp2x = 0x10,
    #[strum(to_string = "AGP 4X")]
    Agp4x = 0x11,
    #[strum(to_string = "PCI-X")]
    PciX = 0x12,
    #[strum(to_string = "AGP 8X")]
    Agp8x = 0x13,
    #[strum(to_string = "M.2 Socket 1-DP (Mechanical Key A)")]
    M2Socket1Dp = 0x14,
    #[strum(to_string = "M.2 Socket 1-SD (Mechanical Key E)")]
    M2Socket1Sd = 0x15,
    #[strum(to_string = "M.2 Socket 2 (Mechanical Key B)")]
    M2Socket2 = 0x16,
    #[strum(to_string = "M.2 Socket 3 (Mechanical Key M)")]
    M2Socket3 = 0x17,
    #[strum(to_string = "MXM Type I")]
    MxmTypeI = 0x18,
    #[strum(to_string = "MXM Type II")]
    MxmTypeII = 0x19,
    #[strum(to_string = "OCP NIC 3.0 Small Form Factor (SFF)")]
    OcpNic3Sff = 0x21,
    #[strum(to_string = "OCP NIC 3.0 Large Form Factor (LFF)")]
    OcpNic3Lff = 0x22,
    #[strum(to_string = "PCI Express")]
    PciExpress = 0xA5,
    #[strum(to_string = "PCI Express x1")]
    PciExpressX1 = 0xA6,
    #[strum(to_string = "PCI Express x2")]
    PciExpressX2 = 0xA7,
    #[strum(to_string = "PCI Express x4")]
    PciExpressX4 = 0xA8,
    #[strum(to_string = "PCI Express x8")]
    PciExpressX8 = 0xA9,
    #[strum(to_string = "PCI Express x16")]
    PciExpressX16 = 0xAA,
    #[strum(to_string = "PCI Express Gen 2")]
    PciExpressGen2 = 0xAB,
    #[strum(to_string = "PCI Express Gen 3")]
    PciExpressGen3 = 0xB1,
    #[strum(to_string = "PCI Express Mini 52-pin with bottom-side keep-outs")]
    PciExpressMini52Bottom = 0xB8,
    #[strum(to_string = "PCI Express Gen 4")]
    PciExpressGen4 = 0xBD,
    #[strum(to_string = "PCI Express Gen 5")]
    PciExpressGen5 = 0xC3,
}

/// One peer device of a slot, DSP0134 7.10.9
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotPeerGroup {
    /// PCI segment group number
    pub segment_group: u16,
    /// PCI bus number
    pub bus_number: u8,
    /// Device number in bits 7:3, function in bits 2:0
    pub device_function_number: u8,
    /// Electrical bus width of the peer
    pub data_bus_width: u8,
}

field_layout!(element SlotPeerGroup {
    segment_group => FieldKind::Uint(2),
    bus_number => FieldKind::Uint(1),
    device_function_number => FieldKind::Uint(1),
    data_bus_width => FieldKind::Uint(1),
});

/// System Slots record
///
/// Slot addressing arrived in SMBIOS 2.6, peer groups in 3.2 and the physical slot
/// description in 3.4.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSlots {
    /// Record header
    pub header: Header,
    /// Slot designation, e.g. "PCIE1"
    pub slot_designation: String,
    /// Raw [`SlotType`]
    pub slot_type: u8,
    /// Slot data bus width
    pub slot_data_bus_width: u8,
    /// Current usage (available, in use, ...)
    pub current_usage: u8,
    /// Slot length
    pub slot_length: u8,
    /// Slot identifier
    pub slot_id: u16,
    /// Slot characteristics 1
    pub characteristics1: u8,
    /// Slot characteristics 2 (SMBIOS 2.1+)
    pub characteristics2: u8,
    /// PCI segment group number (SMBIOS 2.6+)
    pub segment_group: u16,
    /// PCI bus number
    pub bus_number: u8,
    /// Device number in bits 7:3, function in bits 2:0
    pub device_function_number: u8,
    /// Electrical bus width (SMBIOS 3.2+)
    pub data_bus_width: u8,
    /// Number of entries in `peer_groups`
    pub peer_grouping_count: u8,
    /// Peer devices sharing the slot
    pub peer_groups: Vec<SlotPeerGroup>,
    /// Slot information (SMBIOS 3.4+)
    pub slot_information: u8,
    /// Physical width of the slot
    pub slot_physical_width: u8,
    /// Pitch in 1/100 mm
    pub slot_pitch: u16,
    /// Slot height (SMBIOS 3.5+)
    pub slot_height: u8,
}

field_layout!(record SystemSlots {
    slot_designation => FieldKind::Str,
    slot_type => FieldKind::Uint(1),
    slot_data_bus_width => FieldKind::Uint(1),
    current_usage => FieldKind::Uint(1),
    slot_length => FieldKind::Uint(1),
    slot_id => FieldKind::Uint(2),
    characteristics1 => FieldKind::Uint(1),
    characteristics2 => FieldKind::Uint(1),
    segment_group => FieldKind::Uint(2),
    bus_number => FieldKind::Uint(1),
    device_function_number => FieldKind::Uint(1),
    data_bus_width => FieldKind::Uint(1),
    peer_grouping_count => FieldKind::Uint(1),
    peer_groups => FieldKind::counted_by("peer_grouping_count", ElementKind::Nested(SlotPeerGroup::LAYOUT)),
    slot_information => FieldKind::Uint(1),
    slot_physical_width => FieldKind::Uint(1),
    slot_pitch => FieldKind::Uint(2),
    slot_height => FieldKind::Uint(1),
});

impl TypedRecord for SystemSlots {
    const TABLE_TYPE: TableType = TableType::SystemSlots;
    const MIN_LENGTH: u8 = 0x0C;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl SystemSlots {
    /// Typed view of `slot_type`
    #[must_use]
    pub fn kind(&self) -> Option<SlotType> {
        SlotType::from_repr(self.slot_type)
    }

    /// PCI address of the slot as `segment:bus:device.function`, `None` when unset.
    #[must_use]
    pub fn pci_address(&self) -> Option<String> {
        if self.header.length < 0x11
            || (self.segment_group == 0xFFFF
                && self.bus_number == 0xFF
                && self.device_function_number == 0xFF)
        {
            return None;
        }
        Some(format!(
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.segment_group,
            self.bus_number,
            self.device_function_number >> 3,
            self.device_function_number & 0x07
        ))
    }
}

impl fmt::Display for SystemSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tDesignation: {}", self.slot_designation)?;
        writeln!(f, "\tType: {}", describe(self.kind(), self.slot_type))?;
        writeln!(f, "\tData Bus Width: 0x{:02X}", self.slot_data_bus_width)?;
        writeln!(f, "\tCurrent Usage: 0x{:02X}", self.current_usage)?;
        writeln!(f, "\tLength: 0x{:02X}", self.slot_length)?;
        writeln!(f, "\tID: {}", self.slot_id)?;
        match self.pci_address() {
            Some(address) => write!(f, "\tBus Address: {address}")?,
            None => write!(f, "\tBus Address: Not Present")?,
        }
        if !self.peer_groups.is_empty() {
            write!(f, "\n\tPeer Devices: {}", self.peer_groups.len())?;
            for peer in &self.peer_groups {
                write!(
                    f,
                    "\n\t\t{:04x}:{:02x}:{:02x}.{:x} (Width {})",
                    peer.segment_group,
                    peer.bus_number,
                    peer.device_function_number >> 3,
                    peer.device_function_number & 0x07,
                    peer.data_bus_width
                )?;
            }
        }
        Ok(())
    }
}
