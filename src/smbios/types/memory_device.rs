//! Memory Device (type 17), DSP0134 7.18.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::{describe, format_size},
    Header, TableType, TypedRecord,
};

/// Memory device form factor, DSP0134 7.18.1
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MemoryFormFactor {
    Other = 0x01,
    Unknown = 0x02,
    #[strum(to_string = "SIMM")]
    Simm = 0x03,
    #[strum(to_string = "SIP")]
    Sip = 0x04,
    Chip = 0x05,
    #[strum(to_string = "DIP")]
    Dip = 0x06,
    #[strum(to_string = "ZIP")]
    Zip = 0x07,
    #[strum(to_string = "Proprietary Card")]
    ProprietaryCard = 0x08,
    #[strum(to_string = "DIMM")]
    Dimm = 0x09,
    #[strum(to_string = "TSOP")]
    Tsop = 0x0A,
    #[strum(to_string = "Row of chips")]
    RowOfChips = 0x0B,
    #[strum(to_string = "RIMM")]
    Rimm = 0x0C,
    #[strum(to_string = "SODIMM")]
    Sodimm = 0x0D,
    #[strum(to_string = "SRIMM")]
    Srimm = 0x0E,
    #[strum(to_string = "FB-DIMM")]
    FbDimm = 0x0F,
    Die = 0x10,
}

/// Memory device type, DSP0134 7.18.2
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MemoryDeviceType {
    Other = 0x01,
    Unknown = 0x02,
    #[strum(to_string = "DRAM")]
    Dram = 0x03,
    #[strum(to_string = "EDRAM")]
    Edram = 0x04,
    #[strum(to_string = "VRAM")]
    Vram = 0x05,
    #[strum(to_string = "SRAM")]
    Sram = 0x06,
    #[strum(to_string = "RAM")]
    Ram = 0x07,
    #[strum(to_string = "ROM")]
    Rom = 0x08,
    Flash = 0x09,
    #[strum(to_string = "EEPROM")]
    Eeprom = 0x0A,
    #[strum(to_string = "FEPROM")]
    Feprom = 0x0B,
    #[strum(to_string = "EPROM")]
    Eprom = 0x0C,
    #[strum(to_string = "CDRAM")]
    Cdram = 0x0D,
    #[strum(to_string = "3DRAM")]
    Ram3d = 0x0E,
    #[strum(to_string = "SDRAM")]
    Sdram = 0x0F,
    #[strum(to_string = "SGRAM")]
    Sgram = 0x10,
    #[strum(to_string = "RDRAM")]
    Rdram = 0x11,
    #[strum(to_string = "DDR")]
    Ddr = 0x12,
    #[strum(to_string = "DDR2")]
    Ddr2 = 0x13,
    #[strum(to_string = "DDR2 FB-DIMM")]
    Ddr2FbDimm = 0x14,
    #[strum(to_string = "DDR3")]
    Ddr3 = 0x18,
    #[strum(to_string = "FBD2")]
    Fbd2 = 0x19,
    #[strum(to_string = "DDR4")]
    Ddr4 = 0x1A,
    #[strum(to_string = "LPDDR")]
    Lpddr = 0x1B,
    #[strum(to_string = "LPDDR2")]
    Lpddr2 = 0x1C,
    #[strum(to_string = "LPDDR3")]
    Lpddr3 = 0x1D,
    #[strum(to_string = "LPDDR4")]
    Lpddr4 = 0x1E,
    #[strum(to_string = "Logical non-volatile device")]
    LogicalNonVolatile = 0x1F,
    #[strum(to_string = "HBM")]
    Hbm = 0x20,
    #[strum(to_string = "HBM2")]
    Hbm2 = 0x21,
    #[strum(to_string = "DDR5")]
    Ddr5 = 0x22,
    #[strum(to_string = "LPDDR5")]
    Lpddr5 = 0x23,
    #[strum(to_string = "HBM3")]
    Hbm3 = 0x24,
}

/// `size` value deferring to `extended_size`
const SIZE_EXTENDED: u16 = 0x7FFF;

/// Memory Device record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct MemoryDevice {
    /// Record header
    pub header: Header,
    /// Handle of the owning Physical Memory Array
    pub physical_memory_array_handle: u16,
    pub memory_error_information_handle: u16,
    /// Total width in bits, ECC included
    pub total_width: u16,
    /// Data width in bits
    pub data_width: u16,
    /// Size in MiB, or KiB with bit 15 set; 0x7FFF defers to `extended_size`
    pub size: u16,
    /// Raw [`MemoryFormFactor`]
    pub form_factor: u8,
    pub device_set: u8,
    pub device_locator: String,
    pub bank_locator: String,
    /// Raw [`MemoryDeviceType`]
    pub memory_type: u8,
    pub type_detail: u16,
    /// Maximum speed in MT/s
    pub speed: u16,
    pub manufacturer: String,
    pub serial_number: String,
    pub asset_tag: String,
    pub part_number: String,
    /// Rank in bits 3:0
    pub attributes: u8,
    /// Size in MiB for devices of 32 GiB and more
    pub extended_size: u32,
    pub configured_memory_speed: u16,
    /// Voltages in millivolts
    pub minimum_voltage: u16,
    pub maximum_voltage: u16,
    pub configured_voltage: u16,
    pub memory_technology: u8,
    pub operating_mode_capability: u16,
    pub firmware_version: String,
    pub module_manufacturer_id: u16,
    pub module_product_id: u16,
    pub subsystem_controller_manufacturer_id: u16,
    pub subsystem_controller_product_id: u16,
    pub non_volatile_size: u64,
    pub volatile_size: u64,
    pub cache_size: u64,
    pub logical_size: u64,
}

field_layout!(record MemoryDevice {
    physical_memory_array_handle => FieldKind::Uint(2),
    memory_error_information_handle => FieldKind::Uint(2),
    total_width => FieldKind::Uint(2),
    data_width => FieldKind::Uint(2),
    size => FieldKind::Uint(2),
    form_factor => FieldKind::Uint(1),
    device_set => FieldKind::Uint(1),
    device_locator => FieldKind::Str,
    bank_locator => FieldKind::Str,
    memory_type => FieldKind::Uint(1),
    type_detail => FieldKind::Uint(2),
    speed => FieldKind::Uint(2),
    manufacturer => FieldKind::Str,
    serial_number => FieldKind::Str,
    asset_tag => FieldKind::Str,
    part_number => FieldKind::Str,
    attributes => FieldKind::Uint(1),
    extended_size => FieldKind::Uint(4),
    configured_memory_speed => FieldKind::Uint(2),
    minimum_voltage => FieldKind::Uint(2),
    maximum_voltage => FieldKind::Uint(2),
    configured_voltage => FieldKind::Uint(2),
    memory_technology => FieldKind::Uint(1),
    operating_mode_capability => FieldKind::Uint(2),
    firmware_version => FieldKind::Str,
    module_manufacturer_id => FieldKind::Uint(2),
    module_product_id => FieldKind::Uint(2),
    subsystem_controller_manufacturer_id => FieldKind::Uint(2),
    subsystem_controller_product_id => FieldKind::Uint(2),
    non_volatile_size => FieldKind::Uint(8),
    volatile_size => FieldKind::Uint(8),
    cache_size => FieldKind::Uint(8),
    logical_size => FieldKind::Uint(8),
});

impl TypedRecord for MemoryDevice {
    const TABLE_TYPE: TableType = TableType::MemoryDevice;
    const MIN_LENGTH: u8 = 0x15;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl MemoryDevice {
    /// Installed size in bytes, 0 for an empty socket.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        match self.size {
            0 => 0,
            SIZE_EXTENDED => u64::from(self.extended_size & 0x7FFF_FFFF) * 1024 * 1024,
            size => {
                let unit = if size & 0x8000 != 0 { 1024 } else { 1024 * 1024 };
                u64::from(size & 0x7FFF) * unit
            }
        }
    }

    /// Typed view of `form_factor`
    #[must_use]
    pub fn form(&self) -> Option<MemoryFormFactor> {
        MemoryFormFactor::from_repr(self.form_factor)
    }

    /// Typed view of `memory_type`
    #[must_use]
    pub fn kind(&self) -> Option<MemoryDeviceType> {
        MemoryDeviceType::from_repr(self.memory_type)
    }
}

impl fmt::Display for MemoryDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tArray Handle: 0x{:04X}", self.physical_memory_array_handle)?;
        match self.size_bytes() {
            0 => writeln!(f, "\tSize: No Module Installed")?,
            bytes => writeln!(f, "\tSize: {}", format_size(bytes))?,
        }
        writeln!(f, "\tForm Factor: {}", describe(self.form(), self.form_factor))?;
        writeln!(f, "\tLocator: {}", self.device_locator)?;
        writeln!(f, "\tBank Locator: {}", self.bank_locator)?;
        writeln!(f, "\tType: {}", describe(self.kind(), self.memory_type))?;
        writeln!(f, "\tSpeed: {} MT/s", self.speed)?;
        writeln!(f, "\tManufacturer: {}", self.manufacturer)?;
        writeln!(f, "\tSerial Number: {}", self.serial_number)?;
        write!(f, "\tPart Number: {}", self.part_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::Table;

    fn legacy_region() -> Vec<u8> {
        vec![
            0x00, 0x10, 0xFE, 0xFF, 0x48, 0x00, 0x40, 0x00, // handles, widths
            0x00, 0x40, 0x09, 0x00, 1, 2, // size 16 GiB, DIMM, locators
            0x1A, 0x80, 0x00, // DDR4, synchronous
        ]
    }

    #[test]
    fn decode_minimal_record() {
        let table = Table::new(17, 0x1100, legacy_region(), vec!["DIMM A1".into(), "BANK 0".into()])
            .unwrap();
        let device = MemoryDevice::decode(&table).unwrap();

        assert_eq!(device.physical_memory_array_handle, 0x1000);
        assert_eq!(device.size_bytes(), 16 << 30);
        assert_eq!(device.form(), Some(MemoryFormFactor::Dimm));
        assert_eq!(device.kind(), Some(MemoryDeviceType::Ddr4));
        assert_eq!(device.bank_locator, "BANK 0");
        assert_eq!(device.speed, 0);
        assert_eq!(device.encode().unwrap(), table);
    }

    #[test]
    fn extended_and_kib_sizes() {
        let mut device = MemoryDevice {
            size: SIZE_EXTENDED,
            extended_size: 65536,
            ..Default::default()
        };
        assert_eq!(device.size_bytes(), 64 << 30);

        device.size = 0x8000 | 512;
        assert_eq!(device.size_bytes(), 512 * 1024);

        device.size = 0;
        assert_eq!(device.size_bytes(), 0);
    }

    #[test]
    fn full_record_length() {
        let device = MemoryDevice::default();
        assert_eq!(device.encode().unwrap().len(), 0x54);
    }
}
