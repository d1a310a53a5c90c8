//! IPMI Device Information (type 38), DSP0134 7.39.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::describe,
    Header, TableType, TypedRecord,
};

/// Baseboard management controller interface type, DSP0134 7.39.1
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum IpmiInterfaceType {
    Unknown = 0x00,
    #[strum(to_string = "KCS (Keyboard Control Style)")]
    Kcs = 0x01,
    #[strum(to_string = "SMIC (Server Management Interface Chip)")]
    Smic = 0x02,
    #[strum(to_string = "BT (Block Transfer)")]
    Bt = 0x03,
    #[strum(to_string = "SSIF (SMBus System Interface)")]
    Ssif = 0x04,
}

/// IPMI Device Information record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpmiDeviceInformation {
    /// Record header
    pub header: Header,
    /// Raw [`IpmiInterfaceType`]
    pub interface_type: u8,
    /// IPMI specification revision, BCD major.minor
    pub specification_revision: u8,
    /// Slave address of the BMC on the I2C bus
    pub i2c_target_address: u8,
    /// Bus ID of the NV storage device, 0xFF when absent
    pub nv_storage_device_address: u8,
    /// Base address; bit 0 selects I/O space
    pub base_address: u64,
    /// Register spacing, LS address bit and interrupt info
    pub base_address_modifier: u8,
    /// Interrupt number, 0 when unspecified
    pub interrupt_number: u8,
}

field_layout!(record IpmiDeviceInformation {
    interface_type => FieldKind::Uint(1),
    specification_revision => FieldKind::Uint(1),
    i2c_target_address => FieldKind::Uint(1),
    nv_storage_device_address => FieldKind::Uint(1),
    base_address => FieldKind::Uint(8),
    base_address_modifier => FieldKind::Uint(1),
    interrupt_number => FieldKind::Uint(1),
});

impl TypedRecord for IpmiDeviceInformation {
    const TABLE_TYPE: TableType = TableType::IpmiDeviceInformation;
    const MIN_LENGTH: u8 = 0x10;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl IpmiDeviceInformation {
    /// Typed view of `interface_type`
    #[must_use]
    pub fn interface(&self) -> Option<IpmiInterfaceType> {
        IpmiInterfaceType::from_repr(self.interface_type)
    }

    /// Specification revision as (major, minor)
    #[must_use]
    pub fn revision(&self) -> (u8, u8) {
        (self.specification_revision >> 4, self.specification_revision & 0x0F)
    }

    /// `true` if the base address is in I/O space rather than memory
    #[must_use]
    pub fn is_io_space(&self) -> bool {
        self.base_address & 1 != 0
    }
}

impl fmt::Display for IpmiDeviceInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor) = self.revision();
        writeln!(f, "{}", self.header)?;
        writeln!(
            f,
            "\tInterface Type: {}",
            describe(self.interface(), self.interface_type)
        )?;
        writeln!(f, "\tSpecification Version: {major}.{minor}")?;
        writeln!(f, "\tI2C Target Address: 0x{:02x}", self.i2c_target_address >> 1)?;
        if self.nv_storage_device_address == 0xFF {
            writeln!(f, "\tNV Storage Device: Not Present")?;
        } else {
            writeln!(
                f,
                "\tNV Storage Device Address: {}",
                self.nv_storage_device_address
            )?;
        }
        let space = if self.is_io_space() { "I/O" } else { "Memory-mapped" };
        writeln!(
            f,
            "\tBase Address: 0x{:016X} ({space})",
            self.base_address & !1
        )?;
        if self.interrupt_number == 0 {
            write!(f, "\tInterrupt Number: Unspecified")
        } else {
            write!(f, "\tInterrupt Number: {}", self.interrupt_number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::Table;

    #[test]
    fn decode_kcs() {
        let mut data = vec![0x01, 0x20, 0x20, 0xFF];
        data.extend(0x0CA3u64.to_le_bytes());
        data.extend([0x00, 0x00]);
        let table = Table::new(38, 0x26, data, vec![]).unwrap();
        let ipmi = IpmiDeviceInformation::decode(&table).unwrap();

        assert_eq!(ipmi.interface(), Some(IpmiInterfaceType::Kcs));
        assert_eq!(ipmi.revision(), (2, 0));
        assert!(ipmi.is_io_space());

        let text = ipmi.to_string();
        assert!(text.contains("\tInterface Type: KCS (Keyboard Control Style)"));
        assert!(text.contains("\tSpecification Version: 2.0"));
        assert!(text.contains("\tI2C Target Address: 0x10"));
        assert!(text.contains("\tBase Address: 0x0000000000000CA2 (I/O)"));
        assert!(text.ends_with("\tInterrupt Number: Unspecified"));
        assert_eq!(ipmi.encode().unwrap(), table);
    }

    #[test]
    fn legacy_length() {
        let mut data = vec![0x04, 0x15, 0x10, 0xFF];
        data.extend(0x20u64.to_le_bytes());
        let table = Table::new(38, 0x26, data, vec![]).unwrap();
        let ipmi = IpmiDeviceInformation::decode(&table).unwrap();

        assert_eq!(ipmi.interface(), Some(IpmiInterfaceType::Ssif));
        assert_eq!(ipmi.interrupt_number, 0);
        assert_eq!(ipmi.encode().unwrap().len(), 0x10);
    }
}
