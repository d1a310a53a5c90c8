//! System Information (type 1), DSP0134 7.2.

use std::fmt;

use strum::{Display, FromRepr};
use uguid::Guid;

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::describe,
    Header, TableType, TypedRecord,
};

/// Event that caused the system to power up, DSP0134 7.2.2
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, FromRepr)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum WakeUpType {
    Other = 0x01,
    Unknown = 0x02,
    #[strum(to_string = "APM Timer")]
    ApmTimer = 0x03,
    #[strum(to_string = "Modem Ring")]
    ModemRing = 0x04,
    #[strum(to_string = "LAN Remote")]
    LanRemote = 0x05,
    #[strum(to_string = "Power Switch")]
    PowerSwitch = 0x06,
    #[strum(to_string = "PCI PME#")]
    PciPme = 0x07,
    #[strum(to_string = "AC Power Restored")]
    AcPowerRestored = 0x08,
}

/// System Information record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInformation {
    /// Record header
    pub header: Header,
    /// System manufacturer
    pub manufacturer: String,
    /// Product name
    pub product_name: String,
    /// Product version
    pub version: String,
    /// Serial number
    pub serial_number: String,
    /// Raw system UUID (SMBIOS 2.1+)
    pub uuid: [u8; 16],
    /// Raw [`WakeUpType`]
    pub wake_up_type: u8,
    /// SKU number (SMBIOS 2.4+)
    pub sku_number: String,
    /// Product family (SMBIOS 2.4+)
    pub family: String,
}

field_layout!(record SystemInformation {
    manufacturer => FieldKind::Str,
    product_name => FieldKind::Str,
    version => FieldKind::Str,
    serial_number => FieldKind::Str,
    uuid => FieldKind::Bytes(16),
    wake_up_type => FieldKind::Uint(1),
    sku_number => FieldKind::Str,
    family => FieldKind::Str,
});

impl TypedRecord for SystemInformation {
    const TABLE_TYPE: TableType = TableType::SystemInformation;
    const MIN_LENGTH: u8 = 0x08;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl SystemInformation {
    /// The system UUID, `None` when the firmware marks it absent (all bits set) or
    /// unsettable (all clear).
    ///
    /// The first three fields are stored little-endian, the GUID wire order.
    #[must_use]
    pub fn system_uuid(&self) -> Option<Guid> {
        if self.uuid.iter().all(|b| *b == 0xFF) || self.uuid.iter().all(|b| *b == 0) {
            return None;
        }
        Some(Guid::from_bytes(self.uuid))
    }

    /// Typed view of `wake_up_type`
    #[must_use]
    pub fn wake_up(&self) -> Option<WakeUpType> {
        WakeUpType::from_repr(self.wake_up_type)
    }
}

impl fmt::Display for SystemInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tManufacturer: {}", self.manufacturer)?;
        writeln!(f, "\tProduct Name: {}", self.product_name)?;
        writeln!(f, "\tVersion: {}", self.version)?;
        writeln!(f, "\tSerial Number: {}", self.serial_number)?;
        match self.system_uuid() {
            Some(uuid) => writeln!(f, "\tUUID: {uuid}")?,
            None => writeln!(f, "\tUUID: Not Present")?,
        }
        writeln!(f, "\tWake-up Type: {}", describe(self.wake_up(), self.wake_up_type))?;
        writeln!(f, "\tSKU Number: {}", self.sku_number)?;
        write!(f, "\tFamily: {}", self.family)
    }
}
