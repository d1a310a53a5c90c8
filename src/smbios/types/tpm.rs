//! TPM Device (type 43), DSP0134 7.44.

use std::fmt;

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    Header, TableType, TypedRecord,
};

/// TPM Device record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TpmDevice {
    /// Record header
    pub header: Header,
    /// Vendor ID as four ASCII characters, e.g. "INTC"
    pub vendor_id: [u8; 4],
    /// Major spec version supported by the device
    pub major_spec_version: u8,
    /// Minor spec version supported by the device
    pub minor_spec_version: u8,
    /// Firmware version, layout depends on the TPM family
    pub firmware_version1: u32,
    /// Firmware version, layout depends on the TPM family
    pub firmware_version2: u32,
    /// Free-form description
    pub description: String,
    /// TPM characteristics bit mask
    pub characteristics: u64,
    /// OEM-defined data
    pub oem_defined: u32,
}

field_layout!(record TpmDevice {
    vendor_id => FieldKind::Bytes(4),
    major_spec_version => FieldKind::Uint(1),
    minor_spec_version => FieldKind::Uint(1),
    firmware_version1 => FieldKind::Uint(4),
    firmware_version2 => FieldKind::Uint(4),
    description => FieldKind::Str,
    characteristics => FieldKind::Uint(8),
    oem_defined => FieldKind::Uint(4),
});

impl TypedRecord for TpmDevice {
    const TABLE_TYPE: TableType = TableType::TpmDevice;
    const MIN_LENGTH: u8 = 0x1F;
    const MODE: DecodeMode = DecodeMode::Strict;
}

impl TpmDevice {
    /// Vendor ID with trailing NULs removed, `None` if it is not ASCII.
    #[must_use]
    pub fn vendor(&self) -> Option<String> {
        let end = self
            .vendor_id
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(self.vendor_id.len());
        let id = &self.vendor_id[..end];
        id.is_ascii().then(|| String::from_utf8_lossy(id).into_owned())
    }
}

impl fmt::Display for TpmDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        match self.vendor() {
            Some(vendor) => writeln!(f, "\tVendor ID: {vendor}")?,
            None => writeln!(f, "\tVendor ID: {:02X?}", self.vendor_id)?,
        }
        writeln!(
            f,
            "\tSpecification Version: {}.{}",
            self.major_spec_version, self.minor_spec_version
        )?;
        writeln!(
            f,
            "\tFirmware Revision: 0x{:08X} 0x{:08X}",
            self.firmware_version1, self.firmware_version2
        )?;
        writeln!(f, "\tDescription: {}", self.description)?;
        writeln!(f, "\tCharacteristics: 0x{:016X}", self.characteristics)?;
        write!(f, "\tOEM-specific Information: 0x{:08X}", self.oem_defined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::Table;

    #[test]
    fn decode_tpm20() {
        let mut data = b"INTC".to_vec();
        data.extend([2, 0]);
        data.extend(0x0007_0002u32.to_le_bytes());
        data.extend(0x0000_0000u32.to_le_bytes());
        data.push(1);
        data.extend(0x10u64.to_le_bytes());
        data.extend(0u32.to_le_bytes());
        let table = Table::new(43, 0x2B, data, vec!["TPM 2.0".into()]).unwrap();
        let tpm = TpmDevice::decode(&table).unwrap();

        assert_eq!(tpm.vendor().as_deref(), Some("INTC"));
        assert_eq!(tpm.major_spec_version, 2);
        assert_eq!(tpm.description, "TPM 2.0");

        let text = tpm.to_string();
        assert!(text.contains("\tVendor ID: INTC"));
        assert!(text.contains("\tSpecification Version: 2.0"));
        assert!(text.contains("\tFirmware Revision: 0x00070002 0x00000000"));
        assert!(text.ends_with("\tOEM-specific Information: 0x00000000"));
        assert_eq!(tpm.encode().unwrap(), table);
    }

    #[test]
    fn vendor_with_padding() {
        let tpm = TpmDevice {
            vendor_id: *b"IBM\0",
            ..Default::default()
        };
        assert_eq!(tpm.vendor().as_deref(), Some("IBM"));
    }
}
