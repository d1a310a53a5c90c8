//! System Boot Information (type 32), DSP0134 7.33.

use std::fmt;

use crate::smbios::{
    layout::{DecodeMode, ElementKind, FieldKind},
    Header, TableType, TypedRecord,
};

/// System Boot Information record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemBootInformation {
    /// Record header
    pub header: Header,
    /// Reserved, all zero
    pub reserved: [u8; 6],
    /// Boot status code followed by any vendor or product-specific data
    pub boot_status: Vec<u8>,
}

field_layout!(record SystemBootInformation {
    reserved => FieldKind::Bytes(6),
    boot_status => FieldKind::remaining(ElementKind::Uint(1)),
});

impl TypedRecord for SystemBootInformation {
    const TABLE_TYPE: TableType = TableType::SystemBootInformation;
    const MIN_LENGTH: u8 = 0x0B;
    const MODE: DecodeMode = DecodeMode::Strict;
}

impl SystemBootInformation {
    /// `true` if the last boot completed without errors
    #[must_use]
    pub fn no_errors(&self) -> bool {
        self.boot_status.first() == Some(&0)
    }
}

impl fmt::Display for SystemBootInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        match self.boot_status.first() {
            Some(0) => write!(f, "\tStatus: No errors detected"),
            Some(code) => write!(f, "\tStatus: 0x{code:02X}"),
            None => write!(f, "\tStatus: Not Present"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::Table;

    #[test]
    fn decode_status() {
        let table = Table::new(32, 0x20, vec![0, 0, 0, 0, 0, 0, 0x00, 0xAB], vec![]).unwrap();
        let boot = SystemBootInformation::decode(&table).unwrap();

        assert!(boot.no_errors());
        assert_eq!(boot.boot_status, [0x00, 0xAB]);
        assert!(boot.to_string().ends_with("\tStatus: No errors detected"));
        assert_eq!(boot.encode().unwrap(), table);
    }

    #[test]
    fn too_short() {
        let table = Table::new(32, 0x20, vec![0; 6], vec![]).unwrap();
        assert!(SystemBootInformation::decode(&table).is_err());
    }
}
