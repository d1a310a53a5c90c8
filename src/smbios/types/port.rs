//! Port Connector Information (type 8), DSP0134 7.9.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::describe,
    Header, TableType, TypedRecord,
};

/// Connector type, DSP0134 7.9.2
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PortConnectorType {
    #[strum(to_string = "None")]
    NoConnector = 0x00,
    Centronics = 0x01,
    #[strum(to_string = "Mini Centronics")]
    MiniCentronics = 0x02,
    Proprietary = 0x03,
    #[strum(to_string = "DB-25 pin male")]
    Db25Male = 0x04,
    #[strum(to_string = "DB-25 pin female")]
    Db25Female = 0x05,
    #[strum(to_string = "DB-15 pin male")]
    Db15Male = 0x06,
    #[strum(to_string = "DB-15 pin female")]
    Db15Female = 0x07,
    #[strum(to_string = "DB-9 pin male")]
    Db9Male = 0x08,
    #[strum(to_string = "DB-9 pin female")]
    Db9Female = 0x09,
    #[strum(to_string = "RJ-11")]
    Rj11 = 0x0A,
    #[strum(to_string = "RJ-45")]
    Rj45 = 0x0B,
    #[strum(to_string = "50-pin MiniSCSI")]
    MiniScsi50 = 0x0C,
    #[strum(to_string = "Mini-DIN")]
    MiniDin = 0x0D,
    #[strum(to_string = "Micro-DIN")]
    MicroDin = 0x0E,
    #[strum(to_string = "PS/2")]
    Ps2 = 0x0F,
    Infrared = 0x10,
    #[strum(to_string = "HP-HIL")]
    HpHil = 0x11,
    #[strum(to_string = "Access Bus (USB)")]
    Usb = 0x12,
    #[strum(to_string = "SSA SCSI")]
    SsaScsi = 0x13,
    #[strum(to_string = "Circular DIN-8 male")]
    CircularDin8Male = 0x14,
    #[strum(to_string = "Circular DIN-8 female")]
    CircularDin8Female = 0x15,
    #[strum(to_string = "On Board IDE")]
    OnBoardIde = 0x16,
    #[strum(to_string = "On Board Floppy")]
    OnBoardFloppy = 0x17,
    #[strum(to_string = "9-pin Dual Inline (pin 10 cut)")]
    DualInline9 = 0x18,
    #[strum(to_string = "25-pin Dual Inline (pin 26 cut)")]
    DualInline25 = 0x19,
    #[strum(to_string = "50-pin Dual Inline")]
    DualInline50 = 0x1A,
    #[strum(to_string = "68-pin Dual Inline")]
    DualInline68 = 0x1B,
    #[strum(to_string = "On Board Sound Input from CD-ROM")]
    OnBoardSoundInput = 0x1C,
    #[strum(to_string = "Mini-Centronics Type-14")]
    MiniCentronics14 = 0x1D,
    #[strum(to_string = "Mini-Centronics Type-26")]
    MiniCentronics26 = 0x1E,
    #[strum(to_string = "Mini-jack (headphones)")]
    MiniJack = 0x1F,
    #[strum(to_string = "BNC")]
    Bnc = 0x20,
    #[strum(to_string = "IEEE 1394")]
    Ieee1394 = 0x21,
    #[strum(to_string = "SAS/SATA Plug Receptacle")]
    SasSata = 0x22,
    #[strum(to_string = "USB Type-C Receptacle")]
    UsbTypeC = 0x23,
    Other = 0xFF,
}

/// Port Connector Information record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortConnectorInformation {
    /// Record header
    pub header: Header,
    /// Internal reference designator, e.g. "J101"
    pub internal_reference_designator: String,
    /// Raw internal [`PortConnectorType`]
    pub internal_connector_type: u8,
    /// External reference designator, e.g. "COM A"
    pub external_reference_designator: String,
    /// Raw external [`PortConnectorType`]
    pub external_connector_type: u8,
    /// Function of the port
    pub port_type: u8,
}

field_layout!(record PortConnectorInformation {
    internal_reference_designator => FieldKind::Str,
    internal_connector_type => FieldKind::Uint(1),
    external_reference_designator => FieldKind::Str,
    external_connector_type => FieldKind::Uint(1),
    port_type => FieldKind::Uint(1),
});

impl TypedRecord for PortConnectorInformation {
    const TABLE_TYPE: TableType = TableType::PortConnectorInformation;
    const MIN_LENGTH: u8 = 0x09;
    const MODE: DecodeMode = DecodeMode::Strict;
}

impl PortConnectorInformation {
    /// Typed view of `internal_connector_type`
    #[must_use]
    pub fn internal_connector(&self) -> Option<PortConnectorType> {
        PortConnectorType::from_repr(self.internal_connector_type)
    }

    /// Typed view of `external_connector_type`
    #[must_use]
    pub fn external_connector(&self) -> Option<PortConnectorType> {
        PortConnectorType::from_repr(self.external_connector_type)
    }
}

impl fmt::Display for PortConnectorInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(
            f,
            "\tInternal Reference Designator: {}",
            self.internal_reference_designator
        )?;
        writeln!(
            f,
            "\tInternal Connector Type: {}",
            describe(self.internal_connector(), self.internal_connector_type)
        )?;
        writeln!(
            f,
            "\tExternal Reference Designator: {}",
            self.external_reference_designator
        )?;
        writeln!(
            f,
            "\tExternal Connector Type: {}",
            describe(self.external_connector(), self.external_connector_type)
        )?;
        write!(f, "\tPort Type: 0x{:02X}", self.port_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::Table;

    #[test]
    fn decode_and_encode() {
        let table = Table::new(
            8,
            0x80,
            vec![1, 0x00, 2, 0x0B, 0x1F],
            vec!["J1A1".into(), "Network".into()],
        )
        .unwrap();
        let port = PortConnectorInformation::decode(&table).unwrap();

        assert_eq!(port.internal_connector(), Some(PortConnectorType::NoConnector));
        assert_eq!(port.external_connector(), Some(PortConnectorType::Rj45));
        assert_eq!(port.external_reference_designator, "Network");
        assert_eq!(port.encode().unwrap(), table);

        let text = port.to_string();
        assert!(text.contains("\tInternal Connector Type: None"));
        assert!(text.contains("\tExternal Connector Type: RJ-45"));
        assert!(text.ends_with("\tPort Type: 0x1F"));
    }
}
