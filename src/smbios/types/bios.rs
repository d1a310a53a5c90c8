//! BIOS Information (type 0), DSP0134 7.1.

use std::fmt;

use bitflags::bitflags;

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::format_size,
    Header, TableType, TypedRecord,
};

bitflags! {
    /// BIOS characteristics, DSP0134 7.1.1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BiosCharacteristics: u64 {
        /// Unknown
        const UNKNOWN = 1 << 2;
        /// BIOS characteristics are not supported
        const NOT_SUPPORTED = 1 << 3;
        /// ISA is supported
        const ISA = 1 << 4;
        /// MCA is supported
        const MCA = 1 << 5;
        /// EISA is supported
        const EISA = 1 << 6;
        /// PCI is supported
        const PCI = 1 << 7;
        /// PC card (PCMCIA) is supported
        const PC_CARD = 1 << 8;
        /// Plug and Play is supported
        const PLUG_AND_PLAY = 1 << 9;
        /// APM is supported
        const APM = 1 << 10;
        /// BIOS is upgradeable (Flash)
        const UPGRADEABLE = 1 << 11;
        /// BIOS shadowing is allowed
        const SHADOWING = 1 << 12;
        /// VL-VESA is supported
        const VL_VESA = 1 << 13;
        /// ESCD support is available
        const ESCD = 1 << 14;
        /// Boot from CD is supported
        const BOOT_FROM_CD = 1 << 15;
        /// Selectable boot is supported
        const SELECTABLE_BOOT = 1 << 16;
        /// BIOS ROM is socketed
        const ROM_SOCKETED = 1 << 17;
        /// Boot from PC card (PCMCIA) is supported
        const BOOT_FROM_PC_CARD = 1 << 18;
        /// EDD specification is supported
        const EDD = 1 << 19;
        /// Int 13h, Japanese floppy for NEC 9800 1.2 MB
        const FLOPPY_NEC_9800 = 1 << 20;
        /// Int 13h, Japanese floppy for Toshiba 1.2 MB
        const FLOPPY_TOSHIBA = 1 << 21;
        /// Int 13h, 5.25" / 360 KB floppy services
        const FLOPPY_525_360K = 1 << 22;
        /// Int 13h, 5.25" / 1.2 MB floppy services
        const FLOPPY_525_1M2 = 1 << 23;
        /// Int 13h, 3.5" / 720 KB floppy services
        const FLOPPY_35_720K = 1 << 24;
        /// Int 13h, 3.5" / 2.88 MB floppy services
        const FLOPPY_35_2M88 = 1 << 25;
        /// Int 5h, print screen service
        const PRINT_SCREEN = 1 << 26;
        /// Int 9h, 8042 keyboard services
        const KEYBOARD_8042 = 1 << 27;
        /// Int 14h, serial services
        const SERIAL = 1 << 28;
        /// Int 17h, printer services
        const PRINTER = 1 << 29;
        /// Int 10h, CGA/Mono video services
        const CGA_MONO_VIDEO = 1 << 30;
        /// NEC PC-98
        const NEC_PC98 = 1 << 31;
    }
}

bitflags! {
    /// BIOS characteristics extension byte 1, DSP0134 7.1.2.1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BiosCharacteristicsExt1: u8 {
        /// ACPI is supported
        const ACPI = 1 << 0;
        /// USB legacy is supported
        const USB_LEGACY = 1 << 1;
        /// AGP is supported
        const AGP = 1 << 2;
        /// I2O boot is supported
        const I2O_BOOT = 1 << 3;
        /// LS-120 SuperDisk boot is supported
        const LS120_BOOT = 1 << 4;
        /// ATAPI ZIP drive boot is supported
        const ATAPI_ZIP_BOOT = 1 << 5;
        /// 1394 boot is supported
        const FIREWIRE_BOOT = 1 << 6;
        /// Smart battery is supported
        const SMART_BATTERY = 1 << 7;
    }
}

bitflags! {
    /// BIOS characteristics extension byte 2, DSP0134 7.1.2.2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BiosCharacteristicsExt2: u8 {
        /// BIOS Boot Specification is supported
        const BOOT_SPECIFICATION = 1 << 0;
        /// Function key-initiated network service boot is supported
        const NETWORK_BOOT = 1 << 1;
        /// Targeted content distribution is enabled
        const TARGETED_CONTENT = 1 << 2;
        /// UEFI Specification is supported
        const UEFI = 1 << 3;
        /// SMBIOS table describes a virtual machine
        const VIRTUAL_MACHINE = 1 << 4;
        /// Manufacturing mode is supported
        const MANUFACTURING_MODE_CAPABLE = 1 << 5;
        /// Manufacturing mode is enabled
        const MANUFACTURING_MODE_ENABLED = 1 << 6;
    }
}

/// BIOS Information record
///
/// Fields from `characteristics_ext1` on were added in SMBIOS 2.4 and later; older records
/// decode with those fields zeroed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiosInformation {
    /// Record header
    pub header: Header,
    /// BIOS vendor name
    pub vendor: String,
    /// Free-form BIOS version
    pub version: String,
    /// Segment of the BIOS runtime image
    pub starting_address_segment: u16,
    /// Release date, `mm/dd/yy` or `mm/dd/yyyy`
    pub release_date: String,
    /// ROM size as `64K * (n + 1)`, 0xFF when `extended_rom_size` applies
    pub rom_size: u8,
    /// Raw [`BiosCharacteristics`]
    pub characteristics: u64,
    /// Raw [`BiosCharacteristicsExt1`]
    pub characteristics_ext1: u8,
    /// Raw [`BiosCharacteristicsExt2`]
    pub characteristics_ext2: u8,
    /// System BIOS major release
    pub bios_major_release: u8,
    /// System BIOS minor release
    pub bios_minor_release: u8,
    /// Embedded controller firmware major release
    pub ec_major_release: u8,
    /// Embedded controller firmware minor release
    pub ec_minor_release: u8,
    /// Extended ROM size; bits 14-15 select MB or GB
    pub extended_rom_size: u16,
}

field_layout!(record BiosInformation {
    vendor => FieldKind::Str,
    version => FieldKind::Str,
    starting_address_segment => FieldKind::Uint(2),
    release_date => FieldKind::Str,
    rom_size => FieldKind::Uint(1),
    characteristics => FieldKind::Uint(8),
    characteristics_ext1 => FieldKind::Uint(1),
    characteristics_ext2 => FieldKind::Uint(1),
    bios_major_release => FieldKind::Uint(1),
    bios_minor_release => FieldKind::Uint(1),
    ec_major_release => FieldKind::Uint(1),
    ec_minor_release => FieldKind::Uint(1),
    extended_rom_size => FieldKind::Uint(2),
});

impl TypedRecord for BiosInformation {
    const TABLE_TYPE: TableType = TableType::BiosInformation;
    const MIN_LENGTH: u8 = 0x12;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl BiosInformation {
    /// Size of the BIOS ROM in bytes.
    ///
    /// Records older than SMBIOS 3.1 without an extended size field report 16 MB when the
    /// legacy field is saturated.
    #[must_use]
    pub fn rom_size_bytes(&self) -> u64 {
        if self.rom_size != 0xFF {
            return 65536 * (u64::from(self.rom_size) + 1);
        }

        let extended = if self.header.length >= 0x1A {
            u64::from(self.extended_rom_size)
        } else {
            0x10
        };
        let multiplier = match extended >> 14 {
            0 => 1024 * 1024,
            1 => 1024 * 1024 * 1024,
            _ => 1,
        };
        (extended & 0x3FFF) * multiplier
    }

    /// Size of the runtime image between the starting segment and 1 MB.
    #[must_use]
    pub fn runtime_size(&self) -> u64 {
        (0x10000 - u64::from(self.starting_address_segment)) << 4
    }

    /// Typed view of `characteristics`
    #[must_use]
    pub fn characteristic_flags(&self) -> BiosCharacteristics {
        BiosCharacteristics::from_bits_retain(self.characteristics)
    }

    /// Typed view of `characteristics_ext1`
    #[must_use]
    pub fn ext1_flags(&self) -> BiosCharacteristicsExt1 {
        BiosCharacteristicsExt1::from_bits_retain(self.characteristics_ext1)
    }

    /// Typed view of `characteristics_ext2`
    #[must_use]
    pub fn ext2_flags(&self) -> BiosCharacteristicsExt2 {
        BiosCharacteristicsExt2::from_bits_retain(self.characteristics_ext2)
    }
}

impl fmt::Display for BiosInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tVendor: {}", self.vendor)?;
        writeln!(f, "\tVersion: {}", self.version)?;
        writeln!(f, "\tRelease Date: {}", self.release_date)?;
        writeln!(f, "\tAddress: 0x{:04X}0", self.starting_address_segment)?;
        writeln!(f, "\tRuntime Size: {}", format_size(self.runtime_size()))?;
        writeln!(f, "\tROM Size: {}", format_size(self.rom_size_bytes()))?;
        write!(f, "\tCharacteristics: {:?}", self.characteristic_flags())?;
        if self.header.length >= 0x18 {
            write!(
                f,
                "\n\tBIOS Revision: {}.{}",
                self.bios_major_release, self.bios_minor_release
            )?;
            if self.ec_major_release != 0xFF {
                write!(
                    f,
                    "\n\tFirmware Revision: {}.{}",
                    self.ec_major_release, self.ec_minor_release
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        smbios::{decode_tables, Table},
        test::bios_information_bytes,
        Error,
    };

    fn table() -> Table {
        decode_tables(&bios_information_bytes()).unwrap().remove(0)
    }

    #[test]
    fn decode_full_record() {
        let bios = BiosInformation::decode(&table()).unwrap();

        assert_eq!(bios.vendor, "MockVendor");
        assert_eq!(bios.version, "1.0");
        assert_eq!(bios.release_date, "01/01/2024");
        assert_eq!(bios.starting_address_segment, 0xE800);
        assert_eq!(bios.rom_size_bytes(), 16 * 65536);
        assert_eq!(bios.runtime_size(), 0x18000);
        assert!(bios.characteristic_flags().contains(BiosCharacteristics::PCI));
        assert!(bios.ext1_flags().contains(BiosCharacteristicsExt1::ACPI));
        assert!(bios.ext2_flags().contains(BiosCharacteristicsExt2::UEFI));
        assert_eq!(bios.header.handle, 0);
    }

    #[test]
    fn encode_reproduces_table() {
        let table = table();
        let bios = BiosInformation::decode(&table).unwrap();
        assert_eq!(bios.encode().unwrap(), table);
    }

    #[test]
    fn legacy_record_is_tolerated() {
        let mut table = table();
        table.data.truncate(0x12 - 4);
        table.header.length = 0x12;

        let bios = BiosInformation::decode(&table).unwrap();
        assert_eq!(bios.vendor, "MockVendor");
        assert_eq!(bios.characteristics_ext1, 0);
        assert_eq!(bios.extended_rom_size, 0);

        let encoded = bios.encode().unwrap();
        assert_eq!(encoded.len(), 0x12);
        assert_eq!(encoded.data, table.data);
    }

    #[test]
    fn too_short() {
        let mut table = table();
        table.data.truncate(0x0C);
        table.header.length = 0x10;
        assert!(matches!(
            BiosInformation::decode(&table),
            Err(Error::RecordTooShort {
                table_type: 0,
                minimum: 0x12,
                length: 0x10
            })
        ));
    }

    #[test]
    fn wrong_type() {
        let mut table = table();
        table.header.table_type = 1;
        assert!(matches!(
            BiosInformation::decode(&table),
            Err(Error::WrongTableType {
                expected: 0,
                found: 1
            })
        ));
    }

    #[test]
    fn extended_rom_size() {
        let mut bios = BiosInformation {
            header: Header {
                table_type: 0,
                length: 0x1A,
                handle: 0,
            },
            rom_size: 0xFF,
            extended_rom_size: 32,
            ..Default::default()
        };
        assert_eq!(bios.rom_size_bytes(), 32 * 1024 * 1024);

        bios.extended_rom_size = (1 << 14) | 2;
        assert_eq!(bios.rom_size_bytes(), 2 * 1024 * 1024 * 1024);

        bios.header.length = 0x18;
        assert_eq!(bios.rom_size_bytes(), 16 * 1024 * 1024);
    }
}
