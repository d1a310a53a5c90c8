//! Cache Information (type 7), DSP0134 7.8.

use std::fmt;

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::format_size,
    Header, TableType, TypedRecord,
};

/// Cache Information record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheInformation {
    /// Record header
    pub header: Header,
    /// Socket designation, e.g. "L1 Cache"
    pub socket_designation: String,
    /// Level, location, mode and enablement bits
    pub configuration: u16,
    /// Maximum installable size; bit 15 selects 64K granularity
    pub maximum_size: u16,
    /// Installed size; bit 15 selects 64K granularity
    pub installed_size: u16,
    /// Supported SRAM type bit mask
    pub supported_sram_type: u16,
    /// Current SRAM type bit mask
    pub current_sram_type: u16,
    /// Cache speed in nanoseconds
    pub speed: u8,
    /// Error correction scheme
    pub error_correction_type: u8,
    /// Logical cache type
    pub system_type: u8,
    /// Associativity
    pub associativity: u8,
    /// Maximum size for caches of 2 GB and more (SMBIOS 3.1+); bit 31 selects 64K granularity
    pub maximum_size2: u32,
    /// Installed size for caches of 2 GB and more (SMBIOS 3.1+)
    pub installed_size2: u32,
}

field_layout!(record CacheInformation {
    socket_designation => FieldKind::Str,
    configuration => FieldKind::Uint(2),
    maximum_size => FieldKind::Uint(2),
    installed_size => FieldKind::Uint(2),
    supported_sram_type => FieldKind::Uint(2),
    current_sram_type => FieldKind::Uint(2),
    speed => FieldKind::Uint(1),
    error_correction_type => FieldKind::Uint(1),
    system_type => FieldKind::Uint(1),
    associativity => FieldKind::Uint(1),
    maximum_size2 => FieldKind::Uint(4),
    installed_size2 => FieldKind::Uint(4),
});

impl TypedRecord for CacheInformation {
    const TABLE_TYPE: TableType = TableType::CacheInformation;
    const MIN_LENGTH: u8 = 0x0F;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

/// Size in bytes, preferring the 32-bit field when it is set.
fn size_bytes(size: u16, size2: u32) -> u64 {
    let granularity2 = if size2 & 0x8000_0000 != 0 { 64 * 1024 } else { 1024 };
    let bytes2 = u64::from(size2 & 0x7FFF_FFFF) * granularity2;
    if bytes2 != 0 {
        return bytes2;
    }

    let granularity = if size & 0x8000 != 0 { 64 * 1024 } else { 1024 };
    u64::from(size & 0x7FFF) * granularity
}

impl CacheInformation {
    /// Maximum installable cache size in bytes
    #[must_use]
    pub fn maximum_size_bytes(&self) -> u64 {
        size_bytes(self.maximum_size, self.maximum_size2)
    }

    /// Installed cache size in bytes
    #[must_use]
    pub fn installed_size_bytes(&self) -> u64 {
        size_bytes(self.installed_size, self.installed_size2)
    }

    /// Cache level, 1-based
    #[must_use]
    pub fn level(&self) -> u8 {
        // Bits 0-2 hold level - 1.
        (self.configuration & 0x07) as u8 + 1
    }

    /// `true` if the cache is enabled at boot
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.configuration & 0x80 != 0
    }
}

impl fmt::Display for CacheInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tSocket Designation: {}", self.socket_designation)?;
        writeln!(
            f,
            "\tConfiguration: {}, Level {}",
            if self.enabled() { "Enabled" } else { "Disabled" },
            self.level()
        )?;
        writeln!(f, "\tInstalled Size: {}", format_size(self.installed_size_bytes()))?;
        write!(f, "\tMaximum Size: {}", format_size(self.maximum_size_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::Table;

    #[test]
    fn decode_legacy_sizes() {
        let data = vec![
            1, 0x81, 0x01, 0x00, 0x04, 0x00, 0x04, 0x20, 0x00, 0x20, 0x00, 0, 0x06, 0x05, 0x07,
        ];
        let table = Table::new(7, 0x70, data, vec!["L2 Cache".into()]).unwrap();
        let cache = CacheInformation::decode(&table).unwrap();

        assert_eq!(cache.level(), 2);
        assert!(cache.enabled());
        assert_eq!(cache.maximum_size_bytes(), 1024 * 1024);
        assert_eq!(cache.installed_size_bytes(), 1024 * 1024);
        assert_eq!(cache.maximum_size2, 0);
        assert_eq!(cache.encode().unwrap(), table);
    }

    #[test]
    fn extended_sizes_take_precedence() {
        let cache = CacheInformation {
            maximum_size: 0xFFFF,
            maximum_size2: 0x8000_0000 | 0x0000_8000,
            installed_size: 0x8010,
            ..Default::default()
        };
        assert_eq!(cache.maximum_size_bytes(), 0x8000 * 64 * 1024);
        assert_eq!(cache.installed_size_bytes(), 16 * 64 * 1024);
        assert_eq!(format_size(cache.installed_size_bytes()), "1 MB");
    }
}
