//! Modifier configuration
//!
//! Where the live-memory modifier looks for the SMBIOS entry point and which physical
//! memory device it patches.

use std::path::PathBuf;

/// Start of the legacy BIOS area scanned for an entry point anchor
pub const LEGACY_SCAN_START: u64 = 0xF_0000;
/// End (exclusive) of the legacy BIOS area
pub const LEGACY_SCAN_END: u64 = 0x10_0000;

/// Configuration of entry point discovery and physical memory access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierConfig {
    /// Physical memory device the tables are read from and written back to
    pub memory_device: PathBuf,

    /// Firmware system table listing, with `SMBIOS3=` / `SMBIOS=` address lines
    pub systab_path: PathBuf,

    /// Enable the firmware system table fast path
    pub enable_firmware_lookup: bool,

    /// Enable the byte-by-byte anchor scan of the legacy BIOS area
    pub enable_legacy_scan: bool,

    /// First address of the legacy scan window
    pub legacy_scan_start: u64,

    /// End of the legacy scan window, exclusive
    pub legacy_scan_end: u64,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            memory_device: PathBuf::from("/dev/mem"),
            systab_path: PathBuf::from("/sys/firmware/efi/systab"),
            enable_firmware_lookup: true,
            enable_legacy_scan: true,
            legacy_scan_start: LEGACY_SCAN_START,
            legacy_scan_end: LEGACY_SCAN_END,
        }
    }
}

impl ModifierConfig {
    /// Only consult the firmware system table.
    ///
    /// For UEFI machines where the legacy BIOS area holds no anchor.
    #[must_use]
    pub fn firmware_only() -> Self {
        Self {
            enable_legacy_scan: false,
            ..Self::default()
        }
    }

    /// Only scan the legacy BIOS area.
    #[must_use]
    pub fn legacy_only() -> Self {
        Self {
            enable_firmware_lookup: false,
            ..Self::default()
        }
    }

    /// Use `path` as the physical memory device.
    #[must_use]
    pub fn with_memory_device(mut self, path: impl Into<PathBuf>) -> Self {
        self.memory_device = path.into();
        self
    }

    /// Use `path` as the firmware system table listing.
    #[must_use]
    pub fn with_systab(mut self, path: impl Into<PathBuf>) -> Self {
        self.systab_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let default = ModifierConfig::default();
        assert!(default.enable_firmware_lookup);
        assert!(default.enable_legacy_scan);
        assert_eq!(default.legacy_scan_start, 0xF0000);
        assert_eq!(default.legacy_scan_end, 0x100000);

        let firmware = ModifierConfig::firmware_only();
        assert!(firmware.enable_firmware_lookup);
        assert!(!firmware.enable_legacy_scan);

        let legacy = ModifierConfig::legacy_only();
        assert!(!legacy.enable_firmware_lookup);
        assert!(legacy.enable_legacy_scan);
    }

    #[test]
    fn builders() {
        let config = ModifierConfig::default()
            .with_memory_device("/tmp/mem")
            .with_systab("/tmp/systab");
        assert_eq!(config.memory_device, PathBuf::from("/tmp/mem"));
        assert_eq!(config.systab_path, PathBuf::from("/tmp/systab"));
    }
}
