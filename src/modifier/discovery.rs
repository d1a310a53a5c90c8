//! Entry point discovery in physical memory.
//!
//! Two sources are consulted in order:
//!
//! 1. the firmware system table listing (`/sys/firmware/efi/systab`), whose `SMBIOS3=` and
//!    `SMBIOS=` lines carry the entry point address directly
//! 2. the legacy BIOS area 0xF0000..0x100000, scanned at every byte offset for a `_SM3_` or
//!    `_SM_` anchor whose entry point decodes

use std::fs;

use crate::{
    config::ModifierConfig,
    modifier::PhysicalMemory,
    smbios::entrypoint::{
        EntryPoint, ANCHOR_32, ANCHOR_64, ENTRY_POINT_32_SIZE, ENTRY_POINT_64_SIZE,
    },
    Error, Result,
};

/// Physical location and size of an entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointLocation {
    /// Physical address of the anchor
    pub address: u64,
    /// Bytes to read for the entry point structure
    pub size: usize,
}

/// Parse a firmware system table listing.
///
/// The `SMBIOS3=` line is preferred over `SMBIOS=` when both are present. Addresses are hex
/// with or without a `0x` prefix.
#[must_use]
pub fn parse_systab(text: &str) -> Option<EntryPointLocation> {
    let find = |key: &str| {
        text.lines().find_map(|line| {
            let value = line.trim().strip_prefix(key)?.strip_prefix('=')?;
            let digits = value.trim().trim_start_matches("0x").trim_start_matches("0X");
            u64::from_str_radix(digits, 16).ok()
        })
    };

    if let Some(address) = find("SMBIOS3") {
        return Some(EntryPointLocation {
            address,
            size: ENTRY_POINT_64_SIZE,
        });
    }
    find("SMBIOS").map(|address| EntryPointLocation {
        address,
        size: ENTRY_POINT_32_SIZE,
    })
}

/// Scan `start..end` for the first anchor followed by a valid entry point.
///
/// Anchors whose structure fails to decode are skipped and the scan continues.
///
/// # Errors
/// Returns [`Error::FileError`] if the window cannot be read.
pub fn scan_legacy<M: PhysicalMemory + ?Sized>(
    memory: &M,
    start: u64,
    end: u64,
) -> Result<Option<EntryPointLocation>> {
    let len = usize::try_from(end.saturating_sub(start))
        .map_err(|_| Error::Discovery(format!("scan window {start:#x}..{end:#x} is too large")))?;
    let window = memory.read_vec(start, len)?;

    for offset in 0..window.len() {
        let rest = &window[offset..];
        let size = if rest.starts_with(ANCHOR_64) {
            ENTRY_POINT_64_SIZE
        } else if rest.starts_with(ANCHOR_32) {
            ENTRY_POINT_32_SIZE
        } else {
            continue;
        };
        let address = start + offset as u64;
        match EntryPoint::decode(rest.get(..size).unwrap_or(rest)) {
            Ok(_) => return Ok(Some(EntryPointLocation { address, size })),
            Err(error) => log::debug!("skipping anchor at {address:#x}: {error}"),
        }
    }
    Ok(None)
}

/// Locate the entry point using the sources enabled in `config`.
///
/// # Errors
/// Returns [`Error::Discovery`] if no enabled source yields an entry point, or the read error
/// of the legacy scan.
pub fn discover<M: PhysicalMemory + ?Sized>(
    config: &ModifierConfig,
    memory: &M,
) -> Result<EntryPointLocation> {
    if config.enable_firmware_lookup {
        match fs::read_to_string(&config.systab_path) {
            Ok(text) => {
                if let Some(location) = parse_systab(&text) {
                    log::debug!(
                        "entry point at {:#x} from {}",
                        location.address,
                        config.systab_path.display()
                    );
                    return Ok(location);
                }
                log::warn!(
                    "{} lists no SMBIOS entry point",
                    config.systab_path.display()
                );
            }
            Err(error) => {
                log::warn!("cannot read {}: {}", config.systab_path.display(), error);
            }
        }
    }

    if config.enable_legacy_scan {
        log::debug!(
            "scanning {:#x}..{:#x} for an entry point anchor",
            config.legacy_scan_start,
            config.legacy_scan_end
        );
        if let Some(location) =
            scan_legacy(memory, config.legacy_scan_start, config.legacy_scan_end)?
        {
            log::debug!("entry point anchor at {:#x}", location.address);
            return Ok(location);
        }
    }

    Err(Error::Discovery(
        "no SMBIOS entry point found in the enabled sources".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{
        modifier::DevMem,
        test::{entry32_bytes, entry64_bytes},
    };

    fn memory_with(data: &[u8]) -> (tempfile::NamedTempFile, DevMem) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        let memory = DevMem::open(file.path()).unwrap();
        (file, memory)
    }

    #[test]
    fn systab_prefers_64bit() {
        let text = "ACPI20=0x7ff7e014\nSMBIOS=0x7f8f0000\nSMBIOS3=0x7f8ef000\n";
        assert_eq!(
            parse_systab(text),
            Some(EntryPointLocation {
                address: 0x7f8e_f000,
                size: 0x18
            })
        );

        let text = "ACPI=0xf6ab0\nSMBIOS=0xf0ee0\n";
        assert_eq!(
            parse_systab(text),
            Some(EntryPointLocation {
                address: 0xf_0ee0,
                size: 0x1F
            })
        );

        assert_eq!(parse_systab("ACPI20=0x7ff7e014\n"), None);
        assert_eq!(parse_systab("SMBIOS=zz\n"), None);
    }

    #[test]
    fn scan_finds_unaligned_anchor() {
        let mut data = vec![0u8; 0x100];
        data[0x43..0x43 + 0x1F].copy_from_slice(&entry32_bytes(0x40, 0x80, 0x1000, 3));
        let (_file, memory) = memory_with(&data);

        let location = scan_legacy(&memory, 0, 0x100).unwrap().unwrap();
        assert_eq!(location.address, 0x43);
        assert_eq!(location.size, 0x1F);

        assert_eq!(scan_legacy(&memory, 0x50, 0x100).unwrap(), None);
    }

    #[test]
    fn scan_skips_invalid_candidates() {
        let mut data = vec![0u8; 0x100];
        data[0x10..0x14].copy_from_slice(b"_SM_");
        data[0x30..0x35].copy_from_slice(b"_SM3_");
        let mut broken = entry32_bytes(0x40, 0x80, 0x1000, 3);
        broken[4] ^= 0xFF;
        data[0x50..0x50 + 0x1F].copy_from_slice(&broken);
        data[0x90..0x90 + 0x18].copy_from_slice(&entry64_bytes(0x100, 0x2000));
        let (_file, memory) = memory_with(&data);

        let location = scan_legacy(&memory, 0, 0x100).unwrap().unwrap();
        assert_eq!(location.address, 0x90);
        assert_eq!(location.size, 0x18);

        assert_eq!(scan_legacy(&memory, 0, 0x90).unwrap(), None);
    }

    #[test]
    fn discover_falls_back_to_scan() {
        let mut data = vec![0u8; 0x80];
        data[0x21..0x21 + 0x18].copy_from_slice(&entry64_bytes(0x100, 0x2000));
        let (_file, memory) = memory_with(&data);

        let mut config = ModifierConfig::default().with_systab("/nonexistent/systab");
        config.legacy_scan_start = 0;
        config.legacy_scan_end = 0x80;

        let location = discover(&config, &memory).unwrap();
        assert_eq!(location.address, 0x21);
        assert_eq!(location.size, 0x18);

        config.enable_legacy_scan = false;
        assert!(matches!(
            discover(&config, &memory),
            Err(Error::Discovery(_))
        ));
    }

    #[test]
    fn discover_uses_systab() {
        let mut systab = tempfile::NamedTempFile::new().unwrap();
        writeln!(systab, "SMBIOS3=0x1000").unwrap();
        let (_file, memory) = memory_with(&[0u8; 16]);

        let config = ModifierConfig::firmware_only().with_systab(systab.path());
        assert_eq!(discover(&config, &memory).unwrap().address, 0x1000);
    }
}
