//! Typed SMBIOS records.
//!
//! One module per registered record type. Each declares its structured region with
//! `field_layout!` and its per-type contract through [`crate::smbios::TypedRecord`], and adds
//! the derived values DSP0134 defines on top of the raw fields (sizes, counts, flags and
//! label enums).
//!
//! Enumerated and flag fields are stored raw so every value a firmware writes survives a
//! decode/encode cycle; the typed views are accessor methods.

mod baseboard;
mod bios;
mod boot;
mod cache;
mod chassis;
mod end;
mod group;
mod ipmi;
mod memory_array;
mod memory_device;
mod port;
mod processor;
mod slots;
mod system;
mod tpm;

pub use baseboard::{BaseboardInformation, BoardFeatures, BoardType};
pub use bios::{BiosCharacteristics, BiosCharacteristicsExt1, BiosCharacteristicsExt2, BiosInformation};
pub use boot::SystemBootInformation;
pub use cache::CacheInformation;
pub use chassis::{ChassisContainedElement, ChassisInformation, ChassisType};
pub use end::EndOfTable;
pub use group::{GroupAssociation, GroupItem};
pub use ipmi::{IpmiDeviceInformation, IpmiInterfaceType};
pub use memory_array::PhysicalMemoryArray;
pub use memory_device::{MemoryDevice, MemoryDeviceType, MemoryFormFactor};
pub use port::{PortConnectorInformation, PortConnectorType};
pub use processor::{ProcessorCharacteristics, ProcessorInformation, ProcessorType};
pub use slots::{SlotPeerGroup, SlotType, SystemSlots};
pub use system::{SystemInformation, WakeUpType};
pub use tpm::TpmDevice;

use std::fmt::LowerHex;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;
const TIB: u64 = 1024 * GIB;

/// Name of an enumerated value, or its raw value in hex when it is out of range.
pub fn describe<T: ToString>(kind: Option<T>, raw: impl LowerHex) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => format!("{raw:#x}"),
    }
}

/// Format a byte count with the largest binary unit that divides it evenly.
///
/// ```rust
/// use dmiscope::smbios::format_size;
///
/// assert_eq!(format_size(16 * 1024 * 1024), "16 MB");
/// assert_eq!(format_size(1536), "1536 bytes");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    for (unit, name) in [(TIB, "TB"), (GIB, "GB"), (MIB, "MB"), (KIB, "kB")] {
        if bytes >= unit && bytes % unit == 0 {
            return format!("{} {}", bytes / unit, name);
        }
    }
    format!("{bytes} bytes")
}
