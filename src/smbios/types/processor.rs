//! Processor Information (type 4), DSP0134 7.5.

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter, FromRepr};

use crate::smbios::{
    layout::{DecodeMode, FieldKind},
    types::describe,
    Header, TableType, TypedRecord,
};

/// Processor type, DSP0134 7.5.1
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ProcessorType {
    Other = 0x01,
    Unknown = 0x02,
    #[strum(to_string = "Central Processor")]
    CentralProcessor = 0x03,
    #[strum(to_string = "Math Processor")]
    MathProcessor = 0x04,
    #[strum(to_string = "DSP Processor")]
    DspProcessor = 0x05,
    #[strum(to_string = "Video Processor")]
    VideoProcessor = 0x06,
}

bitflags! {
    /// Processor characteristics, DSP0134 7.5.9
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProcessorCharacteristics: u16 {
        /// Unknown
        const UNKNOWN = 1 << 1;
        /// 64-bit capable
        const CAPABLE_64BIT = 1 << 2;
        /// Multi-core
        const MULTI_CORE = 1 << 3;
        /// Hardware thread
        const HARDWARE_THREAD = 1 << 4;
        /// Execute protection
        const EXECUTE_PROTECTION = 1 << 5;
        /// Enhanced virtualization
        const ENHANCED_VIRTUALIZATION = 1 << 6;
        /// Power/performance control
        const POWER_PERFORMANCE_CONTROL = 1 << 7;
        /// 128-bit capable
        const CAPABLE_128BIT = 1 << 8;
        /// Arm64 SoC ID
        const ARM64_SOC_ID = 1 << 9;
    }
}

/// Family code meaning "see `family2`"
const FAMILY_INDICATOR: u8 = 0xFE;

/// Processor Information record
///
/// The record grew in SMBIOS 2.3 (serial, asset tag, part number), 2.5 (core and thread
/// counts), 2.6 (`family2`) and 3.0 (16-bit counts).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ProcessorInformation {
    /// Record header
    pub header: Header,
    /// Socket designation, e.g. "CPU0"
    pub socket_designation: String,
    /// Raw [`ProcessorType`]
    pub processor_type: u8,
    /// Processor family; 0xFE defers to `family2`
    pub family: u8,
    pub manufacturer: String,
    /// Raw CPUID signature and feature flags
    pub id: u64,
    pub version: String,
    /// Voltage, either a legacy bit mask or tenths of a volt with bit 7 set
    pub voltage: u8,
    /// External clock in MHz
    pub external_clock: u16,
    /// Maximum speed in MHz
    pub max_speed: u16,
    /// Current speed in MHz
    pub current_speed: u16,
    pub status: u8,
    pub upgrade: u8,
    pub l1_cache_handle: u16,
    pub l2_cache_handle: u16,
    pub l3_cache_handle: u16,
    pub serial_number: String,
    pub asset_tag: String,
    pub part_number: String,
    pub core_count: u8,
    pub core_enabled: u8,
    pub thread_count: u8,
    /// Raw [`ProcessorCharacteristics`]
    pub characteristics: u16,
    pub family2: u16,
    pub core_count2: u16,
    pub core_enabled2: u16,
    pub thread_count2: u16,
}

field_layout!(record ProcessorInformation {
    socket_designation => FieldKind::Str,
    processor_type => FieldKind::Uint(1),
    family => FieldKind::Uint(1),
    manufacturer => FieldKind::Str,
    id => FieldKind::Uint(8),
    version => FieldKind::Str,
    voltage => FieldKind::Uint(1),
    external_clock => FieldKind::Uint(2),
    max_speed => FieldKind::Uint(2),
    current_speed => FieldKind::Uint(2),
    status => FieldKind::Uint(1),
    upgrade => FieldKind::Uint(1),
    l1_cache_handle => FieldKind::Uint(2),
    l2_cache_handle => FieldKind::Uint(2),
    l3_cache_handle => FieldKind::Uint(2),
    serial_number => FieldKind::Str,
    asset_tag => FieldKind::Str,
    part_number => FieldKind::Str,
    core_count => FieldKind::Uint(1),
    core_enabled => FieldKind::Uint(1),
    thread_count => FieldKind::Uint(1),
    characteristics => FieldKind::Uint(2),
    family2 => FieldKind::Uint(2),
    core_count2 => FieldKind::Uint(2),
    core_enabled2 => FieldKind::Uint(2),
    thread_count2 => FieldKind::Uint(2),
});

impl TypedRecord for ProcessorInformation {
    const TABLE_TYPE: TableType = TableType::ProcessorInformation;
    const MIN_LENGTH: u8 = 0x1A;
    const MODE: DecodeMode = DecodeMode::Tolerant;
}

impl ProcessorInformation {
    /// Processor family, taken from `family2` when the record defers to it.
    #[must_use]
    pub fn processor_family(&self) -> u16 {
        if self.family == FAMILY_INDICATOR && self.header.length >= 0x2A {
            return self.family2;
        }
        u16::from(self.family)
    }

    /// Typed view of `processor_type`
    #[must_use]
    pub fn kind(&self) -> Option<ProcessorType> {
        ProcessorType::from_repr(self.processor_type)
    }

    /// Processor voltage in volts, 0 when unknown.
    #[must_use]
    pub fn voltage_volts(&self) -> f32 {
        if self.voltage & 0x80 != 0 {
            return f32::from(self.voltage & 0x7F) / 10.0;
        }
        if self.voltage & 0x01 != 0 {
            5.0
        } else if self.voltage & 0x02 != 0 {
            3.3
        } else if self.voltage & 0x04 != 0 {
            2.9
        } else {
            0.0
        }
    }

    /// Number of cores per socket.
    #[must_use]
    pub fn cores(&self) -> u16 {
        if self.header.length >= 0x2C && self.core_count == 0xFF {
            return self.core_count2;
        }
        u16::from(self.core_count)
    }

    /// Number of cores enabled by the BIOS.
    #[must_use]
    pub fn cores_enabled(&self) -> u16 {
        if self.header.length >= 0x2E && self.core_enabled == 0xFF {
            return self.core_enabled2;
        }
        u16::from(self.core_enabled)
    }

    /// Number of threads per socket.
    #[must_use]
    pub fn threads(&self) -> u16 {
        if self.header.length >= 0x30 && self.thread_count == 0xFF {
            return self.thread_count2;
        }
        u16::from(self.thread_count)
    }

    /// Typed view of `characteristics`
    #[must_use]
    pub fn characteristic_flags(&self) -> ProcessorCharacteristics {
        ProcessorCharacteristics::from_bits_retain(self.characteristics)
    }
}

impl fmt::Display for ProcessorInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tSocket Designation: {}", self.socket_designation)?;
        writeln!(f, "\tType: {}", describe(self.kind(), self.processor_type))?;
        writeln!(f, "\tFamily: {:#x}", self.processor_family())?;
        writeln!(f, "\tManufacturer: {}", self.manufacturer)?;
        writeln!(f, "\tID: {:016X}", self.id)?;
        writeln!(f, "\tVersion: {}", self.version)?;
        writeln!(f, "\tVoltage: {:.1} V", self.voltage_volts())?;
        writeln!(f, "\tMax Speed: {} MHz", self.max_speed)?;
        writeln!(f, "\tCurrent Speed: {} MHz", self.current_speed)?;
        writeln!(f, "\tCore Count: {}", self.cores())?;
        writeln!(f, "\tCore Enabled: {}", self.cores_enabled())?;
        write!(f, "\tThread Count: {}", self.threads())
    }
}
