//! # dmiscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dmiscope library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dmiscope operations
pub use crate::Error;

/// The result type used throughout dmiscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Decoded table set
pub use crate::Info;

/// Location of the sysfs table snapshot
pub use crate::SysfsPaths;

/// Live-memory modifier and its configuration
pub use crate::{Modifier, ModifierConfig};

// ================================================================================================
// Codec
// ================================================================================================

/// Entry points, generic tables and the type registry
pub use crate::smbios::{
    project, EntryPoint, EntryPoint32, EntryPoint64, Header, Table, TableStream, TableType,
    TypedRecord, TypedTable,
};

/// Typed records
pub use crate::smbios::{
    BaseboardInformation, BiosInformation, CacheInformation, ChassisInformation, EndOfTable,
    GroupAssociation, IpmiDeviceInformation, MemoryDevice, PhysicalMemoryArray,
    PortConnectorInformation, ProcessorInformation, SystemBootInformation, SystemInformation,
    SystemSlots, TpmDevice,
};

/// Label enums and flag sets
pub use crate::smbios::{
    BiosCharacteristics, BoardFeatures, BoardType, ChassisType, MemoryDeviceType,
    MemoryFormFactor, ProcessorCharacteristics, ProcessorType, SlotType,
};

// ================================================================================================
// Modifier
// ================================================================================================

/// Transforms applied by [`Modifier::modify`]
pub use crate::modifier::{
    remove_baseboard_information, replace_baseboard_information,
    replace_motherboard_information, replace_system_information, BaseboardOverride,
    OverrideOpt, PhysicalMemory, SystemInformationOverride,
};
