use strum::{Display, EnumCount, EnumIter, FromRepr};

/// SMBIOS structure type codes defined by DSP0134.
///
/// Codes 128 to 255 are reserved for OEM-specific records and have no variant here.
#[derive(
    Clone, Copy, PartialEq, Debug, Display, EnumIter, EnumCount, FromRepr, Eq, Hash, PartialOrd, Ord,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TableType {
    #[strum(to_string = "BIOS Information")]
    BiosInformation = 0,
    #[strum(to_string = "System Information")]
    SystemInformation = 1,
    #[strum(to_string = "Base Board Information")]
    BaseboardInformation = 2,
    #[strum(to_string = "Chassis Information")]
    ChassisInformation = 3,
    #[strum(to_string = "Processor Information")]
    ProcessorInformation = 4,
    #[strum(to_string = "Memory Controller Information")]
    MemoryControllerInformation = 5,
    #[strum(to_string = "Memory Module Information")]
    MemoryModuleInformation = 6,
    #[strum(to_string = "Cache Information")]
    CacheInformation = 7,
    #[strum(to_string = "Port Connector Information")]
    PortConnectorInformation = 8,
    #[strum(to_string = "System Slots")]
    SystemSlots = 9,
    #[strum(to_string = "On Board Devices Information")]
    OnBoardDevicesInformation = 10,
    #[strum(to_string = "OEM Strings")]
    OemStrings = 11,
    #[strum(to_string = "System Configuration Options")]
    SystemConfigurationOptions = 12,
    #[strum(to_string = "BIOS Language Information")]
    BiosLanguageInformation = 13,
    #[strum(to_string = "Group Associations")]
    GroupAssociations = 14,
    #[strum(to_string = "System Event Log")]
    SystemEventLog = 15,
    #[strum(to_string = "Physical Memory Array")]
    PhysicalMemoryArray = 16,
    #[strum(to_string = "Memory Device")]
    MemoryDevice = 17,
    #[strum(to_string = "32-bit Memory Error Information")]
    MemoryError32 = 18,
    #[strum(to_string = "Memory Array Mapped Address")]
    MemoryArrayMappedAddress = 19,
    #[strum(to_string = "Memory Device Mapped Address")]
    MemoryDeviceMappedAddress = 20,
    #[strum(to_string = "Built-in Pointing Device")]
    BuiltInPointingDevice = 21,
    #[strum(to_string = "Portable Battery")]
    PortableBattery = 22,
    #[strum(to_string = "System Reset")]
    SystemReset = 23,
    #[strum(to_string = "Hardware Security")]
    HardwareSecurity = 24,
    #[strum(to_string = "System Power Controls")]
    SystemPowerControls = 25,
    #[strum(to_string = "Voltage Probe")]
    VoltageProbe = 26,
    #[strum(to_string = "Cooling Device")]
    CoolingDevice = 27,
    #[strum(to_string = "Temperature Probe")]
    TemperatureProbe = 28,
    #[strum(to_string = "Electrical Current Probe")]
    ElectricalCurrentProbe = 29,
    #[strum(to_string = "Out-of-band Remote Access")]
    OutOfBandRemoteAccess = 30,
    #[strum(to_string = "Boot Integrity Services Entry Point")]
    BootIntegrityServices = 31,
    #[strum(to_string = "System Boot Information")]
    SystemBootInformation = 32,
    #[strum(to_string = "64-bit Memory Error Information")]
    MemoryError64 = 33,
    #[strum(to_string = "Management Device")]
    ManagementDevice = 34,
    #[strum(to_string = "Management Device Component")]
    ManagementDeviceComponent = 35,
    #[strum(to_string = "Management Device Threshold Data")]
    ManagementDeviceThresholdData = 36,
    #[strum(to_string = "Memory Channel")]
    MemoryChannel = 37,
    #[strum(to_string = "IPMI Device Information")]
    IpmiDeviceInformation = 38,
    #[strum(to_string = "System Power Supply")]
    SystemPowerSupply = 39,
    #[strum(to_string = "Additional Information")]
    AdditionalInformation = 40,
    #[strum(to_string = "Onboard Devices Extended Information")]
    OnboardDevicesExtendedInformation = 41,
    #[strum(to_string = "Management Controller Host Interface")]
    ManagementControllerHostInterface = 42,
    #[strum(to_string = "TPM Device")]
    TpmDevice = 43,
    #[strum(to_string = "Processor Additional Information")]
    ProcessorAdditionalInformation = 44,
    #[strum(to_string = "Firmware Inventory Information")]
    FirmwareInventoryInformation = 45,
    #[strum(to_string = "String Property")]
    StringProperty = 46,
    #[strum(to_string = "Inactive")]
    Inactive = 126,
    #[strum(to_string = "End Of Table")]
    EndOfTable = 127,
}

impl TableType {
    /// First type code reserved for OEM-specific records
    pub const OEM_START: u8 = 128;

    /// Human readable name of any type code, including OEM and unassigned ones.
    #[must_use]
    pub fn describe_code(code: u8) -> String {
        match TableType::from_repr(code) {
            Some(kind) => kind.to_string(),
            None if code >= Self::OEM_START => format!("OEM-specific Type {code}"),
            None => format!("Unknown Type {code}"),
        }
    }

    /// Type code of this variant
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<TableType> for u8 {
    fn from(kind: TableType) -> u8 {
        kind as u8
    }
}
