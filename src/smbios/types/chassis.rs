//! System Enclosure or Chassis (type 3), DSP0134 7.4.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use crate::{
    smbios::{
        layout::{DecodeMode, ElementKind, FieldKind, FieldType, FieldValue},
        types::describe,
        Header, TableType, TypedRecord,
    },
    Result,
};

/// Chassis type, DSP0134 7.4.1; bit 7 of the raw byte is the chassis lock flag
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, FromRepr, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ChassisType {
    Other = 0x01,
    Unknown = 0x02,
    Desktop = 0x03,
    #[strum(to_string = "Low Profile Desktop")]
    LowProfileDesktop = 0x04,
    #[strum(to_string = "Pizza Box")]
    PizzaBox = 0x05,
    #[strum(to_string = "Mini Tower")]
    MiniTower = 0x06,
    Tower = 0x07,
    Portable = 0x08,
    Laptop = 0x09,
    Notebook = 0x0A,
    #[strum(to_string = "Hand Held")]
    HandHeld = 0x0B,
    #[strum(to_string = "Docking Station")]
    DockingStation = 0x0C,
    #[strum(to_string = "All In One")]
    AllInOne = 0x0D,
    #[strum(to_string = "Sub Notebook")]
    SubNotebook = 0x0E,
    #[strum(to_string = "Space-saving")]
    SpaceSaving = 0x0F,
    #[strum(to_string = "Lunch Box")]
    LunchBox = 0x10,
    #[strum(to_string = "Main Server Chassis")]
    MainServerChassis = 0x11,
    #[strum(to_string = "Expansion Chassis")]
    ExpansionChassis = 0x12,
    #[strum(to_string = "Sub Chassis")]
    SubChassis = 0x13,
    #[strum(to_string = "Bus Expansion Chassis")]
    BusExpansionChassis = 0x14,
    #[strum(to_string = "Peripheral Chassis")]
    PeripheralChassis = 0x15,
    #[strum(to_string = "RAID Chassis")]
    RaidChassis = 0x16,
    #[strum(to_string = "Rack Mount Chassis")]
    RackMountChassis = 0x17,
    #[strum(to_string = "Sealed-case PC")]
    SealedCasePc = 0x18,
    #[strum(to_string = "Multi-system")]
    MultiSystem = 0x19,
    #[strum(to_string = "CompactPCI")]
    CompactPci = 0x1A,
    #[strum(to_string = "AdvancedTCA")]
    AdvancedTca = 0x1B,
    Blade = 0x1C,
    #[strum(to_string = "Blade Chassis")]
    BladeChassis = 0x1D,
    Tablet = 0x1E,
    Convertible = 0x1F,
    Detachable = 0x20,
    #[strum(to_string = "IoT Gateway")]
    IotGateway = 0x21,
    #[strum(to_string = "Embedded PC")]
    EmbeddedPc = 0x22,
    #[strum(to_string = "Mini PC")]
    MiniPc = 0x23,
    #[strum(to_string = "Stick PC")]
    StickPc = 0x24,
}

/// One contained element of a chassis, DSP0134 7.4.4
///
/// Element records are `contained_element_record_length` bytes long; bytes past the three
/// defined ones are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChassisContainedElement {
    /// Element type; bit 7 selects a record type instead of a board type
    pub element_type: u8,
    /// Minimum number of such elements
    pub minimum: u8,
    /// Maximum number of such elements
    pub maximum: u8,
    /// Trailing bytes of a longer element record
    pub extra: Vec<u8>,
}

impl ChassisContainedElement {
    /// Element with the three defined bytes only.
    #[must_use]
    pub fn new(element_type: u8, minimum: u8, maximum: u8) -> Self {
        ChassisContainedElement {
            element_type,
            minimum,
            maximum,
            extra: Vec::new(),
        }
    }

    /// Encoded size of the element record
    #[must_use]
    pub fn record_length(&self) -> usize {
        ELEMENT_FIELDS + self.extra.len()
    }
}

impl FieldType for ChassisContainedElement {
    fn from_value(field: &'static str, value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Bytes(bytes) => match bytes.as_slice() {
                [element_type, minimum, maximum, extra @ ..] => Ok(ChassisContainedElement {
                    element_type: *element_type,
                    minimum: *minimum,
                    maximum: *maximum,
                    extra: extra.to_vec(),
                }),
                short => Err(malformed_error!(
                    "field '{}' element of {} bytes is shorter than {}",
                    field,
                    short.len(),
                    ELEMENT_FIELDS
                )),
            },
            other => Err(malformed_error!(
                "field '{}' expects bytes, got {:?}",
                field,
                other
            )),
        }
    }

    fn to_value(&self) -> FieldValue {
        let mut bytes = vec![self.element_type, self.minimum, self.maximum];
        bytes.extend_from_slice(&self.extra);
        FieldValue::Bytes(bytes)
    }
}

/// Bytes of an element record with a defined meaning
const ELEMENT_FIELDS: usize = 3;

/// Chassis Information record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChassisInformation {
    /// Record header
    pub header: Header,
    /// Chassis manufacturer
    pub manufacturer: String,
    /// Raw [`ChassisType`] with the lock flag in bit 7
    pub chassis_type: u8,
    /// Chassis version
    pub version: String,
    /// Chassis serial number
    pub serial_number: String,
    /// Chassis asset tag
    pub asset_tag: String,
    /// State at last boot
    pub bootup_state: u8,
    /// Power supply state at last boot
    pub power_supply_state: u8,
    /// Thermal state at last boot
    pub thermal_state: u8,
    /// Physical security status at last boot
    pub security_status: u8,
    /// OEM- or BIOS vendor-specific information
    pub oem_defined: u32,
    /// Height in rack units, 0 if unspecified
    pub height: u8,
    /// Number of power cords, 0 if unspecified
    pub number_of_power_cords: u8,
    /// Number of entries in `contained_elements`
    pub contained_element_count: u8,
    /// Size of each contained element record; 0 means the elements are absent
    pub contained_element_record_length: u8,
    /// Elements contained in the chassis, empty when the record length is 0
    pub contained_elements: Vec<ChassisContainedElement>,
    /// Chassis SKU number (SMBIOS 2.7+)
    pub sku_number: String,
}

field_layout!(record ChassisInformation {
    manufacturer => FieldKind::Str,
    chassis_type => FieldKind::Uint(1),
    version => FieldKind::Str,
    serial_number => FieldKind::Str,
    asset_tag => FieldKind::Str,
    bootup_state => FieldKind::Uint(1),
    power_supply_state => FieldKind::Uint(1),
    thermal_state => FieldKind::Uint(1),
    security_status => FieldKind::Uint(1),
    oem_defined => FieldKind::Uint(4),
    height => FieldKind::Uint(1),
    number_of_power_cords => FieldKind::Uint(1),
    contained_element_count => FieldKind::Uint(1),
    contained_element_record_length => FieldKind::Uint(1),
    contained_elements => FieldKind::counted_by(
        "contained_element_count",
        ElementKind::SizedBy("contained_element_record_length"),
    ),
    sku_number => FieldKind::Str,
});

impl TypedRecord for ChassisInformation {
    const TABLE_TYPE: TableType = TableType::ChassisInformation;
    const MIN_LENGTH: u8 = 0x09;
    const MODE: DecodeMode = DecodeMode::Tolerant;
    const EXACT: bool = true;

    fn validate(&self) -> Result<()> {
        let length = usize::from(self.contained_element_record_length);
        if self.contained_element_count > 0 && (1..ELEMENT_FIELDS).contains(&length) {
            return Err(malformed_error!(
                "chassis contained element record length {} is shorter than {}",
                length,
                ELEMENT_FIELDS
            ));
        }
        let mismatched = self
            .contained_elements
            .iter()
            .find(|element| element.record_length() != length);
        if let Some(element) = mismatched {
            return Err(malformed_error!(
                "chassis contained element of {} bytes, record length is {}",
                element.record_length(),
                length
            ));
        }
        Ok(())
    }
}

impl ChassisInformation {
    /// Typed view of `chassis_type`, lock flag masked off
    #[must_use]
    pub fn kind(&self) -> Option<ChassisType> {
        ChassisType::from_repr(self.chassis_type & 0x7F)
    }

    /// `true` if a chassis lock is present
    #[must_use]
    pub fn has_lock(&self) -> bool {
        self.chassis_type & 0x80 != 0
    }
}

impl fmt::Display for ChassisInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tManufacturer: {}", self.manufacturer)?;
        writeln!(
            f,
            "\tType: {}",
            describe(self.kind(), self.chassis_type & 0x7F)
        )?;
        writeln!(
            f,
            "\tLock: {}",
            if self.has_lock() { "Present" } else { "Not Present" }
        )?;
        writeln!(f, "\tVersion: {}", self.version)?;
        writeln!(f, "\tSerial Number: {}", self.serial_number)?;
        writeln!(f, "\tAsset Tag: {}", self.asset_tag)?;
        writeln!(f, "\tOEM Information: 0x{:08X}", self.oem_defined)?;
        writeln!(f, "\tContained Elements: {}", self.contained_element_count)?;
        write!(f, "\tSKU Number: {}", self.sku_number)
    }
}
