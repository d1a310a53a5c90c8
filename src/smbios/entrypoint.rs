//! SMBIOS entry point structures.
//!
//! The entry point is the small anchor structure that locates and sizes the table stream.
//! Two variants exist:
//!
//! - [`EntryPoint32`] (`_SM_`, 0x1F bytes) carries a second, intermediate anchor `_DMI_`
//!   with its own checksum over bytes 0x10..0x1F
//! - [`EntryPoint64`] (`_SM3_`, 0x18 bytes) introduced by SMBIOS 3.0
//!
//! Decoding validates anchors, the declared length and every checksum. Encoding never takes
//! a checksum from the caller: all checksum bytes are recomputed from the serialized data.
//!
//! # Examples
//!
//! ```rust
//! use dmiscope::smbios::{EntryPoint, EntryPoint64};
//!
//! let entry = EntryPoint::Bits64(EntryPoint64::new(3, 2, 0x200, 0x7000_0000));
//! let bytes = entry.encode();
//! assert_eq!(bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)), 0);
//!
//! let decoded = EntryPoint::decode(&bytes)?;
//! assert_eq!(decoded.table_address(), 0x7000_0000);
//! # Ok::<(), dmiscope::Error>(())
//! ```

use std::fmt;

use crate::{
    file::io::{read_le, read_le_at},
    Error, Result,
};

/// Anchor of the 32-bit entry point
pub const ANCHOR_32: &[u8] = b"_SM_";
/// Intermediate anchor of the 32-bit entry point
pub const INTERMEDIATE_ANCHOR: &[u8] = b"_DMI_";
/// Anchor of the 64-bit entry point
pub const ANCHOR_64: &[u8] = b"_SM3_";

/// Size of the 32-bit entry point structure
pub const ENTRY_POINT_32_SIZE: usize = 0x1F;
/// Size of the 64-bit entry point structure
pub const ENTRY_POINT_64_SIZE: usize = 0x18;

const CHECKSUM_32_OFFSET: usize = 0x04;
const INTERMEDIATE_START: usize = 0x10;
const INTERMEDIATE_CHECKSUM_OFFSET: usize = 0x05;
const CHECKSUM_64_OFFSET: usize = 0x05;

/// Computes the byte that makes `bytes` sum to zero mod 256, ignoring the byte at `skip`.
#[must_use]
pub fn checksum(bytes: &[u8], skip: usize) -> u8 {
    let sum = bytes
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != skip)
        .fold(0u8, |acc, (_, byte)| acc.wrapping_add(*byte));
    0u8.wrapping_sub(sum)
}

fn verify_checksum(bytes: &[u8], skip: usize, region: &'static str) -> Result<()> {
    let expected = checksum(bytes, skip);
    let found = bytes[skip];
    if expected != found {
        return Err(Error::InvalidChecksum {
            region,
            expected,
            found,
        });
    }
    Ok(())
}

fn verify_anchor(data: &[u8], anchor: &'static [u8], variant: &'static str) -> Result<()> {
    let Some(found) = data.get(..anchor.len()) else {
        return Err(Error::InvalidAnchor {
            variant,
            expected: anchor,
            found: data.to_vec(),
        });
    };
    if found != anchor {
        return Err(Error::InvalidAnchor {
            variant,
            expected: anchor,
            found: found.to_vec(),
        });
    }
    Ok(())
}

/// The SMBIOS 2.1 32-bit entry point (`_SM_`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint32 {
    /// Checksum over the whole structure, as last decoded or encoded
    pub checksum: u8,
    /// Declared structure length, always 0x1F when valid
    pub length: u8,
    /// SMBIOS major version
    pub major_version: u8,
    /// SMBIOS minor version
    pub minor_version: u8,
    /// Size of the largest structure in the table stream
    pub max_struct_size: u16,
    /// Entry point revision
    pub revision: u8,
    /// Formatted area, reserved
    pub formatted_area: [u8; 5],
    /// Checksum over the intermediate range 0x10..0x1F
    pub intermediate_checksum: u8,
    /// Total length of the table stream in bytes
    pub table_length: u16,
    /// Physical address of the table stream
    pub table_address: u32,
    /// Number of structures in the table stream
    pub number_of_structs: u16,
    /// SMBIOS revision in BCD
    pub bcd_revision: u8,
}

impl EntryPoint32 {
    /// Create an entry point with the given version and table location.
    ///
    /// Checksums are filled in by [`EntryPoint32::encode`].
    #[must_use]
    pub fn new(
        major_version: u8,
        minor_version: u8,
        table_length: u16,
        table_address: u32,
        number_of_structs: u16,
    ) -> Self {
        EntryPoint32 {
            checksum: 0,
            length: ENTRY_POINT_32_SIZE as u8,
            major_version,
            minor_version,
            max_struct_size: 0,
            revision: 0,
            formatted_area: [0; 5],
            intermediate_checksum: 0,
            table_length,
            table_address,
            number_of_structs,
            bcd_revision: (major_version << 4) | (minor_version & 0x0F),
        }
    }

    /// Decode and validate a 32-bit entry point.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAnchor`], [`Error::InvalidLength`], [`Error::InvalidChecksum`]
    /// naming the failing range, or [`Error::OutOfBounds`] for truncated input.
    pub fn decode(data: &[u8]) -> Result<Self> {
        verify_anchor(data, ANCHOR_32, "32-bit")?;
        let length: u8 = read_le(data.get(5..).unwrap_or_default())?;
        if usize::from(length) != ENTRY_POINT_32_SIZE {
            return Err(Error::InvalidLength {
                variant: "32-bit",
                expected: ENTRY_POINT_32_SIZE as u8,
                found: length,
            });
        }
        let Some(bytes) = data.get(..ENTRY_POINT_32_SIZE) else {
            return Err(out_of_bounds_error!());
        };

        verify_checksum(bytes, CHECKSUM_32_OFFSET, "entry point")?;
        verify_anchor(&bytes[INTERMEDIATE_START..], INTERMEDIATE_ANCHOR, "32-bit")?;
        verify_checksum(
            &bytes[INTERMEDIATE_START..],
            INTERMEDIATE_CHECKSUM_OFFSET,
            "intermediate",
        )?;

        let mut offset = CHECKSUM_32_OFFSET;
        let checksum = read_le_at(bytes, &mut offset)?;
        let length = read_le_at(bytes, &mut offset)?;
        let major_version = read_le_at(bytes, &mut offset)?;
        let minor_version = read_le_at(bytes, &mut offset)?;
        let max_struct_size = read_le_at(bytes, &mut offset)?;
        let revision = read_le_at(bytes, &mut offset)?;
        let mut formatted_area = [0u8; 5];
        formatted_area.copy_from_slice(&bytes[offset..offset + 5]);
        offset = INTERMEDIATE_START + INTERMEDIATE_CHECKSUM_OFFSET;

        Ok(EntryPoint32 {
            checksum,
            length,
            major_version,
            minor_version,
            max_struct_size,
            revision,
            formatted_area,
            intermediate_checksum: read_le_at(bytes, &mut offset)?,
            table_length: read_le_at(bytes, &mut offset)?,
            table_address: read_le_at(bytes, &mut offset)?,
            number_of_structs: read_le_at(bytes, &mut offset)?,
            bcd_revision: read_le_at(bytes, &mut offset)?,
        })
    }

    /// Serialize the entry point, recomputing both checksums.
    ///
    /// The intermediate checksum is computed first since the outer checksum covers it.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; ENTRY_POINT_32_SIZE];
        bytes[..4].copy_from_slice(ANCHOR_32);
        bytes[5] = ENTRY_POINT_32_SIZE as u8;
        bytes[6] = self.major_version;
        bytes[7] = self.minor_version;
        bytes[8..10].copy_from_slice(&self.max_struct_size.to_le_bytes());
        bytes[10] = self.revision;
        bytes[11..16].copy_from_slice(&self.formatted_area);
        bytes[16..21].copy_from_slice(INTERMEDIATE_ANCHOR);
        bytes[22..24].copy_from_slice(&self.table_length.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.table_address.to_le_bytes());
        bytes[28..30].copy_from_slice(&self.number_of_structs.to_le_bytes());
        bytes[30] = self.bcd_revision;

        let intermediate = checksum(&bytes[INTERMEDIATE_START..], INTERMEDIATE_CHECKSUM_OFFSET);
        bytes[INTERMEDIATE_START + INTERMEDIATE_CHECKSUM_OFFSET] = intermediate;
        bytes[CHECKSUM_32_OFFSET] = checksum(&bytes, CHECKSUM_32_OFFSET);
        bytes
    }
}

/// The SMBIOS 3.0 64-bit entry point (`_SM3_`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint64 {
    /// Checksum over the whole structure, as last decoded or encoded
    pub checksum: u8,
    /// Declared structure length, always 0x18 when valid
    pub length: u8,
    /// SMBIOS major version
    pub major_version: u8,
    /// SMBIOS minor version
    pub minor_version: u8,
    /// SMBIOS docrev
    pub doc_rev: u8,
    /// Entry point revision
    pub revision: u8,
    /// Reserved
    pub reserved: u8,
    /// Maximum size of the table stream in bytes
    pub max_struct_size: u32,
    /// Physical address of the table stream
    pub table_address: u64,
}

impl EntryPoint64 {
    /// Create an entry point with the given version and table location.
    #[must_use]
    pub fn new(major_version: u8, minor_version: u8, max_struct_size: u32, table_address: u64) -> Self {
        EntryPoint64 {
            checksum: 0,
            length: ENTRY_POINT_64_SIZE as u8,
            major_version,
            minor_version,
            doc_rev: 0,
            revision: 1,
            reserved: 0,
            max_struct_size,
            table_address,
        }
    }

    /// Decode and validate a 64-bit entry point.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAnchor`], [`Error::InvalidLength`], [`Error::InvalidChecksum`]
    /// or [`Error::OutOfBounds`] for truncated input.
    pub fn decode(data: &[u8]) -> Result<Self> {
        verify_anchor(data, ANCHOR_64, "64-bit")?;
        let length: u8 = read_le(data.get(6..).unwrap_or_default())?;
        if usize::from(length) != ENTRY_POINT_64_SIZE {
            return Err(Error::InvalidLength {
                variant: "64-bit",
                expected: ENTRY_POINT_64_SIZE as u8,
                found: length,
            });
        }
        let Some(bytes) = data.get(..ENTRY_POINT_64_SIZE) else {
            return Err(out_of_bounds_error!());
        };
        verify_checksum(bytes, CHECKSUM_64_OFFSET, "entry point")?;

        let mut offset = CHECKSUM_64_OFFSET;
        Ok(EntryPoint64 {
            checksum: read_le_at(bytes, &mut offset)?,
            length: read_le_at(bytes, &mut offset)?,
            major_version: read_le_at(bytes, &mut offset)?,
            minor_version: read_le_at(bytes, &mut offset)?,
            doc_rev: read_le_at(bytes, &mut offset)?,
            revision: read_le_at(bytes, &mut offset)?,
            reserved: read_le_at(bytes, &mut offset)?,
            max_struct_size: read_le_at(bytes, &mut offset)?,
            table_address: read_le_at(bytes, &mut offset)?,
        })
    }

    /// Serialize the entry point, recomputing the checksum.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; ENTRY_POINT_64_SIZE];
        bytes[..5].copy_from_slice(ANCHOR_64);
        bytes[6] = ENTRY_POINT_64_SIZE as u8;
        bytes[7] = self.major_version;
        bytes[8] = self.minor_version;
        bytes[9] = self.doc_rev;
        bytes[10] = self.revision;
        bytes[11] = self.reserved;
        bytes[12..16].copy_from_slice(&self.max_struct_size.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.table_address.to_le_bytes());

        bytes[CHECKSUM_64_OFFSET] = checksum(&bytes, CHECKSUM_64_OFFSET);
        bytes
    }
}

/// Either SMBIOS entry point variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// `_SM_` entry point
    Bits32(EntryPoint32),
    /// `_SM3_` entry point
    Bits64(EntryPoint64),
}

impl EntryPoint {
    /// Decode an entry point, trying the 32-bit layout first and the 64-bit layout second.
    ///
    /// # Errors
    /// Returns [`Error::EntryPoint`] holding both failures if neither layout matches.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let bits32 = match EntryPoint32::decode(data) {
            Ok(entry) => return Ok(EntryPoint::Bits32(entry)),
            Err(error) => error,
        };
        match EntryPoint64::decode(data) {
            Ok(entry) => Ok(EntryPoint::Bits64(entry)),
            Err(bits64) => Err(Error::EntryPoint {
                bits32: Box::new(bits32),
                bits64: Box::new(bits64),
            }),
        }
    }

    /// Serialize the entry point with freshly computed checksums.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            EntryPoint::Bits32(entry) => entry.encode(),
            EntryPoint::Bits64(entry) => entry.encode(),
        }
    }

    /// Size of the serialized structure
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            EntryPoint::Bits32(_) => ENTRY_POINT_32_SIZE,
            EntryPoint::Bits64(_) => ENTRY_POINT_64_SIZE,
        }
    }

    /// `true` for the `_SM3_` variant
    #[must_use]
    pub fn is_64bit(&self) -> bool {
        matches!(self, EntryPoint::Bits64(_))
    }

    /// SMBIOS version as (major, minor, revision)
    #[must_use]
    pub fn version(&self) -> (u8, u8, u8) {
        match self {
            EntryPoint::Bits32(entry) => (entry.major_version, entry.minor_version, 0),
            EntryPoint::Bits64(entry) => {
                (entry.major_version, entry.minor_version, entry.doc_rev)
            }
        }
    }

    /// Physical address of the table stream
    #[must_use]
    pub fn table_address(&self) -> u64 {
        match self {
            EntryPoint::Bits32(entry) => u64::from(entry.table_address),
            EntryPoint::Bits64(entry) => entry.table_address,
        }
    }

    /// Declared size of the table stream: the exact length for 32-bit entry points, the
    /// maximum length for 64-bit ones.
    #[must_use]
    pub fn table_max_size(&self) -> usize {
        match self {
            EntryPoint::Bits32(entry) => usize::from(entry.table_length),
            EntryPoint::Bits64(entry) => entry.max_struct_size as usize,
        }
    }

    /// Record a re-encoded table stream of `length` bytes holding `count` structures.
    ///
    /// For 32-bit entry points this sets the table length and structure count and, when
    /// given, the largest structure size. For 64-bit entry points the maximum size becomes
    /// `length`.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a value does not fit its field.
    pub fn set_table_length(
        &mut self,
        length: usize,
        count: usize,
        largest: Option<usize>,
    ) -> Result<()> {
        match self {
            EntryPoint::Bits32(entry) => {
                entry.table_length = u16::try_from(length)
                    .map_err(|_| malformed_error!("table length {} exceeds 16 bits", length))?;
                entry.number_of_structs = u16::try_from(count)
                    .map_err(|_| malformed_error!("structure count {} exceeds 16 bits", count))?;
                if let Some(largest) = largest {
                    entry.max_struct_size = u16::try_from(largest).map_err(|_| {
                        malformed_error!("structure size {} exceeds 16 bits", largest)
                    })?;
                }
            }
            EntryPoint::Bits64(entry) => {
                entry.max_struct_size = u32::try_from(length)
                    .map_err(|_| malformed_error!("table length {} exceeds 32 bits", length))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor, revision) = self.version();
        match self {
            EntryPoint::Bits32(entry) => write!(
                f,
                "SMBIOS {major}.{minor} present, {} structures occupying {} bytes at {:#010x}",
                entry.number_of_structs, entry.table_length, entry.table_address
            ),
            EntryPoint::Bits64(entry) => write!(
                f,
                "SMBIOS {major}.{minor}.{revision} present, table of at most {} bytes at {:#x}",
                entry.max_struct_size, entry.table_address
            ),
        }
    }
}
