//! Generic SMBIOS records.
//!
//! A [`Table`] is the untyped form every record passes through: a 4-byte [`Header`], the
//! structured region of exactly `length - 4` bytes, and the ordered list of trailing strings.
//! Typed records are projections of a `Table` and encode back into one.

use std::fmt;

use crate::{
    file::{io::read_le_at, parser::Parser},
    smbios::TableType,
    Error, Result,
};

/// Record header present at the start of every table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Header {
    /// Type code of the record
    pub table_type: u8,
    /// Length of the header plus structured region, strings excluded
    pub length: u8,
    /// Stream-unique handle other records use to reference this one
    pub handle: u16,
}

impl Header {
    /// Size of the serialized header
    pub const SIZE: usize = 4;

    /// Read a header at the parser position.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if fewer than four bytes remain.
    pub fn read(parser: &mut Parser) -> Result<Self> {
        Ok(Header {
            table_type: parser.read_le()?,
            length: parser.read_le()?,
            handle: parser.read_le()?,
        })
    }

    /// Append the serialized header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.table_type);
        out.push(self.length);
        out.extend_from_slice(&self.handle.to_le_bytes());
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = TableType::from_repr(self.table_type)
            .map_or_else(|| TableType::describe_code(self.table_type), |kind| kind.to_string());
        write!(
            f,
            "Handle 0x{:04X}, DMI type {}, {} bytes\n{}",
            self.handle, self.table_type, self.length, name
        )
    }
}

/// An untyped SMBIOS record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// The record header
    pub header: Header,
    /// Structured region following the header, `header.length - 4` bytes
    pub data: Vec<u8>,
    /// Trailing strings, referenced by 1-based index from the structured region
    pub strings: Vec<String>,
}

impl Table {
    /// Create a table, deriving the declared length from `data`.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the structured region does not fit a length byte.
    pub fn new(table_type: u8, handle: u16, data: Vec<u8>, strings: Vec<String>) -> Result<Self> {
        let length = u8::try_from(data.len() + Header::SIZE).map_err(|_| {
            malformed_error!("structured region of {} bytes is too long", data.len())
        })?;
        Ok(Table {
            header: Header {
                table_type,
                length,
                handle,
            },
            data,
            strings,
        })
    }

    /// Type code of the record
    #[must_use]
    pub fn table_type(&self) -> u8 {
        self.header.table_type
    }

    /// Handle of the record
    #[must_use]
    pub fn handle(&self) -> u16 {
        self.header.handle
    }

    /// Declared length, header included
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.header.length)
    }

    /// `true` when the record has no structured region
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resolve a 1-based string index; 0 yields an empty string.
    ///
    /// # Errors
    /// Returns [`Error::StringIndex`] for an index past the string list.
    pub fn string(&self, index: u8) -> Result<&str> {
        resolve_string(&self.strings, index)
    }

    fn region_offset(&self, offset: usize, len: usize) -> Result<usize> {
        if offset < Header::SIZE {
            return Err(malformed_error!(
                "offset {:#x} lies inside the record header",
                offset
            ));
        }
        let start = offset - Header::SIZE;
        if start + len > self.data.len() {
            return Err(out_of_bounds_error!());
        }
        Ok(start)
    }

    /// Borrow `len` bytes at a record offset as used in DSP0134 (header included).
    ///
    /// # Errors
    /// Returns an error for offsets inside the header or past the structured region.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let start = self.region_offset(offset, len)?;
        Ok(&self.data[start..start + len])
    }

    /// Read the byte at a record offset.
    ///
    /// # Errors
    /// See [`Table::bytes_at`].
    pub fn byte_at(&self, offset: usize) -> Result<u8> {
        let mut start = self.region_offset(offset, 1)?;
        read_le_at(&self.data, &mut start)
    }

    /// Read the word at a record offset.
    ///
    /// # Errors
    /// See [`Table::bytes_at`].
    pub fn word_at(&self, offset: usize) -> Result<u16> {
        let mut start = self.region_offset(offset, 2)?;
        read_le_at(&self.data, &mut start)
    }

    /// Read the double word at a record offset.
    ///
    /// # Errors
    /// See [`Table::bytes_at`].
    pub fn dword_at(&self, offset: usize) -> Result<u32> {
        let mut start = self.region_offset(offset, 4)?;
        read_le_at(&self.data, &mut start)
    }

    /// Read the quad word at a record offset.
    ///
    /// # Errors
    /// See [`Table::bytes_at`].
    pub fn qword_at(&self, offset: usize) -> Result<u64> {
        let mut start = self.region_offset(offset, 8)?;
        read_le_at(&self.data, &mut start)
    }

    /// Resolve the string whose index is stored at a record offset.
    ///
    /// # Errors
    /// See [`Table::bytes_at`] and [`Table::string`].
    pub fn string_at(&self, offset: usize) -> Result<&str> {
        let index = self.byte_at(offset)?;
        self.string(index)
    }

    /// Size of the serialized record, strings and terminators included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let strings: usize = self.strings.iter().map(|s| s.len() + 1).sum();
        Header::SIZE + self.data.len() + strings.max(1) + 1
    }

    /// Append the serialized record to `out`.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the declared length disagrees with the structured
    /// region, or [`Error::Malformed`] for strings that cannot be stored (empty or holding NUL).
    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.len() != self.data.len() + Header::SIZE {
            return Err(Error::LengthMismatch {
                table_type: self.header.table_type,
                declared: self.len(),
                actual: self.data.len() + Header::SIZE,
            });
        }

        self.header.write(out);
        out.extend_from_slice(&self.data);
        if self.strings.is_empty() {
            out.push(0);
        }
        for string in &self.strings {
            if string.is_empty() || string.as_bytes().contains(&0) {
                return Err(malformed_error!(
                    "string {:?} cannot be stored in table type {}",
                    string,
                    self.header.table_type
                ));
            }
            out.extend_from_slice(string.as_bytes());
            out.push(0);
        }
        out.push(0);
        Ok(())
    }

    /// Serialize the record.
    ///
    /// # Errors
    /// See [`Table::write`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out)?;
        Ok(out)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        write!(f, "\tHeader and Data:")?;
        let mut header = Vec::with_capacity(Header::SIZE);
        self.header.write(&mut header);
        for (index, byte) in header.iter().chain(self.data.iter()).enumerate() {
            if index % 16 == 0 {
                write!(f, "\n\t\t")?;
            } else {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        if !self.strings.is_empty() {
            write!(f, "\n\tStrings:")?;
            for string in &self.strings {
                write!(f, "\n\t\t{string}")?;
            }
        }
        Ok(())
    }
}

pub(crate) fn resolve_string(strings: &[String], index: u8) -> Result<&str> {
    if index == 0 {
        return Ok("");
    }
    match strings.get(usize::from(index) - 1) {
        Some(string) => Ok(string.as_str()),
        None => Err(Error::StringIndex {
            index,
            count: strings.len(),
        }),
    }
}
