//! Typed record contract.
//!
//! A typed record is a [`Table`] projected through its type's field layout. The
//! [`TypedRecord`] trait adds the per-type contract on top of [`FieldLayout`]: the type code,
//! the minimum declared length (the mandatory portion of the record), the decode mode and
//! whether the layout must account for every structured byte.
//!
//! Decoding and encoding are provided methods, so a record type only declares its layout
//! and constants.

use crate::{
    smbios::{
        layout::{decode_fields, encode_fields, DecodeMode, FieldLayout, RecordHeader, StringTable},
        Header, Table, TableType,
    },
    Error, Result,
};

/// A semantically decoded record type
pub trait TypedRecord: FieldLayout + RecordHeader {
    /// Type code this record decodes
    const TABLE_TYPE: TableType;

    /// Smallest declared length, header included, a record of this type may have
    const MIN_LENGTH: u8;

    /// How a structured region shorter than the full layout is handled
    const MODE: DecodeMode;

    /// Whether the layout must consume the structured region exactly
    ///
    /// Set for types with trailing arrays, where stray bytes mean the count and the length
    /// disagree.
    const EXACT: bool = false;

    /// Type-specific consistency checks run after decoding and before encoding.
    ///
    /// # Errors
    /// Returns a format error describing the inconsistency.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Project a generic table into this record type.
    ///
    /// # Errors
    /// - [`Error::WrongTableType`] if the table has another type code
    /// - [`Error::RecordTooShort`] if the declared length is below [`Self::MIN_LENGTH`]
    /// - [`Error::LengthMismatch`] for exact layouts that leave bytes unconsumed
    /// - any error of [`decode_fields`] or [`Self::validate`]
    fn decode(table: &Table) -> Result<Self> {
        let expected = Self::TABLE_TYPE.code();
        if table.table_type() != expected {
            return Err(Error::WrongTableType {
                expected,
                found: table.table_type(),
            });
        }
        if table.header.length < Self::MIN_LENGTH {
            return Err(Error::RecordTooShort {
                table_type: expected,
                minimum: Self::MIN_LENGTH,
                length: table.header.length,
            });
        }

        let (values, consumed) = decode_fields(Self::FIELDS, &table.data, &table.strings, Self::MODE)?;
        if Self::EXACT && consumed != table.data.len() {
            return Err(Error::LengthMismatch {
                table_type: expected,
                declared: table.len(),
                actual: consumed + Header::SIZE,
            });
        }

        let mut record = Self::from_values(values)?;
        *record.header_mut() = table.header;
        record.validate()?;
        Ok(record)
    }

    /// Encode the record into a generic table.
    ///
    /// Tolerant records that carry a declared length keep it for trailing fields that are
    /// still zero; a field holding a value is always written, growing the record. The
    /// returned table's length is always the emitted size.
    ///
    /// # Errors
    /// Returns an error if validation fails, a value does not fit its field, or the record
    /// grows past 255 bytes.
    fn encode(&self) -> Result<Table> {
        self.validate()?;

        let header = self.header();
        let limit = match Self::MODE {
            DecodeMode::Tolerant if header.length != 0 => {
                Some(usize::from(header.length).saturating_sub(Header::SIZE))
            }
            _ => None,
        };

        let mut strings = StringTable::default();
        let data = encode_fields(Self::FIELDS, &self.to_values(), limit, &mut strings)?;
        Table::new(
            Self::TABLE_TYPE.code(),
            header.handle,
            data,
            strings.into_strings(),
        )
    }
}
