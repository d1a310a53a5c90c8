use super::{count_of, ArrayCount, ElementKind, Field, FieldKind, FieldValue};
use crate::{file::io::push_le_sized, Error, Result};

/// Most strings a record can reference through a one-byte index
const MAX_STRINGS: usize = 255;

/// Ordered, deduplicated string list built while encoding a record
///
/// Empty strings are never stored; they encode as index 0.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    /// The 1-based index of `value`, adding it if it is new.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] when the record would need more than 255 strings or the
    /// string contains a NUL byte.
    pub fn index_of(&mut self, value: &str) -> Result<u8> {
        if value.is_empty() {
            return Ok(0);
        }
        if value.as_bytes().contains(&0) {
            return Err(malformed_error!("string {:?} contains a NUL byte", value));
        }

        let index = match self.strings.iter().position(|string| string == value) {
            Some(position) => position,
            None => {
                if self.strings.len() == MAX_STRINGS {
                    return Err(malformed_error!(
                        "a record cannot hold more than {} strings",
                        MAX_STRINGS
                    ));
                }
                self.strings.push(value.to_string());
                self.strings.len() - 1
            }
        };
        u8::try_from(index + 1).map_err(|_| malformed_error!("string index {} overflows", index + 1))
    }

    /// Number of collected strings
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// `true` if no string was collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// The collected strings, in index order
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

struct FieldEncoder<'s> {
    strings: &'s mut StringTable,
    out: Vec<u8>,
}

/// Encode field values into a structured region.
///
/// When `limit` is given, top-level fixed-size fields past the last non-zero value are only
/// written while they fit in `limit` bytes; encoding stops at the first one that does not.
/// Every field up to the last non-zero value is written even if the region outgrows `limit`.
/// Trailing arrays are always written in full once reached.
///
/// # Errors
/// - [`Error::FieldCount`] when an array disagrees with its count field
/// - [`Error::UnsupportedField`] for integer widths other than 1, 2, 4 or 8
/// - [`Error::Malformed`] for values that do not match their field kind or width
pub fn encode_fields(
    fields: &'static [Field],
    values: &[FieldValue],
    limit: Option<usize>,
    strings: &mut StringTable,
) -> Result<Vec<u8>> {
    let mut encoder = FieldEncoder {
        strings,
        out: Vec::new(),
    };
    encoder.encode_list(fields, values, limit)?;
    Ok(encoder.out)
}

impl FieldEncoder<'_> {
    fn encode_list(
        &mut self,
        fields: &[Field],
        values: &[FieldValue],
        limit: Option<usize>,
    ) -> Result<()> {
        if fields.len() != values.len() {
            return Err(malformed_error!(
                "layout has {} fields but {} values were supplied",
                fields.len(),
                values.len()
            ));
        }

        let start = self.out.len();
        let last_set = values.iter().rposition(|value| !value.is_zero());
        for (index, (field, value)) in fields.iter().zip(values).enumerate() {
            if let (Some(limit), Some(size)) = (limit, field.kind.fixed_size()) {
                let holds_value = last_set.is_some_and(|last| index <= last);
                if !holds_value && self.out.len() - start + size > limit {
                    break;
                }
            }
            self.encode_field(field, fields, values, value)?;
        }
        Ok(())
    }

    fn push_uint(&mut self, field: &Field, width: usize, value: &FieldValue) -> Result<()> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(Error::UnsupportedField { field: field.name });
        }
        match value {
            FieldValue::Uint(raw) => push_le_sized(&mut self.out, width, *raw),
            other => Err(mismatch(field, other)),
        }
    }

    fn encode_field(
        &mut self,
        field: &Field,
        fields: &[Field],
        values: &[FieldValue],
        value: &FieldValue,
    ) -> Result<()> {
        match (field.kind, value) {
            (FieldKind::Uint(width), value) => self.push_uint(field, width, value),
            (FieldKind::Str, FieldValue::Str(string)) => {
                let index = self.strings.index_of(string)?;
                self.out.push(index);
                Ok(())
            }
            (FieldKind::Bytes(len), FieldValue::Bytes(bytes)) => {
                if bytes.len() != len {
                    return Err(malformed_error!(
                        "field '{}' holds {} bytes, layout requires {}",
                        field.name,
                        bytes.len(),
                        len
                    ));
                }
                self.out.extend_from_slice(bytes);
                Ok(())
            }
            (FieldKind::Nested(nested), FieldValue::Nested(nested_values)) => {
                self.encode_list(nested, nested_values, None)
            }
            (FieldKind::Array { count, element }, FieldValue::Array(items)) => {
                let stride = match element {
                    ElementKind::SizedBy(name) => Some(count_of(fields, values, name)?),
                    _ => None,
                };
                if stride == Some(0) {
                    if !items.is_empty() {
                        return Err(malformed_error!(
                            "field '{}' holds {} elements but their size is 0",
                            field.name,
                            items.len()
                        ));
                    }
                    return Ok(());
                }
                if let ArrayCount::Field(name) = count {
                    let declared = count_of(fields, values, name)?;
                    if declared != items.len() {
                        return Err(Error::FieldCount {
                            field: field.name,
                            declared,
                            actual: items.len(),
                        });
                    }
                }
                for item in items {
                    match (element, item) {
                        (ElementKind::Uint(width), item) => self.push_uint(field, width, item)?,
                        (ElementKind::Nested(nested), FieldValue::Nested(nested_values)) => {
                            self.encode_list(nested, nested_values, None)?;
                        }
                        (ElementKind::SizedBy(_), FieldValue::Bytes(bytes)) => {
                            if Some(bytes.len()) != stride {
                                return Err(malformed_error!(
                                    "field '{}' element holds {} bytes, expected {}",
                                    field.name,
                                    bytes.len(),
                                    stride.unwrap_or_default()
                                ));
                            }
                            self.out.extend_from_slice(bytes);
                        }
                        (_, other) => return Err(mismatch(field, other)),
                    }
                }
                Ok(())
            }
            (_, other) => Err(mismatch(field, other)),
        }
    }
}

fn mismatch(field: &Field, value: &FieldValue) -> Error {
    malformed_error!(
        "value {:?} does not match the kind of field '{}'",
        value,
        field.name
    )
}
