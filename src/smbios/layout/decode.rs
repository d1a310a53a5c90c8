use super::{count_of, ArrayCount, DecodeMode, ElementKind, Field, FieldKind, FieldValue};
use crate::{
    file::{io::read_le_sized_at, parser::Parser},
    smbios::table::resolve_string,
    Error, Result,
};

struct FieldDecoder<'a> {
    parser: Parser<'a>,
    strings: &'a [String],
    mode: DecodeMode,
}

/// Decode a structured region against a layout.
///
/// Returns one value per field, in layout order, and the number of region bytes consumed.
///
/// # Errors
/// - [`Error::RequiredFieldsMissing`] when strict decoding runs out of bytes
/// - [`Error::StringIndex`] for a string index past the record's strings
/// - [`Error::FieldCount`] when a trailing array disagrees with its count
/// - [`Error::UnsupportedField`] for integer widths other than 1, 2, 4 or 8
pub fn decode_fields(
    fields: &'static [Field],
    region: &[u8],
    strings: &[String],
    mode: DecodeMode,
) -> Result<(Vec<FieldValue>, usize)> {
    let mut decoder = FieldDecoder {
        parser: Parser::new(region),
        strings,
        mode,
    };
    let values = decoder.decode_list(fields)?;
    Ok((values, decoder.parser.pos()))
}

impl FieldDecoder<'_> {
    fn decode_list(&mut self, fields: &'static [Field]) -> Result<Vec<FieldValue>> {
        let mut values = Vec::with_capacity(fields.len());
        let mut exhausted = false;

        for field in fields {
            if !exhausted && self.mode == DecodeMode::Tolerant {
                exhausted = !self.fits(field, fields, &values)?;
            }
            if exhausted {
                values.push(field.kind.zero_value());
                continue;
            }

            let value = self.decode_field(field, fields, &values)?;
            values.push(value);
        }

        Ok(values)
    }

    /// Whether a tolerant decode should still read `field`.
    fn fits(&self, field: &Field, fields: &[Field], values: &[FieldValue]) -> Result<bool> {
        let remaining = self.parser.remaining();
        match field.kind {
            FieldKind::Array { count, .. } => {
                if remaining > 0 {
                    return Ok(true);
                }
                // An empty region still has to agree with a non-zero count.
                match count {
                    ArrayCount::Field(name) => Ok(count_of(fields, values, name)? > 0),
                    ArrayCount::Remaining => Ok(false),
                }
            }
            kind => match kind.fixed_size() {
                Some(size) => Ok(size <= remaining),
                None => Err(Error::UnsupportedField { field: field.name }),
            },
        }
    }

    fn require(&self, field: &Field, needed: usize) -> Result<()> {
        let remaining = self.parser.remaining();
        if needed > remaining {
            return Err(Error::RequiredFieldsMissing {
                field: field.name,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    fn read_uint(&mut self, field: &Field, width: usize) -> Result<u64> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(Error::UnsupportedField { field: field.name });
        }
        self.require(field, width)?;
        let mut position = self.parser.pos();
        let value = read_le_sized_at(self.parser.data(), &mut position, width)?;
        self.parser.seek(position)?;
        Ok(value)
    }

    fn decode_field(
        &mut self,
        field: &Field,
        fields: &[Field],
        values: &[FieldValue],
    ) -> Result<FieldValue> {
        match field.kind {
            FieldKind::Uint(width) => Ok(FieldValue::Uint(self.read_uint(field, width)?)),
            FieldKind::Str => {
                self.require(field, 1)?;
                let index: u8 = self.parser.read_le()?;
                let string = resolve_string(self.strings, index)?;
                Ok(FieldValue::Str(string.to_string()))
            }
            FieldKind::Bytes(len) => {
                self.require(field, len)?;
                Ok(FieldValue::Bytes(self.parser.read_bytes(len)?.to_vec()))
            }
            FieldKind::Nested(nested) => {
                if let Some(size) = super::layout_size(nested) {
                    self.require(field, size)?;
                }
                Ok(FieldValue::Nested(self.decode_list(nested)?))
            }
            FieldKind::Array { count, element } => {
                self.decode_array(field, fields, values, count, element)
            }
        }
    }

    fn decode_array(
        &mut self,
        field: &Field,
        fields: &[Field],
        values: &[FieldValue],
        count: ArrayCount,
        element: ElementKind,
    ) -> Result<FieldValue> {
        let size = match element {
            ElementKind::SizedBy(name) => match count_of(fields, values, name)? {
                0 => return Ok(FieldValue::Array(Vec::new())),
                size => size,
            },
            _ => match element.size() {
                Some(size) if size > 0 => size,
                _ => return Err(Error::UnsupportedField { field: field.name }),
            },
        };
        let remaining = self.parser.remaining();

        let count = match count {
            ArrayCount::Field(name) => count_of(fields, values, name)?,
            ArrayCount::Remaining => {
                if remaining % size != 0 {
                    return Err(malformed_error!(
                        "field '{}': {} trailing bytes are not a whole number of {}-byte elements",
                        field.name,
                        remaining,
                        size
                    ));
                }
                remaining / size
            }
        };

        if count.saturating_mul(size) > remaining {
            return Err(Error::FieldCount {
                field: field.name,
                declared: count,
                actual: remaining / size,
            });
        }

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let item = match element {
                ElementKind::Uint(width) => FieldValue::Uint(self.read_uint(field, width)?),
                ElementKind::Nested(nested) => FieldValue::Nested(self.decode_list(nested)?),
                ElementKind::SizedBy(_) => {
                    FieldValue::Bytes(self.parser.read_bytes(size)?.to_vec())
                }
            };
            items.push(item);
        }
        Ok(FieldValue::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::layout::FieldKind;

    const PAIR: &[Field] = &[
        Field {
            name: "kind",
            kind: FieldKind::Uint(1),
        },
        Field {
            name: "handle",
            kind: FieldKind::Uint(2),
        },
    ];

    const LAYOUT: &[Field] = &[
        Field {
            name: "name",
            kind: FieldKind::Str,
        },
        Field {
            name: "value",
            kind: FieldKind::Uint(2),
        },
        Field {
            name: "count",
            kind: FieldKind::Uint(1),
        },
        Field {
            name: "items",
            kind: FieldKind::counted_by("count", ElementKind::Nested(PAIR)),
        },
    ];

    fn strings() -> Vec<String> {
        vec!["first".to_string()]
    }

    #[test]
    fn strict_full_region() {
        let region = [1, 0x34, 0x12, 2, 7, 1, 0, 8, 2, 0];
        let (values, consumed) =
            decode_fields(LAYOUT, &region, &strings(), DecodeMode::Strict).unwrap();

        assert_eq!(consumed, region.len());
        assert_eq!(values[0], FieldValue::Str("first".to_string()));
        assert_eq!(values[1], FieldValue::Uint(0x1234));
        assert_eq!(
            values[3],
            FieldValue::Array(vec![
                FieldValue::Nested(vec![FieldValue::Uint(7), FieldValue::Uint(1)]),
                FieldValue::Nested(vec![FieldValue::Uint(8), FieldValue::Uint(2)]),
            ])
        );
    }

    #[test]
    fn strict_underrun() {
        let region = [1, 0x34];
        let err = decode_fields(LAYOUT, &region, &strings(), DecodeMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            Error::RequiredFieldsMissing {
                field: "value",
                needed: 2,
                remaining: 1
            }
        ));
    }

    #[test]
    fn tolerant_prefix() {
        let region = [0, 0x34, 0x12];
        let (values, consumed) =
            decode_fields(LAYOUT, &region, &[], DecodeMode::Tolerant).unwrap();

        assert_eq!(consumed, 3);
        assert_eq!(values[0], FieldValue::Str(String::new()));
        assert_eq!(values[1], FieldValue::Uint(0x1234));
        assert_eq!(values[2], FieldValue::Uint(0));
        assert_eq!(values[3], FieldValue::Array(vec![]));
    }

    #[test]
    fn count_mismatch() {
        let region = [0, 0, 0, 255, 7, 1, 0];
        let err = decode_fields(LAYOUT, &region, &[], DecodeMode::Tolerant).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                field: "items",
                declared: 255,
                actual: 1
            }
        ));

        let region = [0, 0, 0, 1];
        assert!(decode_fields(LAYOUT, &region, &[], DecodeMode::Tolerant).is_err());
    }

    #[test]
    fn string_index_out_of_range() {
        let region = [2, 0, 0, 0];
        let err = decode_fields(LAYOUT, &region, &strings(), DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, Error::StringIndex { index: 2, count: 1 }));
    }

    #[test]
    fn remaining_array() {
        const TRAILING: &[Field] = &[Field {
            name: "bytes",
            kind: FieldKind::remaining(ElementKind::Uint(2)),
        }];

        let (values, consumed) =
            decode_fields(TRAILING, &[1, 0, 2, 0], &[], DecodeMode::Strict).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(
            values[0],
            FieldValue::Array(vec![FieldValue::Uint(1), FieldValue::Uint(2)])
        );

        assert!(decode_fields(TRAILING, &[1, 0, 2], &[], DecodeMode::Strict).is_err());
    }

    #[test]
    fn elements_sized_by_field() {
        const SIZED: &[Field] = &[
            Field {
                name: "count",
                kind: FieldKind::Uint(1),
            },
            Field {
                name: "size",
                kind: FieldKind::Uint(1),
            },
            Field {
                name: "items",
                kind: FieldKind::counted_by("count", ElementKind::SizedBy("size")),
            },
            Field {
                name: "tail",
                kind: FieldKind::Uint(1),
            },
        ];

        let region = [2, 2, 1, 2, 3, 4, 9];
        let (values, consumed) =
            decode_fields(SIZED, &region, &[], DecodeMode::Strict).unwrap();
        assert_eq!(consumed, region.len());
        assert_eq!(
            values[2],
            FieldValue::Array(vec![
                FieldValue::Bytes(vec![1, 2]),
                FieldValue::Bytes(vec![3, 4]),
            ])
        );
        assert_eq!(values[3], FieldValue::Uint(9));

        let region = [2, 0, 9];
        let (values, consumed) =
            decode_fields(SIZED, &region, &[], DecodeMode::Strict).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(values[2], FieldValue::Array(vec![]));
        assert_eq!(values[3], FieldValue::Uint(9));

        let err = decode_fields(SIZED, &[2, 3, 1, 2, 3], &[], DecodeMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                field: "items",
                declared: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn unsupported_width() {
        const ODD: &[Field] = &[Field {
            name: "odd",
            kind: FieldKind::Uint(3),
        }];
        let err = decode_fields(ODD, &[1, 2, 3], &[], DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, Error::UnsupportedField { field: "odd" }));
    }
}
