//! Declarative field layouts for typed records.
//!
//! Every typed record describes its structured region once, as an ordered list of
//! [`Field`] descriptors. One engine interprets that list in both directions:
//!
//! - [`decode_fields`] walks a structured region and produces one [`FieldValue`] per field
//! - [`encode_fields`] serializes values back, collecting strings into a [`StringTable`]
//!
//! Field kinds cover everything DSP0134 uses: fixed-width little-endian integers, string
//! indices, opaque byte runs, nested sub-layouts and trailing arrays gated either by a
//! previously decoded count field or by the bytes left in the region. Array elements may
//! take their size from another field when a record declares it.
//!
//! The `field_layout!` macro ties a Rust struct to its descriptor list, generating the
//! conversion between the struct and the engine's values.
//!
//! # Decode Modes
//!
//! [`DecodeMode::Strict`] requires every field to be present. [`DecodeMode::Tolerant`] is
//! used by record types whose field set grew across SMBIOS revisions: fields are decoded
//! while they fit and the rest keep their zero value. When such a record is encoded again,
//! trailing fields that are still zero are only written while they fit the declared length,
//! so older records keep their original size. A field holding a value is always written and
//! grows the record.

mod decode;
mod encode;

pub use decode::decode_fields;
pub use encode::{encode_fields, StringTable};

use crate::Result;

/// How a layout treats a structured region shorter than the full field list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Every field is mandatory
    Strict,
    /// Trailing fields that do not fit are left at their zero value
    Tolerant,
}

/// Where the element count of a trailing array comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayCount {
    /// The value of an earlier integer field of the same layout
    Field(&'static str),
    /// As many elements as the rest of the structured region holds
    Remaining,
}

/// Element type of a trailing array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Little-endian unsigned integer of the given width
    Uint(usize),
    /// Fixed-size nested layout
    Nested(&'static [Field]),
    /// Opaque bytes whose size is the value of the named earlier integer field.
    ///
    /// A size of zero means the array holds no elements, whatever its count says.
    SizedBy(&'static str),
}

impl ElementKind {
    /// Encoded size of one element, `None` if the size is not known from the layout alone.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            ElementKind::Uint(width) => Some(*width),
            ElementKind::Nested(fields) => layout_size(fields),
            ElementKind::SizedBy(_) => None,
        }
    }
}

/// Kind of one field in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Little-endian unsigned integer of 1, 2, 4 or 8 bytes
    Uint(usize),
    /// One-byte string index, resolved against the record's strings
    Str,
    /// Opaque run of bytes
    Bytes(usize),
    /// Fixed-size nested layout
    Nested(&'static [Field]),
    /// Trailing array of fixed-size elements
    Array {
        /// Source of the element count
        count: ArrayCount,
        /// Type of each element
        element: ElementKind,
    },
}

impl FieldKind {
    /// Array of elements counted by the named earlier field.
    #[must_use]
    pub const fn counted_by(name: &'static str, element: ElementKind) -> Self {
        FieldKind::Array {
            count: ArrayCount::Field(name),
            element,
        }
    }

    /// Array filling the rest of the structured region.
    #[must_use]
    pub const fn remaining(element: ElementKind) -> Self {
        FieldKind::Array {
            count: ArrayCount::Remaining,
            element,
        }
    }

    /// Encoded size of the field, `None` for arrays.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldKind::Uint(width) | FieldKind::Bytes(width) => Some(*width),
            FieldKind::Str => Some(1),
            FieldKind::Nested(fields) => layout_size(fields),
            FieldKind::Array { .. } => None,
        }
    }

    /// Value a field holds when it is absent from the region.
    #[must_use]
    pub fn zero_value(&self) -> FieldValue {
        match self {
            FieldKind::Uint(_) => FieldValue::Uint(0),
            FieldKind::Str => FieldValue::Str(String::new()),
            FieldKind::Bytes(len) => FieldValue::Bytes(vec![0; *len]),
            FieldKind::Nested(fields) => {
                FieldValue::Nested(fields.iter().map(|field| field.kind.zero_value()).collect())
            }
            FieldKind::Array { .. } => FieldValue::Array(Vec::new()),
        }
    }
}

/// One named field of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in errors and to resolve array counts
    pub name: &'static str,
    /// Field kind
    pub kind: FieldKind,
}

/// Decoded value of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Integer of any width
    Uint(u64),
    /// Resolved string, empty for index 0
    Str(String),
    /// Opaque bytes
    Bytes(Vec<u8>),
    /// Values of a nested layout
    Nested(Vec<FieldValue>),
    /// Elements of a trailing array
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// `true` if the value equals what an absent field decodes to.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Uint(value) => *value == 0,
            FieldValue::Str(string) => string.is_empty(),
            FieldValue::Bytes(bytes) => bytes.iter().all(|byte| *byte == 0),
            FieldValue::Nested(values) => values.iter().all(FieldValue::is_zero),
            FieldValue::Array(items) => items.is_empty(),
        }
    }
}

/// Sum of the fixed sizes of `fields`, `None` if any field is an array.
#[must_use]
pub fn layout_size(fields: &[Field]) -> Option<usize> {
    fields
        .iter()
        .try_fold(0usize, |size, field| Some(size + field.kind.fixed_size()?))
}

/// Integer value of an earlier field of the same layout, used for array counts.
pub(crate) fn count_of(fields: &[Field], values: &[FieldValue], name: &'static str) -> Result<usize> {
    let position = fields.iter().position(|field| field.name == name);
    match position.and_then(|index| values.get(index)) {
        Some(FieldValue::Uint(count)) => usize::try_from(*count)
            .map_err(|_| malformed_error!("count field '{}' is too large", name)),
        _ => Err(crate::Error::UnsupportedField { field: name }),
    }
}

/// Conversion between a Rust field type and its engine value.
pub trait FieldType: Sized {
    /// Build the Rust value from a decoded value.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the value has the wrong shape.
    fn from_value(field: &'static str, value: FieldValue) -> Result<Self>;

    /// Engine value of this field.
    fn to_value(&self) -> FieldValue;
}

macro_rules! impl_uint_field {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                fn from_value(field: &'static str, value: FieldValue) -> Result<Self> {
                    match value {
                        FieldValue::Uint(raw) => <$ty>::try_from(raw).map_err(|_| {
                            malformed_error!("field '{}' value {:#x} overflows", field, raw)
                        }),
                        other => Err(malformed_error!(
                            "field '{}' expects an integer, got {:?}",
                            field,
                            other
                        )),
                    }
                }

                fn to_value(&self) -> FieldValue {
                    FieldValue::Uint(u64::from(*self))
                }
            }
        )*
    };
}

impl_uint_field!(u8, u16, u32, u64);

impl FieldType for String {
    fn from_value(field: &'static str, value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Str(string) => Ok(string),
            other => Err(malformed_error!(
                "field '{}' expects a string, got {:?}",
                field,
                other
            )),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Str(self.clone())
    }
}

impl<const N: usize> FieldType for [u8; N] {
    fn from_value(field: &'static str, value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Bytes(bytes) => <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
                malformed_error!("field '{}' expects {} bytes, got {}", field, N, bytes.len())
            }),
            other => Err(malformed_error!(
                "field '{}' expects bytes, got {:?}",
                field,
                other
            )),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Bytes(self.to_vec())
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn from_value(field: &'static str, value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Array(items) => items
                .into_iter()
                .map(|item| T::from_value(field, item))
                .collect(),
            other => Err(malformed_error!(
                "field '{}' expects an array, got {:?}",
                field,
                other
            )),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Array(self.iter().map(FieldType::to_value).collect())
    }
}

/// A struct whose fields follow a declarative layout.
pub trait FieldLayout: Sized {
    /// The ordered field descriptors
    const FIELDS: &'static [Field];

    /// Build the struct from one value per field, in layout order.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a value is missing or has the wrong shape.
    fn from_values(values: Vec<FieldValue>) -> Result<Self>;

    /// One value per field, in layout order.
    fn to_values(&self) -> Vec<FieldValue>;
}

pub(crate) fn take_field<T: FieldType>(
    field: &'static str,
    values: &mut impl Iterator<Item = FieldValue>,
) -> Result<T> {
    match values.next() {
        Some(value) => T::from_value(field, value),
        None => Err(malformed_error!("no value for field '{}'", field)),
    }
}

/// Generates [`FieldLayout`] for a struct from its field descriptors.
///
/// `record` structs carry a `header` that is not part of the structured region;
/// `element` structs are nested layouts used inside other records.
macro_rules! field_layout {
    (record $name:ident { $($field:ident => $kind:expr),* $(,)? }) => {
        field_layout!(@fields $name { $($field => $kind),* });

        impl $crate::smbios::layout::FieldLayout for $name {
            const FIELDS: &'static [$crate::smbios::layout::Field] = $name::LAYOUT;

            fn from_values(values: Vec<$crate::smbios::layout::FieldValue>) -> $crate::Result<Self> {
                #[allow(unused_mut, unused_variables)]
                let mut values = values.into_iter();
                Ok($name {
                    header: $crate::smbios::Header::default(),
                    $($field: $crate::smbios::layout::take_field(stringify!($field), &mut values)?,)*
                })
            }

            fn to_values(&self) -> Vec<$crate::smbios::layout::FieldValue> {
                vec![$($crate::smbios::layout::FieldType::to_value(&self.$field)),*]
            }
        }

        impl $crate::smbios::layout::RecordHeader for $name {
            fn header(&self) -> &$crate::smbios::Header {
                &self.header
            }

            fn header_mut(&mut self) -> &mut $crate::smbios::Header {
                &mut self.header
            }
        }
    };
    (element $name:ident { $($field:ident => $kind:expr),* $(,)? }) => {
        field_layout!(@fields $name { $($field => $kind),* });

        impl $crate::smbios::layout::FieldLayout for $name {
            const FIELDS: &'static [$crate::smbios::layout::Field] = $name::LAYOUT;

            fn from_values(values: Vec<$crate::smbios::layout::FieldValue>) -> $crate::Result<Self> {
                let mut values = values.into_iter();
                Ok($name {
                    $($field: $crate::smbios::layout::take_field(stringify!($field), &mut values)?,)*
                })
            }

            fn to_values(&self) -> Vec<$crate::smbios::layout::FieldValue> {
                vec![$($crate::smbios::layout::FieldType::to_value(&self.$field)),*]
            }
        }

        impl $crate::smbios::layout::FieldType for $name {
            fn from_value(
                field: &'static str,
                value: $crate::smbios::layout::FieldValue,
            ) -> $crate::Result<Self> {
                match value {
                    $crate::smbios::layout::FieldValue::Nested(values) => {
                        <$name as $crate::smbios::layout::FieldLayout>::from_values(values)
                    }
                    other => Err(malformed_error!(
                        "field '{}' expects a nested layout, got {:?}",
                        field,
                        other
                    )),
                }
            }

            fn to_value(&self) -> $crate::smbios::layout::FieldValue {
                $crate::smbios::layout::FieldValue::Nested(
                    <$name as $crate::smbios::layout::FieldLayout>::to_values(self),
                )
            }
        }
    };
    (@fields $name:ident { $($field:ident => $kind:expr),* }) => {
        impl $name {
            /// Field layout of the structured region, in order.
            pub const LAYOUT: &'static [$crate::smbios::layout::Field] = &[
                $($crate::smbios::layout::Field { name: stringify!($field), kind: $kind },)*
            ];
        }
    };
}

/// Access to the header of a typed record.
pub trait RecordHeader {
    /// The record header
    fn header(&self) -> &crate::smbios::Header;

    /// Mutable access to the record header
    fn header_mut(&mut self) -> &mut crate::smbios::Header;
}
