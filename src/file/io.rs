//! Bounds-checked little-endian reading and writing of primitive values.
//!
//! Every multi-byte field in SMBIOS (entry points, table headers and structured regions) is
//! little-endian. The helpers in this module read or write the unsigned integer widths
//! SMBIOS uses, advance a caller-owned offset, and report [`crate::Error::OutOfBounds`]
//! instead of panicking when a buffer is too short.
//!
//! # Examples
//!
//! ```rust,ignore
//! use dmiscope::file::io::{read_le_at, write_le_at};
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//! let first: u16 = read_le_at(&data, &mut offset)?;
//! let second: u32 = read_le_at(&data, &mut offset)?;
//! assert_eq!((first, second, offset), (1, 2, 6));
//!
//! let mut out = [0u8; 2];
//! let mut offset = 0;
//! write_le_at(&mut out, &mut offset, 0x1234u16)?;
//! assert_eq!(out, [0x34, 0x12]);
//! # Ok::<(), dmiscope::Error>(())
//! ```

use crate::Result;

/// Unsigned integer types that can be read from and written to SMBIOS byte buffers.
pub trait SmbiosIO: Sized + Copy {
    /// Fixed-size byte representation of the type.
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Decode from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Encode to little-endian bytes
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_smbios_io {
    ($($ty:ty),*) => {
        $(
            impl SmbiosIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_smbios_io!(u8, u16, u32, u64);

/// Reads a value of type `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: SmbiosIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value of type `T` at `offset` and advances the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: SmbiosIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Writes `value` to the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn write_le<T: SmbiosIO>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_le_at(data, &mut offset, value)
}

/// Writes `value` at `offset` and advances the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn write_le_at<T: SmbiosIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let bytes = value.to_le_bytes();
    data[*offset..end].copy_from_slice(bytes.as_ref());
    *offset = end;

    Ok(())
}

/// Appends the little-endian encoding of an integer of `width` bytes to `out`.
///
/// Widths other than 1, 2, 4 and 8 are rejected; values wider than `width` are rejected
/// rather than truncated.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for an unsupported width or an oversized value.
pub fn push_le_sized(out: &mut Vec<u8>, width: usize, value: u64) -> Result<()> {
    let fits = match width {
        1 => u8::try_from(value).is_ok(),
        2 => u16::try_from(value).is_ok(),
        4 => u32::try_from(value).is_ok(),
        8 => true,
        _ => return Err(malformed_error!("unsupported integer width {}", width)),
    };
    if !fits {
        return Err(malformed_error!(
            "value {:#x} does not fit in {} bytes",
            value,
            width
        ));
    }

    out.extend_from_slice(&value.to_le_bytes()[..width]);
    Ok(())
}

/// Reads a little-endian integer of `width` bytes at `offset` and widens it to `u64`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short, or
/// [`crate::Error::Malformed`] for a width other than 1, 2, 4 or 8.
pub fn read_le_sized_at(data: &[u8], offset: &mut usize, width: usize) -> Result<u64> {
    match width {
        1 => read_le_at::<u8>(data, offset).map(u64::from),
        2 => read_le_at::<u16>(data, offset).map(u64::from),
        4 => read_le_at::<u32>(data, offset).map(u64::from),
        8 => read_le_at::<u64>(data, offset),
        _ => Err(malformed_error!("unsupported integer width {}", width)),
    }
}
