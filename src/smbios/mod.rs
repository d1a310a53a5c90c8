//! SMBIOS codec.
//!
//! The codec is layered bottom-up:
//!
//! - [`entrypoint`] - the `_SM_` / `_SM3_` anchor structures and their checksums
//! - [`TableStream`] - splits a table stream into generic [`Table`] records
//! - [`layout`] - one declarative decode/encode engine driven by per-type field lists
//! - [`types`] - the typed records built on that engine, one module per type
//! - [`project`] - type-code dispatch from a [`Table`] to a [`TypedTable`]
//! - [`Info`] - the decoded entry point plus all of its records
//!
//! All of it is pure: functions take caller-owned byte slices and never perform I/O, so
//! independent calls may run on independent threads.
//!
//! # Examples
//!
//! ```rust
//! use dmiscope::smbios::{decode_tables, encode_tables, BiosInformation, TypedRecord};
//!
//! let stream = [
//!     0x00, 0x12, 0x00, 0x00, 0x01, 0x02, 0x00, 0xE8, 0x00, 0x03, 0x00, 0x00,
//!     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, b'V', 0x00, b'1', 0x00, 0x00,
//!     0x7F, 0x04, 0x01, 0x00, 0x00, 0x00,
//! ];
//! let tables = decode_tables(&stream)?;
//! let bios = BiosInformation::decode(&tables[0])?;
//! assert_eq!(bios.vendor, "V");
//! assert_eq!(bios.version, "1");
//! assert_eq!(encode_tables(&tables)?, stream);
//! # Ok::<(), dmiscope::Error>(())
//! ```

#[macro_use]
pub mod layout;

pub mod entrypoint;
pub mod types;

mod info;
mod record;
mod registry;
mod stream;
mod table;
mod tabletype;

pub use entrypoint::{checksum, EntryPoint, EntryPoint32, EntryPoint64};
pub use info::Info;
pub use record::TypedRecord;
pub use registry::{decoder, project, DecodeFn, TypedTable, REGISTRY};
pub use stream::{decode_tables, encode_tables, TableStream};
pub use table::{Header, Table};
pub use tabletype::TableType;
pub use types::*;
