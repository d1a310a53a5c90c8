// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dmiscope
//!
//! [![Crates.io](https://img.shields.io/crates/v/dmiscope.svg)](https://crates.io/crates/dmiscope)
//! [![Documentation](https://docs.rs/dmiscope/badge.svg)](https://docs.rs/dmiscope)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/dmiscope/blob/main/LICENSE-APACHE)
//!
//! A decoder, encoder and live-memory patcher for SMBIOS/DMI firmware tables (DMTF DSP0134).
//!
//! ## Features
//!
//! - **Entry points** - both the `_SM_` (32-bit) and `_SM3_` (64-bit) variants, with every
//!   checksum validated on decode and recomputed on encode
//! - **Table streams** - lazy walk of the raw record stream into generic tables
//! - **Typed records** - one declarative field layout per record type drives both decoding
//!   and encoding
//! - **Live patching** - locate the tables in physical memory, transform them and write
//!   them back
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dmiscope::prelude::*;
//!
//! let info = Info::from_sysfs_default()?;
//! println!("{}", info.entry_point());
//!
//! for (table, typed) in info.typed() {
//!     match typed {
//!         Ok(record) => println!("{record}\n"),
//!         Err(e) if e.is_lookup_miss() => println!("{table}\n"),
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok::<(), dmiscope::Error>(())
//! ```
//!
//! ### Decoding a dump
//!
//! A dump holds the entry point in its first 32 bytes and the table stream after them, the
//! layout `dmidecode --dump-bin` writes:
//!
//! ```rust,no_run
//! use dmiscope::Info;
//!
//! let info = Info::from_dump_file("dmi.bin")?;
//! let system = info.system_information()?;
//! println!("{} {}", system.manufacturer, system.product_name);
//! if let Some(uuid) = system.system_uuid() {
//!     println!("UUID: {uuid}");
//! }
//! # Ok::<(), dmiscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`smbios`] - the codec: entry points, table streams, typed records and [`Info`]
//! - [`modifier`] - the live-memory patcher and its transforms
//! - [`file`] - byte access: bounds-checked reads, dump backends and the sysfs snapshot
//! - [`Error`] and [`Result`] - error handling
//!
//! The codec never performs I/O on its own: every decode function takes a caller-owned
//! byte slice, so independent calls are safe to run on independent threads.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Registry and accessor misses are
//! distinguished from format errors, so callers can fall back to the generic view:
//!
//! ```rust,no_run
//! use dmiscope::{Error, Info};
//!
//! let info = Info::from_sysfs_default()?;
//! match info.bios_information() {
//!     Ok(bios) => println!("BIOS {}", bios.version),
//!     Err(Error::NotFound(_)) => println!("no BIOS Information record"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), dmiscope::Error>(())
//! ```
//!
//! ## Development and Testing
//!
//! ### Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run dump --release
//! ```
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use dmiscope::prelude::*;
///
/// let info = Info::from_sysfs_default()?;
/// let boards = info.baseboard_information()?;
/// # Ok::<(), dmiscope::Error>(())
/// ```
pub mod prelude;

/// Byte access layer
pub mod file;

/// SMBIOS codec based on DMTF DSP0134
pub mod smbios;

/// Configuration of the live-memory modifier
pub mod config;

/// Live-memory modifier
pub mod modifier;

/// `dmiscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dmiscope` Error type
///
/// See [`Error`] for the variants and the families they fall into.
pub use error::Error;

/// Decoded entry point and records of one table set
pub use smbios::Info;

/// Live-memory modifier
pub use modifier::Modifier;

/// Modifier configuration
pub use config::ModifierConfig;

/// Low-level byte access
pub use file::{parser::Parser, SysfsPaths};
