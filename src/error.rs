use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into a handful of families:
///
/// ## Format Errors
/// Malformed input detected while decoding entry points, table streams or typed records:
/// [`Error::Malformed`], [`Error::OutOfBounds`], [`Error::InvalidAnchor`],
/// [`Error::InvalidLength`], [`Error::InvalidChecksum`], [`Error::EntryPoint`],
/// [`Error::StringIndex`], [`Error::FieldCount`], [`Error::RecordTooShort`],
/// [`Error::RequiredFieldsMissing`], [`Error::LengthMismatch`], [`Error::UnsupportedField`]
/// and [`Error::WrongTableType`].
///
/// ## Lookup Conditions
/// Distinguished, non-fatal outcomes of registry and accessor calls:
/// [`Error::UnsupportedType`], [`Error::NotFound`] and [`Error::NotUnique`].
///
/// ## Resource Errors
/// Failures of the file or physical memory collaborator: [`Error::FileError`] and
/// [`Error::Discovery`].
///
/// ## Transform Errors
/// [`Error::Transform`] reports a failed override; the modifier aborts before writing anything.
///
/// # Examples
///
/// ```rust,no_run
/// use dmiscope::{Error, Info};
///
/// match Info::from_sysfs_default() {
///     Ok(info) => println!("{} tables", info.tables().len()),
///     Err(Error::EntryPoint { bits32, bits64 }) => {
///         eprintln!("no entry point: {bits32} / {bits64}");
///     }
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {io_err}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Format errors
    /// The data is damaged and could not be decoded.
    ///
    /// Carries the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading a buffer.
    #[error("Out of Bound read would have occurred! - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An entry point anchor did not match its magic string.
    #[error("{variant} entry point: invalid anchor, expected {expected:?}, found {found:?}")]
    InvalidAnchor {
        /// Which entry point variant was being decoded
        variant: &'static str,
        /// The anchor bytes this variant requires
        expected: &'static [u8],
        /// The bytes found at the anchor offset
        found: Vec<u8>,
    },

    /// An entry point declared a length other than its fixed size.
    #[error("{variant} entry point: invalid length, expected {expected:#x}, found {found:#x}")]
    InvalidLength {
        /// Which entry point variant was being decoded
        variant: &'static str,
        /// The fixed size of this variant
        expected: u8,
        /// The declared length byte
        found: u8,
    },

    /// A checksum byte does not bring its covered range to zero.
    #[error("invalid {region} checksum, expected {expected:#04x}, found {found:#04x}")]
    InvalidChecksum {
        /// The checksummed range, `"entry point"` or `"intermediate"`
        region: &'static str,
        /// The checksum computed over the range
        expected: u8,
        /// The checksum stored in the data
        found: u8,
    },

    /// Neither entry point variant could be decoded.
    ///
    /// Both attempts are kept so callers can see why each failed.
    #[error("no valid entry point: 32-bit: {bits32}; 64-bit: {bits64}")]
    EntryPoint {
        /// Failure of the 32-bit decode attempt
        bits32: Box<Error>,
        /// Failure of the 64-bit decode attempt
        bits64: Box<Error>,
    },

    /// A string-index field points past the record's string list.
    #[error("string index {index} out of range, record has {count} strings")]
    StringIndex {
        /// The 1-based index stored in the field
        index: u8,
        /// The number of strings following the record
        count: usize,
    },

    /// A trailing array disagrees with the count that gates it.
    #[error("field '{field}' declares {declared} elements, found {actual}")]
    FieldCount {
        /// The array field
        field: &'static str,
        /// The count the record declares
        declared: usize,
        /// The number of elements present
        actual: usize,
    },

    /// A record is shorter than the mandatory portion of its type.
    #[error("table type {table_type}: length {length:#x} is below the minimum {minimum:#x}")]
    RecordTooShort {
        /// Type code of the record
        table_type: u8,
        /// Minimum declared length for the type
        minimum: u8,
        /// Declared length of the record
        length: u8,
    },

    /// Strict decoding ran out of structured bytes.
    #[error("required field '{field}' needs {needed} bytes, {remaining} remain")]
    RequiredFieldsMissing {
        /// The field that could not be decoded
        field: &'static str,
        /// Bytes the field needs
        needed: usize,
        /// Bytes left in the structured region
        remaining: usize,
    },

    /// The declared length of a record disagrees with its decoded or encoded layout.
    #[error("table type {table_type}: declared length {declared:#x}, layout covers {actual:#x}")]
    LengthMismatch {
        /// Type code of the record
        table_type: u8,
        /// The declared length
        declared: usize,
        /// The length the layout accounts for
        actual: usize,
    },

    /// The field layout uses a kind the engine cannot handle.
    #[error("unsupported field '{field}'")]
    UnsupportedField {
        /// The offending field
        field: &'static str,
    },

    /// A record was handed to the decoder of a different type.
    #[error("invalid table type {found}, expected {expected}")]
    WrongTableType {
        /// Type code the decoder handles
        expected: u8,
        /// Type code of the record
        found: u8,
    },

    // Lookup conditions
    /// No typed decoder is registered for this type code.
    #[error("no decoder registered for table type {0}")]
    UnsupportedType(u8),

    /// No record of the requested type exists.
    #[error("no table of type {0} found")]
    NotFound(u8),

    /// A type that may appear at most once is present several times.
    #[error("table type {table_type} must be unique, found {count}")]
    NotUnique {
        /// The requested type code
        table_type: u8,
        /// Number of matching records
        count: usize,
    },

    // Resource errors
    /// File I/O error.
    ///
    /// Wraps standard I/O errors raised by the file system and the physical memory device.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// The SMBIOS entry point could not be located in physical memory.
    #[error("discovery failed: {0}")]
    Discovery(String),

    // Transform errors
    /// An override failed; nothing has been written back.
    #[error("transform failed: {0}")]
    Transform(String),
}

impl Error {
    /// Returns `true` for conditions a caller is expected to handle by falling back to a
    /// generic view, rather than treating them as a failure.
    #[must_use]
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType(_) | Error::NotFound(_) | Error::NotUnique { .. }
        )
    }
}
