//! End-of-Table (type 127), DSP0134 7.46.

use crate::smbios::{
    layout::DecodeMode,
    Header, TableType, TypedRecord,
};

/// End-of-Table record, the mandatory last record of a table stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndOfTable {
    /// Record header
    pub header: Header,
}

field_layout!(record EndOfTable {});

impl TypedRecord for EndOfTable {
    const TABLE_TYPE: TableType = TableType::EndOfTable;
    const MIN_LENGTH: u8 = 0x04;
    const MODE: DecodeMode = DecodeMode::Strict;
}
