//! Table stream walker.
//!
//! Splits a raw table stream into generic [`Table`] records. Record boundaries are found
//! by scanning: the structured region is sized by the header, but the string section ends
//! wherever its `{0, 0}` terminator is, so every step searches for it explicitly.
//!
//! The walk is lazy and stops after yielding the End-of-Table record (type 127), after the
//! buffer is exhausted, or after the first error.
//!
//! Strings must be valid UTF-8. A record holding any other bytes in its string section
//! fails the walk, naming the record.

use crate::{
    file::parser::Parser,
    smbios::{Header, Table, TableType},
    Error, Result,
};

/// Iterator over the records of a table stream
///
/// # Examples
///
/// ```rust
/// use dmiscope::smbios::TableStream;
///
/// let stream = [
///     0x00, 0x05, 0x00, 0x00, 0x01, b'V', 0x00, 0x00,
///     0x7F, 0x04, 0x01, 0x00, 0x00, 0x00,
/// ];
/// let tables = TableStream::new(&stream).collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(tables.len(), 2);
/// assert_eq!(tables[0].strings, ["V"]);
/// # Ok::<(), dmiscope::Error>(())
/// ```
pub struct TableStream<'a> {
    parser: Parser<'a>,
    finished: bool,
}

impl<'a> TableStream<'a> {
    /// Start walking `data` from its first byte.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        TableStream {
            parser: Parser::new(data),
            finished: false,
        }
    }

    /// Bytes consumed so far
    #[must_use]
    pub fn position(&self) -> usize {
        self.parser.pos()
    }

    fn next_table(&mut self) -> Result<Table> {
        let start = self.parser.pos();
        if self.parser.remaining() < Header::SIZE {
            return Err(malformed_error!(
                "truncated header at offset {:#x}, {} bytes remain",
                start,
                self.parser.remaining()
            ));
        }

        let header = Header::read(&mut self.parser)?;
        let Some(region_len) = usize::from(header.length).checked_sub(Header::SIZE) else {
            return Err(malformed_error!(
                "table type {} at offset {:#x} declares length {} below the header size",
                header.table_type,
                start,
                header.length
            ));
        };
        if region_len > self.parser.remaining() {
            return Err(malformed_error!(
                "table type {} at offset {:#x} declares length {} but only {} bytes remain",
                header.table_type,
                start,
                header.length,
                self.parser.remaining() + Header::SIZE
            ));
        }
        let data = self.parser.read_bytes(region_len)?.to_vec();

        let mut strings = Vec::new();
        let end_of_strings = loop {
            let string_start = self.parser.pos();
            let string = self.parser.read_cstring().map_err(|error| match error {
                Error::Malformed { message, .. } => malformed_error!(
                    "table type {} handle {:#06x} at offset {:#x}: {}",
                    header.table_type,
                    header.handle,
                    start,
                    message
                ),
                other => other,
            })?;
            if string.is_empty() {
                break string_start;
            }
            strings.push(string);
        };

        // With strings present the terminator pair starts at the last string's NUL.
        let scan_from = if strings.is_empty() {
            end_of_strings
        } else {
            end_of_strings - 1
        };
        self.parser.seek(scan_from)?;
        let Some(terminator) = self.parser.find(&[0, 0]) else {
            return Err(malformed_error!(
                "table type {} at offset {:#x} has no terminator",
                header.table_type,
                start
            ));
        };
        self.parser.seek(terminator + 2)?;

        log::trace!(
            "table type {} handle {:#06x} at offset {:#x}: {} bytes, {} strings",
            header.table_type,
            header.handle,
            start,
            header.length,
            strings.len()
        );

        Ok(Table {
            header,
            data,
            strings,
        })
    }
}

impl Iterator for TableStream<'_> {
    type Item = Result<Table>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || !self.parser.has_more_data() {
            return None;
        }

        match self.next_table() {
            Ok(table) => {
                if table.table_type() == TableType::EndOfTable as u8 {
                    self.finished = true;
                }
                Some(Ok(table))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

/// Decode every record of a table stream.
///
/// # Errors
/// Returns the first error the walk reports.
pub fn decode_tables(data: &[u8]) -> Result<Vec<Table>> {
    TableStream::new(data).collect()
}

/// Serialize records back to back into one stream.
///
/// # Errors
/// Returns the first error a record reports while encoding.
pub fn encode_tables(tables: &[Table]) -> Result<Vec<u8>> {
    let size = tables.iter().map(Table::encoded_len).sum();
    let mut out = Vec::with_capacity(size);
    for table in tables {
        table.write(&mut out)?;
    }
    Ok(out)
}
