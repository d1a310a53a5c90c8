//! Byte builders for unit tests.
//!
//! The mock table set mirrors a small real machine: a BIOS Information record (handle 0),
//! a System Information record (handle 1) and the End-of-Table record (handle 2).

use crate::smbios::{EntryPoint32, EntryPoint64, Table};

/// Encoded 32-bit entry point with valid checksums.
pub fn entry32_bytes(
    max_struct_size: u16,
    table_length: u16,
    table_address: u32,
    number_of_structs: u16,
) -> Vec<u8> {
    let mut entry = EntryPoint32::new(2, 8, table_length, table_address, number_of_structs);
    entry.max_struct_size = max_struct_size;
    entry.encode()
}

/// Encoded SMBIOS 3.1.1 64-bit entry point with a valid checksum.
pub fn entry64_bytes(max_struct_size: u32, table_address: u64) -> Vec<u8> {
    let mut entry = EntryPoint64::new(3, 1, max_struct_size, table_address);
    entry.doc_rev = 1;
    entry.encode()
}

fn with_strings(mut record: Vec<u8>, strings: &[&str]) -> Vec<u8> {
    for string in strings {
        record.extend_from_slice(string.as_bytes());
        record.push(0);
    }
    if strings.is_empty() {
        record.push(0);
    }
    record.push(0);
    record
}

/// BIOS Information, SMBIOS 2.4 layout, 53 bytes.
pub fn bios_information_bytes() -> Vec<u8> {
    let record = vec![
        0x00, 0x1A, 0x00, 0x00, // header
        0x01, 0x02, 0x00, 0xE8, 0x03, 0x0F, // vendor, version, segment, date, ROM size
        0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // PCI supported
        0x01, 0x08, // ACPI, UEFI
        0x01, 0x00, 0xFF, 0xFF, // BIOS 1.0, no EC
        0x00, 0x00,
    ];
    with_strings(record, &["MockVendor", "1.0", "01/01/2024"])
}

/// System Information, SMBIOS 2.4 layout, 27 bytes plus strings.
pub fn system_information_bytes() -> Vec<u8> {
    let mut record = vec![0x01, 0x1B, 0x01, 0x00, 0x01, 0x02, 0x03, 0x04];
    record.extend([0u8; 16]);
    record.extend([0x06, 0x05, 0x06]);
    with_strings(
        record,
        &[
            "MockManufacturer",
            "MockProductName",
            "MockVersion",
            "MockSerialNumber",
            "MockSKUNumber",
            "MockFamily",
        ],
    )
}

/// End-of-Table with handle 2.
pub fn end_of_table_bytes() -> Vec<u8> {
    with_strings(vec![0x7F, 0x04, 0x02, 0x00], &[])
}

/// BIOS, System and End-of-Table records back to back.
pub fn mock_tables_bytes() -> Vec<u8> {
    let mut stream = bios_information_bytes();
    stream.extend(system_information_bytes());
    stream.extend(end_of_table_bytes());
    stream
}

/// Baseboard Information of `board_type` with one contained handle (10) and six "-" strings.
pub fn baseboard_table(handle: u16, board_type: u8) -> Table {
    Table::new(
        2,
        handle,
        vec![1, 2, 3, 4, 5, 0, 6, 0, 0, board_type, 1, 10, 0],
        vec!["-".to_string(); 6],
    )
    .unwrap()
}

/// Group Association named "Group" listing `items` as (type, handle) pairs.
pub fn group_table(handle: u16, items: &[(u8, u16)]) -> Table {
    let mut data = vec![1];
    for (item_type, item_handle) in items {
        data.push(*item_type);
        data.extend(item_handle.to_le_bytes());
    }
    Table::new(14, handle, data, vec!["Group".to_string()]).unwrap()
}
