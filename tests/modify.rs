//! Patching a fake physical memory file end to end.

use std::io::Write;

use dmiscope::modifier::{
    remove_baseboard_information, replace_motherboard_information, replace_system_information,
    BaseboardOverride, DevMem, EntryPointLocation, OverrideOpt, SystemInformationOverride,
};
use dmiscope::prelude::*;

const SYSTEM_DATA: [u8; 27] = [
    0x01, 0x1B, 0x01, 0x00, 0x01, 0x02, 0x03, 0x04, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0x06, 0x05, 0x06,
];

fn strings(values: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        out.extend_from_slice(value.as_bytes());
        out.push(0);
    }
    if values.is_empty() {
        out.push(0);
    }
    out.push(0);
    out
}

fn bios() -> Vec<u8> {
    let mut record = vec![
        0x00, 0x1A, 0x00, 0x00, 0x01, 0x02, 0x00, 0xE8, 0x03, 0x0F, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x01, 0x08, 0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00,
    ];
    record.extend(strings(&["MockVendor", "1.0", "01/01/2024"]));
    record
}

fn system(values: &[&str]) -> Vec<u8> {
    let mut record = SYSTEM_DATA.to_vec();
    record.extend(strings(values));
    record
}

fn end_of_table(handle: u8) -> Vec<u8> {
    let mut record = vec![0x7F, 0x04, handle, 0x00];
    record.extend(strings(&[]));
    record
}

fn board(handle: u8, board_type: u8) -> Vec<u8> {
    let mut record = vec![
        0x02, 0x11, handle, 0x00, 1, 2, 3, 4, 5, 0, 6, 0, 0, board_type, 1, 10, 0,
    ];
    record.extend(strings(&["-"; 6]));
    record
}

fn mock_tables() -> Vec<u8> {
    [
        bios(),
        system(&[
            "MockManufacturer",
            "MockProductName",
            "MockVersion",
            "MockSerialNumber",
            "MockSKUNumber",
            "MockFamily",
        ]),
        end_of_table(2),
    ]
    .concat()
}

fn entry64(max_struct_size: u32, table_address: u64) -> Vec<u8> {
    let mut entry = EntryPoint64::new(3, 1, max_struct_size, table_address);
    entry.doc_rev = 1;
    entry.encode()
}

fn memory_file(data: &[u8]) -> (tempfile::NamedTempFile, DevMem) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    let memory = DevMem::open(file.path()).unwrap();
    (file, memory)
}

fn modifier64(tables: &[u8]) -> (tempfile::NamedTempFile, Modifier<DevMem>) {
    let mut data = entry64(tables.len() as u32, 24);
    data.extend(tables);
    let (file, memory) = memory_file(&data);
    let location = EntryPointLocation {
        address: 0,
        size: 24,
    };
    (file, Modifier::with_memory(memory, location).unwrap())
}

fn read_prefix(file: &tempfile::NamedTempFile, len: usize) -> Vec<u8> {
    let mut data = std::fs::read(file.path()).unwrap();
    data.truncate(len);
    data
}

fn system_override(manufacturer: &str, version: &str) -> OverrideOpt {
    replace_system_information(SystemInformationOverride {
        manufacturer: Some(manufacturer.into()),
        product_name: Some("NewProductName".into()),
        version: Some(version.into()),
        serial_number: Some("NewSerialNumber".into()),
        ..Default::default()
    })
}

#[test]
fn replace_system_information_in_memory() {
    let (file, mut modifier) = modifier64(&mock_tables());
    modifier
        .modify([system_override("NewManufacturer", "NewVersion")])
        .unwrap();

    let want = [
        entry64(170, 24),
        bios(),
        system(&[
            "NewManufacturer",
            "NewProductName",
            "NewVersion",
            "NewSerialNumber",
            "MockSKUNumber",
            "MockFamily",
        ]),
        end_of_table(2),
    ]
    .concat();
    assert_eq!(read_prefix(&file, want.len()), want);
    assert_eq!(
        modifier.info().system_information().unwrap().manufacturer,
        "NewManufacturer"
    );
    modifier.close().unwrap();
}

#[test]
fn empty_string_shifts_indexes() {
    let (file, mut modifier) = modifier64(&mock_tables());
    modifier
        .modify([system_override("NewManufacturer", "")])
        .unwrap();

    let mut system = vec![
        1, 27, 1, 0, 1, 2, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6, 4, 5,
    ];
    system.extend(strings(&[
        "NewManufacturer",
        "NewProductName",
        "NewSerialNumber",
        "MockSKUNumber",
        "MockFamily",
    ]));
    let want = [entry64(159, 24), bios(), system, end_of_table(2)].concat();
    assert_eq!(read_prefix(&file, want.len()), want);
}

#[test]
fn longer_strings_grow_the_stream() {
    let manufacturer = "VeryLooooooooooooooooooooooooongNewManufacturer";
    let (file, mut modifier) = modifier64(&mock_tables());
    modifier
        .modify([system_override(manufacturer, "NewVersion")])
        .unwrap();

    let want = [
        entry64(202, 24),
        bios(),
        system(&[
            manufacturer,
            "NewProductName",
            "NewVersion",
            "NewSerialNumber",
            "MockSKUNumber",
            "MockFamily",
        ]),
        end_of_table(2),
    ]
    .concat();
    assert_eq!(read_prefix(&file, want.len()), want);
}

#[test]
fn failing_override_writes_nothing() {
    let tables = [bios(), end_of_table(1)].concat();
    let (file, mut modifier) = modifier64(&tables);
    let before = std::fs::read(file.path()).unwrap();

    let result = modifier.modify([system_override("NewManufacturer", "NewVersion")]);
    assert!(matches!(result, Err(Error::Transform(_))));
    assert_eq!(std::fs::read(file.path()).unwrap(), before);
}

#[test]
fn non_utf8_strings_are_rejected() {
    let mut system = SYSTEM_DATA.to_vec();
    system.extend(b"Maker\xE9\0Product\0\0");
    let tables = [bios(), system, end_of_table(2)].concat();
    let mut data = entry64(tables.len() as u32, 24);
    data.extend(&tables);
    let (file, memory) = memory_file(&data);
    let location = EntryPointLocation {
        address: 0,
        size: 24,
    };

    assert!(matches!(
        Modifier::with_memory(memory, location),
        Err(Error::Malformed { .. })
    ));
    assert_eq!(std::fs::read(file.path()).unwrap(), data);
}

#[test]
fn remove_boards_and_repair_groups() {
    let mut group = vec![0x0E, 0x0B, 0x05, 0x00, 0x01, 2, 3, 0, 2, 4, 0];
    group.extend(strings(&["Group"]));
    let tables = [
        bios(),
        board(3, 0x05),
        board(4, 0x0A),
        group,
        end_of_table(6),
    ]
    .concat();
    let (_file, mut modifier) = modifier64(&tables);

    modifier
        .modify([
            remove_baseboard_information(BoardType::SystemManagementModule),
            replace_motherboard_information(BaseboardOverride {
                asset_tag: Some("Rack 7".into()),
                ..Default::default()
            }),
        ])
        .unwrap();

    let info = modifier.info();
    assert_eq!(info.tables().len(), 4);
    assert!(info.by_handle(3).is_none());

    let boards = info.baseboard_information().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].asset_tag, "Rack 7");

    let groups = info.group_associations().unwrap();
    assert_eq!(groups[0].items.len(), 1);
    assert_eq!(groups[0].items[0].item_handle, 4);
    for group in &groups {
        for item in &group.items {
            assert!(info.by_handle(item.item_handle).is_some());
        }
    }

    let written = info.encode_tables().unwrap();
    assert_eq!(info.entry_point().table_max_size(), written.len());
}

#[test]
fn entry_point_32_counts_structures() {
    let tables = [
        bios(),
        board(1, 0x05),
        board(2, 0x0A),
        end_of_table(3),
    ]
    .concat();
    let mut entry = EntryPoint32::new(2, 8, tables.len() as u16, 31, 4);
    entry.max_struct_size = 0x40;
    let mut data = entry.encode();
    data.extend(&tables);

    let (file, memory) = memory_file(&data);
    let location = EntryPointLocation {
        address: 0,
        size: 31,
    };
    let mut modifier = Modifier::with_memory(memory, location).unwrap();
    modifier
        .modify([remove_baseboard_information(
            BoardType::SystemManagementModule,
        )])
        .unwrap();
    modifier.close().unwrap();

    let written = std::fs::read(file.path()).unwrap();
    let EntryPoint::Bits32(entry) = EntryPoint::decode(&written[..31]).unwrap() else {
        panic!("expected a 32-bit entry point");
    };
    let expected_len = tables.len() - board(1, 0x05).len();
    assert_eq!(entry.number_of_structs, 3);
    assert_eq!(usize::from(entry.table_length), expected_len);
    assert_eq!(usize::from(entry.max_struct_size), bios().len());
    assert_eq!(entry.table_address, 31);

    let info = Info::decode(&written[..31], &written[31..31 + expected_len]).unwrap();
    assert_eq!(info.tables().len(), 3);
}

#[test]
fn discovery_from_systab() {
    let mut data = vec![0u8; 0x40];
    let tables = mock_tables();
    data.extend(entry64(tables.len() as u32, 0x58));
    data.extend(&tables);
    let (_file, memory) = memory_file(&data);

    let mut systab = tempfile::NamedTempFile::new().unwrap();
    writeln!(systab, "ACPI20=0x7ff7e014\nSMBIOS3=0x40").unwrap();
    let config = ModifierConfig::firmware_only().with_systab(systab.path());

    let location = dmiscope::modifier::discover(&config, &memory).unwrap();
    assert_eq!(location, EntryPointLocation { address: 0x40, size: 24 });

    let modifier = Modifier::with_memory(memory, location).unwrap();
    assert_eq!(modifier.info().tables().len(), 3);
}

#[test]
fn discovery_by_legacy_scan() {
    let tables = mock_tables();
    let mut data = vec![0u8; 0x30];
    data.extend(entry64(tables.len() as u32, 0x30 + 24));
    data.extend(&tables);
    let (_file, memory) = memory_file(&data);

    let mut config = ModifierConfig::legacy_only();
    config.legacy_scan_start = 0;
    config.legacy_scan_end = 0x30 + 24;
    let location = dmiscope::modifier::discover(&config, &memory).unwrap();
    assert_eq!(location, EntryPointLocation { address: 0x30, size: 24 });

    config.legacy_scan_end = 0x20;
    assert!(matches!(
        dmiscope::modifier::discover(&config, &memory),
        Err(Error::Discovery(_))
    ));
}
