//! Decoding complete table sets through the public API.

use dmiscope::prelude::*;
use dmiscope::smbios::{decode_tables, encode_tables, REGISTRY};

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

fn bios() -> Vec<u8> {
    with_strings(
        vec![
            0x00, 0x1A, 0x00, 0x00, 0x01, 0x02, 0x00, 0xE8, 0x03, 0x0F, 0x80, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00,
        ],
        &["MockVendor", "1.0", "01/01/2024"],
    )
}

fn system() -> Vec<u8> {
    let mut record = vec![0x01, 0x1B, 0x01, 0x00, 0x01, 0x02, 0x03, 0x04];
    record.extend([
        0x78, 0x56, 0x34, 0x12, 0x34, 0x12, 0x78, 0x56, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC,
        0xDE, 0xF0,
    ]);
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

fn baseboard() -> Vec<u8> {
    with_strings(
        vec![
            0x02, 0x11, 0x02, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x09, 0x06, 0x03, 0x00, 0x0A,
            0x01, 0x04, 0x00,
        ],
        &["Board Inc.", "X100", "1.0", "B123", "-", "Slot 0"],
    )
}

fn chassis() -> Vec<u8> {
    with_strings(
        vec![
            0x03, 0x15, 0x03, 0x00, 0x01, 0x17, 0x00, 0x00, 0x00, 0x03, 0x03, 0x03, 0x03, 0x00,
            0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x00,
        ],
        &["Chassis Inc."],
    )
}

fn group() -> Vec<u8> {
    with_strings(
        vec![0x0E, 0x08, 0x04, 0x00, 0x01, 0x02, 0x02, 0x00],
        &["Boards"],
    )
}

fn end_of_table() -> Vec<u8> {
    with_strings(vec![0x7F, 0x04, 0x05, 0x00], &[])
}

fn stream() -> Vec<u8> {
    [bios(), system(), baseboard(), chassis(), group(), end_of_table()].concat()
}

fn entry64(max_struct_size: u32, table_address: u64) -> Vec<u8> {
    let mut entry = EntryPoint64::new(3, 1, max_struct_size, table_address);
    entry.doc_rev = 1;
    entry.encode()
}

#[test]
fn decode_mock_vendor() {
    let tables = stream();
    let info = Info::decode(&entry64(tables.len() as u32, 24), &tables).unwrap();

    assert!(info.entry_point().is_64bit());
    assert_eq!(info.entry_point().version(), (3, 1, 1));
    assert_eq!(info.entry_point().table_address(), 24);
    assert_eq!(info.tables().len(), 6);
    assert!(info.is_terminated());
    assert_eq!(info.by_type(0).count(), 1);

    let bios = info.bios_information().unwrap();
    assert_eq!(bios.vendor, "MockVendor");
    assert_eq!(bios.version, "1.0");
    assert_eq!(bios.release_date, "01/01/2024");
    assert_eq!(bios.starting_address_segment, 0xE800);

    let system = info.system_information().unwrap();
    assert_eq!(system.manufacturer, "MockManufacturer");
    assert_eq!(system.sku_number, "MockSKUNumber");
    assert_eq!(system.family, "MockFamily");
    assert_eq!(
        system.system_uuid().unwrap().to_string(),
        "12345678-1234-5678-1234-56789abcdef0"
    );

    let boards = info.baseboard_information().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].kind(), Some(BoardType::Motherboard));
    assert!(boards[0].features().contains(BoardFeatures::HOSTING_BOARD));
    assert_eq!(boards[0].contained_object_handles, [4]);

    let chassis = info.chassis_information().unwrap();
    assert_eq!(chassis[0].manufacturer, "Chassis Inc.");
    assert_eq!(chassis[0].height, 2);
    assert!(chassis[0].contained_elements.is_empty());

    let groups = info.group_associations().unwrap();
    assert_eq!(groups[0].group_name, "Boards");
    assert_eq!(groups[0].items[0].item_handle, 2);

    assert!(info.memory_devices().unwrap().is_empty());
    assert_eq!(info.encode_tables().unwrap(), tables);
}

#[test]
fn lookups_by_type_and_handle() {
    let info = Info::decode(&entry64(0x200, 24), &stream()).unwrap();

    assert_eq!(info.by_type(2).count(), 1);
    assert_eq!(info.by_type(17).count(), 0);
    assert_eq!(info.by_handle(3).map(Table::table_type), Some(3));
    assert!(info.by_handle(0x99).is_none());

    let board = info.by_handle(2).unwrap();
    assert_eq!(board.string_at(0x04).unwrap(), "Board Inc.");
    assert_eq!(board.byte_at(0x0D).unwrap(), 0x0A);
    assert_eq!(board.word_at(0x0B).unwrap(), 3);
}

#[test]
fn missing_singular_record() {
    let tables = [bios(), end_of_table()].concat();
    let info = Info::decode(&entry64(0x100, 24), &tables).unwrap();

    let error = info.system_information().unwrap_err();
    assert!(matches!(error, Error::NotFound(1)));
    assert!(error.is_lookup_miss());
}

#[test]
fn duplicate_singular_record() {
    let tables = [bios(), bios(), end_of_table()].concat();
    let info = Info::decode(&entry64(0x100, 24), &tables).unwrap();
    assert!(matches!(
        info.bios_information(),
        Err(Error::NotUnique { count: 2, .. })
    ));
}

fn assert_anchor_failure(data: &[u8]) {
    match EntryPoint::decode(data) {
        Err(Error::EntryPoint { bits32, bits64 }) => {
            assert!(matches!(*bits32, Error::InvalidAnchor { .. }));
            assert!(matches!(*bits64, Error::InvalidAnchor { .. }));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn anchor_failure_reports_both_variants() {
    assert_anchor_failure(b"_SM3");

    let mut entry = entry64(0x100, 24);
    entry[4] = 0;
    assert_anchor_failure(&entry);
}

#[test]
fn checksum_mismatch() {
    let mut entry = entry64(0x100, 24);
    entry[12] ^= 0xFF;
    match EntryPoint::decode(&entry) {
        Err(Error::EntryPoint { bits64, .. }) => {
            assert!(matches!(*bits64, Error::InvalidChecksum { .. }));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn truncated_stream() {
    let mut tables = stream();
    tables.truncate(60);
    assert!(matches!(
        decode_tables(&tables),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn stream_stops_at_end_of_table() {
    let mut tables = stream();
    tables.extend([0xAA; 16]);
    let decoded = decode_tables(&tables).unwrap();
    assert_eq!(decoded.len(), 6);
    assert_eq!(encode_tables(&decoded).unwrap(), stream());
}

#[test]
fn every_typed_record_round_trips() {
    let tables = decode_tables(&stream()).unwrap();
    for table in &tables {
        let typed = project(table).unwrap();
        assert_eq!(typed.table_type().code(), table.table_type());
        assert_eq!(&typed.encode().unwrap(), table);
    }
}

#[test]
fn projection_covers_registry() {
    for (table_type, decode) in REGISTRY {
        let empty = Table::new(table_type.code(), 0, vec![], vec![]).unwrap();
        let result = decode(&empty);
        if *table_type == TableType::EndOfTable {
            assert!(result.is_ok());
        } else {
            assert!(!result.unwrap_err().is_lookup_miss());
        }
    }

    let oem = Table::new(0xC0, 0, vec![1, 2, 3], vec![]).unwrap();
    assert!(matches!(project(&oem), Err(Error::UnsupportedType(0xC0))));
}

#[test]
fn dump_round_trip() {
    let tables = stream();
    let mut dump = entry64(tables.len() as u32, 0x20);
    dump.resize(0x20, 0);
    dump.extend(&tables);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dmi.bin");
    std::fs::write(&path, &dump).unwrap();

    let from_file = Info::from_dump_file(&path).unwrap();
    let from_buffer = Info::from_dump(&dump).unwrap();
    assert_eq!(from_file, from_buffer);
    assert_eq!(from_file.system_information().unwrap().product_name, "MockProductName");
}

#[test]
fn sysfs_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SysfsPaths::new(dir.path());
    std::fs::write(paths.entry_point(), entry64(0x200, 0)).unwrap();
    std::fs::write(paths.tables(), stream()).unwrap();

    let info = Info::from_sysfs(&paths).unwrap();
    assert_eq!(info.tables().len(), 6);

    let missing = SysfsPaths::new(dir.path().join("missing"));
    assert!(matches!(
        Info::from_sysfs(&missing),
        Err(Error::FileError(_))
    ));
}
