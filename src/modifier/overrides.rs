//! Table transforms applied by [`crate::modifier::Modifier::modify`].
//!
//! An [`OverrideOpt`] takes the complete record list and returns the list to write back.
//! Transforms must keep the End-of-Table record last, and a transform that removes records
//! must also repair every record that referenced them by handle.
//!
//! Every failure is reported as [`Error::Transform`]; the modifier then aborts before
//! anything is written.

use std::collections::HashSet;

use crate::{
    smbios::{
        BaseboardInformation, BoardType, GroupAssociation, SystemInformation, Table, TableType,
        TypedRecord,
    },
    Error, Result,
};

/// A transform of the complete record list
pub type OverrideOpt = Box<dyn Fn(Vec<Table>) -> Result<Vec<Table>>>;

/// Replacement values for System Information; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct SystemInformationOverride {
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub version: Option<String>,
    pub serial_number: Option<String>,
    pub uuid: Option<[u8; 16]>,
    pub wake_up_type: Option<u8>,
    pub sku_number: Option<String>,
    pub family: Option<String>,
}

impl SystemInformationOverride {
    fn apply(&self, record: &mut SystemInformation) {
        replace(&mut record.manufacturer, &self.manufacturer);
        replace(&mut record.product_name, &self.product_name);
        replace(&mut record.version, &self.version);
        replace(&mut record.serial_number, &self.serial_number);
        replace(&mut record.uuid, &self.uuid);
        replace(&mut record.wake_up_type, &self.wake_up_type);
        replace(&mut record.sku_number, &self.sku_number);
        replace(&mut record.family, &self.family);
    }
}

/// Replacement values for Baseboard Information; `None` keeps the current value.
///
/// Replacing the contained object handles also updates their count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct BaseboardOverride {
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub serial_number: Option<String>,
    pub asset_tag: Option<String>,
    pub board_features: Option<u8>,
    pub location_in_chassis: Option<String>,
    pub chassis_handle: Option<u16>,
    pub board_type: Option<u8>,
    pub contained_object_handles: Option<Vec<u16>>,
}

impl BaseboardOverride {
    fn apply(&self, record: &mut BaseboardInformation) -> Result<()> {
        replace(&mut record.manufacturer, &self.manufacturer);
        replace(&mut record.product, &self.product);
        replace(&mut record.version, &self.version);
        replace(&mut record.serial_number, &self.serial_number);
        replace(&mut record.asset_tag, &self.asset_tag);
        replace(&mut record.board_features, &self.board_features);
        replace(&mut record.location_in_chassis, &self.location_in_chassis);
        replace(&mut record.chassis_handle, &self.chassis_handle);
        replace(&mut record.board_type, &self.board_type);
        if let Some(handles) = &self.contained_object_handles {
            record.number_of_contained_objects = u8::try_from(handles.len()).map_err(|_| {
                Error::Transform(format!("{} contained object handles", handles.len()))
            })?;
            record.contained_object_handles.clone_from(handles);
        }
        Ok(())
    }
}

fn replace<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn transform_error(table: &Table, error: &Error) -> Error {
    Error::Transform(format!(
        "{} handle {:#06x}: {}",
        TableType::describe_code(table.table_type()),
        table.handle(),
        error
    ))
}

fn decode<T: TypedRecord>(table: &Table) -> Result<T> {
    T::decode(table).map_err(|error| transform_error(table, &error))
}

fn encode<T: TypedRecord>(record: &T, table: &Table) -> Result<Table> {
    record
        .encode()
        .map_err(|error| transform_error(table, &error))
}

/// Replace fields of the System Information record, which must be unique.
#[must_use]
pub fn replace_system_information(values: SystemInformationOverride) -> OverrideOpt {
    Box::new(move |mut tables: Vec<Table>| {
        let code = TableType::SystemInformation.code();
        let mut positions = tables
            .iter()
            .enumerate()
            .filter(|(_, table)| table.table_type() == code)
            .map(|(index, _)| index);
        let index = match (positions.next(), positions.count()) {
            (Some(index), 0) => index,
            (None, _) => return Err(Error::Transform("no System Information record".into())),
            (Some(_), rest) => {
                return Err(Error::Transform(format!(
                    "{} System Information records, expected one",
                    rest + 1
                )))
            }
        };

        let mut record: SystemInformation = decode(&tables[index])?;
        values.apply(&mut record);
        tables[index] = encode(&record, &tables[index])?;
        Ok(tables)
    })
}

/// Replace fields of every Baseboard Information record accepted by `predicate`.
///
/// Records the predicate rejects are left byte-for-byte unchanged, but every baseboard
/// record must decode.
#[must_use]
pub fn replace_baseboard_information<F>(predicate: F, values: BaseboardOverride) -> OverrideOpt
where
    F: Fn(&BaseboardInformation) -> bool + 'static,
{
    Box::new(move |mut tables: Vec<Table>| {
        let code = TableType::BaseboardInformation.code();
        for table in tables.iter_mut().filter(|table| table.table_type() == code) {
            let mut record: BaseboardInformation = decode(table)?;
            if !predicate(&record) {
                continue;
            }
            values.apply(&mut record)?;
            *table = encode(&record, table)?;
        }
        Ok(tables)
    })
}

/// Replace fields of the motherboard's Baseboard Information record.
#[must_use]
pub fn replace_motherboard_information(values: BaseboardOverride) -> OverrideOpt {
    replace_baseboard_information(
        |board| board.kind() == Some(BoardType::Motherboard),
        values,
    )
}

/// Remove every Baseboard Information record of `board_type`.
///
/// Group Associations that listed a removed record drop that item; a group left without
/// items is kept.
#[must_use]
pub fn remove_baseboard_information(board_type: BoardType) -> OverrideOpt {
    Box::new(move |tables: Vec<Table>| {
        let code = TableType::BaseboardInformation.code();
        let mut removed = HashSet::new();
        for table in tables.iter().filter(|table| table.table_type() == code) {
            let record: BaseboardInformation = decode(table)?;
            if record.kind() == Some(board_type) {
                removed.insert(table.handle());
            }
        }
        if removed.is_empty() {
            return Ok(tables);
        }
        log::debug!("removing {} {} records", removed.len(), board_type);

        let group_code = TableType::GroupAssociations.code();
        let mut kept = Vec::with_capacity(tables.len());
        for table in tables {
            if table.table_type() == code && removed.contains(&table.handle()) {
                continue;
            }
            if table.table_type() != group_code {
                kept.push(table);
                continue;
            }

            let mut group: GroupAssociation = decode(&table)?;
            let before = group.items.len();
            group
                .items
                .retain(|item| !removed.contains(&item.item_handle));
            if group.items.len() == before {
                kept.push(table);
            } else {
                kept.push(encode(&group, &table)?);
            }
        }
        Ok(kept)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        smbios::decode_tables,
        test::{baseboard_table, group_table, system_information_bytes},
    };

    fn system_table() -> Table {
        decode_tables(&system_information_bytes()).unwrap().remove(0)
    }

    #[test]
    fn replace_system_fields() {
        let opt = replace_system_information(SystemInformationOverride {
            manufacturer: Some("NewManufacturer".into()),
            version: Some(String::new()),
            ..Default::default()
        });
        let tables = opt(vec![system_table()]).unwrap();

        let record = SystemInformation::decode(&tables[0]).unwrap();
        assert_eq!(record.manufacturer, "NewManufacturer");
        assert_eq!(record.product_name, "MockProductName");
        assert_eq!(record.version, "");
        assert_eq!(tables[0].header.length, 27);
        assert_eq!(tables[0].data[..4], [1, 2, 0, 3]);
    }

    #[test]
    fn override_grows_short_system_record() {
        let mut data = vec![1, 2, 3, 4];
        data.extend([0u8; 16]);
        data.push(6);
        let strings = ["Maker", "Product", "1.0", "0001"].map(String::from).to_vec();
        let table = Table::new(1, 1, data, strings).unwrap();
        assert_eq!(table.header.length, 0x19);

        let opt = replace_system_information(SystemInformationOverride {
            sku_number: Some("SKU-1".into()),
            family: Some("Family".into()),
            ..Default::default()
        });
        let tables = opt(vec![table]).unwrap();

        assert_eq!(tables[0].header.length, 27);
        let record = SystemInformation::decode(&tables[0]).unwrap();
        assert_eq!(record.sku_number, "SKU-1");
        assert_eq!(record.family, "Family");
        assert_eq!(record.manufacturer, "Maker");
        assert_eq!(record.wake_up_type, 6);
    }

    #[test]
    fn untouched_short_system_record_keeps_length() {
        let mut data = vec![1, 2, 3, 4];
        data.extend([0u8; 16]);
        data.push(6);
        let strings = ["Maker", "Product", "1.0", "0001"].map(String::from).to_vec();
        let table = Table::new(1, 1, data, strings).unwrap();

        let opt = replace_system_information(SystemInformationOverride {
            manufacturer: Some("Other".into()),
            ..Default::default()
        });
        let tables = opt(vec![table]).unwrap();
        assert_eq!(tables[0].header.length, 0x19);
        assert_eq!(tables[0].strings[0], "Other");
    }

    #[test]
    fn system_must_be_unique() {
        let opt = replace_system_information(SystemInformationOverride::default());
        assert!(matches!(opt(vec![]), Err(Error::Transform(_))));
        assert!(matches!(
            opt(vec![system_table(), system_table()]),
            Err(Error::Transform(_))
        ));
    }

    #[test]
    fn replace_motherboard_only() {
        let opt = replace_motherboard_information(BaseboardOverride {
            serial_number: Some("newSerialNumber".into()),
            asset_tag: Some("newTag".into()),
            ..Default::default()
        });
        let unknown = baseboard_table(1, BoardType::Unknown as u8);
        let tables = opt(vec![baseboard_table(0, 0x0A), unknown.clone()]).unwrap();

        let board = BaseboardInformation::decode(&tables[0]).unwrap();
        assert_eq!(board.serial_number, "newSerialNumber");
        assert_eq!(board.asset_tag, "newTag");
        assert_eq!(board.manufacturer, "-");
        assert_eq!(board.contained_object_handles, [10]);
        assert_eq!(tables[1], unknown);
    }

    #[test]
    fn replace_contained_handles() {
        let opt = replace_motherboard_information(BaseboardOverride {
            contained_object_handles: Some(vec![3, 4]),
            ..Default::default()
        });
        let tables = opt(vec![baseboard_table(0, 0x0A)]).unwrap();
        let board = BaseboardInformation::decode(&tables[0]).unwrap();
        assert_eq!(board.number_of_contained_objects, 2);
        assert_eq!(tables[0].header.length, 19);
    }

    #[test]
    fn override_grows_short_board_record() {
        let strings = ["Maker", "Board", "1.0", "0001"].map(String::from).to_vec();
        let table = Table::new(2, 4, vec![1, 2, 3, 4], strings).unwrap();
        assert_eq!(table.header.length, 8);

        let opt = replace_baseboard_information(
            |_| true,
            BaseboardOverride {
                asset_tag: Some("TAG".into()),
                ..Default::default()
            },
        );
        let tables = opt(vec![table.clone()]).unwrap();
        assert_eq!(tables[0].header.length, 9);
        let board = BaseboardInformation::decode(&tables[0]).unwrap();
        assert_eq!(board.asset_tag, "TAG");
        assert_eq!(board.serial_number, "0001");

        let opt = replace_baseboard_information(
            |_| true,
            BaseboardOverride {
                contained_object_handles: Some(vec![7]),
                ..Default::default()
            },
        );
        let tables = opt(vec![table]).unwrap();
        assert_eq!(tables[0].header.length, 19);
        let board = BaseboardInformation::decode(&tables[0]).unwrap();
        assert_eq!(board.number_of_contained_objects, 1);
        assert_eq!(board.contained_object_handles, [7]);
    }

    #[test]
    fn malformed_board_fails() {
        let mut table = baseboard_table(0, 0x0A);
        table.data[10] = 255;
        let opt = replace_motherboard_information(BaseboardOverride::default());
        assert!(matches!(opt(vec![table.clone()]), Err(Error::Transform(_))));

        let opt = remove_baseboard_information(BoardType::SystemManagementModule);
        assert!(matches!(opt(vec![table]), Err(Error::Transform(_))));
    }

    #[test]
    fn remove_boards() {
        let opt = remove_baseboard_information(BoardType::SystemManagementModule);
        let tables = opt(vec![baseboard_table(0, 5), baseboard_table(1, 5)]).unwrap();
        assert!(tables.is_empty());

        let keep = baseboard_table(3, 0x0A);
        let tables = opt(vec![keep.clone()]).unwrap();
        assert_eq!(tables, [keep]);
    }

    #[test]
    fn remove_repairs_groups() {
        let opt = remove_baseboard_information(BoardType::SystemManagementModule);
        let tables = opt(vec![
            baseboard_table(0, 5),
            baseboard_table(1, 5),
            group_table(2, &[(2, 0), (2, 1)]),
        ])
        .unwrap();

        assert_eq!(tables.len(), 1);
        let group = &tables[0];
        assert_eq!(group.handle(), 2);
        assert_eq!(group.header.length, 5);
        assert_eq!(group.data, [1]);
        assert_eq!(group.strings, ["Group"]);
    }

    #[test]
    fn remove_keeps_unrelated_group_items() {
        let opt = remove_baseboard_information(BoardType::SystemManagementModule);
        let tables = opt(vec![
            baseboard_table(0, 5),
            baseboard_table(1, 0x0A),
            group_table(2, &[(2, 0), (2, 1)]),
        ])
        .unwrap();

        let group = GroupAssociation::decode(&tables[1]).unwrap();
        assert_eq!(group.items.len(), 1);
        assert_eq!(group.items[0].item_handle, 1);
        assert_eq!(tables[1].header.length, 8);
    }
}
