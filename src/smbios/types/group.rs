//! Group Associations (type 14), DSP0134 7.15.

use std::fmt;

use crate::smbios::{
    layout::{DecodeMode, ElementKind, FieldKind},
    Header, TableType, TypedRecord,
};

/// One member of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupItem {
    /// Type code of the member record
    pub item_type: u8,
    /// Handle of the member record
    pub item_handle: u16,
}

field_layout!(element GroupItem {
    item_type => FieldKind::Uint(1),
    item_handle => FieldKind::Uint(2),
});

/// Group Associations record
///
/// The item count is implied by the declared length: every byte after the group name
/// belongs to a three-byte item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAssociation {
    /// Record header
    pub header: Header,
    /// Name of the group
    pub group_name: String,
    /// Members of the group
    pub items: Vec<GroupItem>,
}

field_layout!(record GroupAssociation {
    group_name => FieldKind::Str,
    items => FieldKind::remaining(ElementKind::Nested(GroupItem::LAYOUT)),
});

impl TypedRecord for GroupAssociation {
    const TABLE_TYPE: TableType = TableType::GroupAssociations;
    const MIN_LENGTH: u8 = 0x05;
    const MODE: DecodeMode = DecodeMode::Strict;
    const EXACT: bool = true;
}

impl GroupAssociation {
    /// `true` if any item references `handle`
    #[must_use]
    pub fn references(&self, handle: u16) -> bool {
        self.items.iter().any(|item| item.item_handle == handle)
    }
}

impl fmt::Display for GroupAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\tName: {}", self.group_name)?;
        write!(f, "\tItems: {}", self.items.len())?;
        for item in &self.items {
            write!(
                f,
                "\n\t\t0x{:04X} ({})",
                item.item_handle,
                TableType::describe_code(item.item_type)
            )?;
        }
        Ok(())
    }
}
