//! Pack list lookups over an exported pack buffer.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use framework_hii::{ucs2, Error, VariablePackList, EFI_HII_VARIABLE};

use super::common::*;

fn exported_packs() -> Vec<u8> {
    [
        pack("Setup", &SETUP_GUID, 1, &[0x10; 8]),
        pack("Lang", &LANG_GUID, 2, b"en-US\0"),
        pack("Timeout", &SETUP_GUID, 3, &5u16.to_le_bytes()),
    ]
    .concat()
}

#[test]
fn test_lookups_agree_with_list_order() {
    init_logger();
    let buffer = exported_packs();
    let list = VariablePackList::parse_concatenated(&buffer).unwrap();

    assert_eq!(list.len(), 3);
    for (index, map) in list.iter().enumerate() {
        assert_eq!(list.find_by_index(index), Ok(map));
        assert_eq!(list.find_by_id(map.id), Ok(map));
        assert_eq!(list.find_by_name_and_guid(&map.name.to_vec(), &map.guid), Ok(map));
    }
    assert_eq!(list.find_by_index(3), Err(Error::NotFound));
}

#[test]
fn test_pack_values_are_exposed_in_place() {
    init_logger();
    let buffer = exported_packs();
    let list = VariablePackList::parse_concatenated(&buffer).unwrap();

    let lang = list.find_by_id(2).unwrap();
    assert_eq!(lang.name.to_string(), "Lang");
    assert_eq!(lang.guid, LANG_GUID);
    assert_eq!(lang.value, b"en-US\0");
    assert_eq!(lang.size(), 6);

    // Values borrow the exported buffer.
    let range = buffer.as_ptr_range();
    assert!(range.contains(&lang.value.as_ptr()));

    assert!(list.packs().iter().all(|p| p.pack_type() == EFI_HII_VARIABLE));
}

#[test]
fn test_name_lookup_is_scoped_by_guid() {
    init_logger();
    let buffer = exported_packs();
    let list = VariablePackList::parse_concatenated(&buffer).unwrap();

    assert_eq!(list.find_by_name_and_guid(&ucs2::encode("Timeout"), &SETUP_GUID).unwrap().id, 3);
    assert_eq!(list.find_by_name_and_guid(&ucs2::encode("Timeout"), &LANG_GUID), Err(Error::NotFound));
}

#[test]
fn test_corrupted_export_is_rejected() {
    init_logger();
    let mut buffer = exported_packs();
    // Claim a name longer than the first pack.
    buffer[22..26].copy_from_slice(&0x1000u32.to_le_bytes());

    assert!(matches!(VariablePackList::parse_concatenated(&buffer), Err(Error::MalformedPack { .. })));
}
