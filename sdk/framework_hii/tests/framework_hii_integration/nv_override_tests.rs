//! Overriding pack values from the variable store.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use framework_hii::{ucs2, Error, NvOverride, VariablePackList};
use r_efi::efi;

use super::common::*;

/// Copies every pack value, replacing it with `<name>Override` from NV when one of the right size exists.
fn effective_values(list: &VariablePackList<'_>, nv: &NvOverride<'_, MemoryVariableStore>) -> Vec<Vec<u8>> {
    let suffix = ucs2::encode("Override");
    list.iter()
        .map(|map| {
            let mut value = map.value.to_vec();
            if let Err(e) = nv.override_by_suffix(&suffix, &map.name.to_vec(), &map.guid, &mut value) {
                log::debug!("Keeping default for {}: {e}", map.name);
                value.copy_from_slice(map.value);
            }
            value
        })
        .collect()
}

#[test]
fn test_override_by_suffix_applies_matching_variables_only() {
    init_logger();
    let buffer = [pack("Setup", &SETUP_GUID, 1, &[0; 4]), pack("Lang", &LANG_GUID, 2, &[0; 2])].concat();
    let list = VariablePackList::parse_concatenated(&buffer).unwrap();

    let store = MemoryVariableStore::default();
    store.set("SetupOverride", &SETUP_GUID, &[1, 2, 3, 4]);
    // Wrong size, ignored.
    store.set("LangOverride", &LANG_GUID, &[9, 9, 9]);

    let nv = NvOverride::new(&store);
    assert_eq!(effective_values(&list, &nv), vec![vec![1, 2, 3, 4], vec![0, 0]]);
}

#[test]
fn test_override_if_suffix_on_pack_names() {
    init_logger();
    let buffer = [pack("Setup", &SETUP_GUID, 1, &[0; 4]), pack("SetupOverride", &SETUP_GUID, 2, &[0; 4])].concat();
    let list = VariablePackList::parse_concatenated(&buffer).unwrap();

    let store = MemoryVariableStore::default();
    store.set("SetupOverride", &SETUP_GUID, &[5, 6, 7, 8]);
    let nv = NvOverride::new(&store);
    let suffix = ucs2::encode("Override");

    let mut results = Vec::new();
    for map in list.iter() {
        let mut value = [0u8; 4];
        results.push(nv.override_if_suffix(&suffix, &map.name.to_vec(), &map.guid, &mut value).map(|_| value));
    }

    assert_eq!(results, vec![Err(Error::InvalidParameter), Ok([5, 6, 7, 8])]);
    // The rejected name never reached the store: one probe and one read for the accepted one.
    assert_eq!(store.calls(), 2);
}

#[test]
fn test_retrieve_from_nv_owned_buffer() {
    init_logger();
    let store = MemoryVariableStore::default();
    store.set("Timeout", &SETUP_GUID, &5u16.to_le_bytes());
    let nv = NvOverride::new(&store);

    let data = nv.retrieve_from_nv(&ucs2::encode("Timeout"), &SETUP_GUID, 2).unwrap();
    assert_eq!(u16::from_le_bytes([data[0], data[1]]), 5);

    let error = nv.retrieve_from_nv(&ucs2::encode("Timeout"), &SETUP_GUID, 4).unwrap_err();
    assert_eq!(error, Error::LoadError { expected: 4, actual: 2 });
    assert_eq!(efi::Status::from(error), efi::Status::LOAD_ERROR);

    let error = nv.retrieve_from_nv(&ucs2::encode("Missing"), &SETUP_GUID, 2).unwrap_err();
    assert_eq!(efi::Status::from(error), efi::Status::NOT_FOUND);
}
