//! Common Test Infrastructure for Framework HII Integration Tests
//!
//! An in-memory variable store implementing `RuntimeServices`, shared GUIDs and pack builders.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    sync::Once,
};

use framework_hii::{encode_variable_pack, ucs2};
use framework_runtime_services::{variable_services::GetVariableStatus, RuntimeServices};
use r_efi::efi;

pub const SETUP_GUID: efi::Guid =
    efi::Guid::from_fields(0xec87d643, 0xeba4, 0x4bb5, 0xa1, 0xe5, &[0x3f, 0x3e, 0x36, 0xb2, 0x0d, 0xa9]);
pub const LANG_GUID: efi::Guid =
    efi::Guid::from_fields(0x0fc9013a, 0x0568, 0x4ba9, 0x9b, 0x7e, &[0xc9, 0xc3, 0x90, 0xa6, 0x60, 0x9b]);

pub const NV_ATTRIBUTES: u32 = 0x7;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        // Default to no logging unless RUST_LOG environment variable is set
        let mut builder = env_logger::Builder::from_default_env();

        if std::env::var("RUST_LOG").is_err() {
            builder.filter_level(log::LevelFilter::Off);
        }

        builder.is_test(true).init();
    });
}

/// Variable store kept in memory. Every GetVariable call is counted.
#[derive(Default)]
pub struct MemoryVariableStore {
    variables: RefCell<BTreeMap<(Vec<u16>, [u8; 16]), Vec<u8>>>,
    calls: Cell<usize>,
}

impl MemoryVariableStore {
    pub fn set(&self, name: &str, guid: &efi::Guid, data: &[u8]) {
        self.variables.borrow_mut().insert((ucs2::encode(name), *guid.as_bytes()), data.to_vec());
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RuntimeServices for MemoryVariableStore {
    unsafe fn get_variable_unchecked<'a>(
        &self,
        name: &mut [u16],
        namespace: &efi::Guid,
        data: Option<&'a mut [u8]>,
    ) -> GetVariableStatus {
        self.calls.set(self.calls.get() + 1);
        let variables = self.variables.borrow();
        let Some(value) = variables.get(&(ucs2::to_nul_terminated(name), *namespace.as_bytes())) else {
            return GetVariableStatus::Error(efi::Status::NOT_FOUND);
        };
        match data {
            Some(data) if data.len() >= value.len() => {
                data[..value.len()].copy_from_slice(value);
                GetVariableStatus::Success { data_size: value.len(), attributes: NV_ATTRIBUTES }
            }
            _ => GetVariableStatus::BufferTooSmall { data_size: value.len(), attributes: NV_ATTRIBUTES },
        }
    }
}

/// A variable pack for `name` in `guid`.
pub fn pack(name: &str, guid: &efi::Guid, id: u16, value: &[u8]) -> Vec<u8> {
    encode_variable_pack(&ucs2::encode(name), guid, id, value).expect("pack fits in a u32 length")
}
