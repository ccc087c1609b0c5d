//! Variable Pack List
//!
//! An ordered collection of [`VariablePack`] views with the lookups used by HII drivers: by position, by variable id,
//! and by name + GUID. Lookups scan in list order and the first match wins, so duplicate ids or duplicate name + GUID
//! pairs resolve to the earliest pack.
//!
//! A list can be assembled from parsed packs, from a buffer holding packs back to back, or from a C
//! `EFI_HII_VARIABLE_PACK_LIST` chain handed over by other firmware.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
extern crate alloc;
use alloc::vec::Vec;
use core::{ptr, slice};

use r_efi::efi;

use crate::{
    error::{Error, Result},
    ucs2::Ucs2,
    variable_pack::{PackMap, RawVariablePackHeader, VariablePack, HEADER_SIZE},
};

/// Node of a C singly linked variable pack list.
#[repr(C)]
#[derive(Debug)]
pub struct RawVariablePackList {
    /// Next node, or null at the end of the list.
    pub next_variable_pack: *mut RawVariablePackList,
    pub variable_pack: *mut RawVariablePackHeader,
}

/// Ordered list of variable packs.
#[derive(Debug, Clone, Default)]
pub struct VariablePackList<'a> {
    packs: Vec<VariablePack<'a>>,
}

impl<'a> VariablePackList<'a> {
    pub const fn new() -> Self {
        Self { packs: Vec::new() }
    }

    /// Appends a pack at the end of the list.
    pub fn push(&mut self, pack: VariablePack<'a>) {
        self.packs.push(pack);
    }

    /// Builds a list from packs stored back to back in `bytes`, each one starting where the previous one's
    /// `Header.Length` ends.
    pub fn parse_concatenated(bytes: &'a [u8]) -> Result<Self> {
        let mut list = Self::new();
        let mut remaining = bytes;
        while !remaining.is_empty() {
            let pack = VariablePack::parse(remaining)?;
            remaining = &remaining[pack.as_bytes().len()..];
            list.push(pack);
        }
        log::trace!("Parsed {} variable pack(s) from a {} byte buffer.", list.len(), bytes.len());
        Ok(list)
    }

    /// Builds a list from a C variable pack list. A null `head` yields an empty list.
    ///
    /// # Safety
    ///
    /// Every node reachable from `head` must be valid for reads, the chain must end with a null
    /// `next_variable_pack`, and each `variable_pack` must point to at least `Header.Length` readable bytes. All of it
    /// must stay alive and unmodified for `'a`.
    pub unsafe fn from_raw(head: *const RawVariablePackList) -> Result<Self> {
        let mut list = Self::new();
        let mut node = head;
        while let Some(entry) = unsafe { node.as_ref() } {
            let pack = entry.variable_pack as *const u8;
            if pack.is_null() {
                log::warn!("Variable pack list node {:p} has no pack.", node);
                return Err(Error::MalformedPack { reason: "list node without a pack" });
            }

            // Only the length is trusted to be readable before the header is known to fit.
            let length = unsafe { ptr::read_unaligned(pack as *const u32) } as usize;
            if length < HEADER_SIZE {
                log::warn!("Variable pack at {:p} is shorter than its header.", pack);
                return Err(Error::MalformedPack { reason: "pack length is smaller than the pack header" });
            }

            let bytes: &'a [u8] = unsafe { slice::from_raw_parts(pack, length) };
            list.push(VariablePack::parse(bytes)?);
            node = entry.next_variable_pack;
        }
        Ok(list)
    }

    /// Number of packs in the list.
    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// The packs in list order.
    pub fn packs(&self) -> &[VariablePack<'a>] {
        &self.packs
    }

    /// Lazily projects every pack in list order. Stop consuming the iterator to end the walk early.
    pub fn iter(&self) -> impl Iterator<Item = PackMap<'a>> + '_ {
        self.packs.iter().map(VariablePack::map)
    }

    /// Calls `callback` once for every pack, in list order.
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(&PackMap<'a>),
    {
        for map in self.iter() {
            callback(&map);
        }
    }

    /// The pack at zero-based position `index`.
    pub fn find_by_index(&self, index: usize) -> Result<PackMap<'a>> {
        self.iter().nth(index).ok_or_else(|| {
            log::trace!("No variable pack at index {index}, list holds {}.", self.len());
            Error::NotFound
        })
    }

    /// The first pack whose variable id equals `id`.
    pub fn find_by_id(&self, id: u16) -> Result<PackMap<'a>> {
        self.iter().find(|map| map.id == id).ok_or_else(|| {
            log::trace!("No variable pack with id {id}.");
            Error::NotFound
        })
    }

    /// The first pack named `name` under `guid`. `name` may or may not be NUL terminated.
    pub fn find_by_name_and_guid(&self, name: &[u16], guid: &efi::Guid) -> Result<PackMap<'a>> {
        self.iter().find(|map| map.name.eq_ucs2(name) && map.guid == *guid).ok_or_else(|| {
            log::trace!("No variable pack named {} in {:?}.", Ucs2(name), guid);
            Error::NotFound
        })
    }
}

impl<'a> From<Vec<VariablePack<'a>>> for VariablePackList<'a> {
    fn from(packs: Vec<VariablePack<'a>>) -> Self {
        Self { packs }
    }
}

impl<'a> FromIterator<VariablePack<'a>> for VariablePackList<'a> {
    fn from_iter<I: IntoIterator<Item = VariablePack<'a>>>(iter: I) -> Self {
        Self { packs: iter.into_iter().collect() }
    }
}
