//! Framework HII Variable Pack
//!
//! A variable pack is a single HII pack carrying a named, GUID scoped and ID tagged variable map. In memory it is a
//! byte-packed header immediately followed by the NUL-terminated UCS-2 variable name and then the raw value bytes:
//!
//! ```text
//! offset  0  u32       Header.Length       total pack length, header included
//! offset  4  u16       Header.Type         EFI_HII_VARIABLE
//! offset  6  [u8; 16]  VariableGuid
//! offset 22  u32       VariableNameLength  name length in bytes, terminator included
//! offset 26  u16       VariableId
//! offset 28  [u16]     VariableName
//! offset 28 + VariableNameLength           value, Length - 28 - VariableNameLength bytes
//! ```
//!
//! All fields use the native (little endian) byte order of UEFI targets.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
extern crate alloc;
use alloc::vec::Vec;
use core::{fmt, mem::size_of};

use r_efi::efi;
use zerocopy::{FromBytes, IntoBytes};
use zerocopy_derive::*;

use crate::{
    error::{Error, Result},
    ucs2,
};

/// Pack type of a variable pack.
pub const EFI_HII_VARIABLE: u16 = 0x0006;

/// Size of [`RawVariablePackHeader`] in bytes.
pub const HEADER_SIZE: usize = size_of::<RawVariablePackHeader>();

/// Common header of every Framework HII pack.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct PackHeader {
    /// Total pack length in bytes, this header included.
    pub length: u32,
    /// Pack type.
    pub pack_type: u16,
}

/// Fixed portion of a variable pack. The variable name and value follow it.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct RawVariablePackHeader {
    pub header: PackHeader,
    pub variable_guid: [u8; 16],
    /// Byte length of the name, terminator included.
    pub variable_name_length: u32,
    pub variable_id: u16,
}

/// Borrowed UCS-2 name stored inside a pack.
///
/// The bytes are not guaranteed to be 2-byte aligned, so the name is exposed through its code units rather than as a
/// `&[u16]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PackName<'a>(&'a [u8]);

impl<'a> PackName<'a> {
    /// The raw name bytes, terminator included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Code units before the terminator.
    pub fn units(&self) -> impl Iterator<Item = u16> + 'a {
        let bytes: &'a [u8] = self.0;
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .take_while(|&c| c != 0)
    }

    /// Number of code units before the terminator.
    pub fn len(&self) -> usize {
        self.units().count()
    }

    pub fn is_empty(&self) -> bool {
        self.units().next().is_none()
    }

    /// String equality with `other`, which may or may not be NUL terminated.
    pub fn eq_ucs2(&self, other: &[u16]) -> bool {
        self.units().eq(ucs2::trim(other).iter().copied())
    }

    /// A NUL-terminated copy of the name.
    pub fn to_vec(&self) -> Vec<u16> {
        self.units().chain(core::iter::once(0)).collect()
    }
}

impl fmt::Display for PackName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(self.units()) {
            write!(f, "{}", c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for PackName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// The fields of one variable pack, as projected by [`VariablePack::map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackMap<'a> {
    pub name: PackName<'a>,
    pub guid: efi::Guid,
    pub id: u16,
    pub value: &'a [u8],
}

impl PackMap<'_> {
    /// Size of the value in bytes.
    pub fn size(&self) -> usize {
        self.value.len()
    }
}

/// A validated view over the bytes of one variable pack.
#[derive(Clone, Copy)]
pub struct VariablePack<'a> {
    header: RawVariablePackHeader,
    bytes: &'a [u8],
    name: PackName<'a>,
    value: &'a [u8],
}

impl<'a> VariablePack<'a> {
    /// Parses the pack at the start of `bytes`.
    ///
    /// Bytes past `Header.Length` are ignored. The layout is checked so that later projections never read outside
    /// the pack: the header fits, `Length` covers the header and name and fits in `bytes`, and the name is a whole
    /// number of code units containing a terminator.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let (header, _) = RawVariablePackHeader::read_from_prefix(bytes)
            .map_err(|_| malformed("buffer is shorter than the pack header"))?;

        let length = header.header.length as usize;
        let name_length = header.variable_name_length as usize;

        if length < HEADER_SIZE {
            return Err(malformed("pack length is smaller than the pack header"));
        }
        if length > bytes.len() {
            return Err(malformed("pack length exceeds the buffer"));
        }
        let name_end = HEADER_SIZE
            .checked_add(name_length)
            .filter(|&end| end <= length)
            .ok_or_else(|| malformed("variable name extends past the pack"))?;
        if name_length % 2 != 0 {
            return Err(malformed("variable name length is not a whole number of UCS-2 characters"));
        }

        let name = &bytes[HEADER_SIZE..name_end];
        if !name.chunks_exact(2).any(|c| c == [0u8, 0]) {
            return Err(malformed("variable name is not NUL terminated"));
        }

        Ok(Self { header, bytes: &bytes[..length], name: PackName(name), value: &bytes[name_end..length] })
    }

    /// Projects the name, GUID, id and value of the pack.
    pub fn map(&self) -> PackMap<'a> {
        PackMap { name: self.name, guid: self.guid(), id: self.id(), value: self.value }
    }

    pub fn header(&self) -> &RawVariablePackHeader {
        &self.header
    }

    pub fn pack_type(&self) -> u16 {
        self.header.header.pack_type
    }

    pub fn name(&self) -> PackName<'a> {
        self.name
    }

    pub fn guid(&self) -> efi::Guid {
        efi::Guid::from_bytes(&self.header.variable_guid)
    }

    pub fn id(&self) -> u16 {
        self.header.variable_id
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// `Header.Length - 28 - VariableNameLength`
    pub fn value_size(&self) -> usize {
        self.value.len()
    }

    /// The whole pack, header included. Its length is `Header.Length`.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl fmt::Debug for VariablePack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariablePack")
            .field("name", &self.name)
            .field("guid", &self.guid())
            .field("id", &self.id())
            .field("value_size", &self.value_size())
            .finish()
    }
}

/// Builds the bytes of a variable pack.
///
/// A terminator is appended to `name` when it has none; anything after the first NUL is dropped.
pub fn encode_variable_pack(name: &[u16], guid: &efi::Guid, id: u16, value: &[u8]) -> Result<Vec<u8>> {
    let name = ucs2::to_nul_terminated(name);
    let name_length = name.len() * size_of::<u16>();
    let length = HEADER_SIZE + name_length + value.len();

    let header = RawVariablePackHeader {
        header: PackHeader {
            length: u32::try_from(length).map_err(|_| Error::InvalidParameter)?,
            pack_type: EFI_HII_VARIABLE,
        },
        variable_guid: *guid.as_bytes(),
        variable_name_length: u32::try_from(name_length).map_err(|_| Error::InvalidParameter)?,
        variable_id: id,
    };

    let mut bytes = Vec::with_capacity(length);
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend(name.iter().flat_map(|c| c.to_le_bytes()));
    bytes.extend_from_slice(value);
    Ok(bytes)
}

fn malformed(reason: &'static str) -> Error {
    log::warn!("Rejecting variable pack: {reason}.");
    Error::MalformedPack { reason }
}
