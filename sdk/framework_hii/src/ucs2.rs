//! UCS-2 Variable Name Helpers
//!
//! Variable and pack names are NUL-terminated UCS-2 strings. These helpers treat a name as the code units that
//! precede the first NUL, or the whole slice when no terminator is present, so callers may pass names with or without
//! the terminator.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
extern crate alloc;
use alloc::vec::Vec;
use core::fmt;

/// Number of code units before the first NUL.
pub fn str_len(name: &[u16]) -> usize {
    name.iter().position(|&c| c == 0).unwrap_or(name.len())
}

/// The name without its terminator or anything after it.
pub fn trim(name: &[u16]) -> &[u16] {
    &name[..str_len(name)]
}

/// String equality up to the terminator.
pub fn str_eq(a: &[u16], b: &[u16]) -> bool {
    trim(a) == trim(b)
}

/// True if `name` ends with `suffix` and is strictly longer than it.
pub fn ends_with(name: &[u16], suffix: &[u16]) -> bool {
    let name = trim(name);
    let suffix = trim(suffix);
    name.len() > suffix.len() && name.ends_with(suffix)
}

/// A NUL-terminated copy of `name`.
pub fn to_nul_terminated(name: &[u16]) -> Vec<u16> {
    let name = trim(name);
    let mut out = Vec::with_capacity(name.len() + 1);
    out.extend_from_slice(name);
    out.push(0);
    out
}

/// `name` followed by `suffix`, NUL terminated.
pub fn concat(name: &[u16], suffix: &[u16]) -> Vec<u16> {
    let name = trim(name);
    let suffix = trim(suffix);
    let mut out = Vec::with_capacity(name.len() + suffix.len() + 1);
    out.extend_from_slice(name);
    out.extend_from_slice(suffix);
    out.push(0);
    out
}

/// Encodes a Rust string as a NUL-terminated UCS-2 name.
///
/// Characters outside the Basic Multilingual Plane are encoded as surrogate pairs, which firmware treats as two
/// opaque code units.
pub fn encode(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(core::iter::once(0)).collect()
}

/// Display adapter for UCS-2 names in log messages.
pub struct Ucs2<'a>(pub &'a [u16]);

impl fmt::Display for Ucs2<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(trim(self.0).iter().copied()) {
            write!(f, "{}", c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Ucs2<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
