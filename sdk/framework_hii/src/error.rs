//! Error types for Framework HII variable pack operations.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::fmt::Display;

use r_efi::efi;

/// A specialized [`Result`](core::result::Result) type for variable pack operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for variable pack lookups and NV overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No pack in the list, or no variable in NV, matched the request.
    NotFound,
    /// The NV variable exists but its size differs from the expected one. The stored data is considered corrupt or
    /// from a stale layout and is never truncated or zero extended.
    LoadError {
        /// Size the caller expected.
        expected: usize,
        /// Size reported by the variable store.
        actual: usize,
    },
    /// A caller precondition was violated. The variable store was not accessed.
    InvalidParameter,
    /// The pack bytes do not follow the variable pack layout.
    MalformedPack {
        /// Which layout rule was broken.
        reason: &'static str,
    },
    /// The NV variable disappeared or changed size between the size probe and the read.
    VariableChanged,
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotFound => write!(f, "Variable not found."),
            Error::LoadError { expected, actual } => {
                write!(f, "NV variable size mismatch: expected {expected} bytes, found {actual}.")
            }
            Error::InvalidParameter => write!(f, "Invalid parameter."),
            Error::MalformedPack { reason } => write!(f, "Malformed variable pack: {reason}."),
            Error::VariableChanged => write!(f, "NV variable changed between probe and read."),
        }
    }
}

impl core::error::Error for Error {}

impl From<Error> for efi::Status {
    fn from(e: Error) -> efi::Status {
        match e {
            Error::NotFound => efi::Status::NOT_FOUND,
            Error::LoadError { .. } => efi::Status::LOAD_ERROR,
            Error::InvalidParameter => efi::Status::INVALID_PARAMETER,
            Error::MalformedPack { .. } => efi::Status::VOLUME_CORRUPTED,
            Error::VariableChanged => efi::Status::DEVICE_ERROR,
        }
    }
}
