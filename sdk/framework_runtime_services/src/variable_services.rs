//! Variable service status types.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

use r_efi::efi;

/// Outcome of a raw GetVariable() call.
///
/// `BufferTooSmall` is split out from the other errors because callers routinely use it to learn the size of a
/// variable before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetVariableStatus {
    /// The variable was read. `data_size` is the number of bytes written into the buffer.
    Success { data_size: usize, attributes: u32 },
    /// The variable exists but the supplied buffer was too small. `data_size` is the size required.
    BufferTooSmall { data_size: usize, attributes: u32 },
    /// Any other failure reported by the firmware.
    Error(efi::Status),
}
