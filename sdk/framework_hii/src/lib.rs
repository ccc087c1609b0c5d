//! Framework HII Variable Packs
//!
//! Support for the pre-PI Framework HII variable pack model: a bit-exact view of `EFI_HII_VARIABLE_PACK`, an ordered
//! list of packs with lookups by position, id, or name + GUID, and helpers that override a pack value with the copy
//! stored in the platform variable store.
//!
//! ## Examples and Usage
//!
//! ```rust,ignore
//! use framework_hii::{ucs2, NvOverride, VariablePackList};
//! use framework_runtime_services::StandardRuntimeServices;
//!
//! let list = VariablePackList::parse_concatenated(&exported_packs)?;
//! let setup = list.find_by_name_and_guid(&ucs2::encode("Setup"), &SETUP_GUID)?;
//!
//! let mut value = setup.value.to_vec();
//! let nv = NvOverride::new(&runtime_services);
//! match nv.override_by_suffix(&ucs2::encode("Override"), &setup.name.to_vec(), &setup.guid, &mut value) {
//!     Ok(()) => log::info!("Using NV override for {}.", setup.name),
//!     Err(e) => log::info!("Keeping default value for {}: {e}", setup.name),
//! }
//! ```
//!
//! ## Logging
//!
//! All diagnostics go through the `log` facade. Size mismatches and malformed packs are reported at `warn`, a variable
//! that changes between the size probe and the read at `error`.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod nv_override;
pub mod pack_list;
pub mod ucs2;
pub mod variable_pack;

pub use config::{NvOverrideConfig, ReadRacePolicy};
pub use error::{Error, Result};
pub use nv_override::NvOverride;
pub use pack_list::{RawVariablePackList, VariablePackList};
pub use variable_pack::{encode_variable_pack, PackMap, PackName, VariablePack, EFI_HII_VARIABLE};
