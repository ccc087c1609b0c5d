//! NV Variable Override
//!
//! Reconciles a variable pack value with the platform variable store. A value is taken from NV only when a variable
//! with the exact name and GUID exists and its size equals the size the caller expects. Stored data of any other size
//! is treated as corrupt and never truncated or zero extended.
//!
//! Reads are done in two steps: a zero-length probe that reports the stored size, then the actual read. The store
//! may change in between, which [`NvOverrideConfig::read_race_policy`](crate::config::NvOverrideConfig) controls.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
extern crate alloc;
use alloc::{borrow::Cow, vec, vec::Vec};

use framework_runtime_services::RuntimeServices;
use r_efi::efi;

use crate::{
    config::NvOverrideConfig,
    error::{Error, Result},
    ucs2::{self, Ucs2},
};

/// Loads variable pack values from the variable store.
pub struct NvOverride<'a, R: RuntimeServices> {
    runtime_services: &'a R,
    config: NvOverrideConfig,
}

impl<'a, R: RuntimeServices> NvOverride<'a, R> {
    /// Creates an override helper with the default configuration.
    pub fn new(runtime_services: &'a R) -> Self {
        Self::with_config(runtime_services, NvOverrideConfig::default())
    }

    pub fn with_config(runtime_services: &'a R, config: NvOverrideConfig) -> Self {
        Self { runtime_services, config }
    }

    pub fn config(&self) -> &NvOverrideConfig {
        &self.config
    }

    /// Reads variable `name` in `guid` into a new buffer of exactly `size` bytes.
    ///
    /// The buffer is only allocated once the store has confirmed the variable exists with the expected size.
    ///
    /// ## Errors
    ///
    /// - [`Error::NotFound`] if the variable does not exist.
    /// - [`Error::LoadError`] if it exists with a different size.
    /// - [`Error::VariableChanged`] if it changed between the size probe and the read.
    pub fn retrieve_from_nv(&self, name: &[u16], guid: &efi::Guid, size: usize) -> Result<Vec<u8>> {
        let name = terminated(name);
        self.probe(&name, guid, size)?;

        let mut data = vec![0u8; size];
        self.read(&name, guid, &mut data)?;
        Ok(data)
    }

    /// Reads variable `name` in `guid` into `buffer`. The expected size is `buffer.len()`.
    ///
    /// Fails with the same errors as [`Self::retrieve_from_nv`]. `buffer` is not written unless the read itself is
    /// reached.
    pub fn retrieve_from_nv_into(&self, name: &[u16], guid: &efi::Guid, buffer: &mut [u8]) -> Result<()> {
        let name = terminated(name);
        self.probe(&name, guid, buffer.len())?;
        self.read(&name, guid, buffer)
    }

    /// Overrides `buffer` from NV only if `name` ends with `suffix`.
    ///
    /// `name` must be strictly longer than `suffix`. For `suffix = "MyOverride"`, `"XyzSetupMyOverride"` is looked up
    /// in NV while `"XyzSetup"` and `"MyOverride"` are rejected with [`Error::InvalidParameter`] without touching the
    /// store.
    pub fn override_if_suffix(&self, suffix: &[u16], name: &[u16], guid: &efi::Guid, buffer: &mut [u8]) -> Result<()> {
        if !ucs2::ends_with(name, suffix) {
            log::debug!("{} does not end with {}, not overriding.", Ucs2(name), Ucs2(suffix));
            return Err(Error::InvalidParameter);
        }
        self.retrieve_from_nv_into(name, guid, buffer)
    }

    /// Overrides `buffer` from the NV variable named `name` followed by `suffix`.
    ///
    /// For `suffix = "MyOverride"` and `name = "XyzSetup"`, variable `"XyzSetupMyOverride"` is read.
    pub fn override_by_suffix(&self, suffix: &[u16], name: &[u16], guid: &efi::Guid, buffer: &mut [u8]) -> Result<()> {
        let suffixed = ucs2::concat(name, suffix);
        self.retrieve_from_nv_into(&suffixed, guid, buffer)
    }

    /// Checks that the variable exists with exactly `expected` bytes. Only a "buffer too small" answer to the
    /// zero-length probe counts as existing.
    fn probe(&self, name: &[u16], guid: &efi::Guid, expected: usize) -> Result<()> {
        match self.runtime_services.get_variable_size_and_attributes(name, guid) {
            Ok((actual, _)) if actual == expected => Ok(()),
            Ok((actual, _)) => {
                log::warn!("NV variable {} is {actual} bytes, expected {expected}. Ignoring it.", Ucs2(name));
                Err(Error::LoadError { expected, actual })
            }
            Err(status) => {
                log::debug!("NV variable {} not found in {:?}: {:?}.", Ucs2(name), guid, status);
                Err(Error::NotFound)
            }
        }
    }

    /// Reads a probed variable, re-probing per the configured race policy.
    fn read(&self, name: &[u16], guid: &efi::Guid, buffer: &mut [u8]) -> Result<()> {
        let mut result = self.read_exact(name, guid, buffer);
        for _ in 1..self.config.read_attempts() {
            if result != Err(Error::VariableChanged) {
                break;
            }
            log::info!("Retrying read of NV variable {}.", Ucs2(name));
            self.probe(name, guid, buffer.len())?;
            result = self.read_exact(name, guid, buffer);
        }
        result
    }

    fn read_exact(&self, name: &[u16], guid: &efi::Guid, buffer: &mut [u8]) -> Result<()> {
        match self.runtime_services.get_variable_into(name, guid, buffer) {
            Ok((size, _)) if size == buffer.len() => {
                log::debug!("Loaded {size} bytes from NV variable {}.", Ucs2(name));
                Ok(())
            }
            Ok((size, _)) => {
                log::error!("NV variable {} changed size to {size} bytes after it was probed.", Ucs2(name));
                Err(Error::VariableChanged)
            }
            Err(status) => {
                log::error!("Reading NV variable {} failed after it was probed: {:?}.", Ucs2(name), status);
                Err(Error::VariableChanged)
            }
        }
    }
}

/// The variable store requires NUL-terminated names.
fn terminated(name: &[u16]) -> Cow<'_, [u16]> {
    if ucs2::str_len(name) < name.len() {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(ucs2::to_nul_terminated(name))
    }
}
