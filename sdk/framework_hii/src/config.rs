//! NV Override Configuration
//!
//! Platform policy for how [`NvOverride`](crate::nv_override::NvOverride) reacts when the variable store changes
//! between the size probe and the read that follows it.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

/// What to do when a variable that passed the size probe cannot be read back with the probed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadRacePolicy {
    /// Report [`Error::VariableChanged`](crate::error::Error::VariableChanged) to the caller.
    #[default]
    Fail,
    /// Probe and read once more. The outcome of the second attempt is returned as is.
    RetryOnce,
}

/// Configuration consumed by [`NvOverride`](crate::nv_override::NvOverride).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NvOverrideConfig {
    /// Reaction to a variable changing between the size probe and the read. Defaults to [`ReadRacePolicy::Fail`].
    pub read_race_policy: ReadRacePolicy,
}

impl NvOverrideConfig {
    /// Returns the configuration with the given race policy.
    pub const fn with_read_race_policy(mut self, read_race_policy: ReadRacePolicy) -> Self {
        self.read_race_policy = read_race_policy;
        self
    }

    /// Number of probe + read attempts allowed by the policy.
    pub(crate) const fn read_attempts(&self) -> usize {
        match self.read_race_policy {
            ReadRacePolicy::Fail => 1,
            ReadRacePolicy::RetryOnce => 2,
        }
    }
}
