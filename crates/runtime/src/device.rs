// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution device selection.

use crate::RuntimeError;
use std::fmt;
use std::str::FromStr;

/// Where forward passes run.
///
/// Only the host CPU has a backend. Accelerator names are still parsed so a
/// sweep asking for one fails up front with a clear reason instead of
/// silently timing the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
}

impl Device {
    /// Parses a device name such as `"cpu"` or `"cuda:0"`.
    pub fn parse(name: &str) -> Result<Self, RuntimeError> {
        let lowered = name.trim().to_lowercase();
        let family = lowered.split(':').next().unwrap_or_default();
        match family {
            "cpu" if lowered == "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" | "metal" => Err(RuntimeError::DeviceUnavailable {
                requested: name.to_string(),
                reason: "no accelerator backend is compiled into this build".into(),
            }),
            _ => Err(RuntimeError::UnknownDevice(name.to_string())),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
        }
    }
}

impl FromStr for Device {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
