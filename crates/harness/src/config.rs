// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sweep configuration loaded from TOML files or constructed programmatically.
//!
//! Every field has a default, so a file only needs the values it changes.
//!
//! # TOML Format
//! ```toml
//! [inference]
//! artifact_path = "../nn/rgnn"
//! device = "cpu"
//! batch_sizes = [1, 2, 4, 8, 16, 32, 64, 128]
//! repetitions = 1000
//! warmup = 0
//! seed = 7
//!
//! [inference.input]
//! channels = 2
//! height = 15
//! width = 15
//!
//! [process]
//! working_dir = "../out/build/x64-Release"
//! executable = "Exp3.exe"
//! model_path = "../nn/gnn.pt"
//! simulation_counts = [100, 200, 500, 1000, 2000, 5000]
//! on_failure = "continue"
//! ```

use crate::HarnessError;
use std::path::{Path, PathBuf};
use tensor_core::Shape;

/// Top-level configuration holding both sweeps.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub inference: InferenceSweepConfig,
    pub process: ProcessSweepConfig,
}

impl HarnessConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, HarnessError> {
        toml::from_str(toml_str)
            .map_err(|e| HarnessError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, HarnessError> {
        toml::to_string_pretty(self)
            .map_err(|e| HarnessError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Validates both sweeps.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.inference.validate()?;
        self.process.validate()
    }
}

// ── Inference sweep ────────────────────────────────────────────

/// Per-sample input template `(channels, height, width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InputShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl InputShape {
    /// Per-sample shape `[channels, height, width]`.
    pub fn sample_shape(&self) -> Shape {
        Shape::new(vec![self.channels, self.height, self.width])
    }

    /// Full input shape for a batch of `n` samples.
    pub fn batched(&self, n: usize) -> Shape {
        Shape::nchw(n, self.channels, self.height, self.width)
    }
}

impl Default for InputShape {
    fn default() -> Self {
        Self {
            channels: 2,
            height: 15,
            width: 15,
        }
    }
}

/// Configuration of the forward-pass latency sweep.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InferenceSweepConfig {
    /// Directory holding the computational-graph artifact.
    pub artifact_path: PathBuf,
    /// Execution device name.
    pub device: String,
    /// Batch sizes, swept in order.
    pub batch_sizes: Vec<usize>,
    /// Timed forward calls per batch size.
    pub repetitions: u32,
    pub input: InputShape,
    /// Untimed forward calls per batch size before timing starts.
    pub warmup: u32,
    /// Seed for the random inputs. Unseeded runs use the thread RNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for InferenceSweepConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("../nn/rgnn"),
            device: "cpu".to_string(),
            batch_sizes: vec![1, 2, 4, 8, 16, 32, 64, 128],
            repetitions: 1000,
            input: InputShape::default(),
            warmup: 0,
            seed: None,
        }
    }
}

impl InferenceSweepConfig {
    /// Checks the sweep parameters. The artifact itself is checked on load.
    pub fn validate(&self) -> Result<(), HarnessError> {
        check_sequence("batch_sizes", &self.batch_sizes)?;
        if self.repetitions == 0 {
            return Err(HarnessError::ConfigError("repetitions must be positive".into()));
        }
        let InputShape {
            channels,
            height,
            width,
        } = self.input;
        if channels == 0 || height == 0 || width == 0 {
            return Err(HarnessError::ConfigError(format!(
                "input shape ({channels}, {height}, {width}) has a zero dimension"
            )));
        }
        if self.device.trim().is_empty() {
            return Err(HarnessError::ConfigError("device must not be empty".into()));
        }
        Ok(())
    }
}

// ── Process sweep ──────────────────────────────────────────────

/// What the process sweep does when an invocation does not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and go on with the next simulation count.
    #[default]
    Continue,
    /// Stop the sweep with an error.
    Abort,
}

/// Configuration of the external-process sweep.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProcessSweepConfig {
    /// Directory the executable runs in.
    pub working_dir: PathBuf,
    /// Executable name, looked up in `working_dir` first and then on `PATH`.
    pub executable: String,
    /// Passed verbatim as the second argument.
    pub model_path: String,
    /// Simulation counts, swept in order.
    pub simulation_counts: Vec<u64>,
    pub on_failure: FailurePolicy,
}

impl Default for ProcessSweepConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("../out/build/x64-Release"),
            executable: "Exp3.exe".to_string(),
            model_path: "../nn/gnn.pt".to_string(),
            simulation_counts: vec![100, 200, 500, 1000, 2000, 5000],
            on_failure: FailurePolicy::Continue,
        }
    }
}

impl ProcessSweepConfig {
    /// Checks the sweep parameters. The working directory is checked when
    /// the sweep starts.
    pub fn validate(&self) -> Result<(), HarnessError> {
        check_sequence("simulation_counts", &self.simulation_counts)?;
        if self.executable.trim().is_empty() {
            return Err(HarnessError::ConfigError("executable must not be empty".into()));
        }
        Ok(())
    }
}

/// A parameter sequence must be non-empty and strictly positive.
fn check_sequence<T>(field: &str, values: &[T]) -> Result<(), HarnessError>
where
    T: Copy + PartialEq + Default + std::fmt::Display,
{
    if values.is_empty() {
        return Err(HarnessError::ConfigError(format!("{field} must not be empty")));
    }
    if let Some(pos) = values.iter().position(|&v| v == T::default()) {
        return Err(HarnessError::ConfigError(format!(
            "{field}[{pos}] is zero; values must be positive"
        )));
    }
    Ok(())
}
