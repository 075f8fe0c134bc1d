// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the latency sweeps.

use std::path::PathBuf;

/// Errors that end a sweep.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The sweep configuration is unusable.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Loading the artifact or acquiring the device failed.
    #[error("runtime error: {0}")]
    RuntimeError(#[from] runtime::RuntimeError),

    /// A forward call failed part-way through the sweep.
    #[error("forward pass failed at batch size {batch_size}: {source}")]
    Inference {
        batch_size: usize,
        #[source]
        source: runtime::RuntimeError,
    },

    /// The process sweep's working directory does not exist.
    #[error("working directory '{}' does not exist or is not a directory", .path.display())]
    WorkingDirMissing { path: PathBuf },

    /// An external invocation did not succeed and the policy is `Abort`.
    #[error("invocation with {simulation_count} simulations {outcome}")]
    InvocationFailed {
        simulation_count: u64,
        outcome: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report serialisation failed.
    #[error("report serialisation failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
