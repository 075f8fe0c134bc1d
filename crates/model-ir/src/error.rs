// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for artifact loading and IR construction.

/// Errors that can occur when reading, writing or validating an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The manifest file could not be read or the artifact could not be written.
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest JSON is malformed.
    #[error("failed to parse manifest: {0}")]
    ManifestParseError(#[from] serde_json::Error),

    /// A weight tensor referenced in the manifest was not found in the SafeTensors file.
    #[error("weight tensor not found: {name}")]
    WeightNotFound { name: String },

    /// The SafeTensors file could not be read or written.
    #[error("SafeTensors error: {0}")]
    SafeTensorsError(String),

    /// A layer definition is invalid (e.g., incompatible shapes).
    #[error("invalid layer '{layer}': {detail}")]
    InvalidLayer { layer: String, detail: String },

    /// The model graph is empty or otherwise malformed.
    #[error("invalid model graph: {0}")]
    InvalidGraph(String),
}
