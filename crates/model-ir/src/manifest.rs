// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON artifact manifest.
//!
//! # Format
//! ```json
//! {
//!   "name": "gomoku-policy",
//!   "input_shape": [2, 15, 15],
//!   "layers": [
//!     { "name": "flatten", "layer_type": "flatten", "weights": [] },
//!     { "name": "fc1", "layer_type": "linear", "weights": ["fc1.weight", "fc1.bias"] },
//!     { "name": "act1", "layer_type": "relu", "weights": [] }
//!   ]
//! }
//! ```

use crate::{LayerType, ModelError};
use std::collections::HashSet;
use std::path::Path;

/// Top-level manifest, deserialized from `model.json`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelManifest {
    /// Human-readable model name.
    pub name: String,
    /// Per-sample input shape, e.g. `[channels, height, width]`.
    pub input_shape: Vec<usize>,
    /// Layer definitions in execution order.
    pub layers: Vec<ManifestLayer>,
}

/// A single layer entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestLayer {
    /// Layer name.
    pub name: String,
    /// Layer type string (see [`LayerType::from_str_loose`]).
    pub layer_type: String,
    /// Weight tensor names in the SafeTensors file.
    #[serde(default)]
    pub weights: Vec<String>,
}

impl ModelManifest {
    /// Loads a manifest from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the manifest as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates that the manifest is internally consistent.
    ///
    /// Checks:
    /// - The input shape is non-empty and has no zero dimensions.
    /// - At least one layer is defined.
    /// - Layer names are unique and layer types are recognised.
    /// - Each layer lists as many weights as its type accepts.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.input_shape.is_empty() || self.input_shape.contains(&0) {
            return Err(ModelError::InvalidGraph(format!(
                "input shape {:?} must be non-empty with positive dimensions",
                self.input_shape
            )));
        }

        if self.layers.is_empty() {
            return Err(ModelError::InvalidGraph("manifest contains no layers".into()));
        }

        let mut seen_names = HashSet::new();
        for layer in &self.layers {
            if !seen_names.insert(layer.name.as_str()) {
                return Err(ModelError::InvalidLayer {
                    layer: layer.name.clone(),
                    detail: "duplicate layer name".into(),
                });
            }

            let layer_type = LayerType::from_str_loose(&layer.layer_type).ok_or_else(|| {
                ModelError::InvalidLayer {
                    layer: layer.name.clone(),
                    detail: format!("unrecognised layer type '{}'", layer.layer_type),
                }
            })?;

            let arity = layer_type.weight_arity();
            if !arity.contains(&layer.weights.len()) {
                return Err(ModelError::InvalidLayer {
                    layer: layer.name.clone(),
                    detail: format!(
                        "{layer_type} takes {}..={} weight tensors, got {}",
                        arity.start(),
                        arity.end(),
                        layer.weights.len()
                    ),
                });
            }
        }

        Ok(())
    }
}
