// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Writes an artifact directory that [`ModelLoader`](crate::ModelLoader) can read.

use crate::{ModelError, ModelManifest, MANIFEST_FILE, WEIGHTS_FILE};
use safetensors::tensor::TensorView as StView;
use safetensors::Dtype;
use std::path::Path;
use tensor_core::Tensor;

/// Serialises a manifest and its named weights to disk.
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Writes `model.json` and `model.safetensors` into `artifact_dir`,
    /// creating the directory if needed.
    ///
    /// The manifest is validated first so a broken artifact is never written.
    pub fn write(
        artifact_dir: &Path,
        manifest: &ModelManifest,
        weights: &[(String, Tensor)],
    ) -> Result<(), ModelError> {
        manifest.validate()?;
        std::fs::create_dir_all(artifact_dir)?;

        std::fs::write(artifact_dir.join(MANIFEST_FILE), manifest.to_json()?)?;

        let encoded: Vec<(&str, Vec<usize>, Vec<u8>)> = weights
            .iter()
            .map(|(name, t)| (name.as_str(), t.shape().dims().to_vec(), t.to_le_bytes()))
            .collect();

        let views = encoded
            .iter()
            .map(|(name, dims, bytes)| {
                StView::new(Dtype::F32, dims.clone(), bytes)
                    .map(|view| (*name, view))
                    .map_err(|e| ModelError::SafeTensorsError(format!("tensor '{name}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let blob = safetensors::tensor::serialize(views, &None)
            .map_err(|e| ModelError::SafeTensorsError(format!("serialize failed: {e}")))?;
        std::fs::write(artifact_dir.join(WEIGHTS_FILE), blob)?;

        tracing::info!(
            "wrote artifact '{}' ({} tensors) to {}",
            manifest.name,
            weights.len(),
            artifact_dir.display()
        );
        Ok(())
    }
}
