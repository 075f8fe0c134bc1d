// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Weight loading from SafeTensors files with memory-mapped I/O.
//!
//! [`WeightLoader`] maps `model.safetensors` once and copies each layer's
//! tensors out into owned [`Tensor`]s. The engine keeps those resident for
//! its whole lifetime, so the mapping can be dropped right after loading.

use crate::RuntimeError;
use model_ir::{graph::Validated, LayerDef, ModelGraph, WEIGHTS_FILE};
use std::path::{Path, PathBuf};
use tensor_core::Tensor;

/// Reads weight tensors out of an artifact's SafeTensors file.
pub struct WeightLoader {
    /// Path of the mapped SafeTensors file.
    weights_path: PathBuf,
    mmap: memmap2::Mmap,
}

impl WeightLoader {
    /// Memory-maps `artifact_dir/model.safetensors`.
    pub fn open(artifact_dir: &Path) -> Result<Self, RuntimeError> {
        let weights_path = artifact_dir.join(WEIGHTS_FILE);
        let file = std::fs::File::open(&weights_path).map_err(|e| RuntimeError::WeightLoadError {
            layer: "init".into(),
            detail: format!("cannot open '{}': {e}", weights_path.display()),
        })?;

        // SAFETY: read-only mapping; the artifact is not modified while loading.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| {
            RuntimeError::WeightLoadError {
                layer: "init".into(),
                detail: format!("mmap failed: {e}"),
            }
        })?;
        tracing::info!(
            "weight loader: mmap'd {} ({:.2} MB)",
            weights_path.display(),
            mmap.len() as f64 / (1024.0 * 1024.0),
        );

        Ok(Self { weights_path, mmap })
    }

    /// Returns the path of the mapped file.
    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    /// Loads the weights of every layer, in execution order.
    ///
    /// The SafeTensors header is parsed once for the whole graph.
    pub fn load_graph_weights(
        &self,
        graph: &ModelGraph<Validated>,
    ) -> Result<Vec<Vec<Tensor>>, RuntimeError> {
        let st = self.parse("graph")?;
        graph
            .iter_layers()
            .map(|layer| Self::extract_layer(&st, layer))
            .collect()
    }

    /// Loads the weight tensors of a single layer.
    pub fn load_layer_weights(&self, layer: &LayerDef) -> Result<Vec<Tensor>, RuntimeError> {
        let st = self.parse(&layer.name)?;
        Self::extract_layer(&st, layer)
    }

    // ── Private helpers ────────────────────────────────────────

    fn parse(&self, layer: &str) -> Result<safetensors::SafeTensors<'_>, RuntimeError> {
        safetensors::SafeTensors::deserialize(&self.mmap).map_err(|e| {
            RuntimeError::WeightLoadError {
                layer: layer.to_string(),
                detail: format!("SafeTensors parse error: {e}"),
            }
        })
    }

    fn extract_layer(
        st: &safetensors::SafeTensors<'_>,
        layer: &LayerDef,
    ) -> Result<Vec<Tensor>, RuntimeError> {
        let mut tensors = Vec::with_capacity(layer.weight_names.len());

        for (wname, expected_shape) in layer.weight_names.iter().zip(&layer.weight_shapes) {
            let view = st.tensor(wname).map_err(|e| RuntimeError::WeightLoadError {
                layer: layer.name.clone(),
                detail: format!("tensor '{wname}' not found: {e}"),
            })?;

            if view.shape() != expected_shape.dims() {
                return Err(RuntimeError::WeightLoadError {
                    layer: layer.name.clone(),
                    detail: format!(
                        "tensor '{wname}' has shape {:?}, graph expects {expected_shape}",
                        view.shape()
                    ),
                });
            }

            let tensor = Tensor::from_le_bytes(expected_shape.clone(), view.data()).map_err(|e| {
                RuntimeError::WeightLoadError {
                    layer: layer.name.clone(),
                    detail: format!("tensor '{wname}': {e}"),
                }
            })?;
            tensors.push(tensor);
        }

        tracing::debug!("loaded {} weight tensors for '{}'", tensors.len(), layer.name);
        Ok(tensors)
    }
}

impl std::fmt::Debug for WeightLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightLoader")
            .field("weights_path", &self.weights_path)
            .field("mapped_bytes", &self.mmap.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_ir::synthetic::{write_board_policy_network, BoardPolicySpec};
    use model_ir::ModelLoader;
    use tensor_core::Shape;

    fn small_artifact() -> (tempfile::TempDir, BoardPolicySpec) {
        let dir = tempfile::tempdir().unwrap();
        let spec = BoardPolicySpec {
            channels: 1,
            height: 3,
            width: 3,
            hidden: 4,
            seed: 5,
        };
        write_board_policy_network(dir.path(), &spec).unwrap();
        (dir, spec)
    }

    #[test]
    fn test_load_graph_weights() {
        let (dir, _) = small_artifact();
        let graph = ModelLoader::load(dir.path()).unwrap();
        let loader = WeightLoader::open(dir.path()).unwrap();

        let weights = loader.load_graph_weights(&graph).unwrap();
        assert_eq!(weights.len(), graph.num_layers());
        assert!(weights[0].is_empty());
        assert_eq!(weights[1][0].shape(), &Shape::matrix(9, 4));
        assert_eq!(weights[1][1].shape(), &Shape::vector(4));
        assert_eq!(weights[3][0].shape(), &Shape::matrix(4, 9));
    }

    #[test]
    fn test_weights_match_generator() {
        let (dir, spec) = small_artifact();
        let (_, expected) = model_ir::synthetic::board_policy_network(&spec);
        let graph = ModelLoader::load(dir.path()).unwrap();
        let loader = WeightLoader::open(dir.path()).unwrap();

        let fc1 = loader.load_layer_weights(graph.layer(1).unwrap()).unwrap();
        assert_eq!(fc1[0], expected[0].1);
    }

    #[test]
    fn test_shape_disagreement_is_reported() {
        let (dir, _) = small_artifact();
        let graph = ModelLoader::load(dir.path()).unwrap();
        let loader = WeightLoader::open(dir.path()).unwrap();

        let mut layer = graph.layer(1).unwrap().clone();
        layer.weight_shapes[0] = Shape::matrix(4, 9);
        let err = loader.load_layer_weights(&layer).unwrap_err();
        assert!(matches!(err, RuntimeError::WeightLoadError { .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WeightLoader::open(dir.path()).is_err());
    }
}
