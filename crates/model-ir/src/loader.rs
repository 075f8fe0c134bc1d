// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact loading from manifest + SafeTensors files.
//!
//! The loader reads an artifact directory containing:
//! - `model.json`: the manifest (see [`ModelManifest`]).
//! - `model.safetensors`: the weights.
//!
//! Only the SafeTensors header is parsed here, to obtain tensor shapes for
//! shape inference. Weight data is read by the runtime's weight loader.

use crate::{graph, LayerDef, LayerType, ModelError, ModelGraph, ModelManifest};
use std::collections::HashMap;
use std::path::Path;
use tensor_core::Shape;

/// Manifest filename inside an artifact directory.
pub const MANIFEST_FILE: &str = "model.json";

/// SafeTensors filename inside an artifact directory.
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Metadata for a single tensor extracted from the SafeTensors header.
#[derive(Debug, Clone)]
pub struct WeightMeta {
    /// Tensor name (key in the SafeTensors file).
    pub name: String,
    /// Shape of the tensor.
    pub shape: Shape,
}

/// Loads an artifact from disk into a validated [`ModelGraph`].
///
/// # Example
/// ```no_run
/// use model_ir::ModelLoader;
/// use std::path::Path;
///
/// let graph = ModelLoader::load(Path::new("../nn/rgnn")).unwrap();
/// println!("Loaded {} layers", graph.num_layers());
/// ```
pub struct ModelLoader;

impl ModelLoader {
    /// Loads and validates an artifact from the given directory.
    ///
    /// Steps:
    /// 1. Parse `model.json` and validate it.
    /// 2. Read the SafeTensors header to extract weight shapes.
    /// 3. Walk the layer chain, inferring per-sample shapes.
    /// 4. Construct and validate the [`ModelGraph`].
    pub fn load(artifact_dir: &Path) -> Result<ModelGraph<graph::Validated>, ModelError> {
        let manifest = ModelManifest::from_file(&artifact_dir.join(MANIFEST_FILE))?;
        let weight_meta = Self::read_weight_metadata(artifact_dir)?;
        Self::from_manifest_and_meta(&manifest, &weight_meta)
    }

    /// Builds a graph from a manifest and a pre-built weight metadata map.
    pub fn from_manifest_and_meta(
        manifest: &ModelManifest,
        weight_meta: &HashMap<String, WeightMeta>,
    ) -> Result<ModelGraph<graph::Validated>, ModelError> {
        manifest.validate()?;
        let layers = Self::build_layers(manifest, weight_meta)?;
        let graph = ModelGraph::new(manifest.name.clone(), layers);
        graph.validate()
    }

    /// Reads the SafeTensors header of `artifact_dir/model.safetensors`.
    pub fn read_weight_metadata(
        artifact_dir: &Path,
    ) -> Result<HashMap<String, WeightMeta>, ModelError> {
        let weights_path = artifact_dir.join(WEIGHTS_FILE);
        let file = std::fs::File::open(&weights_path).map_err(|e| {
            ModelError::SafeTensorsError(format!(
                "cannot open '{}': {e}",
                weights_path.display()
            ))
        })?;

        // SAFETY: the mapping is read-only and dropped before return; the
        // artifact is not expected to change while it is being loaded.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| ModelError::SafeTensorsError(format!("mmap failed: {e}")))?;

        let tensors = safetensors::SafeTensors::deserialize(&mmap)
            .map_err(|e| ModelError::SafeTensorsError(format!("parse error: {e}")))?;

        let mut meta = HashMap::new();
        for (name, view) in tensors.tensors() {
            if view.dtype() != safetensors::Dtype::F32 {
                return Err(ModelError::SafeTensorsError(format!(
                    "tensor '{name}' has dtype {:?}; only F32 is supported",
                    view.dtype()
                )));
            }
            meta.insert(
                name.clone(),
                WeightMeta {
                    name,
                    shape: Shape::new(view.shape().to_vec()),
                },
            );
        }

        tracing::debug!(
            "read {} tensor headers from {}",
            meta.len(),
            weights_path.display()
        );
        Ok(meta)
    }

    /// Converts manifest entries into layer definitions, threading the
    /// per-sample shape through the chain.
    fn build_layers(
        manifest: &ModelManifest,
        weight_meta: &HashMap<String, WeightMeta>,
    ) -> Result<Vec<LayerDef>, ModelError> {
        let mut current = Shape::new(manifest.input_shape.clone());
        let mut layers = Vec::with_capacity(manifest.layers.len());

        for (i, ml) in manifest.layers.iter().enumerate() {
            let layer_type = LayerType::from_str_loose(&ml.layer_type).ok_or_else(|| {
                ModelError::InvalidLayer {
                    layer: ml.name.clone(),
                    detail: format!("unrecognised layer type '{}'", ml.layer_type),
                }
            })?;

            let weight_shapes = ml
                .weights
                .iter()
                .map(|w| {
                    weight_meta
                        .get(w)
                        .map(|m| m.shape.clone())
                        .ok_or_else(|| ModelError::WeightNotFound { name: w.clone() })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let output_shape = infer_output_shape(&ml.name, layer_type, &current, &weight_shapes)?;

            layers.push(LayerDef {
                name: ml.name.clone(),
                layer_type,
                index: i,
                weight_names: ml.weights.clone(),
                weight_shapes,
                input_shape: current,
                output_shape: output_shape.clone(),
            });
            current = output_shape;
        }

        Ok(layers)
    }
}

/// Infers a layer's per-sample output shape from its input and weights.
fn infer_output_shape(
    name: &str,
    layer_type: LayerType,
    input: &Shape,
    weights: &[Shape],
) -> Result<Shape, ModelError> {
    let invalid = |detail: String| ModelError::InvalidLayer {
        layer: name.to_string(),
        detail,
    };

    match layer_type {
        LayerType::Flatten => Ok(Shape::vector(input.num_elements())),
        LayerType::Linear => {
            if input.rank() != 1 {
                return Err(invalid(format!(
                    "linear input must be flat, got {input}; insert a flatten layer"
                )));
            }
            let weight = &weights[0];
            let (fan_in, fan_out) = match weight.dims() {
                &[fan_in, fan_out] => (fan_in, fan_out),
                _ => return Err(invalid(format!("weight must be [in, out], got {weight}"))),
            };
            if fan_in != input.num_elements() {
                return Err(invalid(format!(
                    "weight {weight} does not accept input {input}"
                )));
            }
            if let Some(bias) = weights.get(1) {
                if bias != &Shape::vector(fan_out) {
                    return Err(invalid(format!("bias {bias} does not match [{fan_out}]")));
                }
            }
            Ok(Shape::vector(fan_out))
        }
        LayerType::Relu | LayerType::Gelu | LayerType::Tanh | LayerType::Softmax => {
            Ok(input.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(entries: &[(&str, Shape)]) -> HashMap<String, WeightMeta> {
        entries
            .iter()
            .map(|(name, shape)| {
                (
                    name.to_string(),
                    WeightMeta {
                        name: name.to_string(),
                        shape: shape.clone(),
                    },
                )
            })
            .collect()
    }

    fn policy_manifest() -> ModelManifest {
        ModelManifest::from_json(
            r#"{
                "name": "policy-test",
                "input_shape": [2, 15, 15],
                "layers": [
                    { "name": "flatten", "layer_type": "flatten" },
                    { "name": "fc1", "layer_type": "linear", "weights": ["fc1.weight", "fc1.bias"] },
                    { "name": "act1", "layer_type": "relu" },
                    { "name": "fc2", "layer_type": "linear", "weights": ["fc2.weight"] },
                    { "name": "policy", "layer_type": "softmax" }
                ]
            }"#,
        )
        .unwrap()
    }

    fn policy_meta() -> HashMap<String, WeightMeta> {
        meta(&[
            ("fc1.weight", Shape::matrix(450, 64)),
            ("fc1.bias", Shape::vector(64)),
            ("fc2.weight", Shape::matrix(64, 225)),
        ])
    }

    #[test]
    fn test_build_from_manifest_and_meta() {
        let graph = ModelLoader::from_manifest_and_meta(&policy_manifest(), &policy_meta()).unwrap();

        assert_eq!(graph.num_layers(), 5);
        assert_eq!(graph.name, "policy-test");
        assert_eq!(graph.input_shape(), &Shape::new(vec![2, 15, 15]));
        assert_eq!(graph.output_shape(), &Shape::vector(225));
    }

    #[test]
    fn test_shape_inference_chain() {
        let graph = ModelLoader::from_manifest_and_meta(&policy_manifest(), &policy_meta()).unwrap();
        let shapes: Vec<_> = graph
            .iter_layers()
            .map(|l| l.output_shape.dims().to_vec())
            .collect();
        assert_eq!(shapes, vec![vec![450], vec![64], vec![64], vec![225], vec![225]]);
    }

    #[test]
    fn test_missing_weight_tensor() {
        let result = ModelLoader::from_manifest_and_meta(&policy_manifest(), &HashMap::new());
        assert!(matches!(result, Err(ModelError::WeightNotFound { .. })));
    }

    #[test]
    fn test_weight_does_not_accept_input() {
        let mut m = policy_meta();
        m.insert(
            "fc1.weight".into(),
            WeightMeta {
                name: "fc1.weight".into(),
                shape: Shape::matrix(400, 64),
            },
        );
        let err = ModelLoader::from_manifest_and_meta(&policy_manifest(), &m).unwrap_err();
        assert!(matches!(err, ModelError::InvalidLayer { ref layer, .. } if layer == "fc1"));
    }

    #[test]
    fn test_bias_mismatch() {
        let mut m = policy_meta();
        m.insert(
            "fc1.bias".into(),
            WeightMeta {
                name: "fc1.bias".into(),
                shape: Shape::vector(63),
            },
        );
        assert!(ModelLoader::from_manifest_and_meta(&policy_manifest(), &m).is_err());
    }

    #[test]
    fn test_linear_requires_flat_input() {
        let manifest = ModelManifest::from_json(
            r#"{
                "name": "no-flatten", "input_shape": [2, 15, 15],
                "layers": [{ "name": "fc", "layer_type": "linear", "weights": ["w"] }]
            }"#,
        )
        .unwrap();
        let m = meta(&[("w", Shape::matrix(450, 10))]);
        let err = ModelLoader::from_manifest_and_meta(&manifest, &m).unwrap_err();
        assert!(err.to_string().contains("flatten"));
    }

    #[test]
    fn test_load_missing_directory() {
        let result = ModelLoader::load(Path::new("/nonexistent/artifact"));
        assert!(matches!(result, Err(ModelError::Io(_))));
    }
}
