// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The core inference engine with type-state–enforced pipeline.
//!
//! ```text
//! InferenceEngine<Idle>
//!     │  .load_artifact()
//!     ▼
//! InferenceEngine<Ready>
//!     │  .forward(&input)   (any number of times)
//!     ▼
//!   Tensor
//! ```
//!
//! Loading consumes the idle engine and returns a ready one, so calling
//! `forward` before an artifact is loaded is a compile error.

use crate::{Device, InferenceModule, RuntimeError, WeightLoader};
use model_ir::{graph::Validated, LayerDef, LayerType, ModelGraph};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tensor_core::{Shape, Tensor, TensorError};

// ── Type-state markers ─────────────────────────────────────────

/// Engine is configured but no artifact is loaded.
#[derive(Debug)]
pub struct Idle;

/// Engine holds a validated graph and its resident weights.
#[derive(Debug)]
pub struct Ready {
    graph: ModelGraph<Validated>,
    /// One entry per layer, in execution order.
    weights: Vec<Vec<Tensor>>,
}

/// Sealed trait for engine states.
pub trait EngineState: std::fmt::Debug {}
impl EngineState for Idle {}
impl EngineState for Ready {}

// ── Engine ─────────────────────────────────────────────────────

/// The inference engine.
///
/// # Example
/// ```no_run
/// use runtime::{Device, InferenceEngine};
/// use tensor_core::{Shape, Tensor};
///
/// # fn example() -> Result<(), runtime::RuntimeError> {
/// let engine = InferenceEngine::new("../nn/rgnn", Device::Cpu).load_artifact()?;
/// let input = Tensor::zeros(engine.input_shape().with_batch(8));
/// let policy = engine.forward(&input)?;
/// println!("{}", policy.shape());
/// # Ok(())
/// # }
/// ```
pub struct InferenceEngine<S: EngineState = Idle> {
    artifact_path: PathBuf,
    device: Device,
    state: S,
}

// ── Idle → Ready ───────────────────────────────────────────────

impl InferenceEngine<Idle> {
    /// Creates an engine that will load the artifact at `artifact_path`.
    pub fn new(artifact_path: impl Into<PathBuf>, device: Device) -> Self {
        let artifact_path = artifact_path.into();
        tracing::info!(
            "engine created for '{}' on {device}",
            artifact_path.display()
        );
        Self {
            artifact_path,
            device,
            state: Idle,
        }
    }

    /// Loads and validates the graph, then reads all weights.
    /// Transitions to the `Ready` state.
    pub fn load_artifact(self) -> Result<InferenceEngine<Ready>, RuntimeError> {
        let start = Instant::now();

        let graph = model_ir::ModelLoader::load(&self.artifact_path)?;
        tracing::info!("{}", graph.summary());

        let loader = WeightLoader::open(&self.artifact_path)?;
        let weights = loader.load_graph_weights(&graph)?;

        tracing::info!(
            "artifact ready on {} in {:.1} ms",
            self.device,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(InferenceEngine {
            artifact_path: self.artifact_path,
            device: self.device,
            state: Ready { graph, weights },
        })
    }

    /// Convenience: builds a ready engine from an in-memory graph and
    /// weights (for testing and benchmarks).
    pub fn from_graph_and_weights(
        graph: ModelGraph<Validated>,
        weights: Vec<Vec<Tensor>>,
        device: Device,
    ) -> Result<InferenceEngine<Ready>, RuntimeError> {
        if weights.len() != graph.num_layers() {
            return Err(RuntimeError::WeightLoadError {
                layer: graph.name.clone(),
                detail: format!(
                    "{} weight groups for {} layers",
                    weights.len(),
                    graph.num_layers()
                ),
            });
        }
        for (layer, tensors) in graph.iter_layers().zip(&weights) {
            let shapes: Vec<&Shape> = tensors.iter().map(Tensor::shape).collect();
            if shapes.len() != layer.weight_shapes.len()
                || shapes.iter().zip(&layer.weight_shapes).any(|(a, b)| *a != b)
            {
                return Err(RuntimeError::WeightLoadError {
                    layer: layer.name.clone(),
                    detail: "weight shapes disagree with the graph".into(),
                });
            }
        }

        Ok(InferenceEngine {
            artifact_path: PathBuf::from("<in-memory>"),
            device,
            state: Ready { graph, weights },
        })
    }
}

// ── Shared accessors ───────────────────────────────────────────

impl<S: EngineState> InferenceEngine<S> {
    /// Returns the artifact directory.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Returns the execution device.
    pub fn device(&self) -> Device {
        self.device
    }
}

// ── Ready: run inference ───────────────────────────────────────

impl InferenceEngine<Ready> {
    /// Returns the model graph.
    pub fn graph(&self) -> &ModelGraph<Validated> {
        &self.state.graph
    }

    /// Per-sample input shape the artifact expects.
    pub fn input_shape(&self) -> &Shape {
        self.state.graph.input_shape()
    }

    /// Per-sample output shape the artifact produces.
    pub fn output_shape(&self) -> &Shape {
        self.state.graph.output_shape()
    }

    /// Runs a forward pass over a batched input of shape `(n, ..input_shape)`.
    ///
    /// Activations are allocated per layer and dropped as soon as the next
    /// layer has consumed them; only the final output is returned.
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, RuntimeError> {
        let batch = self.check_input(input)?;

        let mut current: Option<Tensor> = None;
        for (layer, weights) in self.state.graph.iter_layers().zip(&self.state.weights) {
            let x = current.as_ref().unwrap_or(input);
            let next = execute_layer(layer, weights, x, batch).map_err(|source| {
                RuntimeError::ExecutionError {
                    layer: layer.name.clone(),
                    source,
                }
            })?;
            current = Some(next);
        }

        current.ok_or_else(|| {
            model_ir::ModelError::InvalidGraph("model graph contains no layers".into()).into()
        })
    }

    /// Validates the input and returns its batch size.
    fn check_input(&self, input: &Tensor) -> Result<usize, RuntimeError> {
        let expected = self.input_shape();
        let shape = input.shape();
        let matches = shape.rank() == expected.rank() + 1 && &shape.sample_shape() == expected;
        match shape.batch() {
            Some(n) if n > 0 && matches => Ok(n),
            _ => Err(RuntimeError::InputShapeMismatch {
                expected: expected.clone(),
                actual: shape.clone(),
            }),
        }
    }
}

impl InferenceModule for InferenceEngine<Ready> {
    fn forward(&self, input: &Tensor) -> Result<Tensor, RuntimeError> {
        InferenceEngine::<Ready>::forward(self, input)
    }
}

/// Executes one layer over a batched activation.
fn execute_layer(
    layer: &LayerDef,
    weights: &[Tensor],
    x: &Tensor,
    batch: usize,
) -> Result<Tensor, TensorError> {
    let out_shape = layer.output_shape.with_batch(batch);

    match layer.layer_type {
        LayerType::Flatten => x.clone().reshape(out_shape),
        LayerType::Linear => {
            let mut out = Tensor::zeros(out_shape);
            tensor_core::matmul(&x.view(), &weights[0].view(), &mut out)?;
            if let Some(bias) = weights.get(1) {
                tensor_core::bias_add(&bias.view(), &mut out)?;
            }
            Ok(out)
        }
        LayerType::Relu => elementwise(tensor_core::relu, x, out_shape),
        LayerType::Gelu => elementwise(tensor_core::gelu, x, out_shape),
        LayerType::Tanh => elementwise(tensor_core::tanh, x, out_shape),
        LayerType::Softmax => elementwise(tensor_core::softmax, x, out_shape),
    }
}

fn elementwise(
    op: fn(&tensor_core::TensorView<'_>, &mut Tensor) -> Result<(), TensorError>,
    x: &Tensor,
    out_shape: Shape,
) -> Result<Tensor, TensorError> {
    let mut out = Tensor::zeros(out_shape);
    op(&x.view(), &mut out)?;
    Ok(out)
}

impl<S: EngineState> std::fmt::Debug for InferenceEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("state", &std::any::type_name::<S>())
            .field("artifact_path", &self.artifact_path)
            .field("device", &self.device)
            .finish()
    }
}
