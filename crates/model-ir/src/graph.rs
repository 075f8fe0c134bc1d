// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model graph: the artifact as an ordered chain of layers.
//!
//! # Type-State Pattern
//!
//! ```text
//! ModelGraph<Loaded>     layers parsed, not yet checked.
//!       │  .validate()
//!       ▼
//! ModelGraph<Validated>  shapes verified, ready to execute.
//! ```
//!
//! The engine only accepts `ModelGraph<Validated>`, so an inconsistent chain
//! is rejected at load time rather than on the first forward call.

use crate::{LayerDef, ModelError};
use std::fmt;
use tensor_core::Shape;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph has been loaded but not validated.
#[derive(Debug, Clone)]
pub struct Loaded;

/// Marker: graph has been validated and is ready for execution.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Loaded {}
impl GraphState for Validated {}

// ── ModelGraph ─────────────────────────────────────────────────────

/// The complete model represented as an ordered sequence of layers.
#[derive(Debug, Clone)]
pub struct ModelGraph<S: GraphState = Loaded> {
    /// Human-readable model name.
    pub name: String,
    /// Ordered list of layer definitions.
    pub layers: Vec<LayerDef>,
    _state: std::marker::PhantomData<S>,
}

impl ModelGraph<Loaded> {
    /// Creates a new graph in the `Loaded` state.
    pub fn new(name: String, layers: Vec<LayerDef>) -> Self {
        Self {
            name,
            layers,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the graph and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The graph is non-empty.
    /// - Layer indices are consecutive starting from 0.
    /// - No layer has a zero-element input or output.
    /// - Each layer's output shape equals the next layer's input shape.
    pub fn validate(self) -> Result<ModelGraph<Validated>, ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InvalidGraph(
                "model graph contains no layers".into(),
            ));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.index != i {
                return Err(ModelError::InvalidLayer {
                    layer: layer.name.clone(),
                    detail: format!("expected index {i}, got {}", layer.index),
                });
            }
            if layer.input_shape.num_elements() == 0 || layer.output_shape.num_elements() == 0 {
                return Err(ModelError::InvalidLayer {
                    layer: layer.name.clone(),
                    detail: "zero-element activation".into(),
                });
            }
        }

        for pair in self.layers.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if current.output_shape != next.input_shape {
                return Err(ModelError::InvalidLayer {
                    layer: next.name.clone(),
                    detail: format!(
                        "expects input {} but '{}' produces {}",
                        next.input_shape, current.name, current.output_shape
                    ),
                });
            }
        }

        Ok(ModelGraph {
            name: self.name,
            layers: self.layers,
            _state: std::marker::PhantomData,
        })
    }
}

impl ModelGraph<Validated> {
    /// Returns the total number of layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Per-sample input shape of the first layer.
    pub fn input_shape(&self) -> &Shape {
        &self.layers[0].input_shape
    }

    /// Per-sample output shape of the last layer.
    pub fn output_shape(&self) -> &Shape {
        &self.layers[self.layers.len() - 1].output_shape
    }

    /// Returns the total memory for all weights in bytes.
    pub fn total_weight_bytes(&self) -> usize {
        self.layers.iter().map(LayerDef::estimated_weight_bytes).sum()
    }

    /// Largest per-sample activation footprint of any single layer.
    pub fn max_activation_bytes_per_sample(&self) -> usize {
        self.layers
            .iter()
            .map(LayerDef::activation_bytes_per_sample)
            .max()
            .unwrap_or(0)
    }

    /// Returns an iterator over the layers in execution order.
    pub fn iter_layers(&self) -> impl Iterator<Item = &LayerDef> {
        self.layers.iter()
    }

    /// Returns a reference to a layer by index.
    pub fn layer(&self, index: usize) -> Option<&LayerDef> {
        self.layers.get(index)
    }

    /// Returns a summary string describing the model.
    pub fn summary(&self) -> String {
        format!(
            "Model '{}': {} layers, input {}, output {}, {:.1} KB weights",
            self.name,
            self.num_layers(),
            self.input_shape(),
            self.output_shape(),
            self.total_weight_bytes() as f64 / 1024.0,
        )
    }
}

impl<S: GraphState> fmt::Display for ModelGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ModelGraph '{}' ({} layers):", self.name, self.layers.len())?;
        for layer in &self.layers {
            writeln!(f, "  {}", layer.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayerType;

    /// Helper: flatten → (linear → relu)* over a [2, 3, 3] input.
    fn make_layers(hidden: usize) -> Vec<LayerDef> {
        vec![
            LayerDef {
                name: "flatten".into(),
                layer_type: LayerType::Flatten,
                index: 0,
                weight_names: vec![],
                weight_shapes: vec![],
                input_shape: Shape::new(vec![2, 3, 3]),
                output_shape: Shape::vector(18),
            },
            LayerDef {
                name: "fc".into(),
                layer_type: LayerType::Linear,
                index: 1,
                weight_names: vec!["fc.weight".into()],
                weight_shapes: vec![Shape::matrix(18, hidden)],
                input_shape: Shape::vector(18),
                output_shape: Shape::vector(hidden),
            },
            LayerDef {
                name: "act".into(),
                layer_type: LayerType::Relu,
                index: 2,
                weight_names: vec![],
                weight_shapes: vec![],
                input_shape: Shape::vector(hidden),
                output_shape: Shape::vector(hidden),
            },
        ]
    }

    #[test]
    fn test_validate_ok() {
        let validated = ModelGraph::new("test".into(), make_layers(8)).validate().unwrap();
        assert_eq!(validated.num_layers(), 3);
        assert_eq!(validated.input_shape(), &Shape::new(vec![2, 3, 3]));
        assert_eq!(validated.output_shape(), &Shape::vector(8));
    }

    #[test]
    fn test_validate_empty() {
        let graph = ModelGraph::new("empty".into(), vec![]);
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_bad_index() {
        let mut layers = make_layers(8);
        layers[1].index = 5;
        assert!(ModelGraph::new("bad".into(), layers).validate().is_err());
    }

    #[test]
    fn test_validate_zero_shape() {
        let mut layers = make_layers(8);
        layers[2].output_shape = Shape::vector(0);
        assert!(ModelGraph::new("zero".into(), layers).validate().is_err());
    }

    #[test]
    fn test_validate_broken_chain() {
        let mut layers = make_layers(8);
        layers[2].input_shape = Shape::vector(9);
        layers[2].output_shape = Shape::vector(9);
        let err = ModelGraph::new("broken".into(), layers).validate().unwrap_err();
        assert!(err.to_string().contains("'fc' produces [8]"), "{err}");
    }

    #[test]
    fn test_weight_and_activation_totals() {
        let validated = ModelGraph::new("test".into(), make_layers(8)).validate().unwrap();
        assert_eq!(validated.total_weight_bytes(), 18 * 8 * 4);
        assert_eq!(validated.max_activation_bytes_per_sample(), (18 + 18) * 4);
    }

    #[test]
    fn test_summary_and_display() {
        let validated = ModelGraph::new("board".into(), make_layers(8)).validate().unwrap();
        let s = validated.summary();
        assert!(s.contains("board"));
        assert!(s.contains("3 layers"));

        let display = format!("{validated}");
        assert!(display.contains("flatten"));
        assert!(display.contains("fc"));
    }

    #[test]
    fn test_layer_access() {
        let validated = ModelGraph::new("test".into(), make_layers(8)).validate().unwrap();
        assert_eq!(validated.layer(0).unwrap().name, "flatten");
        assert!(validated.layer(3).is_none());
        let names: Vec<_> = validated.iter_layers().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["flatten", "fc", "act"]);
    }
}
