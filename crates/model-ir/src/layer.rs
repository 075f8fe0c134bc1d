// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer definitions for the artifact IR.
//!
//! Each [`LayerDef`] describes one step of the forward chain: its type,
//! the names of its weight tensors (keys into the SafeTensors file) and its
//! per-sample input/output shapes. Batch size never appears here; the
//! engine prepends it at execution time.

use tensor_core::Shape;

/// The type of computation a layer performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    /// Collapses all per-sample dimensions into one.
    Flatten,
    /// Dense projection `x @ W (+ b)` with `W: [in, out]`, optional `b: [out]`.
    Linear,
    /// Rectified linear unit.
    Relu,
    /// Gaussian error linear unit (tanh approximation).
    Gelu,
    /// Hyperbolic tangent (value heads).
    Tanh,
    /// Softmax over the last dimension (policy heads).
    Softmax,
}

impl LayerType {
    /// Parses a layer type from a manifest string.
    ///
    /// Accepts snake_case names and common aliases (`"dense"`, `"fc"`,
    /// `"reshape"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flatten" | "reshape" => Some(Self::Flatten),
            "linear" | "dense" | "fc" => Some(Self::Linear),
            "relu" => Some(Self::Relu),
            "gelu" => Some(Self::Gelu),
            "tanh" => Some(Self::Tanh),
            "softmax" => Some(Self::Softmax),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flatten => "flatten",
            Self::Linear => "linear",
            Self::Relu => "relu",
            Self::Gelu => "gelu",
            Self::Tanh => "tanh",
            Self::Softmax => "softmax",
        }
    }

    /// Range of weight tensors this layer type accepts.
    pub fn weight_arity(&self) -> std::ops::RangeInclusive<usize> {
        match self {
            Self::Linear => 1..=2,
            _ => 0..=0,
        }
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata describing a single layer in the model graph.
///
/// A `LayerDef` does not own weight data; the runtime loads it through
/// the names stored here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LayerDef {
    /// Unique identifier for this layer (e.g., `"policy.fc1"`).
    pub name: String,
    /// The type of computation this layer performs.
    pub layer_type: LayerType,
    /// Index in the execution order (0-based).
    pub index: usize,
    /// Names of weight tensors required by this layer.
    pub weight_names: Vec<String>,
    /// Shapes of the weight tensors (parallel to `weight_names`).
    pub weight_shapes: Vec<Shape>,
    /// Per-sample input shape.
    pub input_shape: Shape,
    /// Per-sample output shape.
    pub output_shape: Shape,
}

impl LayerDef {
    /// Memory required for this layer's weights in bytes.
    pub fn estimated_weight_bytes(&self) -> usize {
        self.weight_shapes.iter().map(Shape::size_bytes).sum()
    }

    /// Activation memory for one sample: input and output buffers are both
    /// live while the layer executes.
    pub fn activation_bytes_per_sample(&self) -> usize {
        self.input_shape.size_bytes() + self.output_shape.size_bytes()
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} ({}) {} -> {}, weights: {:.1} KB",
            self.index,
            self.name,
            self.layer_type,
            self.input_shape,
            self.output_shape,
            self.estimated_weight_bytes() as f64 / 1024.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(index: usize) -> LayerDef {
        LayerDef {
            name: format!("fc.{index}"),
            layer_type: LayerType::Linear,
            index,
            weight_names: vec!["w".into(), "b".into()],
            weight_shapes: vec![Shape::matrix(450, 128), Shape::vector(128)],
            input_shape: Shape::vector(450),
            output_shape: Shape::vector(128),
        }
    }

    #[test]
    fn test_weight_bytes() {
        assert_eq!(dense(0).estimated_weight_bytes(), (450 * 128 + 128) * 4);
    }

    #[test]
    fn test_activation_bytes_per_sample() {
        assert_eq!(dense(0).activation_bytes_per_sample(), (450 + 128) * 4);
    }

    #[test]
    fn test_layer_type_from_str() {
        assert_eq!(LayerType::from_str_loose("Dense"), Some(LayerType::Linear));
        assert_eq!(LayerType::from_str_loose("fc"), Some(LayerType::Linear));
        assert_eq!(LayerType::from_str_loose("reshape"), Some(LayerType::Flatten));
        assert_eq!(LayerType::from_str_loose("SOFTMAX"), Some(LayerType::Softmax));
        assert_eq!(LayerType::from_str_loose("conv2d"), None);
    }

    #[test]
    fn test_weight_arity() {
        assert!(LayerType::Linear.weight_arity().contains(&2));
        assert!(!LayerType::Linear.weight_arity().contains(&0));
        assert!(LayerType::Relu.weight_arity().contains(&0));
        assert!(!LayerType::Softmax.weight_arity().contains(&1));
    }

    #[test]
    fn test_summary() {
        let s = dense(3).summary();
        assert!(s.contains("[3]"));
        assert!(s.contains("linear"));
        assert!(s.contains("[450] -> [128]"));
    }
}
