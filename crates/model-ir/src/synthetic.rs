// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Seeded synthetic board-policy network.
//!
//! Produces a small artifact with the same interface as a board-game policy
//! head: `(n, channels, height, width)` in, a softmax over
//! `height * width` moves out. Useful for sweeps on machines with no
//! exported model.

use crate::{ArtifactWriter, ManifestLayer, ModelError, ModelManifest};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;
use tensor_core::{Shape, Tensor};

/// Dimensions and seed of the synthetic network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardPolicySpec {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    /// Width of the single hidden layer.
    pub hidden: usize,
    pub seed: u64,
}

impl Default for BoardPolicySpec {
    fn default() -> Self {
        Self {
            channels: 2,
            height: 15,
            width: 15,
            hidden: 128,
            seed: 0,
        }
    }
}

impl BoardPolicySpec {
    /// Flattened per-sample input width.
    pub fn input_features(&self) -> usize {
        self.channels * self.height * self.width
    }

    /// Number of policy outputs (one per board cell).
    pub fn moves(&self) -> usize {
        self.height * self.width
    }
}

fn layer(name: &str, layer_type: &str, weights: &[&str]) -> ManifestLayer {
    ManifestLayer {
        name: name.into(),
        layer_type: layer_type.into(),
        weights: weights.iter().map(|w| w.to_string()).collect(),
    }
}

/// Xavier-uniform init for a `[fan_in, fan_out]` matrix.
fn xavier(fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Tensor {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    Tensor::uniform(Shape::matrix(fan_in, fan_out), limit, rng)
}

/// Builds the manifest and weights of the network described by `spec`.
///
/// Layout: `flatten → fc1 (+bias) → relu → fc2 (+bias) → softmax`.
/// Biases start at zero; the same seed always yields the same weights.
pub fn board_policy_network(spec: &BoardPolicySpec) -> (ModelManifest, Vec<(String, Tensor)>) {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let (features, hidden, moves) = (spec.input_features(), spec.hidden, spec.moves());

    let manifest = ModelManifest {
        name: format!("board-policy-{}x{}", spec.height, spec.width),
        input_shape: vec![spec.channels, spec.height, spec.width],
        layers: vec![
            layer("flatten", "flatten", &[]),
            layer("fc1", "linear", &["fc1.weight", "fc1.bias"]),
            layer("act1", "relu", &[]),
            layer("fc2", "linear", &["fc2.weight", "fc2.bias"]),
            layer("policy", "softmax", &[]),
        ],
    };

    let weights = vec![
        ("fc1.weight".to_string(), xavier(features, hidden, &mut rng)),
        ("fc1.bias".to_string(), Tensor::zeros(Shape::vector(hidden))),
        ("fc2.weight".to_string(), xavier(hidden, moves, &mut rng)),
        ("fc2.bias".to_string(), Tensor::zeros(Shape::vector(moves))),
    ];

    (manifest, weights)
}

/// Generates the network and writes it as an artifact directory.
pub fn write_board_policy_network(dir: &Path, spec: &BoardPolicySpec) -> Result<(), ModelError> {
    let (manifest, weights) = board_policy_network(spec);
    ArtifactWriter::write(dir, &manifest, &weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelLoader;

    #[test]
    fn test_default_dimensions() {
        let spec = BoardPolicySpec::default();
        assert_eq!(spec.input_features(), 450);
        assert_eq!(spec.moves(), 225);
    }

    #[test]
    fn test_weights_are_seeded() {
        let spec = BoardPolicySpec { seed: 11, ..Default::default() };
        let (_, a) = board_policy_network(&spec);
        let (_, b) = board_policy_network(&spec);
        assert_eq!(a, b);

        let (_, c) = board_policy_network(&BoardPolicySpec { seed: 12, ..spec });
        assert_ne!(a[0].1, c[0].1);
    }

    #[test]
    fn test_xavier_limit() {
        let spec = BoardPolicySpec { hidden: 32, ..Default::default() };
        let (_, weights) = board_policy_network(&spec);
        let limit = (6.0f32 / (450.0 + 32.0)).sqrt();
        assert!(weights[0].1.as_slice().iter().all(|x| x.abs() <= limit));
    }

    #[test]
    fn test_written_network_loads() {
        let dir = tempfile::tempdir().unwrap();
        let spec = BoardPolicySpec { hidden: 16, ..Default::default() };
        write_board_policy_network(dir.path(), &spec).unwrap();

        let graph = ModelLoader::load(dir.path()).unwrap();
        assert_eq!(graph.num_layers(), 5);
        assert_eq!(graph.input_shape(), &Shape::new(vec![2, 15, 15]));
        assert_eq!(graph.output_shape(), &Shape::vector(225));
    }
}
