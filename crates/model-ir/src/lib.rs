// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-ir
//!
//! The on-disk computational-graph artifact and its in-memory IR.
//!
//! - [`LayerType`]: the computation each layer performs.
//! - [`LayerDef`]: one layer's weight references and per-sample shapes.
//! - [`ModelGraph`]: the ordered layer chain, with a **type-state pattern**
//!   (`Loaded` → `Validated`).
//! - [`ModelLoader`]: reads an artifact directory into a validated graph.
//! - [`ArtifactWriter`]: writes an artifact directory.
//! - [`synthetic`]: a seeded board-policy network for benchmarking without
//!   an exported model.
//!
//! # Artifact Format
//! An artifact is a directory holding:
//! - `model.json`: manifest describing the input shape and layer order.
//! - `model.safetensors`: `f32` weights in SafeTensors format.
//!
//! # Example
//! ```no_run
//! use model_ir::ModelLoader;
//! use std::path::Path;
//!
//! let graph = ModelLoader::load(Path::new("../nn/rgnn")).unwrap();
//! println!("{}", graph.summary());
//! for layer in graph.iter_layers() {
//!     println!("  {}", layer.summary());
//! }
//! ```

mod error;
pub mod graph;
mod layer;
mod loader;
mod manifest;
pub mod synthetic;
mod writer;

pub use error::ModelError;
pub use graph::ModelGraph;
pub use layer::{LayerDef, LayerType};
pub use loader::{ModelLoader, WeightMeta, MANIFEST_FILE, WEIGHTS_FILE};
pub use manifest::{ManifestLayer, ModelManifest};
pub use writer::ArtifactWriter;
