// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The execution engine for computational-graph artifacts.
//!
//! The runtime takes:
//! - An artifact directory readable by `model-ir`.
//! - A [`Device`] to execute on.
//!
//! And produces a ready engine that holds the validated graph and all
//! weights in memory, exposing a synchronous [`InferenceEngine::forward`].
//!
//! # Type-State Pipeline
//! ```text
//! InferenceEngine<Idle> → InferenceEngine<Ready>
//! ```
//! Transitions are compile-time checked.
//!
//! # Module Seam
//! Callers that only need to time forward passes depend on the
//! [`InferenceModule`] trait, not on the engine itself.

mod device;
mod engine;
mod error;
mod module;
mod weight_loader;

pub use device::Device;
pub use engine::{EngineState, Idle, InferenceEngine, Ready};
pub use error::RuntimeError;
pub use module::InferenceModule;
pub use weight_loader::WeightLoader;
