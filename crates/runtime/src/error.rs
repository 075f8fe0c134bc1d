// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the inference runtime.

use tensor_core::Shape;

/// Errors that can occur while loading or executing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The device name is recognised but no backend for it is available.
    #[error("device '{requested}' is unavailable: {reason}")]
    DeviceUnavailable { requested: String, reason: String },

    /// The device name is not recognised at all.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// Failed to load weights from disk.
    #[error("weight loading failed for layer '{layer}': {detail}")]
    WeightLoadError { layer: String, detail: String },

    /// The input tensor does not match the artifact's per-sample shape.
    #[error("input shape {actual} does not match (n, {expected})")]
    InputShapeMismatch { expected: Shape, actual: Shape },

    /// A tensor operation failed during layer execution.
    #[error("execution error in layer '{layer}': {source}")]
    ExecutionError {
        layer: String,
        #[source]
        source: tensor_core::TensorError,
    },

    /// Model loading failed.
    #[error("model error: {0}")]
    ModelError(#[from] model_ir::ModelError),
}
