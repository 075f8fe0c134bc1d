// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Owned `f32` tensors and the handful of kernels needed to execute a
//! computational-graph artifact on the host.
//!
//! This crate provides:
//! - [`Tensor`] / [`TensorView`]: row-major `f32` storage with shape metadata.
//! - [`Shape`]: dimension descriptors, including `NCHW` batch helpers.
//! - Random normal inputs via [`Tensor::randn`].
//! - Kernels: matrix multiplication, bias add, ReLU, GELU, tanh, softmax.
//!
//! Kernels write into caller-provided output tensors so the engine decides
//! when activation buffers are allocated and dropped.

mod error;
mod ops;
mod shape;
mod tensor;

pub use error::TensorError;
pub use ops::{bias_add, gelu, matmul, relu, softmax, tanh};
pub use shape::Shape;
pub use tensor::{Tensor, TensorView};
