// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The seam between a loaded model and whatever drives it.

use crate::RuntimeError;
use tensor_core::Tensor;

/// Anything that can run a forward pass on a batched input.
///
/// [`InferenceEngine<Ready>`](crate::InferenceEngine) is the production
/// implementation; tests substitute counting or failing stand-ins.
pub trait InferenceModule {
    /// Runs one forward pass. `input` is batched in dimension 0.
    fn forward(&self, input: &Tensor) -> Result<Tensor, RuntimeError>;
}

impl<M: InferenceModule + ?Sized> InferenceModule for &M {
    fn forward(&self, input: &Tensor) -> Result<Tensor, RuntimeError> {
        (**self).forward(input)
    }
}

impl<M: InferenceModule + ?Sized> InferenceModule for Box<M> {
    fn forward(&self, input: &Tensor) -> Result<Tensor, RuntimeError> {
        (**self).forward(input)
    }
}
