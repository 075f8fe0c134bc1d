// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise activations: ReLU, tanh and GELU.

use super::check_same_shape;
use crate::{Tensor, TensorError, TensorView};

/// Writes `f(x)` for every element of `input` into `output`.
fn map_elementwise(
    op: &'static str,
    input: &TensorView<'_>,
    output: &mut Tensor,
    f: impl Fn(f32) -> f32,
) -> Result<(), TensorError> {
    check_same_shape(op, input, output)?;
    for (d, &x) in output.as_mut_slice().iter_mut().zip(input.as_slice()) {
        *d = f(x);
    }
    Ok(())
}

/// Applies `max(0, x)` element-wise.
pub fn relu(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    map_elementwise("relu", input, output, |x| x.max(0.0))
}

/// Applies the hyperbolic tangent element-wise.
pub fn tanh(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    map_elementwise("tanh", input, output, f32::tanh)
}

/// Applies GELU element-wise, tanh form:
/// `0.5 · x · (1 + tanh(√(2/π) · (x + 0.044715 · x³)))`.
pub fn gelu(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    map_elementwise("gelu", input, output, gelu_approx)
}

#[inline]
fn gelu_approx(x: f32) -> f32 {
    const K: f32 = 0.797_884_6; // sqrt(2 / pi)
    let cube = x * x * x;
    0.5 * x * (1.0 + (K * (x + 0.044_715 * cube)).tanh())
}
