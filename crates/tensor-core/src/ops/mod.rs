// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Forward-pass kernels.
//!
//! Each operation writes into a pre-allocated output tensor and validates
//! shapes up front; none of them allocate.

mod activation_op;
mod bias_op;
mod matmul_op;
mod softmax_op;

pub use activation_op::{gelu, relu, tanh};
pub use bias_op::bias_add;
pub use matmul_op::matmul;
pub use softmax_op::softmax;

use crate::{Tensor, TensorError, TensorView};

/// Checks that an element-wise op's input and output shapes agree.
pub(crate) fn check_same_shape(
    op: &'static str,
    input: &TensorView<'_>,
    output: &Tensor,
) -> Result<(), TensorError> {
    if input.shape() != output.shape() {
        return Err(TensorError::ShapeMismatch {
            op,
            lhs: input.shape().clone(),
            rhs: output.shape().clone(),
        });
    }
    Ok(())
}
