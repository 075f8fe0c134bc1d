// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row-broadcast bias addition.

use crate::{Tensor, TensorError, TensorView};

/// Adds `bias` (shape `[N]`) to every row of `output` (shape `[M, N]`) in place.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if `bias` is not a vector whose
/// length equals the last dimension of `output`.
pub fn bias_add(bias: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    let cols = output.shape().dims().last().copied().unwrap_or(0);
    if bias.shape().rank() != 1 || bias.shape().num_elements() != cols {
        return Err(TensorError::ShapeMismatch {
            op: "bias_add",
            lhs: output.shape().clone(),
            rhs: bias.shape().clone(),
        });
    }
    if cols == 0 {
        return Ok(());
    }

    let b = bias.as_slice();
    for row in output.as_mut_slice().chunks_exact_mut(cols) {
        for (d, &v) in row.iter_mut().zip(b) {
            *d += v;
        }
    }
    Ok(())
}
