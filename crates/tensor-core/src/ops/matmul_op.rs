// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense matrix product used by linear layers.

use crate::{Shape, Tensor, TensorError, TensorView};

/// Computes `output = lhs · rhs` for row-major 2-D tensors.
///
/// In a linear layer `lhs` is the `[batch, in]` activation, `rhs` the
/// `[in, out]` weight and `output` the `[batch, out]` result.
///
/// # Errors
/// [`TensorError::ShapeMismatch`] when the inner dimensions differ or
/// `output` is not `[rows(lhs), cols(rhs)]`.
pub fn matmul(
    lhs: &TensorView<'_>,
    rhs: &TensorView<'_>,
    output: &mut Tensor,
) -> Result<(), TensorError> {
    if !lhs.shape().is_matmul_compatible(rhs.shape()) {
        return Err(TensorError::ShapeMismatch {
            op: "matmul",
            lhs: lhs.shape().clone(),
            rhs: rhs.shape().clone(),
        });
    }

    let (rows, inner) = (lhs.shape().dims()[0], lhs.shape().dims()[1]);
    let cols = rhs.shape().dims()[1];

    let want = Shape::matrix(rows, cols);
    if output.shape() != &want {
        return Err(TensorError::ShapeMismatch {
            op: "matmul output",
            lhs: want,
            rhs: output.shape().clone(),
        });
    }

    accumulate_rows(lhs.as_slice(), rhs.as_slice(), output.as_mut_slice(), inner, cols);
    Ok(())
}

/// Row-by-row accumulation: each output row is a weighted sum of `rhs` rows,
/// so both `rhs` and `out` are walked contiguously.
fn accumulate_rows(lhs: &[f32], rhs: &[f32], out: &mut [f32], inner: usize, cols: usize) {
    out.fill(0.0);

    for (out_row, lhs_row) in out.chunks_exact_mut(cols).zip(lhs.chunks_exact(inner)) {
        for (&scale, rhs_row) in lhs_row.iter().zip(rhs.chunks_exact(cols)) {
            // Sparse board planes are mostly zeros.
            if scale == 0.0 {
                continue;
            }
            for (o, &r) in out_row.iter_mut().zip(rhs_row) {
                *o += scale * r;
            }
        }
    }
}
