// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row-wise softmax over the last dimension.

use super::check_same_shape;
use crate::{Tensor, TensorError, TensorView};

/// Computes softmax along the last dimension.
///
/// Each row is shifted by its maximum before exponentiation so large
/// logits cannot overflow. For a batched policy head of shape `[n, 225]`
/// every sample's row sums to 1 independently.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if input and output shapes differ.
pub fn softmax(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    check_same_shape("softmax", input, output)?;

    let row_len = match input.shape().dims().last() {
        Some(&0) => return Ok(()),
        Some(&n) => n,
        None => {
            output.as_mut_slice()[0] = 1.0;
            return Ok(());
        }
    };

    let rows_in = input.as_slice().chunks_exact(row_len);
    let rows_out = output.as_mut_slice().chunks_exact_mut(row_len);
    for (src, dst) in rows_in.zip(rows_out) {
        let max_val = src.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let mut sum = 0.0f32;
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = (s - max_val).exp();
            sum += *d;
        }

        if sum > 0.0 {
            let inv_sum = sum.recip();
            dst.iter_mut().for_each(|d| *d *= inv_sum);
        }
    }

    Ok(())
}
