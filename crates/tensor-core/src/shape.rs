// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row-major tensor shapes with a leading batch dimension convention.

use std::fmt;

/// Dimensions of a [`crate::Tensor`].
///
/// A batched tensor keeps its batch size in dimension 0 and the per-sample
/// shape after it, so `[8, 2, 15, 15]` is eight two-plane 15×15 boards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Builds a shape from explicit dimensions.
    ///
    /// ```
    /// use tensor_core::Shape;
    /// let board = Shape::new(vec![2, 15, 15]);
    /// assert_eq!(board.num_elements(), 450);
    /// assert_eq!(board.with_batch(4).rank(), 4);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    pub fn vector(len: usize) -> Self {
        Self::new(vec![len])
    }

    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self::new(vec![rows, cols])
    }

    /// `(batch, channels, height, width)`.
    pub fn nchw(batch: usize, channels: usize, height: usize, width: usize) -> Self {
        Self::new(vec![batch, channels, height, width])
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Product of all dimensions (1 for an empty shape).
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Bytes needed to hold this many `f32` values.
    pub fn size_bytes(&self) -> usize {
        self.num_elements() * std::mem::size_of::<f32>()
    }

    /// Leading dimension, read as the batch size.
    pub fn batch(&self) -> Option<usize> {
        self.dims.first().copied()
    }

    /// Everything after the batch dimension.
    pub fn sample_shape(&self) -> Shape {
        Self::new(self.dims.get(1..).unwrap_or_default().to_vec())
    }

    /// Inverse of [`Shape::sample_shape`]: prepends `batch`.
    pub fn with_batch(&self, batch: usize) -> Shape {
        Self::new(std::iter::once(batch).chain(self.dims.iter().copied()).collect())
    }

    /// `true` when `self` is `[m, k]` and `other` is `[k, n]`.
    pub fn is_matmul_compatible(&self, other: &Shape) -> bool {
        matches!((self.dims(), other.dims()), ([_, k], [k2, _]) if k == k2)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.dims.iter().map(usize::to_string).collect();
        write!(f, "[{}]", dims.join(", "))
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_and_byte_counts() {
        assert_eq!(Shape::vector(5).num_elements(), 5);
        assert_eq!(Shape::matrix(3, 4).size_bytes(), 48);
        assert_eq!(Shape::new(vec![]).num_elements(), 1);
    }

    #[test]
    fn test_board_batch_split() {
        let s = Shape::nchw(8, 2, 15, 15);
        assert_eq!(s.batch(), Some(8));
        assert_eq!(s.num_elements(), 8 * 450);
        assert_eq!(s.sample_shape(), Shape::new(vec![2, 15, 15]));
    }

    #[test]
    fn test_with_batch_inverts_sample_shape() {
        let sample = Shape::new(vec![2, 15, 15]);
        let batched = sample.with_batch(32);
        assert_eq!(batched, Shape::nchw(32, 2, 15, 15));
        assert_eq!(batched.sample_shape(), sample);
    }

    #[test]
    fn test_empty_shape_has_no_batch() {
        let s = Shape::new(vec![]);
        assert_eq!(s.batch(), None);
        assert_eq!(s.sample_shape(), s);
    }

    #[test]
    fn test_matmul_compatibility() {
        let a = Shape::matrix(3, 4);
        assert!(a.is_matmul_compatible(&Shape::matrix(4, 5)));
        assert!(!a.is_matmul_compatible(&Shape::matrix(5, 5)));
        assert!(!Shape::vector(4).is_matmul_compatible(&a));
    }

    #[test]
    fn test_display_and_conversions() {
        let s1: Shape = vec![2, 3].into();
        let s2: Shape = (&[2, 3][..]).into();
        assert_eq!(s1, s2);
        assert_eq!(s1.to_string(), "[2, 3]");
    }
}
