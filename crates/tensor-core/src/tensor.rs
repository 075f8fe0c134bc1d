// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::{Shape, TensorError};
use rand::Rng;

/// An owned, n-dimensional `f32` tensor stored in contiguous memory.
///
/// # Memory Layout
/// Data is stored in row-major (C) order. For a batched board input of shape
/// `(n, c, h, w)` the sample index varies slowest.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::zeros(Shape::matrix(2, 3));
    /// assert_eq!(t.size_bytes(), 24);
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            data: vec![0.0; n],
        }
    }

    /// Creates a tensor that takes ownership of `data`.
    ///
    /// Returns an error if `data.len()` does not match the shape's element count.
    pub fn from_vec(shape: Shape, data: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a tensor from a slice of `f32` values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_vec(shape, values.to_vec())
    }

    /// Decodes little-endian `f32` bytes (the SafeTensors layout).
    pub fn from_le_bytes(shape: Shape, bytes: &[u8]) -> Result<Self, TensorError> {
        if bytes.len() % 4 != 0 {
            return Err(TensorError::MisalignedBytes { len: bytes.len() });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::from_vec(shape, data)
    }

    /// Fills a new tensor with samples from the standard normal distribution.
    ///
    /// Uses the Box–Muller transform over uniform draws from `rng`.
    pub fn randn<R: Rng + ?Sized>(shape: Shape, rng: &mut R) -> Self {
        let n = shape.num_elements();
        let mut data = Vec::with_capacity(n);
        while data.len() < n {
            // `1.0 - u` keeps the argument of ln() in (0, 1].
            let u1: f32 = 1.0 - rng.gen::<f32>();
            let u2: f32 = rng.gen::<f32>();
            let radius = (-2.0 * u1.ln()).sqrt();
            let theta = std::f32::consts::TAU * u2;
            data.push(radius * theta.cos());
            if data.len() < n {
                data.push(radius * theta.sin());
            }
        }
        Self { shape, data }
    }

    /// Fills a new tensor with samples from `U(-limit, limit)`.
    pub fn uniform<R: Rng + ?Sized>(shape: Shape, limit: f32, rng: &mut R) -> Self {
        let n = shape.num_elements();
        let data = (0..n).map(|_| rng.gen_range(-limit..=limit)).collect();
        Self { shape, data }
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns an immutable view over this tensor's data.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            shape: &self.shape,
            data: &self.data,
        }
    }

    /// Returns the element buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the element buffer mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Encodes the elements as little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Returns the number of elements.
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    /// Returns the memory footprint of this tensor in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    /// Reinterprets the buffer under a new shape with the same element count.
    pub fn reshape(self, shape: Shape) -> Result<Self, TensorError> {
        if shape.num_elements() != self.data.len() {
            return Err(TensorError::InvalidReshape {
                from: self.shape,
                to: shape,
            });
        }
        Ok(Self {
            shape,
            data: self.data,
        })
    }
}

/// A borrowed, read-only view over a [`Tensor`]'s data.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    shape: &'a Shape,
    data: &'a [f32],
}

impl<'a> TensorView<'a> {
    /// Returns the shape of the viewed tensor.
    pub fn shape(&self) -> &Shape {
        self.shape
    }

    /// Returns the viewed elements.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }
}
