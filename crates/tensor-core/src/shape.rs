// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors: sizes plus memory dim order.

use crate::{DType, TensorError};
use std::fmt;

/// Largest supported rank; dim order entries are `u8`.
pub const MAX_RANK: usize = u8::MAX as usize;

/// The sizes of a tensor and the order its dimensions are laid out in
/// memory.
///
/// `dim_order` lists dimensions from outermost to innermost in memory.
/// `[0, 1, .., rank-1]` is plain row-major; `[0, 2, 3, 1]` on a 4-D tensor
/// is channels-last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    sizes: Vec<usize>,
    dim_order: Vec<u8>,
}

impl Shape {
    /// Creates a row-major shape. `sizes` must have at most [`MAX_RANK`]
    /// entries.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::contiguous(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// assert_eq!(s.dim_order(), &[0, 1, 2]);
    /// ```
    pub fn contiguous(sizes: Vec<usize>) -> Self {
        let dim_order = (0..sizes.len() as u8).collect();
        Self { sizes, dim_order }
    }

    /// Creates a shape with an explicit dim order.
    ///
    /// Fails if `dim_order` is not a permutation of `0..sizes.len()`.
    pub fn with_dim_order(sizes: Vec<usize>, dim_order: Vec<u8>) -> Result<Self, TensorError> {
        let rank = sizes.len();
        let mut seen = vec![false; rank];
        let valid = dim_order.len() == rank
            && dim_order.iter().all(|&d| {
                let d = d as usize;
                d < rank && !std::mem::replace(&mut seen[d], true)
            });
        if !valid {
            return Err(TensorError::InvalidDimOrder { dim_order, rank });
        }
        Ok(Self { sizes, dim_order })
    }

    /// Creates a scalar shape (rank 0).
    pub fn scalar() -> Self {
        Self::default()
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self::contiguous(vec![len])
    }

    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn dim_order(&self) -> &[u8] {
        &self.dim_order
    }

    /// Total number of elements; 1 for a scalar.
    pub fn num_elements(&self) -> usize {
        self.sizes.iter().product()
    }

    /// Memory footprint in bytes for `dtype`.
    pub fn size_bytes(&self, dtype: DType) -> usize {
        self.num_elements() * dtype.size_bytes()
    }

    /// Returns `true` if the dim order is the identity (row-major).
    pub fn is_contiguous(&self) -> bool {
        self.dim_order.iter().enumerate().all(|(i, &d)| d as usize == i)
    }

    /// Element strides per dimension, derived from the dim order.
    pub fn strides(&self) -> Vec<usize> {
        let rank = self.rank();
        let mut strides = vec![0usize; rank];
        if rank == 0 {
            return strides;
        }
        let innermost = self.dim_order[rank - 1] as usize;
        strides[innermost] = 1;
        for i in (0..rank - 1).rev() {
            let dim = self.dim_order[i] as usize;
            let next = self.dim_order[i + 1] as usize;
            strides[dim] = strides[next] * self.sizes[next];
        }
        strides
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.sizes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")?;
        if !self.is_contiguous() {
            write!(f, " order {:?}", self.dim_order)?;
        }
        Ok(())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(sizes: Vec<usize>) -> Self {
        Self::contiguous(sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_shape() {
        let s = Shape::scalar();
        assert_eq!(s.rank(), 0);
        assert_eq!(s.num_elements(), 1);
        assert!(s.strides().is_empty());
    }

    #[test]
    fn test_row_major_strides() {
        let s = Shape::contiguous(vec![2, 3, 4]);
        assert_eq!(s.strides(), vec![12, 4, 1]);
        assert!(s.is_contiguous());
    }

    #[test]
    fn test_channels_last_strides() {
        // NCHW sizes laid out as NHWC.
        let s = Shape::with_dim_order(vec![1, 3, 4, 5], vec![0, 2, 3, 1]).unwrap();
        assert_eq!(s.strides(), vec![60, 1, 15, 3]);
        assert!(!s.is_contiguous());
    }

    #[test]
    fn test_invalid_dim_order() {
        assert!(Shape::with_dim_order(vec![2, 2], vec![0, 0]).is_err());
        assert!(Shape::with_dim_order(vec![2, 2], vec![0]).is_err());
        assert!(Shape::with_dim_order(vec![2], vec![1]).is_err());
    }

    #[test]
    fn test_size_bytes() {
        let s = Shape::vector(10);
        assert_eq!(s.size_bytes(DType::F32), 40);
        assert_eq!(s.size_bytes(DType::I64), 80);
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::contiguous(vec![2, 3]).to_string(), "[2, 3]");
        let s = Shape::with_dim_order(vec![2, 3], vec![1, 0]).unwrap();
        assert_eq!(s.to_string(), "[2, 3] order [1, 0]");
    }
}
