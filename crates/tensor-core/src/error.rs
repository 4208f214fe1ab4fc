// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor metadata and kernels.

use crate::DType;

/// Errors that can occur when describing or computing on tensors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    /// A byte buffer does not have the size its metadata implies.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Operands of an elementwise kernel have different element counts.
    #[error("incompatible operands for {op}: {lhs} vs {rhs} elements")]
    ShapeMismatch {
        op: &'static str,
        lhs: usize,
        rhs: usize,
    },

    /// The data type is not supported by this operation.
    #[error("unsupported dtype {dtype} for {op}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    /// A byte buffer is not aligned for its element type.
    #[error("buffer at {addr:#x} is not aligned to {align} bytes")]
    Misaligned { addr: usize, align: usize },

    /// The dim order is not a permutation of `0..rank`.
    #[error("invalid dim order {dim_order:?} for rank {rank}")]
    InvalidDimOrder { dim_order: Vec<u8>, rank: usize },
}
