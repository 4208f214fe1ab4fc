// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise kernels.
//!
//! Every operation writes into a caller-provided output slice and never
//! allocates. Operand and output slices must not alias; the executor stages
//! inputs into scratch memory when a program reuses a buffer.

mod binary_op;
mod unary_op;

pub use binary_op::{add, binary, div, mul, sub, BinaryOp};
pub use unary_op::{copy, relu};
