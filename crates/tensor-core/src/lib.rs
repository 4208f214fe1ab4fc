// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor metadata and kernels for running compiled programs out of
//! caller-managed memory.
//!
//! This crate provides:
//! - [`DType`] — element data types a program may declare.
//! - [`Shape`] — sizes plus memory dim order.
//! - [`TensorInfo`] — declared dtype/shape of a method input or output.
//! - [`TensorView`] — a borrowed tensor over someone else's bytes.
//! - [`EValue`] — the tagged value seen at a method boundary.
//! - [`ops`] — allocation-free elementwise `f32` kernels.
//!
//! # Design Goals
//! - No owned tensor storage: all bytes live in arenas or caller buffers.
//! - Alignment and length checked at every byte-to-`f32` reinterpretation.
//! - Clean error types via `thiserror`.

pub mod cast;
mod dtype;
mod error;
pub mod ops;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::TensorError;
pub use shape::{Shape, MAX_RANK};
pub use tensor::{EValue, Tag, TensorInfo, TensorView};
