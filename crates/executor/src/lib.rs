// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # executor
//!
//! Instantiates a method of a [`program_ir::Program`] over a set of arenas
//! and interprets its instructions.
//!
//! - [`runtime_init`] — one-time bootstrap; registers the kernel table.
//! - [`MemoryManager`] — the method, planned and temp arenas.
//! - [`Method`] — `load` → `set_input` → `execute` → `get_output`.
//! - [`ExecutorError`] — everything that can go wrong along the way.

mod error;
pub mod kernels;
mod memory;
mod method;

pub use error::ExecutorError;
pub use kernels::runtime_init;
pub use memory::MemoryManager;
pub use method::Method;
