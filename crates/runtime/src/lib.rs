// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! Hosts a compiled inference program on a memory-constrained device.
//!
//! The [`ProgramLoader`] owns:
//! - a method arena and a temp arena (`memory-manager` bump allocators)
//!   sized by [`LoaderConfig`];
//! - the parsed [`program_ir::Program`];
//! - the instantiated [`executor::Method`] with its planned buffers carved
//!   out of the method arena.
//!
//! and exposes the single inference entry point
//! [`ProgramLoader::run_inference`]: two `f32` input buffers in, one `f32`
//! output buffer out.
//!
//! # Pipeline
//! ```text
//! initialize → load_program → (create_input_tensor × n → execute → read output)*
//! ```
//! Each step fails fast with a [`LoaderError`] naming the failing sub-step;
//! [`LoaderError::kind`] gives the coarse classification.

mod config;
mod error;
mod loader;
mod metrics;
mod model;

pub use config::LoaderConfig;
pub use error::{ErrorKind, InvalidArgument, LoaderError};
pub use loader::{LoaderState, ProgramLoader};
pub use metrics::{ArenaReport, ArenaUsage, InferenceMetrics};
pub use model::ADD_MODEL;
