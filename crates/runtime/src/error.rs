// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the program loader.
//!
//! Every [`LoaderError`] falls into one of four kinds (see [`ErrorKind`]):
//! calling an operation out of order, passing an unsuitable argument, an
//! arena running out of space, or a failure reported by the program or
//! executor layers, which is carried unchanged as the error source.

use crate::LoaderState;
use executor::ExecutorError;
use memory_manager::MemoryError;
use program_ir::ProgramError;
use std::path::PathBuf;
use tensor_core::{DType, Tag, TensorError};

/// Coarse classification of a [`LoaderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidState,
    InvalidArgument,
    AllocationFailure,
    External,
}

/// What exactly was wrong with a caller-supplied argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("input index {index} out of range ({num_slots} input slots)")]
    InputIndexOutOfRange { index: usize, num_slots: usize },

    #[error("expected {expected} input buffers, got {provided}")]
    InputCountMismatch { expected: usize, provided: usize },

    #[error("input {index} is declared as {dtype}, only f32 inputs can be bound")]
    InputDTypeMismatch { index: usize, dtype: DType },

    #[error("input {index} size mismatch: method expects {expected} bytes, caller provided {provided}")]
    InputSizeMismatch {
        index: usize,
        expected: usize,
        provided: usize,
    },

    #[error("output 0 is a {tag}, not a tensor")]
    OutputNotTensor { tag: Tag },

    #[error("output 0 has dtype {dtype}, expected f32")]
    OutputDTypeMismatch { dtype: DType },

    #[error("output buffer too small: {required} elements required, {provided} provided")]
    OutputBufferTooSmall { required: usize, provided: usize },
}

/// Errors that can occur while loading a program or running inference.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The operation is not allowed in the loader's current state.
    #[error("{operation} is not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: LoaderState,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    /// The configured model file could not be opened.
    #[error("cannot open model file '{}'", path.display())]
    ModelFile {
        path: PathBuf,
        #[source]
        source: ProgramError,
    },

    /// The program container is malformed or incompatible.
    #[error("program parse failed")]
    Parse(#[source] ProgramError),

    /// Method metadata could not be queried.
    #[error("metadata query for method '{method}' failed")]
    MethodMeta {
        method: String,
        #[source]
        source: ProgramError,
    },

    /// The program's method signature differs from the configuration.
    #[error("method '{method}' declares {declared} {what}, configuration expects {configured}")]
    SignatureMismatch {
        method: String,
        what: &'static str,
        declared: usize,
        configured: usize,
    },

    /// The size of a planned buffer could not be queried.
    #[error("size query for planned buffer {buffer_id} failed")]
    PlannedBufferSize {
        buffer_id: usize,
        #[source]
        source: ProgramError,
    },

    /// The method arena could not hold a planned buffer.
    #[error("allocating planned buffer {buffer_id} ({size} bytes) failed")]
    Allocation {
        buffer_id: usize,
        size: usize,
        #[source]
        source: MemoryError,
    },

    /// The executor rejected the method.
    #[error("method load failed")]
    MethodLoad(#[source] ExecutorError),

    /// The executor rejected an input.
    #[error("binding input {index} failed")]
    SetInput {
        index: usize,
        #[source]
        source: ExecutorError,
    },

    /// Execution or output retrieval failed.
    #[error("execution failed")]
    Execution(#[source] ExecutorError),

    /// The output tensor could not be copied out.
    #[error("reading output failed")]
    ReadOutput(#[source] TensorError),

    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LoaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoaderError::InvalidState { .. } => ErrorKind::InvalidState,
            LoaderError::InvalidArgument(_)
            | LoaderError::SignatureMismatch { .. }
            | LoaderError::Config(_) => ErrorKind::InvalidArgument,
            LoaderError::Allocation { .. } => ErrorKind::AllocationFailure,
            LoaderError::ModelFile { .. }
            | LoaderError::Parse(_)
            | LoaderError::MethodMeta { .. }
            | LoaderError::PlannedBufferSize { .. }
            | LoaderError::MethodLoad(_)
            | LoaderError::SetInput { .. }
            | LoaderError::Execution(_)
            | LoaderError::ReadOutput(_) => ErrorKind::External,
        }
    }
}
