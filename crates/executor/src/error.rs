// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for method loading and execution.

use memory_manager::MemoryError;
use program_ir::ProgramError;
use tensor_core::TensorError;

/// Errors that can occur while instantiating or running a method.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// An operation was called out of order.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// A caller-supplied value does not match the method's signature.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The program could not answer a query.
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// The method's plan is inconsistent with the memory it was given, or
    /// an instruction's operands do not suit its kernel.
    #[error("invalid program: method '{method}': {detail}")]
    InvalidProgram { method: String, detail: String },

    /// An instruction names an operator no kernel is registered for.
    #[error("operator '{op}' has no registered kernel")]
    OperatorMissing { op: String },

    /// An arena could not satisfy a request.
    #[error("memory allocation failed for {what}: {source}")]
    MemoryAllocationFailed {
        what: String,
        #[source]
        source: MemoryError,
    },

    /// A kernel rejected its operands.
    #[error("kernel '{op}' failed at instruction {pc}: {source}")]
    Kernel {
        op: &'static str,
        pc: usize,
        #[source]
        source: TensorError,
    },
}
