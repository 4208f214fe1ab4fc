// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for program parsing and metadata queries.

/// Errors that can occur while loading or inspecting a program.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// A file-backed data loader could not open or map its file.
    #[error("failed to read program file: {0}")]
    Io(#[from] std::io::Error),

    /// A data loader was asked for bytes it does not have.
    #[error("data loader read out of range: offset {offset} + {size} bytes exceeds {available}")]
    ReadOutOfRange {
        offset: usize,
        size: usize,
        available: usize,
    },

    /// The container does not start with the expected magic.
    #[error("not a program container (bad magic {found:02x?})")]
    BadMagic { found: Vec<u8> },

    /// The container was produced for a different format version.
    #[error("unsupported container version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The container is shorter than its header claims.
    #[error("truncated container: header declares {declared} body bytes, {available} available")]
    Truncated { declared: usize, available: usize },

    /// The body is not a valid program description.
    #[error("failed to parse program body: {0}")]
    Body(#[from] serde_json::Error),

    /// The program is well-formed JSON but internally inconsistent.
    #[error("invalid program: method '{method}': {detail}")]
    InvalidProgram { method: String, detail: String },

    /// No method with the requested name exists.
    #[error("method '{0}' not found in program")]
    MethodNotFound(String),

    /// A metadata query used an index past the end of its list.
    #[error("{what} index {index} out of range (method has {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl ProgramError {
    pub(crate) fn invalid(method: &str, detail: impl Into<String>) -> Self {
        ProgramError::InvalidProgram {
            method: method.to_string(),
            detail: detail.into(),
        }
    }
}
