// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for arena allocation.

/// Errors that can occur while carving memory out of an arena.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// The aligned request does not fit in the remaining arena capacity.
    #[error("out of memory: requested {requested_bytes} bytes (alignment {alignment}), but only {available_bytes} available (capacity: {capacity_bytes})")]
    OutOfMemory {
        requested_bytes: usize,
        alignment: usize,
        available_bytes: usize,
        capacity_bytes: usize,
    },

    /// Attempted to allocate a zero-sized block.
    #[error("cannot allocate zero-sized block")]
    ZeroSizedAllocation,

    /// The requested alignment is not a power of two.
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),

    /// A planned-memory lookup referenced a buffer id that does not exist.
    #[error("planned buffer {buffer_id} does not exist ({num_buffers} buffers available)")]
    UnknownBuffer { buffer_id: usize, num_buffers: usize },

    /// A planned-memory lookup fell outside its buffer.
    #[error("range [{offset}, {offset}+{size}) exceeds planned buffer {buffer_id} of {buffer_len} bytes")]
    OutOfBounds {
        buffer_id: usize,
        offset: usize,
        size: usize,
        buffer_len: usize,
    },

    /// A human-readable size string could not be parsed.
    #[error("invalid pool size: {0}")]
    InvalidBudget(String),
}
