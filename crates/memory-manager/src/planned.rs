// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Planned memory: the buffers a compiled program's memory plan asks for.
//!
//! A program declares `N` planned buffers and their sizes. The loader
//! carves one [`Span`] per buffer out of the method arena and hands the
//! ordered list to a [`HierarchicalAllocator`]. The method then resolves
//! each tensor's `(buffer_id, offset)` placement against it.

use crate::{MemoryError, Span};
use std::ptr::NonNull;

/// An ordered set of planned buffers addressed by buffer id.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalAllocator {
    buffers: Vec<Span>,
}

impl HierarchicalAllocator {
    /// Wraps the given spans; buffer id `i` is `buffers[i]`.
    pub fn new(buffers: Vec<Span>) -> Self {
        Self { buffers }
    }

    pub fn num_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Sizes of all planned buffers, in buffer-id order.
    pub fn buffer_sizes(&self) -> Vec<usize> {
        self.buffers.iter().map(Span::len).collect()
    }

    /// Sum of all planned buffer sizes.
    pub fn total_bytes(&self) -> usize {
        self.buffers.iter().map(Span::len).sum()
    }

    /// Returns the span of `size` bytes at `offset` inside buffer `buffer_id`.
    pub fn get_offset_span(
        &self,
        buffer_id: usize,
        offset: usize,
        size: usize,
    ) -> Result<Span, MemoryError> {
        let buffer = self
            .buffers
            .get(buffer_id)
            .ok_or(MemoryError::UnknownBuffer {
                buffer_id,
                num_buffers: self.buffers.len(),
            })?;

        buffer
            .subspan(offset, size)
            .ok_or(MemoryError::OutOfBounds {
                buffer_id,
                offset,
                size,
                buffer_len: buffer.len(),
            })
    }

    /// Returns the address of `offset` inside buffer `buffer_id`, checking
    /// that `size` bytes starting there fit in the buffer.
    pub fn get_offset_address(
        &self,
        buffer_id: usize,
        offset: usize,
        size: usize,
    ) -> Result<NonNull<u8>, MemoryError> {
        let span = self.get_offset_span(buffer_id, offset, size)?;
        // SAFETY: spans are built from non-null arena pointers.
        Ok(unsafe { NonNull::new_unchecked(span.as_ptr()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BumpAllocator, MemoryBudget};

    fn planned(sizes: &[usize]) -> (BumpAllocator, HierarchicalAllocator) {
        let arena = BumpAllocator::new("method", MemoryBudget::from_bytes(256));
        let spans = sizes
            .iter()
            .map(|&s| arena.allocate_span(s, 16).unwrap())
            .collect();
        (arena, HierarchicalAllocator::new(spans))
    }

    #[test]
    fn test_buffer_sizes() {
        let (_arena, p) = planned(&[16, 32]);
        assert_eq!(p.num_buffers(), 2);
        assert_eq!(p.buffer_sizes(), vec![16, 32]);
        assert_eq!(p.total_bytes(), 48);
    }

    #[test]
    fn test_offset_resolution() {
        let (arena, p) = planned(&[16, 32]);
        let base1 = p.get_offset_address(1, 0, 32).unwrap();
        let inner = p.get_offset_address(1, 8, 4).unwrap();
        assert_eq!(inner.as_ptr() as usize - base1.as_ptr() as usize, 8);
        assert!(arena.contains(inner.as_ptr()));
    }

    #[test]
    fn test_unknown_buffer() {
        let (_arena, p) = planned(&[16]);
        assert_eq!(
            p.get_offset_span(3, 0, 4),
            Err(MemoryError::UnknownBuffer {
                buffer_id: 3,
                num_buffers: 1
            })
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let (_arena, p) = planned(&[16]);
        assert!(matches!(
            p.get_offset_span(0, 12, 8),
            Err(MemoryError::OutOfBounds { buffer_len: 16, .. })
        ));
        assert!(p.get_offset_span(0, 12, 4).is_ok());
    }

    #[test]
    fn test_empty() {
        let p = HierarchicalAllocator::default();
        assert_eq!(p.num_buffers(), 0);
        assert_eq!(p.total_bytes(), 0);
    }
}
