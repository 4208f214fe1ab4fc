// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Raw `(pointer, length)` views into arena memory.

use std::ptr::NonNull;

/// A contiguous byte range inside an [`crate::ArenaRegion`].
///
/// A `Span` does not own or borrow its memory in the type system: the
/// arena it came from is kept alive by whoever holds the span (the method's
/// memory manager holds `Rc`s to its allocators). Reading or writing through
/// a span is therefore `unsafe` and the caller must guarantee both liveness
/// and exclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    ptr: NonNull<u8>,
    len: usize,
}

impl Span {
    /// Builds a span from raw parts.
    ///
    /// # Safety
    /// `ptr..ptr+len` must lie inside a single live allocation.
    pub unsafe fn from_raw_parts(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the sub-range `[offset, offset + size)`, or `None` if it does
    /// not fit.
    pub fn subspan(&self, offset: usize, size: usize) -> Option<Span> {
        let end = offset.checked_add(size)?;
        if end > self.len {
            return None;
        }
        // SAFETY: offset <= len, so the pointer stays inside the allocation.
        let ptr = unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset)) };
        Some(Span { ptr, len: size })
    }

    /// Returns `true` if the two spans share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        let a = self.ptr.as_ptr() as usize;
        let b = other.ptr.as_ptr() as usize;
        a < b + other.len && b < a + self.len
    }

    /// Views the span as a byte slice.
    ///
    /// # Safety
    /// The backing arena must outlive `'a` and no mutable view of an
    /// overlapping range may exist for `'a`.
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        std::slice::from_raw_parts(self.ptr.as_ptr(), self.len)
    }

    /// Views the span as a mutable byte slice.
    ///
    /// # Safety
    /// The backing arena must outlive `'a` and no other view of an
    /// overlapping range may exist for `'a`.
    pub unsafe fn as_mut_slice<'a>(&self) -> &'a mut [u8] {
        std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len)
    }
}
