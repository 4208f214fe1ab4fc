// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-size backing storage for an arena.

use crate::MemoryBudget;
use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Alignment of every region's base address.
///
/// Large enough for any tensor element type and for cache-line aligned
/// planned buffers, so allocation results do not depend on where the
/// global allocator happened to place the region.
pub const REGION_ALIGN: usize = 64;

/// An owned, zero-initialised block of memory that an arena carves up.
///
/// Acquired once from the global allocator and released on drop. It plays
/// the role of the statically sized pool arrays an embedded build would
/// place in `.bss`.
pub struct ArenaRegion {
    base: NonNull<u8>,
    capacity: usize,
    layout: Layout,
}

impl ArenaRegion {
    /// Acquires a zeroed region of `budget` bytes.
    ///
    /// Failure to obtain the memory is not recoverable: it is routed to
    /// [`std::alloc::handle_alloc_error`], which aborts the process.
    pub fn new(budget: MemoryBudget) -> Self {
        let capacity = budget.as_bytes();
        // A zero-byte layout is not allowed by the global allocator.
        let layout = Layout::from_size_align(capacity.max(1), REGION_ALIGN)
            .unwrap_or_else(|_| alloc::handle_alloc_error(Layout::new::<u8>()));

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let base = match NonNull::new(raw) {
            Some(p) => p,
            None => alloc::handle_alloc_error(layout),
        };

        tracing::trace!(capacity, base = ?base, "arena region acquired");
        Self {
            base,
            capacity,
            layout,
        }
    }

    /// Returns the first byte of the region.
    pub fn base(&self) -> NonNull<u8> {
        self.base
    }

    /// Returns the usable size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `ptr` points inside this region.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let start = self.base.as_ptr() as usize;
        let addr = ptr as usize;
        addr >= start && addr < start + self.capacity
    }
}

impl Drop for ArenaRegion {
    fn drop(&mut self) {
        tracing::trace!(capacity = self.capacity, "arena region released");
        // SAFETY: `base` was returned by `alloc_zeroed` with exactly `layout`.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) };
    }
}

impl std::fmt::Debug for ArenaRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaRegion")
            .field("base", &self.base)
            .field("capacity", &self.capacity)
            .finish()
    }
}
