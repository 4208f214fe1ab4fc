// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity, append-only bump allocator.
//!
//! The [`BumpAllocator`] hands out aligned blocks from a single
//! [`ArenaRegion`] by advancing a cursor. Blocks are never freed
//! individually; their lifetime is the lifetime of the allocator, or ends
//! collectively at [`BumpAllocator::reset`].
//!
//! # Accounting
//! [`used`](BumpAllocator::used) is the distance from the region base to the
//! end of the most recent allocation, i.e. every byte consumed including the
//! padding inserted for alignment. Consequently
//! `used() + free() == capacity()` holds after every call, and a request
//! fails exactly when its aligned end would pass the end of the region.
//!
//! # Threading
//! The cursor lives in a [`Cell`], so the allocator can be shared through
//! `Rc` between the program loader and the method's memory manager while
//! staying `!Sync`. Arenas are single-threaded by construction.

use crate::{AllocationStats, ArenaRegion, MemoryBudget, MemoryError, Span};
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

/// Alignment used when the caller does not ask for one.
pub const DEFAULT_ALIGNMENT: usize = std::mem::align_of::<*const u8>();

/// A linear allocator over a fixed region.
///
/// # Example
/// ```
/// use memory_manager::{BumpAllocator, MemoryBudget};
///
/// let arena = BumpAllocator::new("method", MemoryBudget::from_bytes(64));
/// let a = arena.allocate(3, 1).unwrap();
/// let b = arena.allocate(8, 8).unwrap();
/// assert_eq!(b.as_ptr() as usize % 8, 0);
/// assert!(b.as_ptr() as usize >= a.as_ptr() as usize + 3);
/// assert_eq!(arena.used() + arena.free(), arena.capacity());
/// ```
pub struct BumpAllocator {
    label: String,
    region: ArenaRegion,
    /// Offset of the first unused byte, relative to the region base.
    cursor: Cell<usize>,
    stats: RefCell<AllocationStats>,
}

impl BumpAllocator {
    /// Creates an allocator over a freshly acquired region of `budget` bytes.
    ///
    /// `label` only appears in log lines and diagnostics.
    pub fn new(label: impl Into<String>, budget: MemoryBudget) -> Self {
        Self::with_region(label, ArenaRegion::new(budget))
    }

    /// Creates an allocator over an existing region.
    pub fn with_region(label: impl Into<String>, region: ArenaRegion) -> Self {
        let label = label.into();
        tracing::debug!(arena = %label, capacity = region.capacity(), "bump allocator created");
        Self {
            label,
            region,
            cursor: Cell::new(0),
            stats: RefCell::new(AllocationStats::default()),
        }
    }

    /// Allocates `size` bytes aligned to `alignment`.
    ///
    /// The returned block starts at the first address at or after the
    /// cursor that is a multiple of `alignment`. On failure the allocator
    /// state (cursor, [`used`](Self::used)) is left untouched.
    pub fn allocate(&self, size: usize, alignment: usize) -> Result<NonNull<u8>, MemoryError> {
        if !alignment.is_power_of_two() {
            tracing::warn!(arena = %self.label, alignment, "rejected non power-of-two alignment");
            return Err(MemoryError::InvalidAlignment(alignment));
        }
        if size == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }

        let base = self.region.base().as_ptr() as usize;
        let cursor = self.cursor.get();
        let capacity = self.region.capacity();
        let current = base + cursor;

        let fits = align_up(current, alignment)
            .and_then(|start| start.checked_add(size).map(|end| (start, end)))
            .filter(|&(_, end)| end <= base + capacity);

        let Some((start, end)) = fits else {
            self.stats.borrow_mut().record_failure();
            tracing::warn!(
                arena = %self.label,
                size,
                alignment,
                available = capacity - cursor,
                capacity,
                "arena exhausted"
            );
            return Err(MemoryError::OutOfMemory {
                requested_bytes: size,
                alignment,
                available_bytes: capacity - cursor,
                capacity_bytes: capacity,
            });
        };

        let padding = start - current;
        let new_cursor = end - base;
        self.cursor.set(new_cursor);
        self.stats
            .borrow_mut()
            .record_allocation(size, padding, new_cursor);

        // SAFETY: start - base < capacity, so the pointer is inside the region.
        let ptr = unsafe { NonNull::new_unchecked(self.region.base().as_ptr().add(start - base)) };
        tracing::trace!(arena = %self.label, size, alignment, padding, used = new_cursor, "allocated");
        Ok(ptr)
    }

    /// Allocates with [`DEFAULT_ALIGNMENT`].
    pub fn allocate_default(&self, size: usize) -> Result<NonNull<u8>, MemoryError> {
        self.allocate(size, DEFAULT_ALIGNMENT)
    }

    /// Allocates and wraps the result in a [`Span`] of `size` bytes.
    pub fn allocate_span(&self, size: usize, alignment: usize) -> Result<Span, MemoryError> {
        let ptr = self.allocate(size, alignment)?;
        // SAFETY: `allocate` returned `size` in-bounds bytes.
        Ok(unsafe { Span::from_raw_parts(ptr, size) })
    }

    /// Rewinds the cursor to the start of the region.
    ///
    /// Every block previously handed out becomes reusable; callers must not
    /// touch them afterwards.
    pub fn reset(&self) {
        self.cursor.set(0);
        self.stats.borrow_mut().record_reset();
    }

    /// Bytes consumed so far, alignment padding included.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes still available (before alignment of the next request).
    pub fn free(&self) -> usize {
        self.region.capacity() - self.cursor.get()
    }

    /// Total size of the backing region.
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    /// Returns `true` if `ptr` lies inside the backing region.
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.region.contains(ptr)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns a snapshot of the allocation statistics.
    pub fn stats(&self) -> AllocationStats {
        self.stats.borrow().clone()
    }
}

/// Rounds `addr` up to the next multiple of `align` (a power of two).
fn align_up(addr: usize, align: usize) -> Option<usize> {
    addr.checked_add(align - 1).map(|v| v & !(align - 1))
}

impl std::fmt::Debug for BumpAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BumpAllocator")
            .field("label", &self.label)
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .field("free", &self.free())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(bytes: usize) -> BumpAllocator {
        BumpAllocator::new("test", MemoryBudget::from_bytes(bytes))
    }

    #[test]
    fn test_sequential_allocations() {
        let a = arena(64);
        let p1 = a.allocate(16, 8).unwrap();
        let p2 = a.allocate(16, 8).unwrap();
        assert_eq!(p2.as_ptr() as usize - p1.as_ptr() as usize, 16);
        assert_eq!(a.used(), 32);
        assert_eq!(a.free(), 32);
    }

    #[test]
    fn test_alignment_padding() {
        let a = arena(64);
        a.allocate(3, 1).unwrap();
        let p = a.allocate(4, 16).unwrap();
        assert_eq!(p.as_ptr() as usize % 16, 0);
        // 3 bytes, then 13 bytes of padding, then 4 bytes.
        assert_eq!(a.used(), 20);
        let stats = a.stats();
        assert_eq!(stats.requested_bytes, 7);
        assert_eq!(stats.padding_bytes, 13);
    }

    #[test]
    fn test_used_plus_free_is_capacity() {
        let a = arena(100);
        for (size, align) in [(1, 1), (7, 4), (9, 8), (2, 2), (13, 16)] {
            a.allocate(size, align).unwrap();
            assert_eq!(a.used() + a.free(), a.capacity());
        }
    }

    #[test]
    fn test_exhaustion_leaves_state_unchanged() {
        let a = arena(32);
        a.allocate(24, 8).unwrap();
        let used = a.used();

        let err = a.allocate(16, 8).unwrap_err();
        assert!(matches!(
            err,
            MemoryError::OutOfMemory {
                requested_bytes: 16,
                available_bytes: 8,
                capacity_bytes: 32,
                ..
            }
        ));
        assert_eq!(a.used(), used);
        assert_eq!(a.stats().failed_allocations, 1);

        // The remaining 8 bytes are still usable.
        a.allocate(8, 8).unwrap();
        assert_eq!(a.free(), 0);
    }

    #[test]
    fn test_padding_can_cause_exhaustion() {
        let a = arena(16);
        a.allocate(1, 1).unwrap();
        // 15 bytes remain, but aligning to 16 would start at the end.
        assert!(a.allocate(1, 16).is_err());
        assert!(a.allocate(15, 1).is_ok());
    }

    #[test]
    fn test_exact_fit() {
        let a = arena(48);
        a.allocate(48, 16).unwrap();
        assert_eq!(a.free(), 0);
        assert!(a.allocate(1, 1).is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let a = arena(16);
        assert_eq!(a.allocate(0, 8), Err(MemoryError::ZeroSizedAllocation));
        assert_eq!(a.used(), 0);
    }

    #[test]
    fn test_invalid_alignment_rejected() {
        let a = arena(16);
        assert_eq!(a.allocate(4, 3), Err(MemoryError::InvalidAlignment(3)));
        assert_eq!(a.allocate(4, 0), Err(MemoryError::InvalidAlignment(0)));
    }

    #[test]
    fn test_default_alignment() {
        let a = arena(64);
        a.allocate(1, 1).unwrap();
        let p = a.allocate_default(4).unwrap();
        assert_eq!(p.as_ptr() as usize % DEFAULT_ALIGNMENT, 0);
    }

    #[test]
    fn test_disjoint_regions() {
        let a = arena(256);
        let mut spans = Vec::new();
        for (i, align) in [1usize, 2, 4, 8, 16, 32].iter().cycle().take(12).enumerate() {
            let s = a.allocate_span(i + 1, *align).unwrap();
            assert_eq!(s.as_ptr() as usize % align, 0);
            assert!(a.contains(s.as_ptr()));
            spans.push(s);
        }
        for (i, x) in spans.iter().enumerate() {
            for y in &spans[i + 1..] {
                assert!(!x.overlaps(y));
            }
        }
    }

    #[test]
    fn test_reset() {
        let a = arena(32);
        let first = a.allocate(32, 1).unwrap();
        a.reset();
        assert_eq!(a.used(), 0);
        let again = a.allocate(32, 1).unwrap();
        assert_eq!(first, again);
        let stats = a.stats();
        assert_eq!(stats.resets, 1);
        assert_eq!(stats.peak_used_bytes, 32);
    }

    #[test]
    fn test_debug_format() {
        let a = arena(16);
        let debug = format!("{a:?}");
        assert!(debug.contains("BumpAllocator"));
        assert!(debug.contains("test"));
    }
}
