// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-manager
//!
//! Fixed-capacity arenas for hosting a compiled inference program on a
//! memory-constrained device.
//!
//! # Key Components
//!
//! - [`MemoryBudget`] — the byte capacity of a pool, with human-readable
//!   parsing (`"16K"`, `"2K"`, `"1M"`).
//! - [`ArenaRegion`] — the owned, aligned backing block of one pool.
//! - [`BumpAllocator`] — the allocator: aligned, append-only, never frees
//!   individual blocks, tracks bytes consumed.
//! - [`Span`] — a `(pointer, length)` view into arena memory.
//! - [`HierarchicalAllocator`] — the planned-memory arena: one span per
//!   buffer declared by the program's memory plan.
//! - [`AllocationStats`] — per-arena counters (padding, failures, peak).
//!
//! # Arena Set
//!
//! ```text
//!   method pool (16K)                         temp pool (2K)
//!  ┌──────────────────────────────────┐     ┌─────────────────┐
//!  │ planned #0 │ planned #1 │ consts │     │ kernel scratch  │ reset per
//!  └──────────────────────────────────┘     └─────────────────┘ instruction
//!        ▲            ▲
//!        └── HierarchicalAllocator (planned memory)
//! ```
//!
//! # Example
//! ```
//! use memory_manager::{BumpAllocator, HierarchicalAllocator, MemoryBudget};
//!
//! let method = BumpAllocator::new("method", MemoryBudget::parse("1K").unwrap());
//! let spans = vec![
//!     method.allocate_span(64, 16).unwrap(),
//!     method.allocate_span(32, 16).unwrap(),
//! ];
//! let planned = HierarchicalAllocator::new(spans);
//! assert_eq!(planned.total_bytes(), 96);
//! assert_eq!(method.used(), 96);
//! ```

mod budget;
mod bump;
mod error;
mod planned;
mod region;
mod span;
mod stats;

pub use budget::MemoryBudget;
pub use bump::{BumpAllocator, DEFAULT_ALIGNMENT};
pub use error::MemoryError;
pub use planned::HierarchicalAllocator;
pub use region::{ArenaRegion, REGION_ALIGN};
pub use span::Span;
pub use stats::AllocationStats;
