// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The arena set handed to a method.

use memory_manager::{BumpAllocator, HierarchicalAllocator};
use std::rc::Rc;

/// Everything a method allocates from.
///
/// - `method` — persistent allocations (constants, unplanned tensors).
/// - `planned` — the buffers of the program's memory plan.
/// - `temp` — kernel scratch, reset around every instruction.
///
/// The allocators are shared with the loader that created them; holding the
/// `Rc`s keeps every span handed out of them valid for as long as the
/// method lives.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    method: Rc<BumpAllocator>,
    planned: HierarchicalAllocator,
    temp: Rc<BumpAllocator>,
}

impl MemoryManager {
    pub fn new(
        method: Rc<BumpAllocator>,
        planned: HierarchicalAllocator,
        temp: Rc<BumpAllocator>,
    ) -> Self {
        Self {
            method,
            planned,
            temp,
        }
    }

    pub fn method_allocator(&self) -> &BumpAllocator {
        &self.method
    }

    pub fn planned_memory(&self) -> &HierarchicalAllocator {
        &self.planned
    }

    pub fn temp_allocator(&self) -> &BumpAllocator {
        &self.temp
    }
}
