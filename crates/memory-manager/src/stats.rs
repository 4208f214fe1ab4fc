// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Allocation statistics for arena sizing.
//!
//! [`AllocationStats`] records how a [`crate::BumpAllocator`] has been used:
//! request counts, bytes requested versus bytes lost to alignment padding,
//! exhaustion events, and the high-water mark. These are the numbers to look
//! at when choosing the method and temp pool sizes for a given model.

/// Cumulative statistics about one arena.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AllocationStats {
    /// Number of successful allocations.
    pub total_allocations: u64,
    /// Number of requests rejected because the arena was exhausted.
    pub failed_allocations: u64,
    /// Sum of the `size` arguments of successful allocations.
    pub requested_bytes: u64,
    /// Bytes skipped to satisfy alignment.
    pub padding_bytes: u64,
    /// Highest cursor offset ever reached.
    pub peak_used_bytes: usize,
    /// Number of times the arena was rewound.
    pub resets: u64,
}

impl AllocationStats {
    pub(crate) fn record_allocation(&mut self, size: usize, padding: usize, used_after: usize) {
        self.total_allocations += 1;
        self.requested_bytes += size as u64;
        self.padding_bytes += padding as u64;
        if used_after > self.peak_used_bytes {
            self.peak_used_bytes = used_after;
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_allocations += 1;
    }

    pub(crate) fn record_reset(&mut self) {
        self.resets += 1;
    }

    /// Fraction of consumed bytes that went to alignment padding.
    ///
    /// Returns `0.0` if nothing has been allocated.
    pub fn padding_ratio(&self) -> f64 {
        let consumed = self.requested_bytes + self.padding_bytes;
        if consumed == 0 {
            return 0.0;
        }
        self.padding_bytes as f64 / consumed as f64
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Allocations: {} ok, {} failed, {} B requested, {} B padding ({:.0}%), \
             peak {} B, {} resets",
            self.total_allocations,
            self.failed_allocations,
            self.requested_bytes,
            self.padding_bytes,
            self.padding_ratio() * 100.0,
            self.peak_used_bytes,
            self.resets,
        )
    }
}
