// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inference profiling metrics and arena usage reports.
//!
//! [`InferenceMetrics`] times the phases of one inference call.
//! [`ArenaReport`] snapshots how full the method and temp arenas are; it is
//! the tool for sizing `method_pool` and `temp_pool` for a given model.

use memory_manager::{AllocationStats, BumpAllocator};
use std::fmt;
use std::time::Duration;

/// Timing of a single inference call.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct InferenceMetrics {
    /// Time spent validating and binding inputs.
    pub bind_duration: Duration,
    /// Time spent in `Method::execute`.
    pub execute_duration: Duration,
    /// Time spent checking and copying the output.
    pub readback_duration: Duration,
    /// Wall-clock time of the whole call.
    pub total_duration: Duration,
    /// Elements copied into the caller's output buffer.
    pub output_elements: usize,
    /// Temp arena high-water mark after the call.
    pub temp_peak_bytes: usize,
    /// Sequence number of the call since the method was loaded (1-based).
    pub call_index: u64,
}

impl InferenceMetrics {
    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Inference #{}: {:.3}ms total ({:.3}ms bind, {:.3}ms execute, {:.3}ms readback), \
             {} output element(s), temp peak {} B",
            self.call_index,
            self.total_duration.as_secs_f64() * 1000.0,
            self.bind_duration.as_secs_f64() * 1000.0,
            self.execute_duration.as_secs_f64() * 1000.0,
            self.readback_duration.as_secs_f64() * 1000.0,
            self.output_elements,
            self.temp_peak_bytes,
        )
    }
}

/// Usage of one arena.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ArenaUsage {
    pub label: String,
    pub used: usize,
    pub free: usize,
    pub capacity: usize,
    pub stats: AllocationStats,
}

impl ArenaUsage {
    pub fn of(arena: &BumpAllocator) -> Self {
        Self {
            label: arena.label().to_string(),
            used: arena.used(),
            free: arena.free(),
            capacity: arena.capacity(),
            stats: arena.stats(),
        }
    }

    /// Used fraction of the capacity, in percent.
    pub fn utilisation(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.used as f64 / self.capacity as f64 * 100.0
    }
}

impl fmt::Display for ArenaUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} {:>6} / {:>6} B used ({:.1}%), {} B free, peak {} B, {} failed",
            self.label,
            self.used,
            self.capacity,
            self.utilisation(),
            self.free,
            self.stats.peak_used_bytes,
            self.stats.failed_allocations,
        )
    }
}

/// Snapshot of the whole arena set.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ArenaReport {
    pub method: ArenaUsage,
    pub temp: ArenaUsage,
    /// Sizes of the planned buffers of the loaded method, if any.
    pub planned_buffers: Vec<usize>,
}

impl fmt::Display for ArenaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.temp)?;
        write!(
            f,
            "planned {} buffer(s), {} B {:?}",
            self.planned_buffers.len(),
            self.planned_buffers.iter().sum::<usize>(),
            self.planned_buffers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_manager::MemoryBudget;

    #[test]
    fn test_summary_format() {
        let m = InferenceMetrics {
            total_duration: Duration::from_micros(1500),
            output_elements: 1,
            call_index: 3,
            ..Default::default()
        };
        let s = m.summary();
        assert!(s.starts_with("Inference #3"));
        assert!(s.contains("1.500ms total"));
        assert!(s.contains("1 output element(s)"));
    }

    #[test]
    fn test_arena_usage() {
        let arena = BumpAllocator::new("method", MemoryBudget::from_bytes(200));
        arena.allocate(50, 1).unwrap();
        let usage = ArenaUsage::of(&arena);
        assert_eq!(usage.used, 50);
        assert_eq!(usage.free, 150);
        assert!((usage.utilisation() - 25.0).abs() < 1e-9);
        assert!(usage.to_string().contains("50 /    200 B used"));
    }

    #[test]
    fn test_report_display() {
        let method = BumpAllocator::new("method", MemoryBudget::from_bytes(64));
        let temp = BumpAllocator::new("temp", MemoryBudget::from_bytes(16));
        let report = ArenaReport {
            method: ArenaUsage::of(&method),
            temp: ArenaUsage::of(&temp),
            planned_buffers: vec![48, 16],
        };
        let text = report.to_string();
        assert!(text.contains("planned 2 buffer(s), 64 B"));
        assert!(text.contains("temp"));
    }
}
