// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-loader inspect` command: display the methods of a program.
//!
//! Prints each method's signature, value table and instruction stream,
//! plus the planned memory it will take from the method arena.

use memory_manager::MemoryBudget;
use program_ir::{
    BufferDataLoader, DataLoader, FileDataLoader, MethodPlan, Program, Storage, Value,
};
use std::path::PathBuf;

pub fn execute(model: Option<PathBuf>) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            edge-loader · Program Inspector          ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let program = match &model {
        Some(path) => {
            let data = FileDataLoader::open(path).map_err(|e| {
                anyhow::anyhow!("failed to open program '{}': {e}", path.display())
            })?;
            println!("  File: {} ({} bytes)", path.display(), data.size());
            Program::load(&data)?
        }
        None => {
            let data = BufferDataLoader::new(runtime::ADD_MODEL);
            println!("  File: <bundled add model> ({} bytes)", data.size());
            Program::load(&data)?
        }
    };
    println!("  {}", program.summary());
    println!();

    let names: Vec<String> = program.method_names().map(str::to_string).collect();
    for name in &names {
        let plan = program.method(name)?;
        let meta = program.method_meta(name)?;

        // ── Signature ──────────────────────────────────────────
        println!("  Method '{name}'");
        for i in 0..meta.num_inputs() {
            let info = meta.input_tensor_meta(i)?;
            println!("   input  {i}: {} {} ({} B)", info.dtype(), info.shape(), info.nbytes());
        }
        for i in 0..meta.num_outputs() {
            let info = meta.output_tensor_meta(i)?;
            println!("   output {i}: {} {} ({} B)", info.dtype(), info.shape(), info.nbytes());
        }

        // ── Memory Plan ────────────────────────────────────────
        let planned: usize = plan.planned_buffers.iter().sum();
        println!(
            "   planned memory: {} buffer(s) {:?}, {}",
            meta.num_memory_planned_buffers(),
            plan.planned_buffers,
            MemoryBudget::from_bytes(planned),
        );
        println!();

        print_values(plan);
        print_instructions(plan);
    }

    Ok(())
}

fn print_values(plan: &MethodPlan) {
    println!(
        "   {:<4} {:<8} {:<6} {:<14} {:<14} {}",
        "Idx", "Type", "DType", "Shape", "Strides", "Storage"
    );
    println!("   {}", "-".repeat(72));
    for (i, value) in plan.values.iter().enumerate() {
        println!("{}", value_row(i, value));
    }
    println!();
}

/// One row of the value table.
fn value_row(index: usize, value: &Value) -> String {
    let Value::Tensor(t) = value else {
        return format!("   {:<4} {}", index, value.tag());
    };
    let storage = match &t.storage {
        Storage::Planned { buffer_id, offset } => format!("planned #{buffer_id} @ {offset}"),
        Storage::Constant(data) => format!("constant ({} values)", data.len()),
        Storage::Arena => "arena".to_string(),
    };
    format!(
        "   {:<4} {:<8} {:<6} {:<14} {:<14} {}",
        index,
        value.tag().to_string(),
        t.info.dtype().to_string(),
        t.info.shape().to_string(),
        format!("{:?}", t.info.shape().strides()),
        storage,
    )
}

fn print_instructions(plan: &MethodPlan) {
    println!("   Instructions:");
    if plan.instructions.is_empty() {
        println!("    (none)");
    }
    for (pc, instr) in plan.instructions.iter().enumerate() {
        println!("    {pc:>3}: {:<6} {:?}", instr.op, instr.args);
    }
    println!();
}
