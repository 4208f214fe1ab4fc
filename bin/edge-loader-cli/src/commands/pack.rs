// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-loader pack` command: build a program container from JSON.
//!
//! The description is validated before anything is written, so a packed
//! file always loads.

use program_ir::{encode, Program, ProgramDef};
use std::path::PathBuf;

pub fn execute(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&input)
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", input.display()))?;
    let def: ProgramDef = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("invalid program description '{}': {e}", input.display()))?;

    let bytes = encode(&def)?;
    let program = Program::from_def(def)?;

    std::fs::write(&output, &bytes)
        .map_err(|e| anyhow::anyhow!("failed to write '{}': {e}", output.display()))?;
    tracing::info!(path = %output.display(), bytes = bytes.len(), "container written");

    println!("  {}", program.summary());
    println!("  Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
