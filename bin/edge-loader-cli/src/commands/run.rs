// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-loader run` command: load a program and run one inference.
//!
//! Walks the loader through its lifecycle:
//! ```text
//! Uninitialized → initialize → Initialized → load_program → Loaded → run
//! ```

use runtime::{LoaderConfig, ProgramLoader};
use std::path::PathBuf;

pub fn execute(
    config_path: Option<PathBuf>,
    model: Option<PathBuf>,
    method: Option<String>,
    inputs: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    // ── Configuration ──────────────────────────────────────────
    let mut config = match &config_path {
        Some(path) => LoaderConfig::from_file(path)?,
        None => LoaderConfig::default(),
    };
    if model.is_some() {
        config.model_path = model;
    }
    if let Some(method) = method {
        config.method_name = method;
    }

    let inputs = inputs
        .iter()
        .map(|s| super::parse_values(s))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let inputs = if inputs.is_empty() {
        tracing::info!("no inputs given, using the add demo inputs [2] and [3]");
        vec![vec![2.0], vec![3.0]]
    } else {
        inputs
    };
    config.num_inputs = inputs.len();

    if !json {
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║            edge-loader · Inference Runner           ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        println!("  Config:");
        println!(
            "   Model:    {}",
            config
                .model_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<bundled add model>".to_string())
        );
        println!("   Method:   {}", config.method_name);
        println!("   Pools:    method {}, temp {}", config.method_pool, config.temp_pool);
        println!();
    }

    // ── Lifecycle ──────────────────────────────────────────────
    let mut loader = ProgramLoader::new(config)?;
    loader.initialize();
    loader.load_program()?;

    let meta = loader.method_meta()?;
    // A non-tensor output is reported by the run itself.
    let output_len = meta.output_tensor_meta(0).map(|t| t.numel()).unwrap_or(0);
    if !json {
        println!("  Method: {meta}");
        println!();
    }

    let mut output = vec![0.0f32; output_len];
    let views: Vec<&[f32]> = inputs.iter().map(Vec::as_slice).collect();
    let written = loader.run(&views, &mut output)?;
    output.truncate(written);

    // ── Results ────────────────────────────────────────────────
    if json {
        let report = serde_json::json!({
            "inputs": inputs,
            "output": output,
            "metrics": loader.last_metrics(),
            "arenas": loader.arena_report(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, values) in inputs.iter().enumerate() {
        println!("  Input {i}:  {values:?}");
    }
    println!("  Output:   {output:?}");
    println!();

    if let Some(metrics) = loader.last_metrics() {
        println!("  {}", metrics.summary());
        println!();
    }
    if let Some(report) = loader.arena_report() {
        println!("  Arenas:");
        for line in report.to_string().lines() {
            println!("   {line}");
        }
        println!();
    }

    Ok(())
}
