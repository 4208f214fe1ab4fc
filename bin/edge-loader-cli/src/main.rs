// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # edge-loader
//!
//! Command-line interface for the edge program loader.
//!
//! ## Usage
//! ```bash
//! # Run the bundled add model: prints 5
//! edge-loader run --input 2 --input 3
//!
//! # Run a program file with a TOML configuration
//! edge-loader --config loader.toml run --model ./models/add.pte -i 1.5 -i 2.5
//!
//! # Inspect a program container
//! edge-loader inspect --model ./models/add.pte
//!
//! # Package a JSON program description into a container
//! edge-loader pack --input ./models/add.json --output ./models/add.pte
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "edge-loader",
    about = "Arena-backed loader and runner for compiled inference programs",
    version,
    author
)]
struct Cli {
    /// Path to a TOML loader configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a program and run one inference.
    Run {
        /// Program container; the bundled add model when omitted.
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Entry point to run (overrides the configuration).
        #[arg(long)]
        method: Option<String>,

        /// One input tensor as comma-separated values; repeat per input.
        #[arg(short, long = "input", value_name = "VALUES")]
        inputs: Vec<String>,

        /// Print the result, metrics and arena report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the methods, signatures and memory plans of a program.
    Inspect {
        /// Program container; the bundled add model when omitted.
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Encode a JSON program description into a program container.
    Pack {
        /// JSON program description.
        #[arg(short, long)]
        input: PathBuf,

        /// Destination container file.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            model,
            method,
            inputs,
            json,
        } => commands::run::execute(cli.config, model, method, inputs, json),
        Commands::Inspect { model } => commands::inspect::execute(model),
        Commands::Pack { input, output } => commands::pack::execute(input, output),
    }
}
