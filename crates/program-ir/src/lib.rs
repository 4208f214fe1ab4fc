// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # program-ir
//!
//! The compiled-program container and its metadata.
//!
//! - [`ProgramDef`] — the serialized program description (JSON body).
//! - [`encode`] / [`decode`] — container framing (magic, version, length).
//! - [`DataLoader`] — where the bytes come from: [`BufferDataLoader`]
//!   (zero-copy over a slice) or [`FileDataLoader`] (memory-mapped file).
//! - [`Program`] — a parsed and validated program.
//! - [`MethodMeta`] — input/output signature and memory plan of one method.
//!
//! # Example
//! ```
//! use program_ir::{encode, BufferDataLoader, Program, ProgramDef};
//!
//! let json = r#"{ "methods": [ {
//!     "name": "forward",
//!     "planned_buffers": [32],
//!     "values": [
//!         { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 0 } },
//!         { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 16 } }
//!     ],
//!     "inputs": [0],
//!     "outputs": [1],
//!     "instructions": [ { "op": "relu", "args": [0, 1] } ]
//! } ] }"#;
//! let def: ProgramDef = serde_json::from_str(json).unwrap();
//! let bytes = encode(&def).unwrap();
//!
//! let program = Program::load(&BufferDataLoader::new(&bytes)).unwrap();
//! let meta = program.method_meta("forward").unwrap();
//! assert_eq!(meta.num_memory_planned_buffers(), 1);
//! assert_eq!(meta.input_tensor_meta(0).unwrap().nbytes(), 4);
//! ```

mod error;
pub mod format;
mod loader;
mod meta;
mod program;
pub mod schema;

pub use error::ProgramError;
pub use format::{decode, encode};
pub use loader::{BufferDataLoader, DataLoader, FileDataLoader};
pub use meta::MethodMeta;
pub use program::{Instruction, MethodPlan, Program, Storage, TensorValue, Value};
pub use schema::ProgramDef;
