// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Serialized program description (the JSON container body).
//!
//! # Format
//! ```json
//! {
//!   "methods": [
//!     {
//!       "name": "forward",
//!       "planned_buffers": [48],
//!       "values": [
//!         { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 0 } },
//!         { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 16 } },
//!         { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 32 } }
//!       ],
//!       "inputs": [0, 1],
//!       "outputs": [2],
//!       "instructions": [ { "op": "add", "args": [0, 1, 2] } ]
//!     }
//!   ]
//! }
//! ```

use tensor_core::DType;

/// Top-level program description.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ProgramDef {
    pub methods: Vec<MethodDef>,
}

/// One named entry point.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MethodDef {
    pub name: String,
    /// Byte size of each planned buffer, indexed by buffer id.
    #[serde(default)]
    pub planned_buffers: Vec<u64>,
    /// The method's value table.
    pub values: Vec<ValueDef>,
    /// Value indices bound by `set_input`, in input order.
    pub inputs: Vec<usize>,
    /// Value indices read by `get_output`, in output order.
    pub outputs: Vec<usize>,
    #[serde(default)]
    pub instructions: Vec<InstructionDef>,
}

/// A tagged entry in a method's value table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueDef {
    Tensor(TensorDef),
    Int { value: i64 },
    Double { value: f64 },
    Bool { value: bool },
    None,
}

/// A tensor value.
///
/// `mem` places it inside a planned buffer and `data` makes it a constant.
/// A tensor with neither gets its own block from the method arena at load.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorDef {
    pub dtype: DType,
    pub sizes: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_order: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<MemDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<f32>>,
}

/// Placement of a tensor in planned memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemDef {
    pub buffer_id: usize,
    pub offset: u64,
}

/// One kernel invocation; `args` are value indices, output last.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InstructionDef {
    pub op: String,
    pub args: Vec<usize>,
}
