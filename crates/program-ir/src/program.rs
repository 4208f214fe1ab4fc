// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Parsed, validated programs.
//!
//! [`Program::load`] reads a container through a [`DataLoader`], parses
//! the body and checks every method before returning. Anything holding a
//! `Program` can therefore index values, buffers and instructions without
//! re-checking bounds.

use crate::format::{Header, HEADER_LEN};
use crate::schema::{MethodDef, TensorDef, ValueDef};
use crate::{DataLoader, MethodMeta, ProgramDef, ProgramError};
use std::collections::HashSet;
use std::fmt;
use tensor_core::{DType, Shape, Tag, TensorInfo, MAX_RANK};

// ── Validated IR ───────────────────────────────────────────────────

/// Where a tensor's bytes live once its method is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    /// Inside planned buffer `buffer_id` at byte `offset`.
    Planned { buffer_id: usize, offset: usize },
    /// Constant values, copied into the method arena at load.
    Constant(Vec<f32>),
    /// A dedicated block from the method arena.
    Arena,
}

/// A tensor entry of a method's value table.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    pub info: TensorInfo,
    pub storage: Storage,
}

/// A validated value table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Int(i64),
    Double(f64),
    Bool(bool),
    Tensor(TensorValue),
}

impl Value {
    pub fn tag(&self) -> Tag {
        match self {
            Value::None => Tag::None,
            Value::Int(_) => Tag::Int,
            Value::Double(_) => Tag::Double,
            Value::Bool(_) => Tag::Bool,
            Value::Tensor(_) => Tag::Tensor,
        }
    }

    pub fn as_tensor(&self) -> Option<&TensorValue> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }
}

/// One kernel invocation; `args` index the value table, output last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: String,
    pub args: Vec<usize>,
}

/// A validated method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodPlan {
    pub name: String,
    pub planned_buffers: Vec<usize>,
    pub values: Vec<Value>,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
    pub instructions: Vec<Instruction>,
}

// ── Program ────────────────────────────────────────────────────────

/// An immutable, validated program.
#[derive(Debug, Clone)]
pub struct Program {
    methods: Vec<MethodPlan>,
}

impl Program {
    /// Reads, parses and validates a container.
    ///
    /// # Errors
    /// - [`ProgramError::Truncated`], [`ProgramError::BadMagic`] or
    ///   [`ProgramError::UnsupportedVersion`] for a malformed header.
    /// - [`ProgramError::Body`] if the body is not a program description.
    /// - [`ProgramError::InvalidProgram`] if a method is inconsistent.
    pub fn load(loader: &dyn DataLoader) -> Result<Self, ProgramError> {
        let available = loader.size();
        if available < HEADER_LEN {
            return Err(ProgramError::Truncated {
                declared: HEADER_LEN,
                available,
            });
        }
        let header = Header::parse(loader.load(0, HEADER_LEN)?)?;
        let body = loader
            .load(HEADER_LEN, header.body_len)
            .map_err(|_| ProgramError::Truncated {
                declared: header.body_len,
                available: available - HEADER_LEN,
            })?;

        let def: ProgramDef = serde_json::from_slice(body)?;
        let program = Self::from_def(def)?;
        tracing::info!(
            version = header.version,
            body_bytes = header.body_len,
            methods = program.num_methods(),
            "program loaded"
        );
        Ok(program)
    }

    /// Validates an in-memory description.
    pub fn from_def(def: ProgramDef) -> Result<Self, ProgramError> {
        let mut seen = HashSet::new();
        let mut methods = Vec::with_capacity(def.methods.len());
        for method in def.methods {
            if !seen.insert(method.name.clone()) {
                return Err(ProgramError::invalid(&method.name, "duplicate method name"));
            }
            methods.push(validate_method(method)?);
        }
        if methods.is_empty() {
            return Err(ProgramError::invalid("<program>", "program declares no methods"));
        }
        Ok(Self { methods })
    }

    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name.as_str())
    }

    /// Returns the validated plan of method `name`.
    pub fn method(&self, name: &str) -> Result<&MethodPlan, ProgramError> {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ProgramError::MethodNotFound(name.to_string()))
    }

    /// Returns the metadata of method `name`.
    pub fn method_meta(&self, name: &str) -> Result<MethodMeta<'_>, ProgramError> {
        self.method(name).map(MethodMeta::new)
    }

    /// Returns a one-line summary string.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.method_names().collect();
        format!("Program: {} method(s) [{}]", self.num_methods(), names.join(", "))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for m in &self.methods {
            let meta = MethodMeta::new(m);
            writeln!(f, "  {meta}")?;
        }
        Ok(())
    }
}

// ── Validation ─────────────────────────────────────────────────────

fn validate_method(def: MethodDef) -> Result<MethodPlan, ProgramError> {
    let name = def.name;

    let mut planned_buffers = Vec::with_capacity(def.planned_buffers.len());
    for (id, &size) in def.planned_buffers.iter().enumerate() {
        let size = usize::try_from(size)
            .map_err(|_| ProgramError::invalid(&name, format!("planned buffer {id} is too large")))?;
        if size == 0 {
            return Err(ProgramError::invalid(&name, format!("planned buffer {id} has zero size")));
        }
        planned_buffers.push(size);
    }

    let values = def
        .values
        .into_iter()
        .enumerate()
        .map(|(i, v)| validate_value(&name, i, v, &planned_buffers))
        .collect::<Result<Vec<_>, _>>()?;

    let check_tensor_index = |what: &str, idx: usize| -> Result<(), ProgramError> {
        match values.get(idx) {
            None => Err(ProgramError::invalid(
                &name,
                format!("{what} refers to value {idx}, table has {}", values.len()),
            )),
            Some(v) if v.as_tensor().is_none() => Err(ProgramError::invalid(
                &name,
                format!("{what} value {idx} is a {}, not a tensor", v.tag()),
            )),
            Some(_) => Ok(()),
        }
    };

    for &idx in &def.inputs {
        check_tensor_index("input", idx)?;
    }
    // Outputs may be any value; callers check the tag when reading them.
    if let Some(&bad) = def.outputs.iter().find(|&&idx| idx >= values.len()) {
        return Err(ProgramError::invalid(
            &name,
            format!("output refers to value {bad}, table has {}", values.len()),
        ));
    }

    let mut instructions = Vec::with_capacity(def.instructions.len());
    for (pc, ins) in def.instructions.into_iter().enumerate() {
        if ins.args.is_empty() {
            return Err(ProgramError::invalid(&name, format!("instruction {pc} ({}) has no arguments", ins.op)));
        }
        if let Some(&bad) = ins.args.iter().find(|&&a| a >= values.len()) {
            return Err(ProgramError::invalid(
                &name,
                format!("instruction {pc} ({}) refers to value {bad}, table has {}", ins.op, values.len()),
            ));
        }
        instructions.push(Instruction {
            op: ins.op,
            args: ins.args,
        });
    }

    Ok(MethodPlan {
        name,
        planned_buffers,
        values,
        inputs: def.inputs,
        outputs: def.outputs,
        instructions,
    })
}

fn validate_value(
    method: &str,
    index: usize,
    def: ValueDef,
    planned_buffers: &[usize],
) -> Result<Value, ProgramError> {
    Ok(match def {
        ValueDef::None => Value::None,
        ValueDef::Int { value } => Value::Int(value),
        ValueDef::Double { value } => Value::Double(value),
        ValueDef::Bool { value } => Value::Bool(value),
        ValueDef::Tensor(t) => Value::Tensor(validate_tensor(method, index, t, planned_buffers)?),
    })
}

fn validate_tensor(
    method: &str,
    index: usize,
    def: TensorDef,
    planned_buffers: &[usize],
) -> Result<TensorValue, ProgramError> {
    if def.sizes.len() > MAX_RANK {
        return Err(ProgramError::invalid(
            method,
            format!("value {index}: rank {} exceeds {MAX_RANK}", def.sizes.len()),
        ));
    }
    // Element count and byte size must both be representable.
    def.sizes
        .iter()
        .try_fold(def.dtype.size_bytes(), |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| ProgramError::invalid(method, format!("value {index}: size overflows")))?;

    let shape = match def.dim_order {
        Some(order) => Shape::with_dim_order(def.sizes, order)
            .map_err(|e| ProgramError::invalid(method, format!("value {index}: {e}")))?,
        None => Shape::contiguous(def.sizes),
    };
    let info = TensorInfo::new(def.dtype, shape);
    let nbytes = info.nbytes();

    let storage = match (def.mem, def.data) {
        (Some(_), Some(_)) => {
            return Err(ProgramError::invalid(
                method,
                format!("value {index} is both planned and constant"),
            ))
        }
        (Some(mem), None) => {
            let size = planned_buffers.get(mem.buffer_id).copied().ok_or_else(|| {
                ProgramError::invalid(
                    method,
                    format!(
                        "value {index} placed in buffer {}, method has {}",
                        mem.buffer_id,
                        planned_buffers.len()
                    ),
                )
            })?;
            let offset = usize::try_from(mem.offset).unwrap_or(usize::MAX);
            let fits = offset.checked_add(nbytes).is_some_and(|end| end <= size);
            if !fits {
                return Err(ProgramError::invalid(
                    method,
                    format!(
                        "value {index} ({nbytes} bytes at offset {}) does not fit buffer {} ({size} bytes)",
                        mem.offset, mem.buffer_id
                    ),
                ));
            }
            if offset % def.dtype.size_bytes() != 0 {
                return Err(ProgramError::invalid(
                    method,
                    format!("value {index} offset {offset} is not aligned for {}", def.dtype),
                ));
            }
            Storage::Planned {
                buffer_id: mem.buffer_id,
                offset,
            }
        }
        (None, Some(data)) => {
            if def.dtype != DType::F32 {
                return Err(ProgramError::invalid(
                    method,
                    format!("value {index}: constant data requires f32, got {}", def.dtype),
                ));
            }
            if data.len() != info.numel() {
                return Err(ProgramError::invalid(
                    method,
                    format!(
                        "value {index}: {} constant elements for shape {}",
                        data.len(),
                        info.shape()
                    ),
                ));
            }
            Storage::Constant(data)
        }
        (None, None) => Storage::Arena,
    };

    Ok(TensorValue { info, storage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InstructionDef, MemDef};
    use crate::{encode, BufferDataLoader};

    fn f32_tensor(sizes: Vec<usize>, mem: Option<(usize, u64)>) -> ValueDef {
        ValueDef::Tensor(TensorDef {
            dtype: DType::F32,
            sizes,
            dim_order: None,
            mem: mem.map(|(buffer_id, offset)| MemDef { buffer_id, offset }),
            data: None,
        })
    }

    fn add_method() -> MethodDef {
        MethodDef {
            name: "forward".into(),
            planned_buffers: vec![48],
            values: vec![
                f32_tensor(vec![1], Some((0, 0))),
                f32_tensor(vec![1], Some((0, 16))),
                f32_tensor(vec![1], Some((0, 32))),
            ],
            inputs: vec![0, 1],
            outputs: vec![2],
            instructions: vec![InstructionDef {
                op: "add".into(),
                args: vec![0, 1, 2],
            }],
        }
    }

    fn program_with(method: MethodDef) -> Result<Program, ProgramError> {
        Program::from_def(ProgramDef {
            methods: vec![method],
        })
    }

    fn assert_invalid(result: Result<Program, ProgramError>, needle: &str) {
        match result {
            Err(ProgramError::InvalidProgram { detail, .. }) => {
                assert!(detail.contains(needle), "'{detail}' does not mention '{needle}'")
            }
            other => panic!("expected InvalidProgram, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_container() {
        let bytes = encode(&ProgramDef {
            methods: vec![add_method()],
        })
        .unwrap();
        let program = Program::load(&BufferDataLoader::new(&bytes)).unwrap();
        assert_eq!(program.num_methods(), 1);
        assert_eq!(program.method_names().collect::<Vec<_>>(), vec!["forward"]);

        let plan = program.method("forward").unwrap();
        assert_eq!(plan.planned_buffers, vec![48]);
        assert_eq!(
            plan.values[1].as_tensor().unwrap().storage,
            Storage::Planned {
                buffer_id: 0,
                offset: 16
            }
        );
    }

    #[test]
    fn test_truncated_container() {
        let bytes = encode(&ProgramDef {
            methods: vec![add_method()],
        })
        .unwrap();
        let short = &bytes[..bytes.len() - 5];
        assert!(matches!(
            Program::load(&BufferDataLoader::new(short)),
            Err(ProgramError::Truncated { .. })
        ));
        assert!(matches!(
            Program::load(&BufferDataLoader::new(&bytes[..3])),
            Err(ProgramError::Truncated { .. })
        ));
    }

    #[test]
    fn test_missing_method() {
        let program = program_with(add_method()).unwrap();
        assert!(matches!(
            program.method_meta("predict"),
            Err(ProgramError::MethodNotFound(name)) if name == "predict"
        ));
    }

    #[test]
    fn test_empty_program_rejected() {
        assert_invalid(Program::from_def(ProgramDef::default()), "no methods");
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let result = Program::from_def(ProgramDef {
            methods: vec![add_method(), add_method()],
        });
        assert_invalid(result, "duplicate");
    }

    #[test]
    fn test_zero_sized_planned_buffer_rejected() {
        let mut m = add_method();
        m.planned_buffers.push(0);
        assert_invalid(program_with(m), "zero size");
    }

    #[test]
    fn test_placement_must_fit() {
        let mut m = add_method();
        m.values[2] = f32_tensor(vec![4], Some((0, 40)));
        assert_invalid(program_with(m), "does not fit");

        let mut m = add_method();
        m.values[2] = f32_tensor(vec![1], Some((1, 0)));
        assert_invalid(program_with(m), "method has 1");
    }

    #[test]
    fn test_placement_must_be_aligned() {
        let mut m = add_method();
        m.values[2] = f32_tensor(vec![1], Some((0, 33)));
        assert_invalid(program_with(m), "not aligned");
    }

    #[test]
    fn test_inputs_must_be_tensors() {
        let mut m = add_method();
        m.values.push(ValueDef::Int { value: 1 });
        m.inputs = vec![0, 3];
        assert_invalid(program_with(m), "not a tensor");

        let mut m = add_method();
        m.outputs = vec![9];
        assert_invalid(program_with(m), "refers to value 9");
    }

    #[test]
    fn test_non_tensor_output_accepted() {
        let mut m = add_method();
        m.values.push(ValueDef::Int { value: 7 });
        m.outputs = vec![3];
        let program = program_with(m).unwrap();
        let meta = program.method_meta("forward").unwrap();
        assert_eq!(meta.num_outputs(), 1);
        assert!(meta.output_tensor_meta(0).is_err());
    }

    #[test]
    fn test_oversized_tensor_rejected() {
        let json = r#"{ "methods": [ {
            "name": "forward",
            "planned_buffers": [16],
            "values": [
                { "type": "tensor", "dtype": "f32", "sizes": [4294967296, 4294967296, 4294967296] }
            ],
            "inputs": [0],
            "outputs": [0]
        } ] }"#;
        let def: ProgramDef = serde_json::from_str(json).unwrap();
        let bytes = encode(&def).unwrap();
        let err = Program::load(&BufferDataLoader::new(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            ProgramError::InvalidProgram { ref detail, .. } if detail.contains("size overflows")
        ));

        // Fits in elements, overflows once multiplied by the element size.
        let mut m = add_method();
        m.values[0] = f32_tensor(vec![usize::MAX / 2 + 1], None);
        assert_invalid(program_with(m), "size overflows");
    }

    #[test]
    fn test_rank_limit() {
        let mut m = add_method();
        m.values[0] = f32_tensor(vec![1; MAX_RANK + 1], None);
        assert_invalid(program_with(m), "rank 256 exceeds 255");

        let mut m = add_method();
        m.values.push(f32_tensor(vec![1; MAX_RANK], None));
        assert!(program_with(m).is_ok());
    }

    #[test]
    fn test_instruction_args_in_range() {
        let mut m = add_method();
        m.instructions[0].args = vec![0, 1, 5];
        assert_invalid(program_with(m), "refers to value 5");

        let mut m = add_method();
        m.instructions[0].args.clear();
        assert_invalid(program_with(m), "no arguments");
    }

    #[test]
    fn test_dim_order_checked() {
        let mut m = add_method();
        m.values.push(ValueDef::Tensor(TensorDef {
            dtype: DType::F32,
            sizes: vec![2, 2],
            dim_order: Some(vec![1, 1]),
            mem: None,
            data: None,
        }));
        assert_invalid(program_with(m), "dim order");
    }

    #[test]
    fn test_constant_tensors() {
        let mut m = add_method();
        m.values.push(ValueDef::Tensor(TensorDef {
            dtype: DType::F32,
            sizes: vec![2],
            dim_order: None,
            mem: None,
            data: Some(vec![1.0, 2.0]),
        }));
        let program = program_with(m).unwrap();
        let plan = program.method("forward").unwrap();
        assert_eq!(
            plan.values[3].as_tensor().unwrap().storage,
            Storage::Constant(vec![1.0, 2.0])
        );

        let mut m = add_method();
        m.values.push(ValueDef::Tensor(TensorDef {
            dtype: DType::F32,
            sizes: vec![3],
            dim_order: None,
            mem: None,
            data: Some(vec![1.0]),
        }));
        assert_invalid(program_with(m), "constant elements");
    }

    #[test]
    fn test_summary() {
        let program = program_with(add_method()).unwrap();
        assert!(program.summary().contains("1 method(s) [forward]"));
        assert!(program.to_string().contains("forward"));
    }
}
