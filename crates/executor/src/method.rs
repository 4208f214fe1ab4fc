// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Method instantiation and execution.
//!
//! # Lifecycle
//!
//! ```text
//! Method::load ──► set_input(0..n) ──► execute ──► get_output(0..m)
//!                      ▲                                │
//!                      └────────────────────────────────┘
//! ```
//!
//! Loading resolves every tensor to a [`Span`] in one of the arenas of the
//! [`MemoryManager`] and binds every instruction to a kernel. After that,
//! execution performs no allocation outside the temp arena.

use crate::kernels::{self, Kernel};
use crate::{ExecutorError, MemoryManager};
use memory_manager::Span;
use program_ir::{MethodPlan, Program, Storage, Value};
use std::ptr::NonNull;
use tensor_core::{cast, DType, EValue, TensorInfo, TensorView};

// ── Resolved values ────────────────────────────────────────────────

#[derive(Debug)]
struct BoundTensor {
    info: TensorInfo,
    span: Span,
}

#[derive(Debug)]
enum BoundValue {
    None,
    Int(i64),
    Double(f64),
    Bool(bool),
    Tensor(BoundTensor),
}

impl BoundValue {
    fn as_tensor(&self) -> Option<&BoundTensor> {
        match self {
            BoundValue::Tensor(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct BoundInstruction {
    kernel: &'static Kernel,
    inputs: Vec<usize>,
    output: usize,
}

/// An empty span for zero-element tensors.
fn empty_span() -> Span {
    // SAFETY: a zero-length span never dereferences its pointer.
    unsafe { Span::from_raw_parts(NonNull::dangling(), 0) }
}

// ── Method ─────────────────────────────────────────────────────────

/// An instantiated, executable method.
pub struct Method {
    name: String,
    memory: MemoryManager,
    values: Vec<BoundValue>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    instructions: Vec<BoundInstruction>,
    executions: u64,
}

impl Method {
    /// Instantiates method `name` of `program` over `memory`.
    ///
    /// # Errors
    /// - [`ExecutorError::InvalidState`] if [`kernels::runtime_init`] has
    ///   not run.
    /// - [`ExecutorError::Program`] if the method does not exist.
    /// - [`ExecutorError::InvalidProgram`] if the planned memory does not
    ///   match the method's plan or an instruction's operands are unusable.
    /// - [`ExecutorError::OperatorMissing`] for an unknown operator.
    /// - [`ExecutorError::MemoryAllocationFailed`] if the method arena cannot
    ///   hold the method's constants and unplanned tensors.
    pub fn load(
        program: &Program,
        name: &str,
        memory: MemoryManager,
    ) -> Result<Self, ExecutorError> {
        let registry = kernels::registry().ok_or(ExecutorError::InvalidState(
            "runtime_init must run before a method is loaded",
        ))?;
        let plan = program.method(name)?;

        check_memory_plan(plan, &memory)?;

        let values = plan
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| bind_value(plan, i, v, &memory))
            .collect::<Result<Vec<_>, _>>()?;

        let mut instructions = Vec::with_capacity(plan.instructions.len());
        for (pc, ins) in plan.instructions.iter().enumerate() {
            let kernel = registry
                .get(&ins.op)
                .ok_or_else(|| ExecutorError::OperatorMissing { op: ins.op.clone() })?;
            instructions.push(bind_instruction(plan, pc, kernel, &ins.args, &values)?);
        }

        tracing::info!(
            method = name,
            values = values.len(),
            instructions = instructions.len(),
            method_arena_used = memory.method_allocator().used(),
            "method loaded"
        );

        Ok(Self {
            name: name.to_string(),
            memory,
            values,
            inputs: plan.inputs.clone(),
            outputs: plan.outputs.clone(),
            instructions,
            executions: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of completed [`execute`](Self::execute) calls.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Copies `input` into the storage of input `index`.
    ///
    /// The view's dtype and element count must match the declared input.
    pub fn set_input(&mut self, input: &TensorView<'_>, index: usize) -> Result<(), ExecutorError> {
        let value_idx = *self.inputs.get(index).ok_or_else(|| {
            ExecutorError::InvalidArgument(format!(
                "input index {index} out of range ({} inputs)",
                self.inputs.len()
            ))
        })?;
        let tensor = self.values[value_idx]
            .as_tensor()
            .ok_or_else(|| ExecutorError::InvalidArgument(format!("input {index} is not a tensor")))?;

        if input.dtype() != tensor.info.dtype() {
            return Err(ExecutorError::InvalidArgument(format!(
                "input {index}: dtype {} does not match declared {}",
                input.dtype(),
                tensor.info.dtype()
            )));
        }
        if input.numel() != tensor.info.numel() {
            return Err(ExecutorError::InvalidArgument(format!(
                "input {index}: {} elements, declared shape {} has {}",
                input.numel(),
                tensor.info.shape(),
                tensor.info.numel()
            )));
        }

        // SAFETY: the span lives in an arena kept alive by `self.memory`,
        // and `&mut self` rules out any outstanding view of it. The caller's
        // bytes cannot overlap it: outputs are only handed out as borrows
        // of `self`.
        let dst = unsafe { tensor.span.as_mut_slice() };
        dst.copy_from_slice(input.as_bytes());
        tracing::debug!(method = %self.name, index, bytes = dst.len(), "input bound");
        Ok(())
    }

    /// Runs every instruction in order.
    ///
    /// The temp arena is reset before the first instruction and after each
    /// one. Each instruction's inputs are staged into temp scratch so that
    /// a kernel may write over storage it also reads.
    pub fn execute(&mut self) -> Result<(), ExecutorError> {
        let temp = self.memory.temp_allocator();
        temp.reset();

        for (pc, ins) in self.instructions.iter().enumerate() {
            let mut staged: Vec<&[f32]> = Vec::with_capacity(ins.inputs.len());
            for &arg in &ins.inputs {
                let Some(src) = self.values[arg].as_tensor() else {
                    return Err(invalid_operand(&self.name, pc, arg));
                };
                let len = src.span.len();
                if len == 0 {
                    staged.push(&[]);
                    continue;
                }
                let scratch = temp.allocate_span(len, DType::F32.size_bytes()).map_err(|source| {
                    tracing::error!(method = %self.name, pc, bytes = len, "temp arena exhausted");
                    ExecutorError::MemoryAllocationFailed {
                        what: format!("instruction {pc} scratch ({len} bytes)"),
                        source,
                    }
                })?;
                // SAFETY: `scratch` was just carved from the temp arena, which
                // is disjoint from every tensor span; `src.span` is only read.
                let bytes = unsafe {
                    let dst = scratch.as_mut_slice();
                    dst.copy_from_slice(src.span.as_slice());
                    scratch.as_slice()
                };
                staged.push(cast::bytes_as_f32(bytes).map_err(|source| ExecutorError::Kernel {
                    op: ins.kernel.name,
                    pc,
                    source,
                })?);
            }

            let Some(dst) = self.values[ins.output].as_tensor() else {
                return Err(invalid_operand(&self.name, pc, ins.output));
            };
            let result = if dst.span.is_empty() {
                (ins.kernel.func)(&staged, &mut [])
            } else {
                // SAFETY: the output span is not aliased by any staged input
                // (those live in the temp arena) and `&mut self` excludes
                // outstanding views.
                let out_bytes = unsafe { dst.span.as_mut_slice() };
                cast::bytes_as_f32_mut(out_bytes).and_then(|out| (ins.kernel.func)(&staged, out))
            };
            temp.reset();

            result.map_err(|source| {
                tracing::error!(method = %self.name, pc, op = ins.kernel.name, error = %source, "kernel failed");
                ExecutorError::Kernel {
                    op: ins.kernel.name,
                    pc,
                    source,
                }
            })?;
        }

        self.executions += 1;
        tracing::debug!(method = %self.name, executions = self.executions, "method executed");
        Ok(())
    }

    /// Returns output `index` as a value borrowing the method's memory.
    pub fn get_output(&self, index: usize) -> Result<EValue<'_>, ExecutorError> {
        let value_idx = *self.outputs.get(index).ok_or_else(|| {
            ExecutorError::InvalidArgument(format!(
                "output index {index} out of range ({} outputs)",
                self.outputs.len()
            ))
        })?;
        Ok(match &self.values[value_idx] {
            BoundValue::None => EValue::None,
            BoundValue::Int(v) => EValue::Int(*v),
            BoundValue::Double(v) => EValue::Double(*v),
            BoundValue::Bool(v) => EValue::Bool(*v),
            BoundValue::Tensor(t) => {
                let bytes: &[u8] = if t.span.is_empty() {
                    &[]
                } else {
                    // SAFETY: the span lives as long as `self.memory`, and
                    // the returned borrow of `self` blocks mutation.
                    unsafe { t.span.as_slice() }
                };
                let view = TensorView::from_parts(t.info.shape(), t.info.dtype(), bytes).map_err(
                    |e| ExecutorError::InvalidProgram {
                        method: self.name.clone(),
                        detail: format!("output {index}: {e}"),
                    },
                )?;
                EValue::Tensor(view)
            }
        })
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .field("instructions", &self.instructions.len())
            .field("executions", &self.executions)
            .finish()
    }
}

// ── Load-time binding ──────────────────────────────────────────────

fn invalid(plan: &MethodPlan, detail: String) -> ExecutorError {
    ExecutorError::InvalidProgram {
        method: plan.name.clone(),
        detail,
    }
}

fn invalid_operand(method: &str, pc: usize, arg: usize) -> ExecutorError {
    ExecutorError::InvalidProgram {
        method: method.to_string(),
        detail: format!("instruction {pc}: value {arg} is not a tensor"),
    }
}

fn check_memory_plan(plan: &MethodPlan, memory: &MemoryManager) -> Result<(), ExecutorError> {
    let provided = memory.planned_memory().buffer_sizes();
    if provided.len() != plan.planned_buffers.len() {
        return Err(invalid(
            plan,
            format!(
                "plan declares {} planned buffers, memory provides {}",
                plan.planned_buffers.len(),
                provided.len()
            ),
        ));
    }
    for (id, (&want, &have)) in plan.planned_buffers.iter().zip(&provided).enumerate() {
        if have < want {
            return Err(invalid(
                plan,
                format!("planned buffer {id} needs {want} bytes, memory provides {have}"),
            ));
        }
    }
    Ok(())
}

fn bind_value(
    plan: &MethodPlan,
    index: usize,
    value: &Value,
    memory: &MemoryManager,
) -> Result<BoundValue, ExecutorError> {
    let tensor = match value {
        Value::None => return Ok(BoundValue::None),
        Value::Int(v) => return Ok(BoundValue::Int(*v)),
        Value::Double(v) => return Ok(BoundValue::Double(*v)),
        Value::Bool(v) => return Ok(BoundValue::Bool(*v)),
        Value::Tensor(t) => t,
    };

    let info = tensor.info.clone();
    let nbytes = info.nbytes();
    let span = match &tensor.storage {
        Storage::Planned { buffer_id, offset } => memory
            .planned_memory()
            .get_offset_span(*buffer_id, *offset, nbytes)
            .map_err(|e| invalid(plan, format!("value {index}: {e}")))?,
        Storage::Constant(_) | Storage::Arena if nbytes == 0 => empty_span(),
        Storage::Constant(data) => {
            let span = alloc_in_method_arena(memory, index, &info)?;
            // SAFETY: fresh, exclusively owned arena bytes.
            unsafe { span.as_mut_slice() }.copy_from_slice(cast::f32_as_bytes(data));
            span
        }
        Storage::Arena => {
            let span = alloc_in_method_arena(memory, index, &info)?;
            // SAFETY: fresh, exclusively owned arena bytes.
            unsafe { span.as_mut_slice() }.fill(0);
            span
        }
    };

    Ok(BoundValue::Tensor(BoundTensor { info, span }))
}

fn alloc_in_method_arena(
    memory: &MemoryManager,
    index: usize,
    info: &TensorInfo,
) -> Result<Span, ExecutorError> {
    memory
        .method_allocator()
        .allocate_span(info.nbytes(), info.dtype().size_bytes())
        .map_err(|source| ExecutorError::MemoryAllocationFailed {
            what: format!("value {index} ({} bytes)", info.nbytes()),
            source,
        })
}

fn bind_instruction(
    plan: &MethodPlan,
    pc: usize,
    kernel: &'static Kernel,
    args: &[usize],
    values: &[BoundValue],
) -> Result<BoundInstruction, ExecutorError> {
    if args.len() != kernel.arity + 1 {
        return Err(invalid(
            plan,
            format!(
                "instruction {pc} ({}): expected {} arguments, got {}",
                kernel.name,
                kernel.arity + 1,
                args.len()
            ),
        ));
    }

    let mut numels = Vec::with_capacity(args.len());
    for &arg in args {
        let tensor = values[arg].as_tensor().ok_or_else(|| invalid_operand(&plan.name, pc, arg))?;
        if tensor.info.dtype() != DType::F32 {
            return Err(invalid(
                plan,
                format!(
                    "instruction {pc} ({}): value {arg} has dtype {}, kernels require f32",
                    kernel.name,
                    tensor.info.dtype()
                ),
            ));
        }
        numels.push(tensor.info.numel());
    }

    let (out_numel, in_numels) = numels.split_last().map(|(o, i)| (*o, i)).unwrap_or((0, &[]));
    let widest = in_numels.iter().copied().max().unwrap_or(0);
    let compatible = out_numel == widest && in_numels.iter().all(|&n| n == widest || n == 1);
    if !compatible {
        return Err(invalid(
            plan,
            format!(
                "instruction {pc} ({}): operand sizes {:?} do not match output size {out_numel}",
                kernel.name, in_numels
            ),
        ));
    }

    Ok(BoundInstruction {
        kernel,
        inputs: args[..kernel.arity].to_vec(),
        output: args[kernel.arity],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_init;
    use memory_manager::{BumpAllocator, HierarchicalAllocator, MemoryBudget, MemoryError};
    use program_ir::ProgramDef;
    use std::rc::Rc;
    use tensor_core::Shape;

    const ADD_JSON: &str = r#"{ "methods": [ {
        "name": "forward",
        "planned_buffers": [48],
        "values": [
            { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 0 } },
            { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 16 } },
            { "type": "tensor", "dtype": "f32", "sizes": [1], "mem": { "buffer_id": 0, "offset": 32 } }
        ],
        "inputs": [0, 1],
        "outputs": [2],
        "instructions": [ { "op": "add", "args": [0, 1, 2] } ]
    } ] }"#;

    fn program(json: &str) -> Program {
        let def: ProgramDef = serde_json::from_str(json).unwrap();
        Program::from_def(def).unwrap()
    }

    struct Arenas {
        method: Rc<BumpAllocator>,
        temp: Rc<BumpAllocator>,
    }

    fn arenas(method: usize, temp: usize) -> Arenas {
        Arenas {
            method: Rc::new(BumpAllocator::new("method", MemoryBudget::from_bytes(method))),
            temp: Rc::new(BumpAllocator::new("temp", MemoryBudget::from_bytes(temp))),
        }
    }

    fn memory_for(program: &Program, arenas: &Arenas) -> MemoryManager {
        let meta = program.method_meta("forward").unwrap();
        let spans = (0..meta.num_memory_planned_buffers())
            .map(|id| {
                let size = meta.memory_planned_buffer_size(id).unwrap();
                arenas.method.allocate_span(size, 8).unwrap()
            })
            .collect();
        MemoryManager::new(
            Rc::clone(&arenas.method),
            HierarchicalAllocator::new(spans),
            Rc::clone(&arenas.temp),
        )
    }

    fn load(json: &str, arenas: &Arenas) -> Result<Method, ExecutorError> {
        runtime_init();
        let program = program(json);
        let memory = memory_for(&program, arenas);
        Method::load(&program, "forward", memory)
    }

    fn set_f32(method: &mut Method, index: usize, values: &[f32]) -> Result<(), ExecutorError> {
        let shape = Shape::vector(values.len());
        let view = TensorView::from_f32(&shape, values).unwrap();
        method.set_input(&view, index)
    }

    fn output_f32(method: &Method, index: usize) -> Vec<f32> {
        let out = method.get_output(index).unwrap().to_tensor().unwrap();
        out.as_f32_slice().unwrap().to_vec()
    }

    #[test]
    fn test_add_end_to_end() {
        let a = arenas(256, 64);
        let mut m = load(ADD_JSON, &a).unwrap();
        assert_eq!(m.num_inputs(), 2);
        assert_eq!(m.num_outputs(), 1);

        set_f32(&mut m, 0, &[2.0]).unwrap();
        set_f32(&mut m, 1, &[3.0]).unwrap();
        m.execute().unwrap();
        assert_eq!(output_f32(&m, 0), vec![5.0]);
        assert_eq!(m.executions(), 1);

        // Temp is left empty after execution.
        assert_eq!(a.temp.used(), 0);
        assert!(a.temp.stats().peak_used_bytes > 0);
    }

    #[test]
    fn test_reexecute_with_new_inputs() {
        let a = arenas(256, 64);
        let mut m = load(ADD_JSON, &a).unwrap();
        for (x, y) in [(1.0, 1.0), (-4.0, 0.5), (10.0, 20.0)] {
            set_f32(&mut m, 0, &[x]).unwrap();
            set_f32(&mut m, 1, &[y]).unwrap();
            m.execute().unwrap();
            assert_eq!(output_f32(&m, 0), vec![x + y]);
        }
        assert_eq!(m.executions(), 3);
    }

    #[test]
    fn test_chained_instructions_with_constant() {
        // out = relu(x * [2, -1]) ; tmp is an unplanned arena tensor.
        let json = r#"{ "methods": [ {
            "name": "forward",
            "planned_buffers": [16],
            "values": [
                { "type": "tensor", "dtype": "f32", "sizes": [2], "mem": { "buffer_id": 0, "offset": 0 } },
                { "type": "tensor", "dtype": "f32", "sizes": [2], "data": [2.0, -1.0] },
                { "type": "tensor", "dtype": "f32", "sizes": [2] },
                { "type": "tensor", "dtype": "f32", "sizes": [2], "mem": { "buffer_id": 0, "offset": 8 } }
            ],
            "inputs": [0],
            "outputs": [3],
            "instructions": [
                { "op": "mul", "args": [0, 1, 2] },
                { "op": "relu", "args": [2, 3] }
            ]
        } ] }"#;
        let a = arenas(256, 64);
        let mut m = load(json, &a).unwrap();
        set_f32(&mut m, 0, &[3.0, 4.0]).unwrap();
        m.execute().unwrap();
        assert_eq!(output_f32(&m, 0), vec![6.0, 0.0]);
    }

    #[test]
    fn test_in_place_update() {
        // x = x + x, reading and writing the same storage.
        let json = r#"{ "methods": [ {
            "name": "forward",
            "planned_buffers": [8],
            "values": [
                { "type": "tensor", "dtype": "f32", "sizes": [2], "mem": { "buffer_id": 0, "offset": 0 } }
            ],
            "inputs": [0],
            "outputs": [0],
            "instructions": [ { "op": "add", "args": [0, 0, 0] } ]
        } ] }"#;
        let a = arenas(64, 16);
        let mut m = load(json, &a).unwrap();
        set_f32(&mut m, 0, &[1.5, -2.0]).unwrap();
        m.execute().unwrap();
        assert_eq!(output_f32(&m, 0), vec![3.0, -4.0]);
    }

    #[test]
    fn test_set_input_validation() {
        let a = arenas(256, 64);
        let mut m = load(ADD_JSON, &a).unwrap();

        assert!(matches!(
            set_f32(&mut m, 2, &[1.0]),
            Err(ExecutorError::InvalidArgument(_))
        ));
        assert!(matches!(
            set_f32(&mut m, 0, &[1.0, 2.0]),
            Err(ExecutorError::InvalidArgument(_))
        ));

        let shape = Shape::vector(1);
        let bytes = [0u8; 4];
        let wrong_dtype = TensorView::from_parts(&shape, DType::I32, &bytes).unwrap();
        assert!(matches!(
            m.set_input(&wrong_dtype, 0),
            Err(ExecutorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_get_output_out_of_range() {
        let a = arenas(256, 64);
        let m = load(ADD_JSON, &a).unwrap();
        assert!(matches!(m.get_output(1), Err(ExecutorError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_operator() {
        let json = ADD_JSON.replace("\"add\"", "\"conv2d\"");
        let a = arenas(256, 64);
        assert!(matches!(
            load(&json, &a),
            Err(ExecutorError::OperatorMissing { op }) if op == "conv2d"
        ));
    }

    #[test]
    fn test_wrong_arity() {
        let json = ADD_JSON.replace("[0, 1, 2]", "[0, 2]");
        let a = arenas(256, 64);
        assert!(matches!(load(&json, &a), Err(ExecutorError::InvalidProgram { .. })));
    }

    #[test]
    fn test_planned_memory_mismatch() {
        runtime_init();
        let program = program(ADD_JSON);
        let a = arenas(256, 64);
        let small = a.method.allocate_span(16, 8).unwrap();
        let memory = MemoryManager::new(
            Rc::clone(&a.method),
            HierarchicalAllocator::new(vec![small]),
            Rc::clone(&a.temp),
        );
        assert!(matches!(
            Method::load(&program, "forward", memory),
            Err(ExecutorError::InvalidProgram { detail, .. }) if detail.contains("needs 48 bytes")
        ));

        let memory = MemoryManager::new(
            Rc::clone(&a.method),
            HierarchicalAllocator::default(),
            Rc::clone(&a.temp),
        );
        assert!(Method::load(&program, "forward", memory).is_err());
    }

    #[test]
    fn test_missing_method() {
        runtime_init();
        let program = program(ADD_JSON);
        let a = arenas(256, 64);
        let memory = memory_for(&program, &a);
        assert!(matches!(
            Method::load(&program, "predict", memory),
            Err(ExecutorError::Program(_))
        ));
    }

    #[test]
    fn test_temp_exhaustion() {
        // Two 4-byte inputs need 8 bytes of scratch; give temp only 4.
        let a = arenas(256, 4);
        let mut m = load(ADD_JSON, &a).unwrap();
        set_f32(&mut m, 0, &[1.0]).unwrap();
        set_f32(&mut m, 1, &[1.0]).unwrap();
        assert!(matches!(
            m.execute(),
            Err(ExecutorError::MemoryAllocationFailed {
                source: MemoryError::OutOfMemory { .. },
                ..
            })
        ));
        assert_eq!(m.executions(), 0);

        // The next execution starts from an empty temp arena again.
        assert!(m.execute().is_err());
        assert_eq!(a.temp.stats().failed_allocations, 2);
    }

    #[test]
    fn test_constants_exhaust_method_arena() {
        let json = r#"{ "methods": [ {
            "name": "forward",
            "planned_buffers": [],
            "values": [
                { "type": "tensor", "dtype": "f32", "sizes": [64], "data": [] }
            ],
            "inputs": [],
            "outputs": [0]
        } ] }"#
            .replace("\"data\": []", &format!("\"data\": {:?}", vec![1.0f32; 64]));
        let a = arenas(128, 16);
        assert!(matches!(
            load(&json, &a),
            Err(ExecutorError::MemoryAllocationFailed { .. })
        ));
    }

    #[test]
    fn test_constant_output() {
        let json = r#"{ "methods": [ {
            "name": "forward",
            "planned_buffers": [],
            "values": [ { "type": "tensor", "dtype": "f32", "sizes": [1], "data": [7.0] } ],
            "inputs": [],
            "outputs": [0]
        } ] }"#;
        let a = arenas(64, 16);
        let mut m = load(json, &a).unwrap();
        m.execute().unwrap();
        assert_eq!(output_f32(&m, 0), vec![7.0]);
        assert!(m.get_output(0).unwrap().is_tensor());
    }

    #[test]
    fn test_int_output() {
        let json = r#"{ "methods": [ {
            "name": "forward",
            "planned_buffers": [],
            "values": [ { "type": "int", "value": 42 } ],
            "inputs": [],
            "outputs": [0]
        } ] }"#;
        let a = arenas(64, 16);
        let mut m = load(json, &a).unwrap();
        m.execute().unwrap();
        let out = m.get_output(0).unwrap();
        assert!(!out.is_tensor());
        assert!(matches!(out, EValue::Int(42)));
    }
}
