// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The program loader: arena set, load pipeline and inference entry point.
//!
//! ```text
//!  Uninitialized
//!      │  initialize()        runtime_init, method + temp arenas
//!      ▼
//!  Initialized ◄──────────── reset()
//!      │  load_program()
//!      ▼
//!  ProgramParsed              (observable only if a later step fails)
//!      │  method meta, planned buffers, Method::load
//!      ▼
//!  MethodLoaded ──► run_inference() / create_input_tensor()
//! ```
//!
//! The loader is an ordinary value owned by the application. `Rc` inside
//! makes it `!Send` and `!Sync`, and every mutating call takes `&mut self`,
//! so inference requests are serialised by construction.

use crate::{
    ArenaReport, ArenaUsage, InferenceMetrics, InvalidArgument, LoaderConfig, LoaderError,
    ADD_MODEL,
};
use executor::{Method, MemoryManager};
use memory_manager::{BumpAllocator, HierarchicalAllocator, MemoryBudget, DEFAULT_ALIGNMENT};
use program_ir::{BufferDataLoader, DataLoader, FileDataLoader, MethodMeta, Program};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;
use tensor_core::{cast, DType, Shape, TensorView};

// ── State ──────────────────────────────────────────────────────────

/// Where the loader is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Uninitialized,
    Initialized,
    ProgramParsed,
    MethodLoaded,
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoaderState::Uninitialized => "uninitialized",
            LoaderState::Initialized => "initialized",
            LoaderState::ProgramParsed => "program-parsed",
            LoaderState::MethodLoaded => "method-loaded",
        };
        f.write_str(s)
    }
}

/// Metadata of the tensor most recently bound to one input.
#[derive(Debug, Clone, Default)]
struct InputSlot {
    shape: Shape,
    bound: bool,
}

struct Arenas {
    method: Rc<BumpAllocator>,
    temp: Rc<BumpAllocator>,
}

// ── ProgramLoader ──────────────────────────────────────────────────

/// Hosts one method of one program in two fixed-size arenas.
///
/// # Example
/// ```
/// use runtime::{LoaderConfig, ProgramLoader};
///
/// let mut loader = ProgramLoader::new(LoaderConfig::default()).unwrap();
/// loader.initialize();
/// loader.load_program().unwrap();
///
/// let mut out = [0.0f32; 1];
/// let n = loader.run_inference(&[2.0], &[3.0], &mut out).unwrap();
/// assert_eq!((n, out[0]), (1, 5.0));
/// ```
pub struct ProgramLoader {
    config: LoaderConfig,
    method_budget: MemoryBudget,
    temp_budget: MemoryBudget,
    state: LoaderState,
    // Dropped in this order: the method releases its arena handles first.
    method: Option<Method>,
    program: Option<Program>,
    arenas: Option<Arenas>,
    input_slots: Vec<InputSlot>,
    calls: u64,
    last_metrics: Option<InferenceMetrics>,
}

impl ProgramLoader {
    /// Creates an uninitialized loader. No memory is acquired yet.
    pub fn new(config: LoaderConfig) -> Result<Self, LoaderError> {
        config.validate()?;
        let method_budget = config.method_budget()?;
        let temp_budget = config.temp_budget()?;
        tracing::debug!(
            method = %config.method_name,
            method_pool = %method_budget,
            temp_pool = %temp_budget,
            "program loader created"
        );
        Ok(Self {
            config,
            method_budget,
            temp_budget,
            state: LoaderState::Uninitialized,
            method: None,
            program: None,
            arenas: None,
            input_slots: Vec::new(),
            calls: 0,
            last_metrics: None,
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// `true` once a method has been instantiated successfully.
    pub fn is_loaded(&self) -> bool {
        self.method.is_some()
    }

    /// Bootstraps the runtime and acquires the method and temp arenas.
    ///
    /// Calling it again is a no-op. Failure to obtain the arena memory
    /// aborts the process through the global allocation error handler.
    pub fn initialize(&mut self) {
        if self.state != LoaderState::Uninitialized {
            tracing::debug!(state = %self.state, "already initialized");
            return;
        }
        executor::runtime_init();
        self.arenas = Some(Arenas {
            method: Rc::new(BumpAllocator::new("method", self.method_budget)),
            temp: Rc::new(BumpAllocator::new("temp", self.temp_budget)),
        });
        self.state = LoaderState::Initialized;
        tracing::info!(
            method_pool = %self.method_budget,
            temp_pool = %self.temp_budget,
            "program loader initialized"
        );
    }

    /// Loads the configured model file, or the bundled model when no path
    /// is configured.
    pub fn load_program(&mut self) -> Result<(), LoaderError> {
        match self.config.model_path.clone() {
            Some(path) => {
                let file = FileDataLoader::open(&path).map_err(|source| {
                    tracing::error!(path = %path.display(), error = %source, "model file unavailable");
                    LoaderError::ModelFile { path, source }
                })?;
                self.load_program_from(&file)
            }
            None => self.load_program_from(&BufferDataLoader::new(ADD_MODEL)),
        }
    }

    /// Parses a program from `data` and instantiates the configured method.
    ///
    /// A previously loaded method stays usable until the new one has been
    /// instantiated, so a failed reload leaves the loader as it was. Arena
    /// memory consumed by earlier loads is not reclaimed: call
    /// [`reset`](Self::reset) to start from empty arenas.
    pub fn load_program_from(&mut self, data: &dyn DataLoader) -> Result<(), LoaderError> {
        let arenas = match (&self.arenas, self.state) {
            (Some(arenas), s) if s != LoaderState::Uninitialized => arenas,
            _ => return Err(self.invalid_state("load_program")),
        };

        let program = Program::load(data).map_err(|e| {
            tracing::error!(bytes = data.size(), error = %e, "program parse failed");
            LoaderError::Parse(e)
        })?;
        if self.method.is_none() {
            self.state = LoaderState::ProgramParsed;
        }

        let method = instantiate(&self.config, &program, arenas)?;

        self.input_slots = vec![InputSlot::default(); self.config.num_inputs];
        self.calls = 0;
        self.program = Some(program);
        self.method = Some(method);
        self.state = LoaderState::MethodLoaded;
        tracing::info!(
            method = %self.config.method_name,
            method_arena_used = arenas.method.used(),
            method_arena_free = arenas.method.free(),
            "program loaded"
        );
        Ok(())
    }

    /// Drops the method and program and rewinds both arenas.
    ///
    /// The loader returns to `Initialized` and the next
    /// [`load_program`](Self::load_program) starts from empty arenas.
    pub fn reset(&mut self) {
        self.method = None;
        self.program = None;
        self.input_slots.clear();
        self.calls = 0;
        self.last_metrics = None;
        if let Some(arenas) = &self.arenas {
            arenas.method.reset();
            arenas.temp.reset();
            self.state = LoaderState::Initialized;
        }
        tracing::info!(state = %self.state, "program loader reset");
    }

    /// Binds `data` as input `input_index` of the loaded method.
    ///
    /// The declared input must be `f32` and exactly `data.len()` elements.
    pub fn create_input_tensor(
        &mut self,
        data: &[f32],
        input_index: usize,
    ) -> Result<(), LoaderError> {
        if self.method.is_none() {
            return Err(self.invalid_state("create_input_tensor"));
        }
        let num_slots = self.input_slots.len();
        if input_index >= num_slots {
            tracing::error!(index = input_index, num_slots, "input index out of range");
            return Err(InvalidArgument::InputIndexOutOfRange {
                index: input_index,
                num_slots,
            }
            .into());
        }

        let info = self.method_meta()?.input_tensor_meta(input_index).map_err(|source| {
            tracing::error!(index = input_index, error = %source, "input metadata unavailable");
            LoaderError::MethodMeta {
                method: self.config.method_name.clone(),
                source,
            }
        })?;
        if info.dtype() != DType::F32 {
            tracing::error!(index = input_index, dtype = %info.dtype(), "input dtype is not f32");
            return Err(InvalidArgument::InputDTypeMismatch {
                index: input_index,
                dtype: info.dtype(),
            }
            .into());
        }
        let provided = std::mem::size_of_val(data);
        let size_mismatch = InvalidArgument::InputSizeMismatch {
            index: input_index,
            expected: info.nbytes(),
            provided,
        };
        if info.nbytes() != provided {
            tracing::error!(index = input_index, expected = info.nbytes(), provided, "input size mismatch");
            return Err(size_mismatch.into());
        }

        let slot = &mut self.input_slots[input_index];
        slot.shape = info.shape().clone();
        slot.bound = true;
        let view = TensorView::from_parts(&slot.shape, DType::F32, cast::f32_as_bytes(data))
            .map_err(|_| LoaderError::from(size_mismatch))?;

        let Some(method) = self.method.as_mut() else {
            return Err(LoaderError::InvalidState {
                operation: "create_input_tensor",
                state: self.state,
            });
        };
        method.set_input(&view, input_index).map_err(|source| {
            tracing::error!(index = input_index, error = %source, "set_input failed");
            LoaderError::SetInput {
                index: input_index,
                source,
            }
        })?;
        tracing::debug!(index = input_index, elements = data.len(), "input tensor bound");
        Ok(())
    }

    /// Adds-two-buffers entry point: binds `input1` and `input2`, executes,
    /// and copies output 0 into `output`.
    ///
    /// Returns the number of elements written.
    pub fn run_inference(
        &mut self,
        input1: &[f32],
        input2: &[f32],
        output: &mut [f32],
    ) -> Result<usize, LoaderError> {
        self.run(&[input1, input2], output)
    }

    /// General entry point: binds one buffer per configured input,
    /// executes, and copies output 0 into `output`.
    ///
    /// `output` is written only when the whole call succeeds, and then
    /// only its first `numel` elements.
    pub fn run(&mut self, inputs: &[&[f32]], output: &mut [f32]) -> Result<usize, LoaderError> {
        if self.method.is_none() {
            return Err(self.invalid_state("run_inference"));
        }
        if inputs.len() != self.input_slots.len() {
            tracing::error!(expected = self.input_slots.len(), provided = inputs.len(), "wrong input count");
            return Err(InvalidArgument::InputCountMismatch {
                expected: self.input_slots.len(),
                provided: inputs.len(),
            }
            .into());
        }

        let started = Instant::now();
        for (index, data) in inputs.iter().enumerate() {
            self.create_input_tensor(data, index)?;
        }
        let bound = Instant::now();

        let Some(method) = self.method.as_mut() else {
            return Err(LoaderError::InvalidState {
                operation: "run_inference",
                state: self.state,
            });
        };
        method.execute().map_err(|e| {
            tracing::error!(error = %e, "execution failed");
            LoaderError::Execution(e)
        })?;
        let executed = Instant::now();

        let value = method.get_output(0).map_err(LoaderError::Execution)?;
        let Some(tensor) = value.to_tensor() else {
            tracing::error!(tag = %value.tag(), "output 0 is not a tensor");
            return Err(InvalidArgument::OutputNotTensor { tag: value.tag() }.into());
        };
        if tensor.dtype() != DType::F32 {
            tracing::error!(dtype = %tensor.dtype(), "output 0 is not f32");
            return Err(InvalidArgument::OutputDTypeMismatch {
                dtype: tensor.dtype(),
            }
            .into());
        }
        let numel = tensor.numel();
        if numel > output.len() {
            tracing::error!(required = numel, provided = output.len(), "output buffer too small");
            return Err(InvalidArgument::OutputBufferTooSmall {
                required: numel,
                provided: output.len(),
            }
            .into());
        }
        tensor
            .copy_to_f32(&mut output[..numel])
            .map_err(LoaderError::ReadOutput)?;
        let finished = Instant::now();

        self.calls += 1;
        if self.config.enable_profiling {
            let temp_peak_bytes = self
                .arenas
                .as_ref()
                .map(|a| a.temp.stats().peak_used_bytes)
                .unwrap_or(0);
            let metrics = InferenceMetrics {
                bind_duration: bound - started,
                execute_duration: executed - bound,
                readback_duration: finished - executed,
                total_duration: finished - started,
                output_elements: numel,
                temp_peak_bytes,
                call_index: self.calls,
            };
            tracing::debug!("{}", metrics.summary());
            self.last_metrics = Some(metrics);
        }
        Ok(numel)
    }

    /// Metadata of the loaded method.
    pub fn method_meta(&self) -> Result<MethodMeta<'_>, LoaderError> {
        let Some(program) = self.program.as_ref() else {
            return Err(self.invalid_state("method_meta"));
        };
        program
            .method_meta(&self.config.method_name)
            .map_err(|source| LoaderError::MethodMeta {
                method: self.config.method_name.clone(),
                source,
            })
    }

    /// Snapshot of arena usage, once initialized.
    pub fn arena_report(&self) -> Option<ArenaReport> {
        let arenas = self.arenas.as_ref()?;
        let planned_buffers = self
            .method
            .as_ref()
            .map(|m| m.memory().planned_memory().buffer_sizes())
            .unwrap_or_default();
        Some(ArenaReport {
            method: ArenaUsage::of(&arenas.method),
            temp: ArenaUsage::of(&arenas.temp),
            planned_buffers,
        })
    }

    /// Timing of the most recent successful call, when profiling is enabled.
    pub fn last_metrics(&self) -> Option<&InferenceMetrics> {
        self.last_metrics.as_ref()
    }

    /// Number of inputs bound since the method was loaded.
    pub fn bound_inputs(&self) -> usize {
        self.input_slots.iter().filter(|s| s.bound).count()
    }

    fn invalid_state(&self, operation: &'static str) -> LoaderError {
        tracing::error!(operation, state = %self.state, "operation not allowed in current state");
        LoaderError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl fmt::Debug for ProgramLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramLoader")
            .field("method_name", &self.config.method_name)
            .field("state", &self.state)
            .field("method_pool", &self.method_budget)
            .field("temp_pool", &self.temp_budget)
            .field("calls", &self.calls)
            .finish()
    }
}

// ── Load pipeline ──────────────────────────────────────────────────

/// Method metadata → signature check → planned buffers → `Method::load`.
fn instantiate(
    config: &LoaderConfig,
    program: &Program,
    arenas: &Arenas,
) -> Result<Method, LoaderError> {
    let name = config.method_name.as_str();
    let meta = program.method_meta(name).map_err(|source| {
        tracing::error!(method = name, error = %source, "method metadata unavailable");
        LoaderError::MethodMeta {
            method: name.to_string(),
            source,
        }
    })?;

    check_signature(name, "inputs", meta.num_inputs(), config.num_inputs)?;
    check_signature(name, "outputs", meta.num_outputs(), config.num_outputs)?;

    let num_buffers = meta.num_memory_planned_buffers();
    tracing::debug!(method = name, num_buffers, "allocating planned buffers");
    let mut spans = Vec::with_capacity(num_buffers);
    for buffer_id in 0..num_buffers {
        let size = meta.memory_planned_buffer_size(buffer_id).map_err(|source| {
            tracing::error!(buffer_id, error = %source, "planned buffer size unavailable");
            LoaderError::PlannedBufferSize { buffer_id, source }
        })?;
        let span = arenas
            .method
            .allocate_span(size, DEFAULT_ALIGNMENT)
            .map_err(|source| {
                tracing::error!(
                    buffer_id,
                    size,
                    free = arenas.method.free(),
                    "planned buffer does not fit the method arena"
                );
                LoaderError::Allocation {
                    buffer_id,
                    size,
                    source,
                }
            })?;
        tracing::debug!(buffer_id, size, "planned buffer allocated");
        spans.push(span);
    }

    let memory = MemoryManager::new(
        Rc::clone(&arenas.method),
        HierarchicalAllocator::new(spans),
        Rc::clone(&arenas.temp),
    );
    Method::load(program, name, memory).map_err(|e| {
        tracing::error!(method = name, error = %e, "method load failed");
        LoaderError::MethodLoad(e)
    })
}

fn check_signature(
    method: &str,
    what: &'static str,
    declared: usize,
    configured: usize,
) -> Result<(), LoaderError> {
    if declared != configured {
        tracing::error!(method, what, declared, configured, "method signature mismatch");
        return Err(LoaderError::SignatureMismatch {
            method: method.to_string(),
            what,
            declared,
            configured,
        });
    }
    Ok(())
}
