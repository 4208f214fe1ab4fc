// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel registry and runtime bootstrap.

use std::collections::HashMap;
use std::sync::OnceLock;
use tensor_core::{ops, TensorError};

/// Signature shared by all kernels: staged inputs, then the output buffer.
pub type KernelFn = fn(&[&[f32]], &mut [f32]) -> Result<(), TensorError>;

/// A registered operator implementation.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub name: &'static str,
    /// Number of input operands; the output is one extra argument.
    pub arity: usize,
    pub func: KernelFn,
}

/// Operator name → kernel.
#[derive(Debug, Default)]
pub struct KernelRegistry {
    kernels: HashMap<&'static str, Kernel>,
}

impl KernelRegistry {
    pub fn register(&mut self, kernel: Kernel) {
        self.kernels.insert(kernel.name, kernel);
    }

    pub fn get(&self, op: &str) -> Option<&Kernel> {
        self.kernels.get(op)
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Registered operator names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.kernels.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn builtin() -> Self {
        let mut reg = Self::default();
        reg.register(Kernel { name: "add", arity: 2, func: add_kernel });
        reg.register(Kernel { name: "sub", arity: 2, func: sub_kernel });
        reg.register(Kernel { name: "mul", arity: 2, func: mul_kernel });
        reg.register(Kernel { name: "div", arity: 2, func: div_kernel });
        reg.register(Kernel { name: "relu", arity: 1, func: relu_kernel });
        reg.register(Kernel { name: "copy", arity: 1, func: copy_kernel });
        reg
    }
}

static REGISTRY: OnceLock<KernelRegistry> = OnceLock::new();

/// Bootstraps the runtime: registers the built-in kernels.
///
/// Safe to call any number of times from any thread; only the first call
/// does work.
pub fn runtime_init() {
    let mut first = false;
    REGISTRY.get_or_init(|| {
        first = true;
        KernelRegistry::builtin()
    });
    if first {
        tracing::info!(kernels = ?registry().map(KernelRegistry::names), "runtime initialized");
    } else {
        tracing::debug!("runtime already initialized");
    }
}

/// The kernel table, once [`runtime_init`] has run.
pub fn registry() -> Option<&'static KernelRegistry> {
    REGISTRY.get()
}

// ── Built-in kernels ───────────────────────────────────────────────

fn add_kernel(inputs: &[&[f32]], out: &mut [f32]) -> Result<(), TensorError> {
    ops::add(inputs[0], inputs[1], out)
}

fn sub_kernel(inputs: &[&[f32]], out: &mut [f32]) -> Result<(), TensorError> {
    ops::sub(inputs[0], inputs[1], out)
}

fn mul_kernel(inputs: &[&[f32]], out: &mut [f32]) -> Result<(), TensorError> {
    ops::mul(inputs[0], inputs[1], out)
}

fn div_kernel(inputs: &[&[f32]], out: &mut [f32]) -> Result<(), TensorError> {
    ops::div(inputs[0], inputs[1], out)
}

fn relu_kernel(inputs: &[&[f32]], out: &mut [f32]) -> Result<(), TensorError> {
    ops::relu(inputs[0], out)
}

fn copy_kernel(inputs: &[&[f32]], out: &mut [f32]) -> Result<(), TensorError> {
    ops::copy(inputs[0], out)
}
