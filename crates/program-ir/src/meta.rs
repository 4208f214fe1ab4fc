// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Method metadata: what a host needs to know before instantiating a method.

use crate::{MethodPlan, ProgramError, Value};
use std::fmt;
use tensor_core::{Tag, TensorInfo};

/// Read-only view over one method's signature and memory plan.
#[derive(Debug, Clone, Copy)]
pub struct MethodMeta<'a> {
    plan: &'a MethodPlan,
}

impl<'a> MethodMeta<'a> {
    pub(crate) fn new(plan: &'a MethodPlan) -> Self {
        Self { plan }
    }

    pub fn name(&self) -> &'a str {
        &self.plan.name
    }

    pub fn num_inputs(&self) -> usize {
        self.plan.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.plan.outputs.len()
    }

    pub fn num_instructions(&self) -> usize {
        self.plan.instructions.len()
    }

    pub fn num_memory_planned_buffers(&self) -> usize {
        self.plan.planned_buffers.len()
    }

    /// Size in bytes of planned buffer `id`.
    pub fn memory_planned_buffer_size(&self, id: usize) -> Result<usize, ProgramError> {
        self.plan
            .planned_buffers
            .get(id)
            .copied()
            .ok_or(ProgramError::IndexOutOfRange {
                what: "planned buffer",
                index: id,
                len: self.plan.planned_buffers.len(),
            })
    }

    /// Tag of input `index`.
    pub fn input_tag(&self, index: usize) -> Result<Tag, ProgramError> {
        self.value_at("input", &self.plan.inputs, index).map(Value::tag)
    }

    /// Declared dtype and shape of input `index`.
    pub fn input_tensor_meta(&self, index: usize) -> Result<TensorInfo, ProgramError> {
        self.tensor_at("input", &self.plan.inputs, index)
    }

    /// Declared dtype and shape of output `index`.
    pub fn output_tensor_meta(&self, index: usize) -> Result<TensorInfo, ProgramError> {
        self.tensor_at("output", &self.plan.outputs, index)
    }

    fn value_at(
        &self,
        what: &'static str,
        list: &[usize],
        index: usize,
    ) -> Result<&'a Value, ProgramError> {
        let plan: &'a MethodPlan = self.plan;
        list.get(index)
            .and_then(|&v| plan.values.get(v))
            .ok_or(ProgramError::IndexOutOfRange {
                what,
                index,
                len: list.len(),
            })
    }

    fn tensor_at(
        &self,
        what: &'static str,
        list: &[usize],
        index: usize,
    ) -> Result<TensorInfo, ProgramError> {
        let value = self.value_at(what, list, index)?;
        value
            .as_tensor()
            .map(|t| t.info.clone())
            .ok_or_else(|| ProgramError::invalid(self.name(), format!("{what} {index} is a {}", value.tag())))
    }
}

impl fmt::Display for MethodMeta<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} input(s), {} output(s), {} instruction(s), planned buffers {:?}",
            self.name(),
            self.num_inputs(),
            self.num_outputs(),
            self.num_instructions(),
            self.plan.planned_buffers
        )
    }
}
