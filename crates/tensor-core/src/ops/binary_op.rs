// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise binary arithmetic on `f32` buffers.

use crate::TensorError;

/// Elementwise binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
        }
    }

    #[inline(always)]
    fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
        }
    }
}

/// Computes `out[i] = lhs[i] (op) rhs[i]`.
///
/// A single-element operand is broadcast against the other one.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if the operands cannot be
/// broadcast together or `out` has the wrong length.
pub fn binary(op: BinaryOp, lhs: &[f32], rhs: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    let n = lhs.len().max(rhs.len());
    let broadcastable = lhs.len() == rhs.len() || lhs.len() == 1 || rhs.len() == 1;
    if !broadcastable {
        return Err(TensorError::ShapeMismatch {
            op: op.name(),
            lhs: lhs.len(),
            rhs: rhs.len(),
        });
    }
    if out.len() != n {
        return Err(TensorError::ShapeMismatch {
            op: op.name(),
            lhs: n,
            rhs: out.len(),
        });
    }

    match (lhs.len(), rhs.len()) {
        (l, r) if l == r => {
            for ((d, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
                *d = op.apply(a, b);
            }
        }
        (1, _) => {
            let a = lhs[0];
            for (d, &b) in out.iter_mut().zip(rhs) {
                *d = op.apply(a, b);
            }
        }
        _ => {
            let b = rhs[0];
            for (d, &a) in out.iter_mut().zip(lhs) {
                *d = op.apply(a, b);
            }
        }
    }
    Ok(())
}

pub fn add(lhs: &[f32], rhs: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    binary(BinaryOp::Add, lhs, rhs, out)
}

pub fn sub(lhs: &[f32], rhs: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    binary(BinaryOp::Sub, lhs, rhs, out)
}

pub fn mul(lhs: &[f32], rhs: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    binary(BinaryOp::Mul, lhs, rhs, out)
}

/// Division follows IEEE 754: dividing by zero yields an infinity or NaN.
pub fn div(lhs: &[f32], rhs: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    binary(BinaryOp::Div, lhs, rhs, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_scalars() {
        let mut out = [0.0];
        add(&[2.0], &[3.0], &mut out).unwrap();
        assert_eq!(out, [5.0]);
    }

    #[test]
    fn test_elementwise() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let mut out = [0.0; 3];

        sub(&a, &b, &mut out).unwrap();
        assert_eq!(out, [-3.0, -3.0, -3.0]);
        mul(&a, &b, &mut out).unwrap();
        assert_eq!(out, [4.0, 10.0, 18.0]);
        div(&b, &a, &mut out).unwrap();
        assert_eq!(out, [4.0, 2.5, 2.0]);
    }

    #[test]
    fn test_broadcast_single_element() {
        let mut out = [0.0; 3];
        mul(&[2.0], &[1.0, 2.0, 3.0], &mut out).unwrap();
        assert_eq!(out, [2.0, 4.0, 6.0]);
        sub(&[1.0, 2.0, 3.0], &[1.0], &mut out).unwrap();
        assert_eq!(out, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut out = [0.0; 3];
        assert_eq!(
            add(&[1.0, 2.0], &[1.0, 2.0, 3.0], &mut out),
            Err(TensorError::ShapeMismatch {
                op: "add",
                lhs: 2,
                rhs: 3
            })
        );
        let mut short = [0.0; 1];
        assert!(add(&[1.0, 2.0], &[1.0, 2.0], &mut short).is_err());
    }

    #[test]
    fn test_div_by_zero_is_infinite() {
        let mut out = [0.0];
        div(&[1.0], &[0.0], &mut out).unwrap();
        assert!(out[0].is_infinite());
    }
}
