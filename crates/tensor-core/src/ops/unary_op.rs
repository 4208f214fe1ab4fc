// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise unary operations on `f32` buffers.

use crate::TensorError;

fn check_len(op: &'static str, input: &[f32], out: &[f32]) -> Result<(), TensorError> {
    if input.len() != out.len() {
        return Err(TensorError::ShapeMismatch {
            op,
            lhs: input.len(),
            rhs: out.len(),
        });
    }
    Ok(())
}

/// Rectified linear unit: `out[i] = max(input[i], 0)`.
pub fn relu(input: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    check_len("relu", input, out)?;
    for (d, &x) in out.iter_mut().zip(input) {
        *d = x.max(0.0);
    }
    Ok(())
}

/// Copies `input` into `out`.
pub fn copy(input: &[f32], out: &mut [f32]) -> Result<(), TensorError> {
    check_len("copy", input, out)?;
    out.copy_from_slice(input);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu() {
        let mut out = [9.0; 4];
        relu(&[-1.0, 0.0, 0.5, 3.0], &mut out).unwrap();
        assert_eq!(out, [0.0, 0.0, 0.5, 3.0]);
    }

    #[test]
    fn test_copy() {
        let mut out = [0.0; 2];
        copy(&[1.0, -1.0], &mut out).unwrap();
        assert_eq!(out, [1.0, -1.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut out = [0.0; 2];
        assert!(matches!(
            relu(&[1.0], &mut out),
            Err(TensorError::ShapeMismatch { op: "relu", .. })
        ));
    }
}
