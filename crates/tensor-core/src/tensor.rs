// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor metadata, borrowed tensor views and tagged values.

use crate::{cast, DType, Shape, TensorError};

/// Declared metadata of a method input or output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorInfo {
    dtype: DType,
    shape: Shape,
}

impl TensorInfo {
    pub fn new(dtype: DType, shape: Shape) -> Self {
        Self { dtype, shape }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn sizes(&self) -> &[usize] {
        self.shape.sizes()
    }

    pub fn dim_order(&self) -> &[u8] {
        self.shape.dim_order()
    }

    pub fn numel(&self) -> usize {
        self.shape.num_elements()
    }

    /// Bytes a buffer holding this tensor must have.
    pub fn nbytes(&self) -> usize {
        self.shape.size_bytes(self.dtype)
    }
}

/// A borrowed, read-only tensor: metadata plus someone else's bytes.
///
/// Neither the shape nor the data is owned. The borrow checker ties the
/// view to both, so the caller's buffer cannot be released or mutated
/// while a view over it is alive.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    shape: &'a Shape,
    dtype: DType,
    data: &'a [u8],
}

impl<'a> TensorView<'a> {
    /// Creates a view from raw parts, checking the byte length.
    pub fn from_parts(shape: &'a Shape, dtype: DType, data: &'a [u8]) -> Result<Self, TensorError> {
        let expected = shape.size_bytes(dtype);
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, dtype, data })
    }

    /// Creates an `F32` view over caller-owned floats.
    pub fn from_f32(shape: &'a Shape, values: &'a [f32]) -> Result<Self, TensorError> {
        Self::from_parts(shape, DType::F32, cast::f32_as_bytes(values))
    }

    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn numel(&self) -> usize {
        self.shape.num_elements()
    }

    pub fn nbytes(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Interprets the view as `f32`s.
    ///
    /// Fails if the dtype is not `F32` or the bytes are not 4-byte aligned.
    pub fn as_f32_slice(&self) -> Result<&'a [f32], TensorError> {
        if self.dtype != DType::F32 {
            return Err(TensorError::UnsupportedDType {
                op: "as_f32_slice",
                dtype: self.dtype,
            });
        }
        cast::bytes_as_f32(self.data)
    }

    /// Copies the elements into `out`, which must hold exactly
    /// [`numel`](Self::numel) values. Works regardless of alignment.
    pub fn copy_to_f32(&self, out: &mut [f32]) -> Result<(), TensorError> {
        if self.dtype != DType::F32 {
            return Err(TensorError::UnsupportedDType {
                op: "copy_to_f32",
                dtype: self.dtype,
            });
        }
        if out.len() != self.numel() {
            return Err(TensorError::BufferSizeMismatch {
                expected: self.nbytes(),
                actual: out.len() * DType::F32.size_bytes(),
            });
        }
        cast::f32_as_bytes_mut(out).copy_from_slice(self.data);
        Ok(())
    }
}

/// The kind of an [`EValue`], for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    None,
    Int,
    Double,
    Bool,
    Tensor,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tag::None => "none",
            Tag::Int => "int",
            Tag::Double => "double",
            Tag::Bool => "bool",
            Tag::Tensor => "tensor",
        };
        f.write_str(s)
    }
}

/// A tagged value as seen at a method's input/output boundary.
#[derive(Debug, Clone, Copy)]
pub enum EValue<'a> {
    None,
    Int(i64),
    Double(f64),
    Bool(bool),
    Tensor(TensorView<'a>),
}

impl<'a> EValue<'a> {
    pub fn tag(&self) -> Tag {
        match self {
            EValue::None => Tag::None,
            EValue::Int(_) => Tag::Int,
            EValue::Double(_) => Tag::Double,
            EValue::Bool(_) => Tag::Bool,
            EValue::Tensor(_) => Tag::Tensor,
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, EValue::Tensor(_))
    }

    /// Returns the tensor view, or `None` for any other tag.
    pub fn to_tensor(&self) -> Option<TensorView<'a>> {
        match self {
            EValue::Tensor(t) => Some(*t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_info_nbytes() {
        let info = TensorInfo::new(DType::F32, Shape::contiguous(vec![2, 3]));
        assert_eq!(info.numel(), 6);
        assert_eq!(info.nbytes(), 24);
        assert_eq!(info.dim_order(), &[0, 1]);
    }

    #[test]
    fn test_view_over_f32() {
        let shape = Shape::vector(3);
        let data = [1.0f32, 2.0, 3.0];
        let v = TensorView::from_f32(&shape, &data).unwrap();
        assert_eq!(v.numel(), 3);
        assert_eq!(v.nbytes(), 12);
        assert_eq!(v.as_f32_slice().unwrap(), &data);
    }

    #[test]
    fn test_view_size_mismatch() {
        let shape = Shape::vector(2);
        let data = [1.0f32, 2.0, 3.0];
        assert_eq!(
            TensorView::from_f32(&shape, &data).unwrap_err(),
            TensorError::BufferSizeMismatch {
                expected: 8,
                actual: 12
            }
        );
    }

    #[test]
    fn test_copy_to_f32() {
        let shape = Shape::vector(2);
        let data = [4.0f32, 5.0];
        let v = TensorView::from_f32(&shape, &data).unwrap();
        let mut out = [0.0f32; 2];
        v.copy_to_f32(&mut out).unwrap();
        assert_eq!(out, data);

        let mut short = [0.0f32; 1];
        assert!(v.copy_to_f32(&mut short).is_err());
    }

    #[test]
    fn test_non_f32_view() {
        let shape = Shape::vector(2);
        let bytes = [0u8; 16];
        let v = TensorView::from_parts(&shape, DType::I64, &bytes).unwrap();
        assert!(matches!(
            v.as_f32_slice(),
            Err(TensorError::UnsupportedDType { .. })
        ));
    }

    #[test]
    fn test_evalue_tags() {
        let shape = Shape::scalar();
        let data = [1.0f32];
        let t = EValue::Tensor(TensorView::from_f32(&shape, &data).unwrap());
        assert!(t.is_tensor());
        assert_eq!(t.tag(), Tag::Tensor);
        assert!(t.to_tensor().is_some());

        let i = EValue::Int(3);
        assert!(!i.is_tensor());
        assert!(i.to_tensor().is_none());
        assert_eq!(i.tag().to_string(), "int");
    }
}
