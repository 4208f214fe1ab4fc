// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Byte reinterpretation for `f32` buffers.

use crate::TensorError;

const F32_ALIGN: usize = std::mem::align_of::<f32>();
const F32_SIZE: usize = std::mem::size_of::<f32>();

/// Views `f32`s as their native-endian bytes.
pub fn f32_as_bytes(values: &[f32]) -> &[u8] {
    // SAFETY: every f32 bit pattern is a valid sequence of 4 bytes, and u8
    // has no alignment requirement.
    unsafe { std::slice::from_raw_parts(values.as_ptr() as *const u8, std::mem::size_of_val(values)) }
}

/// Mutable variant of [`f32_as_bytes`].
pub fn f32_as_bytes_mut(values: &mut [f32]) -> &mut [u8] {
    // SAFETY: as above; any byte pattern written back is a valid f32.
    unsafe {
        std::slice::from_raw_parts_mut(values.as_mut_ptr() as *mut u8, std::mem::size_of_val(values))
    }
}

fn check_f32_layout(bytes: &[u8]) -> Result<(), TensorError> {
    let addr = bytes.as_ptr() as usize;
    if addr % F32_ALIGN != 0 {
        return Err(TensorError::Misaligned {
            addr,
            align: F32_ALIGN,
        });
    }
    if bytes.len() % F32_SIZE != 0 {
        return Err(TensorError::BufferSizeMismatch {
            expected: bytes.len() / F32_SIZE * F32_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Views bytes as `f32`s, checking alignment and length.
pub fn bytes_as_f32(bytes: &[u8]) -> Result<&[f32], TensorError> {
    check_f32_layout(bytes)?;
    // SAFETY: alignment and length checked above.
    Ok(unsafe { std::slice::from_raw_parts(bytes.as_ptr() as *const f32, bytes.len() / F32_SIZE) })
}

/// Mutable variant of [`bytes_as_f32`].
pub fn bytes_as_f32_mut(bytes: &mut [u8]) -> Result<&mut [f32], TensorError> {
    check_f32_layout(bytes)?;
    // SAFETY: alignment and length checked above.
    Ok(unsafe {
        std::slice::from_raw_parts_mut(bytes.as_mut_ptr() as *mut f32, bytes.len() / F32_SIZE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_bytes() {
        let mut values = [1.5f32, -2.0];
        assert_eq!(f32_as_bytes(&values).len(), 8);
        f32_as_bytes_mut(&mut values)[..4].copy_from_slice(&3.0f32.to_ne_bytes());
        assert_eq!(values[0], 3.0);
        assert_eq!(bytes_as_f32(f32_as_bytes(&values)).unwrap(), &[3.0, -2.0]);
    }

    #[test]
    fn test_misaligned_rejected() {
        let values = [0.0f32; 4];
        let bytes = f32_as_bytes(&values);
        assert!(matches!(
            bytes_as_f32(&bytes[1..5]),
            Err(TensorError::Misaligned { align: 4, .. })
        ));
    }

    #[test]
    fn test_ragged_length_rejected() {
        let values = [0.0f32; 2];
        let bytes = f32_as_bytes(&values);
        assert!(matches!(
            bytes_as_f32(&bytes[..6]),
            Err(TensorError::BufferSizeMismatch { actual: 6, .. })
        ));
    }
}
