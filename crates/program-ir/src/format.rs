// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Binary container framing.
//!
//! ```text
//! offset 0   8 bytes  magic  "EIRPROG\0"
//! offset 8   u32 LE   format version
//! offset 12  u32 LE   body length N
//! offset 16  N bytes  UTF-8 JSON body (ProgramDef)
//! ```

use crate::{ProgramDef, ProgramError};

pub const MAGIC: &[u8; 8] = b"EIRPROG\0";
pub const FORMAT_VERSION: u32 = 1;
pub const HEADER_LEN: usize = 16;

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub body_len: usize,
}

impl Header {
    /// Parses the first [`HEADER_LEN`] bytes of a container.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProgramError> {
        if bytes.len() < HEADER_LEN {
            return Err(ProgramError::Truncated {
                declared: HEADER_LEN,
                available: bytes.len(),
            });
        }
        if &bytes[..8] != MAGIC {
            return Err(ProgramError::BadMagic {
                found: bytes[..8].to_vec(),
            });
        }
        let version = read_u32_le(&bytes[8..12]);
        if version != FORMAT_VERSION {
            return Err(ProgramError::UnsupportedVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }
        let body_len = read_u32_le(&bytes[12..16]) as usize;
        Ok(Self { version, body_len })
    }
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

/// Serializes a program description into a container.
pub fn encode(def: &ProgramDef) -> Result<Vec<u8>, ProgramError> {
    let body = serde_json::to_vec(def)?;
    let body_len = u32::try_from(body.len())
        .map_err(|_| ProgramError::invalid("<container>", "body exceeds u32::MAX bytes"))?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&body_len.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Splits a complete container into its description, without validation.
pub fn decode(bytes: &[u8]) -> Result<ProgramDef, ProgramError> {
    let header = Header::parse(bytes)?;
    let body = bytes
        .get(HEADER_LEN..HEADER_LEN + header.body_len)
        .ok_or(ProgramError::Truncated {
            declared: header.body_len,
            available: bytes.len().saturating_sub(HEADER_LEN),
        })?;
    Ok(serde_json::from_slice(body)?)
}
