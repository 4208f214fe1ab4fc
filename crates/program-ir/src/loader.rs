// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sources of program bytes.
//!
//! [`Program::load`](crate::Program::load) never copies the container; it
//! asks a [`DataLoader`] for the header and the body in place. Two loaders
//! are provided:
//!
//! - [`BufferDataLoader`] — wraps a byte slice already in memory (the
//!   compiled-in model).
//! - [`FileDataLoader`] — memory-maps a file from disk.

use crate::ProgramError;
use std::path::{Path, PathBuf};

/// Random access to a program's bytes.
pub trait DataLoader {
    /// Returns `size` bytes starting at `offset`.
    fn load(&self, offset: usize, size: usize) -> Result<&[u8], ProgramError>;

    /// Total number of bytes available.
    fn size(&self) -> usize;
}

fn slice_at(bytes: &[u8], offset: usize, size: usize) -> Result<&[u8], ProgramError> {
    offset
        .checked_add(size)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(ProgramError::ReadOutOfRange {
            offset,
            size,
            available: bytes.len(),
        })
}

/// Zero-copy loader over borrowed bytes.
#[derive(Debug, Clone, Copy)]
pub struct BufferDataLoader<'a> {
    data: &'a [u8],
}

impl<'a> BufferDataLoader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl DataLoader for BufferDataLoader<'_> {
    fn load(&self, offset: usize, size: usize) -> Result<&[u8], ProgramError> {
        slice_at(self.data, offset, size)
    }

    fn size(&self) -> usize {
        self.data.len()
    }
}

/// Loader over a memory-mapped file.
pub struct FileDataLoader {
    path: PathBuf,
    mmap: memmap2::Mmap,
}

impl FileDataLoader {
    /// Opens and maps `path` read-only.
    pub fn open(path: &Path) -> Result<Self, ProgramError> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the map is read-only and the file is not expected to be
        // modified by another process while a program is loaded from it.
        let mmap = unsafe { memmap2::Mmap::map(&file) }?;
        tracing::debug!(path = %path.display(), bytes = mmap.len(), "program file mapped");
        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataLoader for FileDataLoader {
    fn load(&self, offset: usize, size: usize) -> Result<&[u8], ProgramError> {
        slice_at(&self.mmap, offset, size)
    }

    fn size(&self) -> usize {
        self.mmap.len()
    }
}

impl std::fmt::Debug for FileDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDataLoader")
            .field("path", &self.path)
            .field("size", &self.mmap.len())
            .finish()
    }
}
