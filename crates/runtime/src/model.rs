// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The bundled model.

/// A program whose `forward` method adds two single-element `f32` tensors.
///
/// Built from `models/add.json` with `edge-loader pack`.
pub const ADD_MODEL: &[u8] = include_bytes!("../models/add.pte");
