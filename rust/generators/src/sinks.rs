// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host sink descriptions
//!
//! Opaque configuration the generators produce for the host to apply:
//! vertex groups for masking and modifier-stack entries. The core writes
//! these blobs but never interprets them.

use serde::{Deserialize, Serialize};

/// Named vertex group with per-vertex weights, addressed by persisted
/// (post-commit) vertex indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexGroupSpec {
    pub name: String,
    /// (vertex index, weight) pairs
    pub entries: Vec<(u32, f32)>,
}

impl VertexGroupSpec {
    /// Create a group assigning unit weight to each vertex index
    pub fn with_unit_weights(name: impl Into<String>, indices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            entries: indices.into_iter().map(|i| (i, 1.0)).collect(),
        }
    }
}

/// Modifier-stack entry for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierSpec {
    /// Smoothing subdivision surface
    Subdivision { levels: u32, render_levels: u32 },
    /// Visibility mask driven by a vertex group
    Mask {
        vertex_group: String,
        invert_vertex_group: bool,
        show_render: bool,
        show_in_editmode: bool,
    },
    /// Shell thickness for lathe profiles
    Solidify {
        thickness: f64,
        edge_crease_outer: f64,
        edge_crease_inner: f64,
        use_even_offset: bool,
        use_quality_normals: bool,
    },
    /// Lathe revolution
    Screw { steps: u32, render_steps: u32 },
}
