// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing mesh snapshot
//!
//! Flat polygon-mesh buffers exchanged with the host. An operator reads one
//! snapshot in, edits a private [`EditMesh`], and writes one snapshot back:
//! the host never observes a partially mutated mesh.

use crate::error::{Error, Result};
use crate::mesh::{EdgeId, EditMesh, VertId};
use nalgebra::Point3;
use rustc_hash::FxHashMap;

/// Flat polygon mesh as exchanged with the host
#[derive(Debug, Clone, Default)]
pub struct MeshSnapshot {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Edge vertex indices (v0, v1), including face boundary edges
    pub edges: Vec<u32>,
    /// Flattened face vertex indices
    pub loops: Vec<u32>,
    /// Offset of each face's loop in `loops`
    pub loop_starts: Vec<u32>,
    /// Per-face material index
    pub materials: Vec<i32>,
    /// Per-face smooth flag
    pub smooth: Vec<bool>,
}

/// [`EditMesh`] imported from a snapshot, with handle tables for addressing
/// snapshot elements by index
#[derive(Debug, Clone)]
pub struct ImportedMesh {
    pub mesh: EditMesh,
    /// Handle of snapshot vertex `i`
    pub verts: Vec<VertId>,
    /// Handle of snapshot edge `i`
    pub edges: Vec<EdgeId>,
}

impl MeshSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex, returning its index
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.extend_from_slice(&[x, y, z]);
        idx
    }

    /// Append an edge between two vertex indices, returning its index
    pub fn add_edge(&mut self, a: u32, b: u32) -> u32 {
        let idx = (self.edges.len() / 2) as u32;
        self.edges.extend_from_slice(&[a, b]);
        idx
    }

    /// Append a face from a vertex-index loop, returning its index
    pub fn add_face(&mut self, loop_verts: &[u32], material: i32, smooth: bool) -> u32 {
        let idx = self.face_count() as u32;
        self.loop_starts.push(self.loops.len() as u32);
        self.loops.extend_from_slice(loop_verts);
        self.materials.push(material);
        self.smooth.push(smooth);
        idx
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.loop_starts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex-index loop of face `f`
    pub fn face_loop(&self, f: usize) -> &[u32] {
        let start = self.loop_starts[f] as usize;
        let end = self
            .loop_starts
            .get(f + 1)
            .map(|&s| s as usize)
            .unwrap_or(self.loops.len());
        &self.loops[start..end]
    }
}

impl EditMesh {
    /// Build an editable mesh from a host snapshot.
    ///
    /// Vertices, explicit edges and faces are imported in snapshot order, so
    /// the returned handle tables address snapshot elements directly.
    pub fn from_snapshot(snapshot: &MeshSnapshot) -> Result<ImportedMesh> {
        let mut mesh = EditMesh::new();
        let vcount = snapshot.vertex_count() as u32;

        let verts: Vec<VertId> = snapshot
            .positions
            .chunks_exact(3)
            .map(|p| mesh.add_vertex(Point3::new(p[0], p[1], p[2])))
            .collect();

        let mut edges = Vec::with_capacity(snapshot.edge_count());
        for pair in snapshot.edges.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            if a >= vcount || b >= vcount {
                return Err(Error::InvalidSnapshot(format!(
                    "edge ({}, {}) out of range",
                    a, b
                )));
            }
            edges.push(mesh.add_edge(verts[a as usize], verts[b as usize])?);
        }

        for f in 0..snapshot.face_count() {
            let loop_ids = snapshot.face_loop(f);
            if loop_ids.iter().any(|&v| v >= vcount) {
                return Err(Error::InvalidSnapshot(format!("face {} out of range", f)));
            }
            let loop_verts: Vec<VertId> =
                loop_ids.iter().map(|&v| verts[v as usize]).collect();
            mesh.add_face_with(&loop_verts, snapshot.materials[f], snapshot.smooth[f])?;
        }

        Ok(ImportedMesh { mesh, verts, edges })
    }

    /// Compact the mesh into a snapshot for the host, together with the
    /// handle → persisted-index map (vertex group sinks record persisted
    /// indices, not edit handles).
    pub fn to_snapshot(&self) -> (MeshSnapshot, FxHashMap<VertId, u32>) {
        let mut snapshot = MeshSnapshot::new();
        let mut index_of: FxHashMap<VertId, u32> = FxHashMap::default();

        for v in self.vert_ids() {
            let p = self.position(v);
            index_of.insert(v, snapshot.add_vertex(p.x, p.y, p.z));
        }
        for e in self.edge_ids() {
            let [a, b] = self.edge_verts(e);
            snapshot.add_edge(index_of[&a], index_of[&b]);
        }
        for f in self.face_ids() {
            let loop_ids: Vec<u32> = self.face_verts(f).iter().map(|v| index_of[v]).collect();
            snapshot.add_face(&loop_ids, self.face_material(f), self.face_smooth(f));
        }

        (snapshot, index_of)
    }
}
