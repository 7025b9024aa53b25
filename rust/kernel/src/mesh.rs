// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editable polygon mesh with maintained incidence tables
//!
//! An indexed vertex/edge/face structure. Handles are stable for the lifetime
//! of the mesh; deleted elements are tombstoned, never reused. Incidence
//! (vertex→edges, edge→faces) is derived data maintained by every mutation,
//! not authoritative state.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Handle to a vertex. Stable until the mesh is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertId(pub(crate) u32);

/// Handle to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u32);

/// Handle to a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub(crate) u32);

impl VertId {
    /// Slot index of this handle
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    position: Point3<f64>,
    alive: bool,
}

#[derive(Debug, Clone)]
struct Edge {
    verts: [VertId; 2],
    alive: bool,
}

#[derive(Debug, Clone)]
struct Face {
    verts: SmallVec<[VertId; 4]>,
    normal: Vector3<f64>,
    material: i32,
    smooth: bool,
    alive: bool,
}

/// Editable polygon mesh
///
/// Owned exclusively by one operator invocation: created from a host
/// snapshot, mutated in place, written back once at the end.
#[derive(Debug, Clone, Default)]
pub struct EditMesh {
    verts: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    /// vertex -> incident edges, insertion-ordered
    vert_edges: Vec<SmallVec<[EdgeId; 6]>>,
    /// edge -> incident faces
    edge_faces: Vec<SmallVec<[FaceId; 2]>>,
    /// normalized (min, max) vertex pair -> edge
    edge_lookup: FxHashMap<(u32, u32), EdgeId>,
}

#[inline]
fn edge_key(a: VertId, b: VertId) -> (u32, u32) {
    if a.0 <= b.0 {
        (a.0, b.0)
    } else {
        (b.0, a.0)
    }
}

impl EditMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    // ---- element creation ----------------------------------------------

    /// Add a vertex at `position`
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertId {
        let id = VertId(self.verts.len() as u32);
        self.verts.push(Vertex {
            position,
            alive: true,
        });
        self.vert_edges.push(SmallVec::new());
        id
    }

    /// Add an edge between two live vertices. Returns the existing edge if
    /// one already connects the pair.
    pub fn add_edge(&mut self, a: VertId, b: VertId) -> Result<EdgeId> {
        if a == b {
            return Err(Error::InvalidLoop(format!("self edge at {:?}", a)));
        }
        self.check_vert(a)?;
        self.check_vert(b)?;
        if let Some(&e) = self.edge_lookup.get(&edge_key(a, b)) {
            return Ok(e);
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            verts: [a, b],
            alive: true,
        });
        self.edge_faces.push(SmallVec::new());
        self.edge_lookup.insert(edge_key(a, b), id);
        self.vert_edges[a.index()].push(id);
        self.vert_edges[b.index()].push(id);
        Ok(id)
    }

    /// Add a face from an ordered vertex loop (≥ 3 distinct live vertices).
    /// Boundary edges are created as needed; the normal is computed from the
    /// loop via Newell's method.
    pub fn add_face(&mut self, loop_verts: &[VertId]) -> Result<FaceId> {
        self.add_face_with(loop_verts, 0, false)
    }

    /// `add_face` with explicit material index and smooth flag
    pub fn add_face_with(
        &mut self,
        loop_verts: &[VertId],
        material: i32,
        smooth: bool,
    ) -> Result<FaceId> {
        if loop_verts.len() < 3 {
            return Err(Error::InvalidLoop(format!(
                "face loop has {} vertices",
                loop_verts.len()
            )));
        }
        for &v in loop_verts {
            self.check_vert(v)?;
        }
        for (i, &v) in loop_verts.iter().enumerate() {
            if loop_verts[i + 1..].contains(&v) {
                return Err(Error::InvalidLoop(format!("repeated vertex {:?}", v)));
            }
        }

        let id = FaceId(self.faces.len() as u32);
        let normal = self.newell_normal(loop_verts);
        self.faces.push(Face {
            verts: SmallVec::from_slice(loop_verts),
            normal,
            material,
            smooth,
            alive: true,
        });
        for i in 0..loop_verts.len() {
            let a = loop_verts[i];
            let b = loop_verts[(i + 1) % loop_verts.len()];
            let e = self.add_edge(a, b)?;
            self.edge_faces[e.index()].push(id);
        }
        Ok(id)
    }

    // ---- element removal -----------------------------------------------

    /// Remove a face, unregistering it from its boundary edges
    pub fn remove_face(&mut self, f: FaceId) {
        if !self.face_alive(f) {
            return;
        }
        let loop_verts: SmallVec<[VertId; 4]> = self.faces[f.index()].verts.clone();
        for i in 0..loop_verts.len() {
            let a = loop_verts[i];
            let b = loop_verts[(i + 1) % loop_verts.len()];
            if let Some(&e) = self.edge_lookup.get(&edge_key(a, b)) {
                self.edge_faces[e.index()].retain(|&mut x| x != f);
            }
        }
        self.faces[f.index()].alive = false;
    }

    /// Remove a wire edge. Edges still referenced by faces are left alone.
    pub fn remove_edge(&mut self, e: EdgeId) {
        if !self.edge_alive(e) || !self.edge_faces[e.index()].is_empty() {
            return;
        }
        let [a, b] = self.edges[e.index()].verts;
        self.vert_edges[a.index()].retain(|&mut x| x != e);
        self.vert_edges[b.index()].retain(|&mut x| x != e);
        self.edge_lookup.remove(&edge_key(a, b));
        self.edges[e.index()].alive = false;
    }

    /// Remove an isolated vertex. Vertices with incident edges are left alone.
    pub fn remove_vertex(&mut self, v: VertId) {
        if !self.vert_alive(v) || !self.vert_edges[v.index()].is_empty() {
            return;
        }
        self.verts[v.index()].alive = false;
    }

    // ---- queries --------------------------------------------------------

    #[inline]
    pub fn vert_alive(&self, v: VertId) -> bool {
        self.verts.get(v.index()).map(|x| x.alive).unwrap_or(false)
    }

    #[inline]
    pub fn edge_alive(&self, e: EdgeId) -> bool {
        self.edges.get(e.index()).map(|x| x.alive).unwrap_or(false)
    }

    #[inline]
    pub fn face_alive(&self, f: FaceId) -> bool {
        self.faces.get(f.index()).map(|x| x.alive).unwrap_or(false)
    }

    #[inline]
    pub fn position(&self, v: VertId) -> Point3<f64> {
        self.verts[v.index()].position
    }

    #[inline]
    pub fn set_position(&mut self, v: VertId, position: Point3<f64>) {
        self.verts[v.index()].position = position;
    }

    /// The two endpoints of an edge
    #[inline]
    pub fn edge_verts(&self, e: EdgeId) -> [VertId; 2] {
        self.edges[e.index()].verts
    }

    /// Ordered vertex loop of a face
    #[inline]
    pub fn face_verts(&self, f: FaceId) -> &[VertId] {
        &self.faces[f.index()].verts
    }

    #[inline]
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        self.faces[f.index()].normal
    }

    #[inline]
    pub fn face_material(&self, f: FaceId) -> i32 {
        self.faces[f.index()].material
    }

    #[inline]
    pub fn set_face_material(&mut self, f: FaceId, material: i32) {
        self.faces[f.index()].material = material;
    }

    #[inline]
    pub fn face_smooth(&self, f: FaceId) -> bool {
        self.faces[f.index()].smooth
    }

    #[inline]
    pub fn set_face_smooth(&mut self, f: FaceId, smooth: bool) {
        self.faces[f.index()].smooth = smooth;
    }

    /// Incident edges of a vertex, in insertion order
    #[inline]
    pub fn vert_edges(&self, v: VertId) -> &[EdgeId] {
        &self.vert_edges[v.index()]
    }

    /// Faces using an edge
    #[inline]
    pub fn edge_faces(&self, e: EdgeId) -> &[FaceId] {
        &self.edge_faces[e.index()]
    }

    /// Look up the edge connecting two vertices, if any
    #[inline]
    pub fn find_edge(&self, a: VertId, b: VertId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Live faces that contain a vertex in their loop
    pub fn vert_faces(&self, v: VertId) -> Vec<FaceId> {
        let mut out = Vec::new();
        for &e in self.vert_edges(v) {
            for &f in self.edge_faces(e) {
                if self.face_alive(f) && !out.contains(&f) {
                    out.push(f);
                }
            }
        }
        out
    }

    /// Iterate live vertex handles
    pub fn vert_ids(&self) -> impl Iterator<Item = VertId> + '_ {
        self.verts
            .iter()
            .enumerate()
            .filter(|(_, v)| v.alive)
            .map(|(i, _)| VertId(i as u32))
    }

    /// Iterate live edge handles
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, _)| EdgeId(i as u32))
    }

    /// Iterate live face handles
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.alive)
            .map(|(i, _)| FaceId(i as u32))
    }

    /// Number of live vertices
    pub fn vertex_count(&self) -> usize {
        self.verts.iter().filter(|v| v.alive).count()
    }

    /// Number of live edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.alive).count()
    }

    /// Number of live faces
    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.alive).count()
    }

    // ---- normals --------------------------------------------------------

    /// Newell's method over an ordered loop; zero for degenerate loops
    pub(crate) fn newell_normal(&self, loop_verts: &[VertId]) -> Vector3<f64> {
        let mut n = Vector3::zeros();
        for i in 0..loop_verts.len() {
            let p = self.position(loop_verts[i]);
            let q = self.position(loop_verts[(i + 1) % loop_verts.len()]);
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }

    /// Recompute the stored normal of one face from its current loop
    pub fn recalc_face_normal(&mut self, f: FaceId) {
        let loop_verts: SmallVec<[VertId; 4]> = self.faces[f.index()].verts.clone();
        self.faces[f.index()].normal = self.newell_normal(&loop_verts);
    }

    /// Recompute stored normals for a face set
    pub fn recalc_face_normals(&mut self, faces: &[FaceId]) {
        for &f in faces {
            if self.face_alive(f) {
                self.recalc_face_normal(f);
            }
        }
    }

    /// Vertex normal: normalized average of live incident face normals.
    /// Zero for wire-only vertices.
    pub fn vertex_normal(&self, v: VertId) -> Vector3<f64> {
        let mut sum = Vector3::zeros();
        let mut seen = 0usize;
        for f in self.vert_faces(v) {
            sum += self.face_normal(f);
            seen += 1;
        }
        if seen == 0 {
            return Vector3::zeros();
        }
        sum.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }

    // ---- internal helpers ----------------------------------------------

    #[inline]
    pub(crate) fn check_vert(&self, v: VertId) -> Result<()> {
        if self.vert_alive(v) {
            Ok(())
        } else {
            Err(Error::DeadElement(format!("{:?}", v)))
        }
    }

    /// Re-point one endpoint of an edge, fixing incidence and lookup.
    /// Used by the split operation; callers guarantee `to` is live.
    pub(crate) fn repoint_edge(&mut self, e: EdgeId, from: VertId, to: VertId) {
        let [a, b] = self.edges[e.index()].verts;
        self.edge_lookup.remove(&edge_key(a, b));
        let verts = if a == from { [to, b] } else { [a, to] };
        self.edges[e.index()].verts = verts;
        self.edge_lookup.insert(edge_key(verts[0], verts[1]), e);
        self.vert_edges[from.index()].retain(|&mut x| x != e);
        self.vert_edges[to.index()].push(e);
    }

    /// Unregister a face from its current boundary edges without deleting it.
    /// Paired with `register_face_edges` by ops that rewrite a loop.
    pub(crate) fn unregister_face_edges(&mut self, f: FaceId) {
        let loop_verts: SmallVec<[VertId; 4]> = self.faces[f.index()].verts.clone();
        for i in 0..loop_verts.len() {
            let a = loop_verts[i];
            let b = loop_verts[(i + 1) % loop_verts.len()];
            if let Some(&e) = self.edge_lookup.get(&edge_key(a, b)) {
                self.edge_faces[e.index()].retain(|&mut x| x != f);
            }
        }
    }

    /// Replace a face's loop and register boundary edges (created as needed)
    pub(crate) fn rewrite_face_loop(&mut self, f: FaceId, loop_verts: &[VertId]) -> Result<()> {
        self.faces[f.index()].verts = SmallVec::from_slice(loop_verts);
        for i in 0..loop_verts.len() {
            let a = loop_verts[i];
            let b = loop_verts[(i + 1) % loop_verts.len()];
            let e = self.add_edge(a, b)?;
            if !self.edge_faces[e.index()].contains(&f) {
                self.edge_faces[e.index()].push(f);
            }
        }
        Ok(())
    }
}
