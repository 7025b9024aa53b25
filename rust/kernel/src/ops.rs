// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh edit operations
//!
//! Every operation returns the geometry it created as explicit handle sets;
//! there is no selection state threaded between calls.

use crate::error::{Error, Result};
use crate::mesh::{EdgeId, EditMesh, FaceId, VertId};
use nalgebra::{Matrix4, Vector3};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Result of [`EditMesh::extrude_vert`]
#[derive(Debug, Clone, Copy)]
pub struct VertExtrusion {
    /// The clone left behind at the seed position
    pub anchor: VertId,
    /// Edge connecting the seed vertex to its clone
    pub edge: EdgeId,
}

/// Result of [`EditMesh::extrude_edges`]
#[derive(Debug, Clone, Default)]
pub struct EdgeExtrusion {
    /// Cloned vertices, one per distinct endpoint, in creation order
    pub verts: Vec<VertId>,
    /// Offset-ring edges, one per input edge
    pub edges: Vec<EdgeId>,
    /// Bridge quads, one per input edge
    pub faces: Vec<FaceId>,
}

/// Result of [`EditMesh::extrude_discrete_faces`]
#[derive(Debug, Clone, Default)]
pub struct FaceExtrusion {
    /// Moved cap faces, one per input face
    pub cap_faces: Vec<FaceId>,
    /// Side-wall quads ringing each cell
    pub side_faces: Vec<FaceId>,
    /// Cloned cap vertices
    pub verts: Vec<VertId>,
}

/// Result of [`EditMesh::subdivide_edges`]
#[derive(Debug, Clone, Default)]
pub struct Subdivision {
    /// Cut vertices, grouped per input edge in order along it
    pub new_verts: Vec<VertId>,
    /// All resulting sub-edges
    pub edges: Vec<EdgeId>,
}

impl EditMesh {
    /// Translate a vertex set by a fixed vector
    pub fn translate(&mut self, verts: &[VertId], delta: Vector3<f64>) {
        for &v in verts {
            let p = self.position(v);
            self.set_position(v, p + delta);
        }
    }

    /// Apply an affine transform to a vertex set
    pub fn transform(&mut self, verts: &[VertId], matrix: &Matrix4<f64>) {
        for &v in verts {
            let p = self.position(v);
            self.set_position(v, matrix.transform_point(&p));
        }
    }

    /// Duplicate a face with fresh vertices and edges at the same positions.
    /// Material and smooth flag are carried over.
    pub fn duplicate_face(&mut self, f: FaceId) -> Result<FaceId> {
        if !self.face_alive(f) {
            return Err(Error::DeadElement(format!("{:?}", f)));
        }
        let loop_verts: SmallVec<[VertId; 4]> = SmallVec::from_slice(self.face_verts(f));
        let material = self.face_material(f);
        let smooth = self.face_smooth(f);
        let clones: SmallVec<[VertId; 4]> = loop_verts
            .iter()
            .map(|&v| self.add_vertex(self.position(v)))
            .collect();
        self.add_face_with(&clones, material, smooth)
    }

    /// Clone a vertex in place and connect seed and clone with an edge.
    /// The caller typically moves the seed vertex afterwards, leaving the
    /// clone anchored at the original position.
    pub fn extrude_vert(&mut self, v: VertId) -> Result<VertExtrusion> {
        self.check_vert(v)?;
        let anchor = self.add_vertex(self.position(v));
        let edge = self.add_edge(v, anchor)?;
        Ok(VertExtrusion { anchor, edge })
    }

    /// Extrude an edge set: clone the ring, bridge seeds and clones with
    /// quads. Endpoints shared between input edges are cloned once. The
    /// returned `edges` are only the offset-ring edges, one per input edge.
    pub fn extrude_edges(&mut self, edges: &[EdgeId]) -> Result<EdgeExtrusion> {
        let mut out = EdgeExtrusion::default();
        let mut clones: FxHashMap<VertId, VertId> = FxHashMap::default();
        for &e in edges {
            if !self.edge_alive(e) {
                return Err(Error::DeadElement(format!("{:?}", e)));
            }
            let [a, b] = self.edge_verts(e);
            let ca = match clones.get(&a) {
                Some(&c) => c,
                None => {
                    let c = self.add_vertex(self.position(a));
                    self.add_edge(a, c)?;
                    clones.insert(a, c);
                    out.verts.push(c);
                    c
                }
            };
            let cb = match clones.get(&b) {
                Some(&c) => c,
                None => {
                    let c = self.add_vertex(self.position(b));
                    self.add_edge(b, c)?;
                    clones.insert(b, c);
                    out.verts.push(c);
                    c
                }
            };
            let ring = self.add_edge(ca, cb)?;
            let quad = self.add_face(&[a, b, cb, ca])?;
            out.edges.push(ring);
            out.faces.push(quad);
        }
        Ok(out)
    }

    /// Extrude each face into its own independent cell: the loop is cloned,
    /// the cap re-built on the clones, side quads ring the cell, and the seed
    /// face is removed. Shared seed vertices are still cloned per face.
    pub fn extrude_discrete_faces(&mut self, faces: &[FaceId]) -> Result<FaceExtrusion> {
        let mut out = FaceExtrusion::default();
        for &f in faces {
            if !self.face_alive(f) {
                return Err(Error::DeadElement(format!("{:?}", f)));
            }
            let loop_verts: SmallVec<[VertId; 4]> = SmallVec::from_slice(self.face_verts(f));
            let material = self.face_material(f);
            let smooth = self.face_smooth(f);
            let clones: SmallVec<[VertId; 4]> = loop_verts
                .iter()
                .map(|&v| self.add_vertex(self.position(v)))
                .collect();
            out.verts.extend(clones.iter().copied());

            let cap = self.add_face_with(&clones, material, smooth)?;
            out.cap_faces.push(cap);
            for i in 0..loop_verts.len() {
                let j = (i + 1) % loop_verts.len();
                let side =
                    self.add_face(&[loop_verts[i], loop_verts[j], clones[j], clones[i]])?;
                out.side_faces.push(side);
            }
            self.remove_face(f);
        }
        Ok(out)
    }

    /// Detach an edge set from all geometry outside it.
    ///
    /// Every endpoint that also carries unselected edges or faces is cloned;
    /// the outside connectivity moves to the clone while the selected edges
    /// keep the original vertices and become wire. Face loops crossing a
    /// selected edge are rebuilt on the clones.
    pub fn split_edges(&mut self, edges: &[EdgeId]) -> Result<()> {
        let selected: FxHashSet<EdgeId> = edges.iter().copied().collect();
        for &e in edges {
            if !self.edge_alive(e) {
                return Err(Error::DeadElement(format!("{:?}", e)));
            }
        }

        // endpoints with outside connectivity get a clone
        let mut clone_map: FxHashMap<VertId, VertId> = FxHashMap::default();
        let mut endpoints: Vec<VertId> = Vec::new();
        for &e in edges {
            for v in self.edge_verts(e) {
                if !endpoints.contains(&v) {
                    endpoints.push(v);
                }
            }
        }
        for &v in &endpoints {
            let has_outside_edge = self
                .vert_edges(v)
                .iter()
                .any(|ie| !selected.contains(ie));
            let has_face = !self.vert_faces(v).is_empty();
            if has_outside_edge || has_face {
                let c = self.add_vertex(self.position(v));
                clone_map.insert(v, c);
            }
        }
        if clone_map.is_empty() {
            return Ok(());
        }

        // faces touching a cloned vertex get their loops rebuilt
        let mut affected: Vec<FaceId> = Vec::new();
        for &v in clone_map.keys() {
            for f in self.vert_faces(v) {
                if !affected.contains(&f) {
                    affected.push(f);
                }
            }
        }
        affected.sort();
        for &f in &affected {
            self.unregister_face_edges(f);
        }

        // outside edges move over to the clones
        for (&v, &c) in clone_map.iter() {
            let outside: Vec<EdgeId> = self
                .vert_edges(v)
                .iter()
                .copied()
                .filter(|e| !selected.contains(e))
                .collect();
            for e in outside {
                self.repoint_edge(e, v, c);
            }
        }

        for &f in &affected {
            let new_loop: SmallVec<[VertId; 4]> = self
                .face_verts(f)
                .iter()
                .map(|v| clone_map.get(v).copied().unwrap_or(*v))
                .collect();
            self.rewrite_face_loop(f, &new_loop)?;
        }
        Ok(())
    }

    /// Subdivide wire edges into `cuts + 1` collinear sub-edges each.
    /// Edges still bounding faces are rejected; detach them first with
    /// [`EditMesh::split_edges`].
    pub fn subdivide_edges(&mut self, edges: &[EdgeId], cuts: u32) -> Result<Subdivision> {
        let mut out = Subdivision::default();
        if cuts == 0 {
            out.edges.extend_from_slice(edges);
            return Ok(out);
        }
        for &e in edges {
            if !self.edge_alive(e) {
                return Err(Error::DeadElement(format!("{:?}", e)));
            }
            if !self.edge_faces(e).is_empty() {
                return Err(Error::EdgeNotWire(format!("{:?}", e)));
            }
            let [a, b] = self.edge_verts(e);
            let pa = self.position(a);
            let pb = self.position(b);
            self.remove_edge(e);

            let mut prev = a;
            for i in 1..=cuts {
                let t = i as f64 / (cuts + 1) as f64;
                let v = self.add_vertex(pa + (pb - pa) * t);
                out.new_verts.push(v);
                out.edges.push(self.add_edge(prev, v)?);
                prev = v;
            }
            out.edges.push(self.add_edge(prev, b)?);
        }
        Ok(out)
    }

    /// Dissolve vertices one at a time, in input order.
    ///
    /// A vertex interior to a fan of faces merges its faces into one region
    /// face; a valence-2 wire vertex is bridged. Vertices whose incident
    /// region does not reduce to a single boundary loop are left untouched.
    pub fn dissolve_verts(&mut self, verts: &[VertId]) {
        for &v in verts {
            if self.vert_alive(v) {
                self.dissolve_one(v);
            }
        }
    }

    fn dissolve_one(&mut self, v: VertId) {
        let faces = self.vert_faces(v);
        if faces.is_empty() {
            self.dissolve_wire(v);
            return;
        }

        // every edge at v must be interior to the region, or dissolving
        // would orphan geometry
        for &e in self.vert_edges(v) {
            let users = self.edge_faces(e);
            if users.is_empty() || users.iter().any(|f| !faces.contains(f)) {
                return;
            }
        }

        // directed boundary walk over pairs used by exactly one region face
        let mut pair_count: FxHashMap<(VertId, VertId), usize> = FxHashMap::default();
        let mut next: FxHashMap<VertId, VertId> = FxHashMap::default();
        for &f in &faces {
            let lv = self.face_verts(f);
            for i in 0..lv.len() {
                let a = lv[i];
                let b = lv[(i + 1) % lv.len()];
                let key = if a <= b { (a, b) } else { (b, a) };
                *pair_count.entry(key).or_insert(0) += 1;
            }
        }
        for &f in &faces {
            let lv: SmallVec<[VertId; 4]> = SmallVec::from_slice(self.face_verts(f));
            for i in 0..lv.len() {
                let a = lv[i];
                let b = lv[(i + 1) % lv.len()];
                let key = if a <= b { (a, b) } else { (b, a) };
                if pair_count[&key] == 1 && next.insert(a, b).is_some() {
                    return; // non-manifold boundary
                }
            }
        }

        let start = match next.keys().find(|&&k| k != v) {
            Some(&k) => k,
            None => return,
        };
        let mut walk = vec![start];
        let mut cur = start;
        loop {
            cur = match next.get(&cur) {
                Some(&n) => n,
                None => return, // open boundary
            };
            if cur == start {
                break;
            }
            walk.push(cur);
            if walk.len() > next.len() {
                return;
            }
        }
        if walk.len() != next.len() {
            return; // boundary split into several loops
        }

        let merged: Vec<VertId> = walk.into_iter().filter(|&w| w != v).collect();
        if merged.len() < 3 {
            return;
        }

        let material = self.face_material(faces[0]);
        let smooth = self.face_smooth(faces[0]);
        for &f in &faces {
            self.remove_face(f);
        }
        let spokes: Vec<EdgeId> = self.vert_edges(v).to_vec();
        for e in spokes {
            self.remove_edge(e);
        }
        self.remove_vertex(v);
        // region faces were consistently wound, so the walk is a valid loop
        let _ = self.add_face_with(&merged, material, smooth);
    }

    fn dissolve_wire(&mut self, v: VertId) {
        let incident: Vec<EdgeId> = self.vert_edges(v).to_vec();
        if incident.len() == 2 {
            let others: Vec<VertId> = incident
                .iter()
                .map(|&e| {
                    let [a, b] = self.edge_verts(e);
                    if a == v {
                        b
                    } else {
                        a
                    }
                })
                .collect();
            for e in incident {
                self.remove_edge(e);
            }
            self.remove_vertex(v);
            if others[0] != others[1] {
                let _ = self.add_edge(others[0], others[1]);
            }
        } else {
            for e in incident {
                self.remove_edge(e);
            }
            self.remove_vertex(v);
        }
    }

    /// Flip the winding (and stored normal) of each face
    pub fn reverse_faces(&mut self, faces: &[FaceId]) {
        for &f in faces {
            if !self.face_alive(f) {
                continue;
            }
            let mut lv: SmallVec<[VertId; 4]> = SmallVec::from_slice(self.face_verts(f));
            lv.reverse();
            // the boundary edge set is unchanged by a reversal
            self.unregister_face_edges(f);
            let _ = self.rewrite_face_loop(f, &lv);
            self.recalc_face_normal(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn wire_strip(mesh: &mut EditMesh, n: usize) -> Vec<EdgeId> {
        let verts: Vec<VertId> = (0..=n)
            .map(|i| mesh.add_vertex(Point3::new(i as f64, 0.0, 0.0)))
            .collect();
        verts
            .windows(2)
            .map(|w| mesh.add_edge(w[0], w[1]).unwrap())
            .collect()
    }

    #[test]
    fn test_extrude_vert_leaves_anchor() {
        let mut mesh = EditMesh::new();
        let v = mesh.add_vertex(Point3::new(1.0, 2.0, 3.0));
        let ext = mesh.extrude_vert(v).unwrap();
        assert_eq!(mesh.position(ext.anchor), Point3::new(1.0, 2.0, 3.0));
        mesh.translate(&[v], Vector3::new(0.0, 0.0, 5.0));
        let [a, b] = mesh.edge_verts(ext.edge);
        assert_eq!((a, b), (v, ext.anchor));
        assert_eq!(mesh.position(v).z, 8.0);
        assert_eq!(mesh.position(ext.anchor).z, 3.0);
    }

    #[test]
    fn test_extrude_edges_shares_clones() {
        let mut mesh = EditMesh::new();
        let edges = wire_strip(&mut mesh, 2);
        let ext = mesh.extrude_edges(&edges).unwrap();
        // 3 distinct endpoints -> 3 clones, 2 ring edges, 2 quads
        assert_eq!(ext.verts.len(), 3);
        assert_eq!(ext.edges.len(), 2);
        assert_eq!(ext.faces.len(), 2);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_extrude_discrete_faces_is_independent() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 0.0, 1.0));
        let d = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
        let e = mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
        let g = mesh.add_vertex(Point3::new(2.0, 0.0, 1.0));
        let f1 = mesh.add_face(&[a, b, c, d]).unwrap();
        let f2 = mesh.add_face(&[b, e, g, c]).unwrap();

        let ext = mesh.extrude_discrete_faces(&[f1, f2]).unwrap();
        assert_eq!(ext.cap_faces.len(), 2);
        assert_eq!(ext.side_faces.len(), 8);
        // shared seed verts are cloned per face
        assert_eq!(ext.verts.len(), 8);
        assert!(!mesh.face_alive(f1));
        assert!(!mesh.face_alive(f2));
        // caps keep the seed winding and normal
        let n = mesh.face_normal(ext.cap_faces[0]);
        assert!((n.y - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_split_edges_detaches_from_faces() {
        let mut mesh = EditMesh::new();
        let (f, [a, b, _, _]) = {
            let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
            let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
            let c = mesh.add_vertex(Point3::new(1.0, 0.0, 1.0));
            let d = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
            (mesh.add_face(&[a, b, c, d]).unwrap(), [a, b, c, d])
        };
        let e = mesh.find_edge(a, b).unwrap();
        mesh.split_edges(&[e]).unwrap();
        // selected edge is now wire; the face survives on cloned vertices
        assert!(mesh.edge_faces(e).is_empty());
        assert!(mesh.face_alive(f));
        assert!(!mesh.face_verts(f).contains(&a));
        assert!(!mesh.face_verts(f).contains(&b));
    }

    #[test]
    fn test_subdivide_counts() {
        let mut mesh = EditMesh::new();
        let edges = wire_strip(&mut mesh, 4);
        let sub = mesh.subdivide_edges(&edges, 50).unwrap();
        assert_eq!(sub.new_verts.len(), 200);
        assert_eq!(sub.edges.len(), 4 * 51);
    }

    #[test]
    fn test_subdivide_rejects_face_edges() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.5, 0.0, 1.0));
        mesh.add_face(&[a, b, c]).unwrap();
        let e = mesh.find_edge(a, b).unwrap();
        assert!(mesh.subdivide_edges(&[e], 2).is_err());
    }

    #[test]
    fn test_subdivide_positions_are_even() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(3.0, 0.0, 0.0));
        let e = mesh.add_edge(a, b).unwrap();
        let sub = mesh.subdivide_edges(&[e], 2).unwrap();
        assert_eq!(mesh.position(sub.new_verts[0]).x, 1.0);
        assert_eq!(mesh.position(sub.new_verts[1]).x, 2.0);
    }

    #[test]
    fn test_dissolve_merges_two_quads() {
        let mut mesh = EditMesh::new();
        // inner ring i0..i2, outer ring o0..o2, two quads sharing spoke i1-o1
        let i0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let i1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let i2 = mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
        let o0 = mesh.add_vertex(Point3::new(0.0, 0.0, -1.0));
        let o1 = mesh.add_vertex(Point3::new(1.0, 0.0, -1.0));
        let o2 = mesh.add_vertex(Point3::new(2.0, 0.0, -1.0));
        mesh.add_face(&[i0, i1, o1, o0]).unwrap();
        mesh.add_face(&[i1, i2, o2, o1]).unwrap();

        mesh.dissolve_verts(&[o1]);
        assert!(!mesh.vert_alive(o1));
        assert_eq!(mesh.face_count(), 1);
        let region = mesh.face_ids().next().unwrap();
        assert_eq!(mesh.face_verts(region).len(), 5);
        assert!(!mesh.face_verts(region).contains(&o1));
        assert!(mesh.face_verts(region).contains(&i1));
    }

    #[test]
    fn test_dissolve_bridges_wire_vertex() {
        let mut mesh = EditMesh::new();
        let edges = wire_strip(&mut mesh, 2);
        let [_, mid] = mesh.edge_verts(edges[0]);
        mesh.dissolve_verts(&[mid]);
        assert!(!mesh.vert_alive(mid));
        assert_eq!(mesh.edge_count(), 1);
    }

    #[test]
    fn test_reverse_faces_flips_normal() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 0.0, 1.0));
        let f = mesh.add_face(&[a, b, c]).unwrap();
        let before = mesh.face_normal(f);
        mesh.reverse_faces(&[f]);
        let after = mesh.face_normal(f);
        assert!((before + after).norm() < 1e-9);
    }

    #[test]
    fn test_duplicate_face_is_disjoint() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 0.0, 1.0));
        let f = mesh.add_face(&[a, b, c]).unwrap();
        mesh.set_face_material(f, 3);
        let copy = mesh.duplicate_face(f).unwrap();
        assert_eq!(mesh.face_material(copy), 3);
        assert!(mesh
            .face_verts(copy)
            .iter()
            .all(|v| !mesh.face_verts(f).contains(v)));
    }
}
