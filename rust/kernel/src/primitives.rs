// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive generators
//!
//! Primitives are built at the origin in their local frame; callers place
//! them with [`EditMesh::transform`].

use crate::error::{Error, Result};
use crate::mesh::{EditMesh, FaceId, VertId};
use nalgebra::Point3;
use std::f64::consts::TAU;

/// Geometry created by [`create_cone`]
#[derive(Debug, Clone, Default)]
pub struct ConeGeometry {
    /// Every vertex of the primitive, rings first, cap center last
    pub verts: Vec<VertId>,
    /// Side quads followed by cap triangles
    pub faces: Vec<FaceId>,
}

/// Create a tapered cone around the local Z axis.
///
/// The base ring (radius `radius_bottom`) sits at `z = -depth/2` and is left
/// open; the top ring (radius `radius_top`) at `z = +depth/2` is closed with
/// a triangle fan around a center vertex. With a small bottom radius this
/// yields the spike/fin shape used for facade protrusions.
pub fn create_cone(
    mesh: &mut EditMesh,
    segments: u32,
    radius_bottom: f64,
    radius_top: f64,
    depth: f64,
) -> Result<ConeGeometry> {
    if segments < 3 {
        return Err(Error::InvalidLoop(format!(
            "cone needs at least 3 segments, got {}",
            segments
        )));
    }

    let mut out = ConeGeometry::default();
    let half = depth / 2.0;
    let n = segments as usize;

    let mut bottom = Vec::with_capacity(n);
    let mut top = Vec::with_capacity(n);
    for i in 0..n {
        let angle = TAU * i as f64 / n as f64;
        let (sin, cos) = angle.sin_cos();
        bottom.push(mesh.add_vertex(Point3::new(
            radius_bottom * cos,
            radius_bottom * sin,
            -half,
        )));
        top.push(mesh.add_vertex(Point3::new(radius_top * cos, radius_top * sin, half)));
    }
    out.verts.extend_from_slice(&bottom);
    out.verts.extend_from_slice(&top);

    for i in 0..n {
        let j = (i + 1) % n;
        out.faces
            .push(mesh.add_face(&[bottom[i], bottom[j], top[j], top[i]])?);
    }

    let center = mesh.add_vertex(Point3::new(0.0, 0.0, half));
    out.verts.push(center);
    for i in 0..n {
        let j = (i + 1) % n;
        out.faces.push(mesh.add_face(&[top[i], top[j], center])?);
    }

    Ok(out)
}
