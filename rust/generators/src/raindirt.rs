// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rain streak / dirt drip generation
//!
//! Pipeline over an edge selection on the host mesh: rip the selection free,
//! subdivide it into a fine vertex ring, extrude a drip-lip ribbon, thin the
//! ribbon down to a seeded subset of drip columns, then extrude and displace
//! the surviving columns into irregular drip fingers.

use crate::config::RainDirtConfig;
use crate::error::{Error, Result};
use crate::sampling::{fraction_removed, remove_random_fraction};
use crate::sinks::ModifierSpec;
use facadegen_kernel::{EdgeId, EditMesh, MeshSnapshot, VertId, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Small fixed drop keeping generated geometry off the seed surface
const SURFACE_DROP: f64 = 0.02;
/// Shading threshold handed back to the host
const AUTO_SMOOTH_ANGLE_DEG: f64 = 60.0;

/// Counts of one rain/dirt pass
#[derive(Debug, Clone, Copy, Default)]
pub struct RainDirtStats {
    /// Vertices introduced by subdivision
    pub subdivision_verts: usize,
    /// Drip columns before thinning
    pub columns_total: usize,
    /// Drip columns kept
    pub columns_kept: usize,
    /// Finger edges displaced
    pub finger_edges: usize,
}

/// Output of [`generate_rain_dirt`]
#[derive(Debug, Clone)]
pub struct RainDirtResult {
    /// The committed mesh
    pub mesh: MeshSnapshot,
    /// Smoothing subdivision to install if the host has none
    pub modifiers: Vec<ModifierSpec>,
    /// Shade-smooth threshold to enable
    pub auto_smooth_angle_deg: f64,
    pub stats: RainDirtStats,
}

/// Generate drip geometry along the selected edges of the snapshot.
///
/// The selection indexes `snapshot.edges`. Configuration and selection are
/// checked before the mesh is touched. All randomness derives from
/// `config.seed`: thinning reseeds per removal, finger displacement per
/// finger-edge ordinal, so a rerun reproduces the same drip pattern.
pub fn generate_rain_dirt(
    snapshot: &MeshSnapshot,
    selected_edges: &[u32],
    config: &RainDirtConfig,
) -> Result<RainDirtResult> {
    config.validate()?;
    if selected_edges.is_empty() {
        return Err(Error::HostState("no edges selected".to_string()));
    }
    if selected_edges
        .iter()
        .any(|&i| i as usize >= snapshot.edge_count())
    {
        return Err(Error::HostState(
            "edge selection out of range".to_string(),
        ));
    }

    let imported = EditMesh::from_snapshot(snapshot)?;
    let mut mesh = imported.mesh;

    let mut selection: Vec<EdgeId> = Vec::with_capacity(selected_edges.len());
    for &i in selected_edges {
        let e = imported.edges[i as usize];
        if !selection.contains(&e) {
            selection.push(e);
        }
    }

    let distance = if config.invert_distance {
        -config.distance
    } else {
        config.distance
    };
    let drop_sign = if config.invert_drops { -1.0 } else { 1.0 };

    // surface normals, captured while the selection is still attached
    let mut drip_normals: FxHashMap<VertId, Vector3<f64>> = FxHashMap::default();
    let mut edge_normals: Vec<Vector3<f64>> = Vec::with_capacity(selection.len());
    for &e in &selection {
        let mut n = Vector3::zeros();
        for &f in mesh.edge_faces(e) {
            n += mesh.face_normal(f);
        }
        edge_normals.push(n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros));
        for v in mesh.edge_verts(e) {
            drip_normals
                .entry(v)
                .or_insert_with(|| mesh.vertex_normal(v));
        }
    }

    // rip the selection free so subdivision stays out of the surrounding
    // topology, then cut it into the drip ring
    mesh.split_edges(&selection)?;
    let protected: FxHashSet<VertId> = mesh.vert_ids().collect();
    let sub = mesh.subdivide_edges(&selection, config.cuts)?;
    let mut stats = RainDirtStats {
        subdivision_verts: sub.new_verts.len(),
        ..RainDirtStats::default()
    };
    for (k, &v) in sub.new_verts.iter().enumerate() {
        let n = edge_normals[k / config.cuts as usize];
        drip_normals.insert(v, n);
    }

    // drip-lip ribbon: the subdivided ring slides down and outward while
    // the extruded clones stay at the seam
    let ring_verts: Vec<VertId> = {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for &e in &sub.edges {
            for v in mesh.edge_verts(e) {
                if seen.insert(v) {
                    out.push(v);
                }
            }
        }
        out
    };
    let ribbon = mesh.extrude_edges(&sub.edges)?;
    mesh.translate(&ring_verts, Vector3::new(0.0, 0.0, -SURFACE_DROP));
    for &v in &ring_verts {
        let n = drip_normals.get(&v).copied().unwrap_or_else(Vector3::zeros);
        mesh.translate(
            &[v],
            Vector3::new(n.x / 12.0 * distance, n.y / 12.0 * distance, 0.0),
        );
    }
    if config.invert_distance {
        mesh.reverse_faces(&ribbon.faces);
    }
    mesh.recalc_face_normals(&ribbon.faces);

    // thinning: keep a seeded subset of the outer-ring columns and dissolve
    // ring vertices belonging only to removed columns, never a vertex of
    // the original mesh
    let mut columns = sub.edges.clone();
    stats.columns_total = columns.len();
    remove_random_fraction(
        &mut columns,
        fraction_removed(config.amount),
        config.seed,
        0,
    );
    stats.columns_kept = columns.len();

    let kept_verts: FxHashSet<VertId> = columns
        .iter()
        .flat_map(|&e| mesh.edge_verts(e))
        .collect();
    let dissolve: Vec<VertId> = ring_verts
        .iter()
        .copied()
        .filter(|v| !kept_verts.contains(v) && !protected.contains(v))
        .collect();
    mesh.dissolve_verts(&dissolve);

    // drip fingers: extrude the kept columns, rip 3-valence junctions, then
    // displace each finger edge from its own seeded stream
    let fingers = mesh.extrude_edges(&columns)?;
    mesh.translate(&fingers.verts, Vector3::new(0.0, 0.0, -SURFACE_DROP));
    mesh.recalc_face_normals(&fingers.faces);
    for &v in &fingers.verts {
        if mesh.vert_edges(v).len() == 3 {
            let third = mesh.vert_edges(v)[2];
            mesh.split_edges(&[third])?;
        }
    }
    stats.finger_edges = fingers.edges.len();

    for (ordinal, &e) in fingers.edges.iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed + ordinal as u64);
        let finger_drop = -config.height * rng.gen::<f64>();
        let lateral = rng.gen::<f64>();
        for v in mesh.edge_verts(e) {
            let n = mesh.vertex_normal(v);
            mesh.translate(
                &[v],
                Vector3::new(
                    n.x / 10.0 * lateral * drop_sign,
                    n.y / 10.0 * lateral * drop_sign,
                    finger_drop,
                ),
            );
        }
    }

    let (out, _) = mesh.to_snapshot();
    debug!(
        columns = stats.columns_kept,
        of = stats.columns_total,
        "rain dirt pass done"
    );
    Ok(RainDirtResult {
        mesh: out,
        modifiers: vec![ModifierSpec::Subdivision {
            levels: 1,
            render_levels: 3,
        }],
        auto_smooth_angle_deg: AUTO_SMOOTH_ANGLE_DEG,
        stats,
    })
}
