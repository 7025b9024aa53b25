// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window assembly generation
//!
//! Turns every facade face into a window cell: a recessed frame box, a
//! seeded partition of the remaining panes into interior-light, curtain and
//! glass subsets, and the mask sink that lets the host hide glass panes
//! behind a modifier.

use crate::config::WindowConfig;
use crate::curtain::{generate_curtains, CurtainKind, CurtainSelect};
use crate::error::{Error, Result};
use crate::materials::{window_slot_names, window_slots, MaterialHandle, MaterialResolver};
use crate::sampling::{fraction_removed, remove_random_fraction};
use crate::sinks::{ModifierSpec, VertexGroupSpec};
use facadegen_kernel::{EditMesh, FaceId, MeshSnapshot, VertId, Vector3};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Shading threshold handed back to the host
const AUTO_SMOOTH_ANGLE_DEG: f64 = 60.0;

/// Face counts of one window pass
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowStats {
    /// Frame ("black box") faces
    pub frame_faces: usize,
    /// Faces kept as interior light leaks
    pub light_faces: usize,
    /// Faces seeded with curtains
    pub curtain_seed_faces: usize,
    /// Generated curtain faces
    pub curtain_faces: usize,
}

/// Output of [`build_windows`]
#[derive(Debug, Clone)]
pub struct WindowAssembly {
    /// The committed mesh
    pub mesh: MeshSnapshot,
    /// Resolved material slot table; face material indices point here
    pub materials: Vec<MaterialHandle>,
    /// Glass vertices for the host's mask modifier, persisted indices
    pub glass_group: VertexGroupSpec,
    /// Modifier-stack entries to install
    pub modifiers: Vec<ModifierSpec>,
    /// Shade-smooth threshold to enable
    pub auto_smooth_angle_deg: f64,
    pub stats: WindowStats,
}

/// Build window assemblies over every face of the snapshot.
///
/// Materials are resolved and the configuration validated before the mesh
/// is touched; a failure there leaves nothing mutated.
pub fn build_windows(
    snapshot: &MeshSnapshot,
    config: &WindowConfig,
    resolver: &dyn MaterialResolver,
    object_name: &str,
) -> Result<WindowAssembly> {
    config.validate()?;
    if snapshot.face_count() == 0 {
        return Err(Error::HostState("no faces on the active mesh".to_string()));
    }
    let materials = window_slot_names(object_name)
        .iter()
        .map(|name| resolver.resolve(name))
        .collect::<Result<Vec<MaterialHandle>>>()?;

    let mut imported = EditMesh::from_snapshot(snapshot)?;
    let mesh = &mut imported.mesh;
    let mut stats = WindowStats::default();

    // frame box: duplicate each face as the window pane, then push the
    // extruded cell back into the facade
    let originals: Vec<FaceId> = mesh.face_ids().collect();
    for &f in &originals {
        mesh.duplicate_face(f)?;
    }
    let cells = mesh.extrude_discrete_faces(&originals)?;
    for &cap in &cells.cap_faces {
        let n = mesh.face_normal(cap);
        let verts: Vec<VertId> = mesh.face_verts(cap).to_vec();
        mesh.translate(
            &verts,
            Vector3::new(-n.x * config.thickness, -n.y * config.thickness, 0.0),
        );
    }
    let mut frame_faces: Vec<FaceId> = cells.cap_faces.clone();
    frame_faces.extend_from_slice(&cells.side_faces);
    for &f in &frame_faces {
        mesh.set_face_material(f, window_slots::FRAME);
    }
    let frame_set: FxHashSet<FaceId> = frame_faces.iter().copied().collect();
    stats.frame_faces = frame_faces.len();

    // interior light leaks: keep a seeded subset of the panes, back each
    // kept pane with a fresh glass pane, recess it, and round-robin the
    // three light materials (later assignments overwrite earlier ones)
    let panes: Vec<FaceId> = mesh
        .face_ids()
        .filter(|f| !frame_set.contains(f))
        .collect();
    let mut light_faces = panes;
    remove_random_fraction(
        &mut light_faces,
        fraction_removed(config.amount_light),
        config.seed,
        1,
    );
    for &f in &light_faces {
        mesh.duplicate_face(f)?;
    }
    for &f in &light_faces {
        let n = mesh.face_normal(f);
        let inset = config.thickness / 3.0;
        let verts: Vec<VertId> = mesh.face_verts(f).to_vec();
        mesh.translate(&verts, Vector3::new(-n.x * inset, -n.y * inset, 0.0));
    }
    for &f in &light_faces {
        mesh.set_face_material(f, window_slots::LIGHT_A);
    }
    for &f in light_faces.iter().step_by(2) {
        mesh.set_face_material(f, window_slots::LIGHT_B);
    }
    for &f in light_faces.iter().step_by(3) {
        mesh.set_face_material(f, window_slots::LIGHT_C);
    }
    let light_set: FxHashSet<FaceId> = light_faces.iter().copied().collect();
    stats.light_faces = light_faces.len();

    // curtain seeds, drawn from everything that is neither frame nor light
    let glass_candidates: Vec<FaceId> = mesh
        .face_ids()
        .filter(|f| !frame_set.contains(f) && !light_set.contains(f))
        .collect();
    let mut curtain_seeds = glass_candidates.clone();
    remove_random_fraction(
        &mut curtain_seeds,
        fraction_removed(config.amount_curtain),
        config.seed,
        0,
    );
    stats.curtain_seed_faces = curtain_seeds.len();

    let mut curtain_faces: Vec<FaceId> = Vec::new();
    match config.curtain {
        CurtainSelect::Blinds => {
            let faces = generate_curtains(
                mesh,
                &curtain_seeds,
                CurtainKind::Blinds,
                config.resolution,
                config.seed,
            )?;
            for &f in &faces {
                mesh.set_face_material(f, window_slots::CURTAIN_BLIND);
            }
            curtain_faces = faces;
        }
        CurtainSelect::Drapes => {
            let faces = generate_curtains(
                mesh,
                &curtain_seeds,
                CurtainKind::Drapes,
                config.resolution,
                config.seed,
            )?;
            for &f in &faces {
                mesh.set_face_material(f, window_slots::CURTAIN_DRAPE);
            }
            curtain_faces = faces;
        }
        CurtainSelect::Both => {
            let mut blind_seeds = curtain_seeds.clone();
            remove_random_fraction(&mut blind_seeds, 0.5, config.seed, 1);
            let blind_set: FxHashSet<FaceId> = blind_seeds.iter().copied().collect();
            let drape_seeds: Vec<FaceId> = curtain_seeds
                .iter()
                .copied()
                .filter(|f| !blind_set.contains(f))
                .collect();

            let blinds = generate_curtains(
                mesh,
                &blind_seeds,
                CurtainKind::Blinds,
                config.resolution,
                config.seed,
            )?;
            let drapes = generate_curtains(
                mesh,
                &drape_seeds,
                CurtainKind::Drapes,
                config.resolution,
                config.seed,
            )?;
            for &f in &drapes {
                mesh.set_face_material(f, window_slots::CURTAIN_DRAPE);
            }
            for &f in &blinds {
                mesh.set_face_material(f, window_slots::CURTAIN_BLIND);
                mesh.set_face_smooth(f, false);
            }
            curtain_faces.extend(blinds);
            curtain_faces.extend(drapes);
        }
    }
    mesh.recalc_face_normals(&curtain_faces);
    stats.curtain_faces = curtain_faces.len();

    // mask sink: every vertex of a glass-candidate pane, recorded against
    // persisted indices after the commit
    let mut seen: FxHashSet<VertId> = FxHashSet::default();
    let mut glass_verts: Vec<VertId> = Vec::new();
    for &f in &glass_candidates {
        for &v in mesh.face_verts(f) {
            if seen.insert(v) {
                glass_verts.push(v);
            }
        }
    }

    let (out, vert_map) = mesh.to_snapshot();
    let glass_group = VertexGroupSpec::with_unit_weights(
        "Glass",
        glass_verts.iter().map(|v| vert_map[v]),
    );
    let modifiers = vec![ModifierSpec::Mask {
        vertex_group: "Glass".to_string(),
        invert_vertex_group: true,
        show_render: false,
        show_in_editmode: true,
    }];

    debug!(
        frame = stats.frame_faces,
        light = stats.light_faces,
        curtains = stats.curtain_faces,
        "window pass done"
    );
    Ok(WindowAssembly {
        mesh: out,
        materials,
        glass_group,
        modifiers,
        auto_smooth_angle_deg: AUTO_SMOOTH_ANGLE_DEG,
        stats,
    })
}
