// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertical protrusion generation
//!
//! Drops one tapered cone (a fin/spike) onto every eligible quad face of
//! the mesh, placed with the face's anchor policy. With the track-to
//! alignment the open base faces outward and the capped top sits against
//! the facade.

use crate::config::ProtrusionConfig;
use crate::error::Result;
use crate::frame::FaceFrame;
use crate::placement::build_transform;
use facadegen_kernel::{create_cone, EditMesh, FaceId, VertId};
use tracing::{debug, warn};

/// Outcome of a protrusion pass
#[derive(Debug, Clone, Default)]
pub struct ProtrusionResult {
    /// Every vertex created, across all faces: the new active selection
    /// for the host
    pub verts: Vec<VertId>,
    /// Faces skipped for an ambiguous base edge
    pub skipped: usize,
}

/// Generate one cone per quad face.
///
/// Non-quad faces are silently excluded from the seed set. Quads without a
/// level base are skipped with a warning and counted in the result.
pub fn generate_protrusions(
    mesh: &mut EditMesh,
    config: &ProtrusionConfig,
) -> Result<ProtrusionResult> {
    config.validate()?;

    let seeds: Vec<FaceId> = mesh
        .face_ids()
        .filter(|&f| mesh.face_verts(f).len() == 4)
        .collect();

    let mut result = ProtrusionResult::default();
    for face in seeds {
        let frame = match FaceFrame::extract(mesh, face) {
            Some(frame) => frame,
            None => {
                warn!(face = face.index(), "ambiguous base edge, skipping");
                result.skipped += 1;
                continue;
            }
        };
        let matrix = build_transform(
            &frame,
            config.anchor,
            config.offset,
            config.rotation_deg,
            config.scale,
        );
        let cone = create_cone(
            mesh,
            config.resolution,
            config.tip_radius,
            config.base_radius,
            config.depth,
        )?;
        mesh.transform(&cone.verts, &matrix);
        mesh.recalc_face_normals(&cone.faces);
        result.verts.extend(cone.verts);
    }

    debug!(
        created = result.verts.len(),
        skipped = result.skipped,
        "protrusion pass done"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::AnchorPolicy;
    use approx::assert_relative_eq;
    use facadegen_kernel::Point3;

    fn unit_wall() -> EditMesh {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 0.0, 1.0));
        let d = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
        mesh.add_face(&[a, b, c, d]).unwrap();
        mesh
    }

    #[test]
    fn test_single_cone_on_unit_quad() {
        let mut mesh = unit_wall();
        let config = ProtrusionConfig {
            anchor: AnchorPolicy::Center,
            offset: 0.5,
            ..ProtrusionConfig::default()
        };
        let result = generate_protrusions(&mut mesh, &config).unwrap();

        // one cone: 6 per ring, 2 rings, cap center
        assert_eq!(result.verts.len(), 13);
        assert_eq!(result.skipped, 0);
        // 1 seed quad + 6 side quads + 6 cap triangles
        assert_eq!(mesh.face_count(), 13);

        // anchored at the face centroid, pushed 0.5 along the -Y normal
        let centroid = result
            .verts
            .iter()
            .fold(Point3::origin(), |acc, &v| acc + mesh.position(v).coords)
            / result.verts.len() as f64;
        assert_relative_eq!(centroid.x, 0.5, epsilon = 1e-9);
        assert!(centroid.y < 0.0);
        assert_relative_eq!(centroid.z, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_cone_axis_aligned_with_normal() {
        let mut mesh = unit_wall();
        let config = ProtrusionConfig {
            anchor: AnchorPolicy::Center,
            offset: 0.0,
            ..ProtrusionConfig::default()
        };
        let result = generate_protrusions(&mut mesh, &config).unwrap();
        // cap center is the last created vertex; the open-base tip ring
        // comes first. Cap minus ring center must be parallel to the -Y
        // normal.
        let cap = mesh.position(*result.verts.last().unwrap());
        let ring = &result.verts[..6];
        let tip = ring
            .iter()
            .fold(Point3::origin(), |acc, &v| acc + mesh.position(v).coords)
            / ring.len() as f64;
        let axis = cap - tip;
        assert_relative_eq!(axis.x, 0.0, epsilon = 1e-9);
        assert!(axis.y > 0.0, "cap sits against the wall, tip points out");
        assert_relative_eq!(axis.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangles_excluded_silently() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.5, 0.0, 1.0));
        mesh.add_face(&[a, b, c]).unwrap();
        let result =
            generate_protrusions(&mut mesh, &ProtrusionConfig::default()).unwrap();
        assert!(result.verts.is_empty());
        assert_eq!(result.skipped, 0);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_invalid_config_rejected_before_mutation() {
        let mut mesh = unit_wall();
        let config = ProtrusionConfig {
            resolution: 99,
            ..ProtrusionConfig::default()
        };
        assert!(generate_protrusions(&mut mesh, &config).is_err());
        assert_eq!(mesh.face_count(), 1);
    }
}
