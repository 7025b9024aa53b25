// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pot generation
//!
//! A flower pot is only a three-point lathe profile; the host's screw and
//! solidify modifiers do the actual revolution. This builder emits the
//! profile polyline in a fresh mesh plus the modifier stack to install.

use crate::config::PotConfig;
use crate::error::Result;
use crate::sinks::ModifierSpec;
use facadegen_kernel::{EditMesh, MeshSnapshot, Point3};

/// Output of [`build_pot`]
#[derive(Debug, Clone)]
pub struct PotResult {
    /// Profile polyline mesh: base, belly and rim points joined by edges
    pub mesh: MeshSnapshot,
    /// Screw, solidify and smoothing modifiers, in stack order
    pub modifiers: Vec<ModifierSpec>,
}

/// Name for the `ordinal`-th pot object in a scene
pub fn pot_name(ordinal: usize) -> String {
    format!("Pot_{:0>2}", ordinal + 1)
}

/// Build the lathe profile for a pot
pub fn build_pot(config: &PotConfig) -> Result<PotResult> {
    config.validate()?;

    let mut mesh = EditMesh::new();
    let base = mesh.add_vertex(Point3::new(config.base_width, 0.0, 0.0));
    let top = mesh.add_vertex(Point3::new(config.top_width, 0.0, config.size));
    let shape = mesh.add_vertex(Point3::new(
        config.shape_width,
        0.0,
        config.shape_height,
    ));
    mesh.add_edge(top, shape)?;
    mesh.add_edge(shape, base)?;

    let (snapshot, _) = mesh.to_snapshot();
    Ok(PotResult {
        mesh: snapshot,
        modifiers: vec![
            ModifierSpec::Screw {
                steps: config.resolution,
                render_steps: config.resolution,
            },
            ModifierSpec::Solidify {
                thickness: 0.05,
                edge_crease_outer: 1.0,
                edge_crease_inner: 1.0,
                use_even_offset: true,
                use_quality_normals: true,
            },
            ModifierSpec::Subdivision {
                levels: 2,
                render_levels: 3,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_shape() {
        let out = build_pot(&PotConfig::default()).unwrap();
        assert_eq!(out.mesh.vertex_count(), 3);
        assert_eq!(out.mesh.edge_count(), 2);
        assert_eq!(out.mesh.face_count(), 0);
        // base at z = 0, rim at z = size
        assert_eq!(out.mesh.positions[2], 0.0);
        assert_eq!(out.mesh.positions[5], 0.70);
    }

    #[test]
    fn test_modifier_stack_order() {
        let out = build_pot(&PotConfig {
            resolution: 16,
            ..PotConfig::default()
        })
        .unwrap();
        assert!(matches!(
            out.modifiers[0],
            ModifierSpec::Screw { steps: 16, render_steps: 16 }
        ));
        assert!(matches!(out.modifiers[1], ModifierSpec::Solidify { .. }));
        assert!(matches!(
            out.modifiers[2],
            ModifierSpec::Subdivision { levels: 2, .. }
        ));
    }

    #[test]
    fn test_pot_names() {
        assert_eq!(pot_name(0), "Pot_01");
        assert_eq!(pot_name(11), "Pot_12");
    }
}
