// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement transform composition
//!
//! Builds the single affine matrix that drops a primitive onto a face:
//! `Translation(anchor) · (TrackTo(-Z → normal) · RotZ(angle)) · Scale`.
//! The ordering is load-bearing: scaling happens in the primitive's local
//! space, rotation next, and the anchor translation last, so the anchor
//! point stays fixed under rotation and scale.

use crate::frame::{AnchorPolicy, FaceFrame};
use facadegen_kernel::{Matrix4, Point3, Vector3};
use nalgebra::Rotation3;

/// Rotation aligning a primitive's local -Z axis with `direction`, keeping
/// local Y as the up reference.
///
/// A track-to construction rather than Euler angles: near-vertical and
/// near-horizontal faces stay free of gimbal artifacts. When `direction` is
/// parallel to the world Z axis the up reference degenerates and a fixed
/// world-X fallback keeps the result deterministic.
pub fn track_to_negative_z(direction: Vector3<f64>) -> Rotation3<f64> {
    let z_local = (-direction)
        .try_normalize(1e-12)
        .unwrap_or_else(|| -Vector3::z());

    let x_local = match Vector3::z().cross(&z_local).try_normalize(1e-6) {
        Some(x) => x,
        None => Vector3::x(),
    };
    let y_local = z_local.cross(&x_local).normalize();

    Rotation3::from_matrix_unchecked(nalgebra::Matrix3::from_columns(&[
        x_local, y_local, z_local,
    ]))
}

/// Compose the placement matrix for a face frame.
///
/// `rotation_deg` spins the primitive about its local Z axis after the
/// track-to alignment; `scale` applies per-axis in local space.
pub fn build_transform(
    frame: &FaceFrame,
    policy: AnchorPolicy,
    offset: f64,
    rotation_deg: f64,
    scale: [f64; 3],
) -> Matrix4<f64> {
    let anchor = frame.anchor(policy, offset);
    build_transform_at(anchor, frame.normal, rotation_deg, scale)
}

/// `build_transform` with an explicit anchor point
pub fn build_transform_at(
    anchor: Point3<f64>,
    normal: Vector3<f64>,
    rotation_deg: f64,
    scale: [f64; 3],
) -> Matrix4<f64> {
    let translation = Matrix4::new_translation(&anchor.coords);
    let track = track_to_negative_z(normal);
    let spin = Rotation3::from_axis_angle(&Vector3::z_axis(), rotation_deg.to_radians());
    let rotation = Matrix4::from(track * spin);
    let scaling = Matrix4::new_nonuniform_scaling(&Vector3::new(scale[0], scale[1], scale[2]));
    translation * rotation * scaling
}
