// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Facadegen Mesh Kernel
//!
//! Editable polygon-mesh kernel consumed by the facade generators.
//!
//! The kernel owns the narrow capability surface the generators rely on:
//!
//! - **Elements**: vertices, edges, faces addressed by stable handles, with
//!   maintained incidence tables
//! - **Edit operations**: extrude (vertex / edge ring / discrete faces),
//!   translate and transform, wire subdivision, edge splitting, vertex
//!   dissolve, winding reversal, each returning the created geometry as
//!   explicit handle sets
//! - **Primitives**: the open-base tapered cone used for facade protrusions
//! - **Snapshots**: flat host-facing buffers for atomic read-in / write-back
//!
//! Adjacency bookkeeping is internal; generators never see it.

pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;
pub mod snapshot;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use error::{Error, Result};
pub use mesh::{EdgeId, EditMesh, FaceId, VertId};
pub use ops::{EdgeExtrusion, FaceExtrusion, Subdivision, VertExtrusion};
pub use primitives::{create_cone, ConeGeometry};
pub use snapshot::{ImportedMesh, MeshSnapshot};
