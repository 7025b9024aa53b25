// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Facadegen Generators
//!
//! Procedural facade-detailing operators for a 3D content-creation host.
//! Each generator reads the quad faces (or an edge selection) of one mesh
//! snapshot, mutates a private editable copy through the
//! [facadegen-kernel](facadegen_kernel) capability surface, and hands one
//! snapshot back, atomic per call.
//!
//! ## Operators
//!
//! - [`protrusion`]: one tapered cone per quad face, placed by anchor policy
//! - [`window`]: recessed frame boxes, seeded light/curtain/glass partition,
//!   glass mask sink
//! - [`curtain`]: blind and drape styles built by chain extrusion
//! - [`raindirt`]: subdivide → extrude → thin → drip fingers along an edge
//!   selection
//! - [`pot`]: lathe-profile pot driven by screw/solidify modifiers
//!
//! All randomness is explicit: every output-affecting draw comes from a
//! stream constructed from the caller's seed and an element index, so
//! identical seeds reproduce identical facade detail.

pub mod config;
pub mod curtain;
pub mod error;
pub mod frame;
pub mod materials;
pub mod placement;
pub mod pot;
pub mod protrusion;
pub mod raindirt;
pub mod sampling;
pub mod sinks;
pub mod window;

pub use config::{PotConfig, ProtrusionConfig, RainDirtConfig, WindowConfig};
pub use curtain::{generate_curtains, CurtainKind, CurtainSelect};
pub use error::{Error, Result};
pub use frame::{AnchorPolicy, FaceFrame, ANCHOR_POLICIES};
pub use materials::{MaterialHandle, MaterialResolver};
pub use placement::{build_transform, build_transform_at};
pub use pot::{build_pot, pot_name, PotResult};
pub use protrusion::{generate_protrusions, ProtrusionResult};
pub use raindirt::{generate_rain_dirt, RainDirtResult, RainDirtStats};
pub use sampling::{fraction_removed, remove_random_fraction};
pub use sinks::{ModifierSpec, VertexGroupSpec};
pub use window::{build_windows, WindowAssembly, WindowStats};
