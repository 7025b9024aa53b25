// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material resolution
//!
//! Generators never touch the host's asset registry directly; they resolve
//! material names through an injected [`MaterialResolver`] and tag faces
//! with slot indices into the resolved table.

use crate::error::Result;

/// Opaque handle to a host material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// Resolves a material name to a host handle.
///
/// Resolution happens before any mesh mutation, so a missing material
/// aborts the operator call cleanly.
pub trait MaterialResolver {
    fn resolve(&self, name: &str) -> Result<MaterialHandle>;
}

/// Material slot layout of a window assembly. Slot order is part of the
/// output contract: faces carry these indices as their material tag.
pub mod window_slots {
    /// Facade thin-ray driver material
    pub const FACADE: i32 = 0;
    /// Recessed frame ("black box")
    pub const FRAME: i32 = 1;
    /// Interior light, first variant
    pub const LIGHT_A: i32 = 2;
    /// Interior light, second variant
    pub const LIGHT_B: i32 = 3;
    /// Interior light, third variant
    pub const LIGHT_C: i32 = 4;
    /// Drawn drape curtains
    pub const CURTAIN_DRAPE: i32 = 5;
    /// Venetian blind curtains
    pub const CURTAIN_BLIND: i32 = 6;
}

/// The seven window material names, in slot order, composed from the host
/// object's base name (the part before the first `:`)
pub fn window_slot_names(object_name: &str) -> [String; 7] {
    let base = object_name.split(':').next().unwrap_or(object_name);
    [
        format!("{}:thin_RAY.002_DRV", base),
        "001.non_material.000".to_string(),
        format!("{}:luz_INTERNA.01", base),
        format!("{}:luz_INTERNA.02", base),
        format!("{}:luz_INTERNA.03", base),
        "001.curtain.000".to_string(),
        "N6".to_string(),
    ]
}
