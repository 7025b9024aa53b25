// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generator configuration
//!
//! Flat parameter structs with host-facing defaults. Every parameter is
//! validated against its declared range before a generator touches the
//! mesh; out-of-range values are a configuration error, not a runtime
//! fault.

use crate::curtain::CurtainSelect;
use crate::error::{Error, Result};
use crate::frame::AnchorPolicy;
use serde::{Deserialize, Serialize};

/// Vertical-protrusion generator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtrusionConfig {
    /// Anchor policy for primitive placement
    pub anchor: AnchorPolicy,
    /// Outward offset along the planar normal components
    pub offset: f64,
    /// Per-axis local scale
    pub scale: [f64; 3],
    /// Spin about the local Z axis, degrees
    pub rotation_deg: f64,
    /// Radial segments of the cone (3–24)
    pub resolution: u32,
    /// Open-base (tip) radius
    pub tip_radius: f64,
    /// Capped-top radius
    pub base_radius: f64,
    /// Cone depth along its axis
    pub depth: f64,
}

impl Default for ProtrusionConfig {
    fn default() -> Self {
        Self {
            anchor: AnchorPolicy::Center,
            offset: 0.5,
            scale: [1.0, 1.0, 1.0],
            rotation_deg: 0.0,
            resolution: 6,
            tip_radius: 0.005,
            base_radius: 0.35,
            depth: 0.5,
        }
    }
}

impl ProtrusionConfig {
    pub fn validate(&self) -> Result<()> {
        check_range_u32("resolution", self.resolution, 3, 24)?;
        check_non_negative("tip_radius", self.tip_radius)?;
        check_non_negative("base_radius", self.base_radius)?;
        check_non_negative("depth", self.depth)?;
        for (axis, &s) in ["x", "y", "z"].iter().zip(&self.scale) {
            if !s.is_finite() {
                return Err(Error::Config(format!("scale.{} must be finite", axis)));
            }
        }
        Ok(())
    }
}

/// Window assembly builder parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Percentage of faces kept as light leaks (10–100)
    pub amount_light: u32,
    /// Percentage of faces kept for curtains (0–100)
    pub amount_curtain: u32,
    /// Partition seed (≥ 1)
    pub seed: u64,
    /// Curtain chain resolution (2–64)
    pub resolution: u32,
    /// Curtain style selection
    pub curtain: CurtainSelect,
    /// Frame recession depth (≥ 0.25)
    pub thickness: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            amount_light: 40,
            amount_curtain: 50,
            seed: 50,
            resolution: 32,
            curtain: CurtainSelect::Both,
            thickness: 0.35,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        check_range_u32("amount_light", self.amount_light, 10, 100)?;
        check_range_u32("amount_curtain", self.amount_curtain, 0, 100)?;
        check_range_u32("resolution", self.resolution, 2, 64)?;
        if self.seed < 1 {
            return Err(Error::Config("seed must be at least 1".to_string()));
        }
        if self.thickness < 0.25 {
            return Err(Error::Config(format!(
                "thickness must be at least 0.25, got {}",
                self.thickness
            )));
        }
        Ok(())
    }
}

/// Rain/dirt drip generator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainDirtConfig {
    /// Drip finger height scale (≥ 0.01)
    pub height: f64,
    /// Subdivision cuts per selected edge (≥ 1)
    pub cuts: u32,
    /// Percentage of drip columns kept (10–100)
    pub amount: u32,
    /// Outward ribbon distance (≥ 0)
    pub distance: f64,
    /// Flip the ribbon to the other side of the surface
    pub invert_distance: bool,
    /// Flip the lateral drip jitter
    pub invert_drops: bool,
    /// Thinning and displacement seed (≥ 1)
    pub seed: u64,
}

impl Default for RainDirtConfig {
    fn default() -> Self {
        Self {
            height: 0.25,
            cuts: 50,
            amount: 50,
            distance: 1.9,
            invert_distance: false,
            invert_drops: false,
            seed: 1,
        }
    }
}

impl RainDirtConfig {
    pub fn validate(&self) -> Result<()> {
        if self.height < 0.01 {
            return Err(Error::Config(format!(
                "height must be at least 0.01, got {}",
                self.height
            )));
        }
        if self.cuts < 1 {
            return Err(Error::Config("cuts must be at least 1".to_string()));
        }
        check_range_u32("amount", self.amount, 10, 100)?;
        check_non_negative("distance", self.distance)?;
        if self.seed < 1 {
            return Err(Error::Config("seed must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Pot (lathe profile) generator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotConfig {
    /// Total height
    pub size: f64,
    /// Belly profile point, radial
    pub shape_width: f64,
    /// Belly profile point, height
    pub shape_height: f64,
    /// Rim radius
    pub top_width: f64,
    /// Foot radius
    pub base_width: f64,
    /// Revolution steps (3–24)
    pub resolution: u32,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            size: 0.70,
            shape_width: 0.50,
            shape_height: 0.15,
            top_width: 0.20,
            base_width: 0.20,
            resolution: 12,
        }
    }
}

impl PotConfig {
    pub fn validate(&self) -> Result<()> {
        check_range_u32("resolution", self.resolution, 3, 24)?;
        check_non_negative("size", self.size)?;
        Ok(())
    }
}

fn check_range_u32(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Config(format!(
            "{} must be in {}..={}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !(value >= 0.0) {
        return Err(Error::Config(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}
