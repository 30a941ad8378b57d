//! Simulation settings
//!
//! Loaded from JSON; any field left out falls back to its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::{BlockGrid, CorrectionSplit, ResolutionPolicy};

/// Axis-aligned region balls must stay inside (when culling is enabled)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gravitational acceleration applied to every ball
    pub gravity: Vec2,
    /// Coefficient of restitution for every contact (0 = inelastic, 1 = elastic)
    pub restitution: f32,
    /// Apply quadratic aerodynamic drag during integration
    pub drag: bool,
    /// How detected contacts are resolved within a tick
    pub policy: ResolutionPolicy,
    /// How ball-ball overlap is shared between the two balls
    pub split: CorrectionSplit,
    /// Block grid size in cells
    pub grid_width: u32,
    pub grid_height: u32,
    /// Remove balls that leave this region (None = never remove)
    pub bounds: Option<Bounds>,
    /// Steps longer than this (seconds) are logged as tunneling hazards
    pub large_step_warning: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: DEFAULT_RESTITUTION,
            drag: false,
            policy: ResolutionPolicy::default(),
            split: CorrectionSplit::default(),
            grid_width: DEFAULT_GRID_SIZE,
            grid_height: DEFAULT_GRID_SIZE,
            bounds: None,
            large_step_warning: LARGE_STEP_WARNING,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(SimError::InvalidRestitution(self.restitution));
        }
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if BlockGrid::cell_count(self.grid_width, self.grid_height).is_none() {
            return Err(SimError::InvalidConfig(format!(
                "grid {}x{} exceeds {} cells",
                self.grid_width, self.grid_height, MAX_GRID_CELLS
            )));
        }
        if let Some(bounds) = self.bounds {
            if bounds.min.x > bounds.max.x || bounds.min.y > bounds.max.y {
                return Err(SimError::InvalidConfig(format!(
                    "bounds min {} exceeds max {}",
                    bounds.min, bounds.max
                )));
            }
        }
        if self.large_step_warning <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "large_step_warning must be > 0, got {}",
                self.large_step_warning
            )));
        }
        Ok(())
    }
}
