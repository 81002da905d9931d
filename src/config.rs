//! Configuration for the coverage planner.

use crate::core::WorldPoint;
use crate::error::{CoverageError, Result};
use crate::footprint::polygon_is_convex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coverage planner configuration.
///
/// All fields have defaults, so a partial TOML file (or an empty one) is
/// accepted. The defaults describe the reference vehicle: a 1.1 m wide
/// platform towing a rectangular tool mounted ahead of the base frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Vehicle width in meters (default: 1.1)
    #[serde(default = "default_vehicle_width")]
    pub vehicle_width: f32,

    /// How many coverage cells fit in one vehicle width (default: 3)
    #[serde(default = "default_division_factor")]
    pub division_factor: u32,

    /// Number of intermediate footprints used to sweep a rotation (default: 100)
    #[serde(default = "default_manoeuvre_resolution")]
    pub manoeuvre_resolution: u32,

    /// Maximum already-covered cells a turning manoeuvre may re-sweep (default: 2)
    #[serde(default = "default_max_overlap_turn")]
    pub max_overlap_turn: u32,

    /// Maximum already-covered cells a forward manoeuvre may re-sweep (default: 0)
    #[serde(default = "default_max_overlap_forward")]
    pub max_overlap_forward: u32,

    /// Vehicle body polygon in the robot frame (convex, counter-clockwise)
    #[serde(default = "default_vehicle_footprint")]
    pub vehicle_footprint: Vec<WorldPoint>,

    /// Tool polygon in the robot frame (convex, counter-clockwise)
    #[serde(default = "default_tool_footprint")]
    pub tool_footprint: Vec<WorldPoint>,
}

fn default_vehicle_width() -> f32 {
    1.1
}

fn default_division_factor() -> u32 {
    3
}

fn default_manoeuvre_resolution() -> u32 {
    100
}

fn default_max_overlap_turn() -> u32 {
    2
}

fn default_max_overlap_forward() -> u32 {
    0
}

fn default_vehicle_footprint() -> Vec<WorldPoint> {
    vec![
        WorldPoint::new(-0.55, -0.55),
        WorldPoint::new(0.55, -0.55),
        WorldPoint::new(0.55, 0.55),
        WorldPoint::new(-0.55, 0.55),
    ]
}

fn default_tool_footprint() -> Vec<WorldPoint> {
    vec![
        WorldPoint::new(0.2, 0.4),
        WorldPoint::new(0.545, 0.4),
        WorldPoint::new(0.545, -0.4),
        WorldPoint::new(0.2, -0.4),
    ]
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            vehicle_width: default_vehicle_width(),
            division_factor: default_division_factor(),
            manoeuvre_resolution: default_manoeuvre_resolution(),
            max_overlap_turn: default_max_overlap_turn(),
            max_overlap_forward: default_max_overlap_forward(),
            vehicle_footprint: default_vehicle_footprint(),
            tool_footprint: default_tool_footprint(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PlannerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Side length of one coverage cell in meters.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.vehicle_width / self.division_factor as f32
    }

    /// Check the configuration for contract violations.
    pub fn validate(&self) -> Result<()> {
        if !(self.vehicle_width > 0.0) {
            return Err(CoverageError::Config(format!(
                "vehicle_width must be positive, got {}",
                self.vehicle_width
            )));
        }
        if self.division_factor == 0 {
            return Err(CoverageError::Config(
                "division_factor must be at least 1".into(),
            ));
        }
        if self.manoeuvre_resolution < 3 {
            return Err(CoverageError::Config(format!(
                "manoeuvre_resolution must be at least 3, got {}",
                self.manoeuvre_resolution
            )));
        }
        validate_polygon("vehicle_footprint", &self.vehicle_footprint)?;
        validate_polygon("tool_footprint", &self.tool_footprint)?;
        Ok(())
    }
}

fn validate_polygon(name: &str, points: &[WorldPoint]) -> Result<()> {
    let mut distinct: Vec<WorldPoint> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.iter().any(|q| q == p) {
            distinct.push(*p);
        }
    }
    if distinct.len() < 3 {
        return Err(CoverageError::DegenerateFootprint(format!(
            "{} has fewer than 3 distinct points",
            name
        )));
    }
    if !polygon_is_convex(points) {
        return Err(CoverageError::Config(format!("{} is not convex", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.tile_size() - 1.1 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PlannerConfig = toml::from_str("vehicle_width = 2.2\n").unwrap();
        assert!((config.vehicle_width - 2.2).abs() < 1e-6);
        assert_eq!(config.division_factor, 3);
        assert_eq!(config.tool_footprint.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_degenerate_footprint_rejected() {
        let config = PlannerConfig {
            tool_footprint: vec![
                WorldPoint::new(0.0, 0.0),
                WorldPoint::new(1.0, 0.0),
                WorldPoint::new(0.0, 0.0),
            ],
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoverageError::DegenerateFootprint(_))
        ));
    }

    #[test]
    fn test_non_convex_footprint_rejected() {
        let config = PlannerConfig {
            vehicle_footprint: vec![
                WorldPoint::new(0.0, 0.0),
                WorldPoint::new(2.0, 0.0),
                WorldPoint::new(0.2, 0.2),
                WorldPoint::new(0.0, 2.0),
            ],
            ..PlannerConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoverageError::Config(_))));
    }

    #[test]
    fn test_zero_division_factor_rejected() {
        let config = PlannerConfig {
            division_factor: 0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
