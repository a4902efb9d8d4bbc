use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Conversion between rule distances (inches), base sizes (millimeters) and
/// the world units poses are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    units_per_inch: f64,
}

impl Scale {
    /// Creates a scale with the given number of world units per inch.
    #[must_use]
    pub fn new(units_per_inch: f64) -> Self {
        Self { units_per_inch }
    }

    /// World units per inch.
    #[must_use]
    pub fn units_per_inch(&self) -> f64 {
        self.units_per_inch
    }

    /// Converts inches to world units.
    #[must_use]
    pub fn inches(&self, inches: f64) -> f64 {
        inches * self.units_per_inch
    }

    /// Converts millimeters to world units.
    #[must_use]
    pub fn mm(&self, mm: f64) -> f64 {
        mm / MM_PER_INCH * self.units_per_inch
    }

    /// Converts world units to inches.
    #[must_use]
    pub fn to_inches(&self, units: f64) -> f64 {
        units / self.units_per_inch
    }

    /// Converts world units to millimeters.
    #[must_use]
    pub fn to_mm(&self, units: f64) -> f64 {
        units / self.units_per_inch * MM_PER_INCH
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(Rules::default().units_per_inch)
    }
}

/// How non-circular bases are tested against a zone polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentMode {
    /// Every outline sample point must lie inside the polygon.
    #[default]
    Sampled,
    /// No polygon edge may touch the shape.
    Exact,
}

/// Rule thresholds. Distances are in inches; see [`Rules::scale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// World units per inch.
    pub units_per_inch: f64,
    /// Maximum edge-to-edge distance between coherent models.
    pub coherency_range_in: f64,
    /// Units with at least this many models need two neighbors in range.
    pub large_unit_size: usize,
    /// Minimum distance from enemy models when arriving from reserves.
    pub reserves_min_distance_in: f64,
    /// Minimum distance from the enemy zone and enemy models for infiltrators.
    pub infiltrator_min_distance_in: f64,
    /// Gap left between bases in a tight formation.
    pub tight_gap_in: f64,
    /// Models per formation row.
    pub formation_columns: usize,
    pub containment: ContainmentMode,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            units_per_inch: 40.0,
            coherency_range_in: 2.0,
            large_unit_size: 7,
            reserves_min_distance_in: 9.0,
            infiltrator_min_distance_in: 9.0,
            tight_gap_in: 0.05,
            formation_columns: 5,
            containment: ContainmentMode::Sampled,
        }
    }
}

impl Rules {
    /// Parses rules from TOML. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if a value fails [`Rules::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let rules: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.units_per_inch.is_finite() && self.units_per_inch > 0.0) {
            return Err(invalid("units_per_inch", "must be a positive number"));
        }
        let distances = [
            ("coherency_range_in", self.coherency_range_in),
            ("reserves_min_distance_in", self.reserves_min_distance_in),
            ("infiltrator_min_distance_in", self.infiltrator_min_distance_in),
            ("tight_gap_in", self.tight_gap_in),
        ];
        for (field, value) in distances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if self.large_unit_size < 2 {
            return Err(invalid("large_unit_size", "must be at least 2"));
        }
        if self.formation_columns == 0 {
            return Err(invalid("formation_columns", "must be at least 1"));
        }
        Ok(())
    }

    /// Returns the unit conversion implied by `units_per_inch`.
    #[must_use]
    pub fn scale(&self) -> Scale {
        Scale::new(self.units_per_inch)
    }

    /// Number of in-range neighbors each model of a `model_count` unit needs.
    #[must_use]
    pub fn required_neighbors(&self, model_count: usize) -> usize {
        if model_count >= self.large_unit_size {
            2
        } else {
            1
        }
    }

    /// Coherency range in world units.
    #[must_use]
    pub fn coherency_range(&self) -> f64 {
        self.scale().inches(self.coherency_range_in)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> crate::error::MusterError {
    ConfigError::Invalid { field, reason }.into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scale_conversions() {
        let s = Scale::new(40.0);
        assert_relative_eq!(s.inches(2.0), 80.0);
        assert_relative_eq!(s.mm(25.4), 40.0);
        assert_relative_eq!(s.to_inches(100.0), 2.5);
        assert_relative_eq!(s.to_mm(40.0), 25.4);
    }

    #[test]
    fn neighbor_threshold_switches_at_seven() {
        let rules = Rules::default();
        assert_eq!(rules.required_neighbors(1), 1);
        assert_eq!(rules.required_neighbors(6), 1);
        assert_eq!(rules.required_neighbors(7), 2);
        assert_eq!(rules.required_neighbors(20), 2);
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let rules = Rules::from_toml_str(
            r#"
            units_per_inch = 1.0
            containment = "exact"
            "#,
        )
        .unwrap();
        assert_relative_eq!(rules.units_per_inch, 1.0);
        assert_eq!(rules.containment, ContainmentMode::Exact);
        assert_relative_eq!(rules.coherency_range_in, 2.0);
        assert_eq!(rules.formation_columns, 5);
    }

    #[test]
    fn toml_rejects_bad_scale() {
        let err = Rules::from_toml_str("units_per_inch = 0.0").unwrap_err();
        assert!(err.to_string().contains("units_per_inch"), "{err}");
    }

    #[test]
    fn toml_rejects_garbage() {
        assert!(Rules::from_toml_str("units_per_inch = [").is_err());
    }

    #[test]
    fn coherency_range_in_world_units() {
        let rules = Rules::default();
        assert_relative_eq!(rules.coherency_range(), 80.0);
    }
}
