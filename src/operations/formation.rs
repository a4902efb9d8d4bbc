use nalgebra::Rotation2;
use serde::{Deserialize, Serialize};

use crate::config::Rules;
use crate::error::LayoutError;
use crate::geometry::{Pose, Shape};
use crate::math::{Point2, Vector2};

/// Spacing used between models of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationMode {
    /// Bases as far apart as coherency allows.
    Spread,
    /// Bases nearly touching.
    Tight,
}

/// Lays out a batch of models on a grid anchored at a point.
///
/// Rows of up to [`Rules::formation_columns`] models are centered on the
/// anchor horizontally and stack away from it, then the whole grid is rotated
/// about the anchor.
#[derive(Debug, Clone)]
pub struct Formation {
    anchor: Point2,
    count: usize,
    shape: Shape,
    mode: FormationMode,
    rotation: f64,
    facing: f64,
}

impl Formation {
    /// Creates a new `Formation` layout.
    #[must_use]
    pub fn new(anchor: Point2, count: usize, shape: Shape, mode: FormationMode) -> Self {
        Self {
            anchor,
            count,
            shape,
            mode,
            rotation: 0.0,
            facing: 0.0,
        }
    }

    /// Rotates the grid about the anchor (radians).
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets every model's own rotation (radians). Defaults to 0.
    #[must_use]
    pub fn with_facing(mut self, facing: f64) -> Self {
        self.facing = facing;
        self
    }

    /// Center-to-center distance between grid neighbors.
    ///
    /// The base's [`grid_extent`] plus the mode's gap. Neighboring boxes are
    /// then at least one gap apart on both axes, so bases never overlap
    /// whatever their facing.
    #[must_use]
    pub fn spacing(&self, rules: &Rules) -> f64 {
        let gap = match self.mode {
            FormationMode::Spread => rules.coherency_range_in,
            FormationMode::Tight => rules.tight_gap_in,
        };
        grid_extent(&self.shape, self.facing, self.rotation) + rules.scale().inches(gap)
    }

    /// Computes the model poses, in placement order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyFormation`] if the count is zero.
    pub fn execute(&self, rules: &Rules) -> Result<Vec<Pose>, LayoutError> {
        if self.count == 0 {
            return Err(LayoutError::EmptyFormation);
        }
        let columns = rules.formation_columns.max(1).min(self.count);
        let spacing = self.spacing(rules);
        let rotation = Rotation2::new(self.rotation);
        #[allow(clippy::cast_precision_loss)]
        let center_column = (columns / 2) as f64;

        let poses = (0..self.count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let (column, row) = ((i % columns) as f64, (i / columns) as f64);
                let offset = Vector2::new((column - center_column) * spacing, row * spacing);
                Pose::new(self.anchor + rotation * offset, self.facing)
            })
            .collect();
        Ok(poses)
    }
}

/// Largest side of the shape's bounding box in a grid rotated by `rotation`,
/// for a base turned to `facing`.
///
/// Laying out a unit of mixed bases with the shape that maximizes this keeps
/// every pair of neighbors apart.
#[must_use]
pub fn grid_extent(shape: &Shape, facing: f64, rotation: f64) -> f64 {
    let (w, h) = shape.rotated_bounds(facing - rotation);
    w.max(h)
}

/// Number of rows needed for `count` models.
#[must_use]
pub fn row_count(count: usize, rules: &Rules) -> usize {
    count.div_ceil(rules.formation_columns.max(1))
}
