use serde::{Deserialize, Serialize};

use crate::math::{Isometry2, Point2, Vector2};

/// Placement of a shape in world space.
///
/// `rotation` is in radians, counter-clockwise, applied about the shape's
/// center before the translation to `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point2,
    pub rotation: f64,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub fn new(position: Point2, rotation: f64) -> Self {
        Self { position, rotation }
    }

    /// Unrotated pose at `(x, y)`.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point2::new(x, y), 0.0)
    }

    /// Returns a copy rotated to `rotation`.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// The local-to-world rigid transform.
    #[must_use]
    pub fn isometry(&self) -> Isometry2 {
        Isometry2::new(self.position.coords, self.rotation)
    }

    /// Maps a shape-local point to world space.
    #[must_use]
    pub fn to_world(&self, local: &Point2) -> Point2 {
        self.isometry().transform_point(local)
    }

    /// Maps a world point into the shape-local frame.
    #[must_use]
    pub fn to_local(&self, world: &Point2) -> Point2 {
        self.isometry().inverse_transform_point(world)
    }

    /// Rotates a world direction into the shape-local frame.
    #[must_use]
    pub fn dir_to_local(&self, dir: &Vector2) -> Vector2 {
        self.isometry().inverse_transform_vector(dir)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Point2::origin(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotate_then_translate() {
        let pose = Pose::new(Point2::new(10.0, 5.0), FRAC_PI_2);
        let w = pose.to_world(&Point2::new(1.0, 0.0));
        assert!((w - Point2::new(10.0, 6.0)).norm() < 1e-9);
    }

    #[test]
    fn world_direction_into_local_frame() {
        let pose = Pose::new(Point2::new(10.0, 5.0), FRAC_PI_2);
        let d = pose.dir_to_local(&Vector2::new(0.0, 1.0));
        assert!((d - Vector2::new(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn local_round_trip() {
        let pose = Pose::new(Point2::new(-3.0, 2.0), 0.7);
        let world = Point2::new(4.0, 1.0);
        let back = pose.to_world(&pose.to_local(&world));
        assert!((back - world).norm() < 1e-9);
    }
}
