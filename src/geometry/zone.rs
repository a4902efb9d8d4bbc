use serde::{Deserialize, Serialize};

use crate::math::polygon_2d::{centroid, edges, is_simple, point_in_polygon, signed_area};
use crate::math::{Point2, TOLERANCE};

use super::Aabb;

/// A deployment area: a simple polygon in world units.
///
/// Vertices may wind either way; the closing edge is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    vertices: Vec<Point2>,
}

impl Zone {
    /// Creates a zone from its vertices.
    ///
    /// Degenerate input is accepted: a zone with fewer than three vertices
    /// contains nothing.
    #[must_use]
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangular zone.
    #[must_use]
    pub fn rect(min: Point2, max: Point2) -> Self {
        Self::new(Aabb::new(min, max).corners().to_vec())
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Iterates the polygon edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point2, &Point2)> {
        edges(&self.vertices)
    }

    #[must_use]
    pub fn contains_point(&self, point: &Point2) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    #[must_use]
    pub fn centroid(&self) -> Point2 {
        centroid(&self.vertices)
    }

    /// Whether the polygon has at least three vertices, non-zero area and no
    /// self-intersections.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.area() > TOLERANCE && is_simple(&self.vertices)
    }

    /// Bounding box of the vertices, `None` for an empty zone.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold(Aabb::new(first, first), |acc, p| {
            Aabb::new(
                Point2::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
                Point2::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
            )
        }))
    }
}
