use crate::config::ContainmentMode;
use crate::geometry::{Aabb, Pose, Shape, Zone};
use crate::math::gjk_2d::{gjk_distance, Segment2};
use crate::math::polygon_2d::min_edge_distance;

use super::collision::CONTACT_TOLERANCE;

/// Whether the whole shape lies inside the zone polygon.
///
/// Circles are tested exactly: the center must be inside and at least one
/// radius away from every edge. Other shapes are tested by their outline
/// samples (ovals: 16 points, rectangles: corners), so a concave zone corner
/// poking between two samples goes unnoticed. See [`wholly_inside_exact`].
#[must_use]
pub fn wholly_inside(shape: &Shape, pose: &Pose, zone: &Zone) -> bool {
    match *shape {
        Shape::Circle { radius } => {
            zone.contains_point(&pose.position)
                && min_edge_distance(&pose.position, zone.vertices()) >= radius
        }
        _ => shape.outline(pose).iter().all(|p| zone.contains_point(p)),
    }
}

/// Exact variant of [`wholly_inside`] that also handles concave zones.
///
/// The center must be inside and no zone edge may touch the shape.
#[must_use]
pub fn wholly_inside_exact(shape: &Shape, pose: &Pose, zone: &Zone) -> bool {
    if matches!(shape, Shape::Circle { .. }) {
        return wholly_inside(shape, pose, zone);
    }
    if !zone.contains_point(&pose.position) {
        return false;
    }
    let posed = shape.posed(pose);
    let bounds = shape.aabb(pose);
    zone.edges().all(|(a, b)| {
        !Aabb::new(*a, *b).intersects(&bounds)
            || gjk_distance(&posed, &Segment2::new(*a, *b)) > CONTACT_TOLERANCE
    })
}

/// Dispatches to the sampled or exact test.
#[must_use]
pub fn inside_zone(mode: ContainmentMode, shape: &Shape, pose: &Pose, zone: &Zone) -> bool {
    match mode {
        ContainmentMode::Sampled => wholly_inside(shape, pose, zone),
        ContainmentMode::Exact => wholly_inside_exact(shape, pose, zone),
    }
}

/// Edge distance from the posed shape to the zone, `0.0` if it touches or
/// enters the zone. A zone with fewer than three vertices is infinitely far.
#[must_use]
pub fn distance_to_zone(shape: &Shape, pose: &Pose, zone: &Zone) -> f64 {
    if zone.vertices().len() < 3 {
        return f64::INFINITY;
    }
    if zone.contains_point(&pose.position) {
        return 0.0;
    }
    let posed = shape.posed(pose);
    zone.edges()
        .map(|(a, b)| gjk_distance(&posed, &Segment2::new(*a, *b)))
        .fold(f64::INFINITY, f64::min)
}

/// Whether the posed shape lies wholly within the board rectangle.
#[must_use]
pub fn wholly_on_board(shape: &Shape, pose: &Pose, board: &Aabb) -> bool {
    board.contains_aabb(&shape.aabb(pose))
}
