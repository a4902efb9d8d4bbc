use crate::geometry::{Pose, Shape};
use crate::math::gjk_2d::gjk_distance;
use crate::math::Point2;

/// Distances at or below this count as contact for the GJK-resolved pairs.
pub const CONTACT_TOLERANCE: f64 = 1e-9;

/// Whether two posed shapes intersect.
///
/// Circle pairs and circle/rectangle pairs use closed forms; every other pair
/// goes through GJK on the support mappings, which is exact for these convex
/// bases. The pair is evaluated in a canonical order, so swapping the
/// arguments never changes the answer.
///
/// Circle/circle is strict (touching bases do not overlap). Pairs resolved by
/// GJK treat touching as overlapping, erring towards rejecting a placement.
#[must_use]
pub fn overlaps(a: &Shape, pose_a: &Pose, b: &Shape, pose_b: &Pose) -> bool {
    let (a, pose_a, b, pose_b) = canonical(a, pose_a, b, pose_b);
    if !a.aabb(pose_a).intersects(&b.aabb(pose_b)) {
        return false;
    }
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            (pose_a.position - pose_b.position).norm() < ra + rb
        }
        (Shape::Circle { radius }, Shape::Rectangle { length, width }) => {
            let (gap, inside) = point_rect_gap(&pose_a.position, length, width, pose_b);
            inside || gap < radius
        }
        (Shape::Rectangle { length, width }, Shape::Circle { radius }) => {
            let (gap, inside) = point_rect_gap(&pose_b.position, length, width, pose_a);
            inside || gap < radius
        }
        _ => gjk_distance(&a.posed(pose_a), &b.posed(pose_b)) <= CONTACT_TOLERANCE,
    }
}

/// Edge-to-edge distance between two posed shapes; `0.0` when they overlap.
#[must_use]
pub fn edge_distance(a: &Shape, pose_a: &Pose, b: &Shape, pose_b: &Pose) -> f64 {
    let (a, pose_a, b, pose_b) = canonical(a, pose_a, b, pose_b);
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            ((pose_a.position - pose_b.position).norm() - ra - rb).max(0.0)
        }
        (Shape::Circle { radius }, Shape::Rectangle { length, width }) => {
            circle_rect_distance(&pose_a.position, radius, length, width, pose_b)
        }
        (Shape::Rectangle { length, width }, Shape::Circle { radius }) => {
            circle_rect_distance(&pose_b.position, radius, length, width, pose_a)
        }
        _ => gjk_distance(&a.posed(pose_a), &b.posed(pose_b)),
    }
}

/// Whether the two shapes are within `range` of each other, edge to edge.
///
/// Runs a bounding-box rejection before the exact distance.
#[must_use]
pub fn within_range(a: &Shape, pose_a: &Pose, b: &Shape, pose_b: &Pose, range: f64) -> bool {
    if !a
        .aabb(pose_a)
        .expanded(range + CONTACT_TOLERANCE)
        .intersects(&b.aabb(pose_b))
    {
        return false;
    }
    edge_distance(a, pose_a, b, pose_b) <= range + CONTACT_TOLERANCE
}

/// Orders a pair deterministically by shape, then pose.
fn canonical<'a>(
    a: &'a Shape,
    pose_a: &'a Pose,
    b: &'a Shape,
    pose_b: &'a Pose,
) -> (&'a Shape, &'a Pose, &'a Shape, &'a Pose) {
    let order = a
        .total_cmp(b)
        .then_with(|| pose_a.position.x.total_cmp(&pose_b.position.x))
        .then_with(|| pose_a.position.y.total_cmp(&pose_b.position.y))
        .then_with(|| pose_a.rotation.total_cmp(&pose_b.rotation));
    if order.is_gt() {
        (b, pose_b, a, pose_a)
    } else {
        (a, pose_a, b, pose_b)
    }
}

/// Distance from a world point to a posed rectangle, and whether the point is
/// inside it.
fn point_rect_gap(point: &Point2, length: f64, width: f64, rect_pose: &Pose) -> (f64, bool) {
    let local = rect_pose.to_local(point);
    let (hx, hy) = (length * 0.5, width * 0.5);
    let clamped = Point2::new(local.x.clamp(-hx, hx), local.y.clamp(-hy, hy));
    let inside = local.x.abs() <= hx && local.y.abs() <= hy;
    ((local - clamped).norm(), inside)
}

fn circle_rect_distance(
    center: &Point2,
    radius: f64,
    length: f64,
    width: f64,
    rect_pose: &Pose,
) -> f64 {
    let (gap, inside) = point_rect_gap(center, length, width, rect_pose);
    if inside {
        0.0
    } else {
        (gap - radius).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn circles_touching_do_not_overlap() {
        let c = Shape::circle(1.0);
        assert!(!overlaps(&c, &Pose::at(0.0, 0.0), &c, &Pose::at(2.0, 0.0)));
        assert!(overlaps(&c, &Pose::at(0.0, 0.0), &c, &Pose::at(1.999, 0.0)));
    }

    #[test]
    fn identical_circles_at_same_point_overlap() {
        let c = Shape::circle(0.5);
        assert!(overlaps(&c, &Pose::at(3.0, 3.0), &c, &Pose::at(3.0, 3.0)));
    }

    #[test]
    fn circle_near_rectangle_corner() {
        let rect = Shape::rectangle(2.0, 2.0);
        let c = Shape::circle(1.0);
        // Corner at (1, 1); circle center 1.2 away along the diagonal.
        let d = 1.0 + 1.2 / 2.0_f64.sqrt();
        assert!(!overlaps(&c, &Pose::at(d, d), &rect, &Pose::at(0.0, 0.0)));
        assert_relative_eq!(
            edge_distance(&c, &Pose::at(d, d), &rect, &Pose::at(0.0, 0.0)),
            0.2,
            epsilon = 1e-9
        );
    }

    #[test]
    fn circle_beside_rectangle_face_is_clear() {
        // A half-diagonal bounding circle (radius 1.414) would reject this.
        let rect = Shape::rectangle(2.0, 2.0);
        let c = Shape::circle(1.0);
        assert!(!overlaps(&c, &Pose::at(2.05, 0.0), &rect, &Pose::at(0.0, 0.0)));
    }

    #[test]
    fn circle_inside_rectangle_overlaps() {
        let rect = Shape::rectangle(10.0, 10.0);
        let c = Shape::circle(0.5);
        assert!(overlaps(&rect, &Pose::at(0.0, 0.0), &c, &Pose::at(1.0, 1.0)));
    }

    #[test]
    fn rotated_rectangles_corner_gap() {
        let r = Shape::rectangle(2.0, 2.0);
        let a = Pose::new(Point2::new(0.0, 0.0), FRAC_PI_4);
        let b = Pose::at(2.5, 0.0);
        // Diamond reaches x = sqrt(2) ~ 1.414, square starts at 1.5.
        assert!(!overlaps(&r, &a, &r, &b));
        assert_relative_eq!(edge_distance(&r, &a, &r, &b), 1.5 - 2.0_f64.sqrt(), epsilon = 1e-7);
        let c = Pose::at(2.3, 0.0);
        assert!(overlaps(&r, &a, &r, &c));
    }

    #[test]
    fn ovals_side_by_side() {
        let o = Shape::oval(4.0, 2.0);
        let a = Pose::at(0.0, 0.0);
        // Minor axes face each other: gap = 3 - 2 = 1.
        let b = Pose::at(0.0, 3.0);
        assert!(!overlaps(&o, &a, &o, &b));
        assert_relative_eq!(edge_distance(&o, &a, &o, &b), 1.0, epsilon = 1e-6);
        // Turn one a quarter: its major axis now reaches down to y = 0.8.
        let c = Pose::new(Point2::new(0.0, 2.8), FRAC_PI_2);
        assert!(overlaps(&o, &a, &o, &c));
    }

    #[test]
    fn oval_and_circle_distance() {
        let o = Shape::oval(6.0, 2.0);
        let c = Shape::circle(1.0);
        let d = edge_distance(&o, &Pose::at(0.0, 0.0), &c, &Pose::at(5.0, 0.0));
        assert_relative_eq!(d, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn within_range_uses_edges_not_centers() {
        let c = Shape::circle(1.0);
        // Centers 4 apart, edges 2 apart.
        assert!(within_range(&c, &Pose::at(0.0, 0.0), &c, &Pose::at(4.0, 0.0), 2.0));
        assert!(!within_range(&c, &Pose::at(0.0, 0.0), &c, &Pose::at(4.1, 0.0), 2.0));
    }

    fn shape_strategy() -> impl Strategy<Value = Shape> {
        prop_oneof![
            (0.2..3.0f64).prop_map(Shape::circle),
            (0.2..4.0f64, 0.2..4.0f64).prop_map(|(l, w)| Shape::oval(l, w)),
            (0.2..4.0f64, 0.2..4.0f64).prop_map(|(l, w)| Shape::rectangle(l, w)),
        ]
    }

    fn pose_strategy() -> impl Strategy<Value = Pose> {
        (-5.0..5.0f64, -5.0..5.0f64, -3.2..3.2f64)
            .prop_map(|(x, y, r)| Pose::new(Point2::new(x, y), r))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            a in shape_strategy(),
            pa in pose_strategy(),
            b in shape_strategy(),
            pb in pose_strategy(),
        ) {
            prop_assert_eq!(overlaps(&a, &pa, &b, &pb), overlaps(&b, &pb, &a, &pa));
            prop_assert_eq!(
                edge_distance(&a, &pa, &b, &pb).to_bits(),
                edge_distance(&b, &pb, &a, &pa).to_bits()
            );
        }

        #[test]
        fn shapes_at_same_pose_overlap(a in shape_strategy(), pa in pose_strategy()) {
            prop_assert!(overlaps(&a, &pa, &a, &pa));
        }

        #[test]
        fn overlap_agrees_with_distance(
            a in shape_strategy(),
            pa in pose_strategy(),
            b in shape_strategy(),
            pb in pose_strategy(),
        ) {
            if edge_distance(&a, &pa, &b, &pb) > 1e-6 {
                prop_assert!(!overlaps(&a, &pa, &b, &pb));
            }
        }
    }
}
