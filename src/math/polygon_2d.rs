use super::distance_2d::point_to_segment_dist;
use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the area centroid of a simple polygon.
///
/// Falls back to the vertex average when the area is (near) zero.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    let area = signed_area(points);
    if area.abs() < TOLERANCE {
        let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords);
        #[allow(clippy::cast_precision_loss)]
        let count = points.len() as f64;
        return Point2::from(sum / count);
    }
    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let w = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    Point2::new(cx / (6.0 * area), cy / (6.0 * area))
}

/// Even-odd ray casting point-in-polygon test.
///
/// Casts a ray towards +x and counts edge crossings. Points exactly on the
/// boundary may land on either side.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns the minimum distance from `point` to any edge of a closed polygon.
///
/// Returns `f64::INFINITY` for an empty polygon.
#[must_use]
pub fn min_edge_distance(point: &Point2, polygon: &[Point2]) -> f64 {
    edges(polygon)
        .map(|(a, b)| point_to_segment_dist(point, a, b))
        .fold(f64::INFINITY, f64::min)
}

/// Iterates the closing edges `(p[i], p[i + 1 mod n])` of a polygon.
pub fn edges(polygon: &[Point2]) -> impl Iterator<Item = (&Point2, &Point2)> {
    let n = polygon.len();
    (0..n).map(move |i| (&polygon[i], &polygon[(i + 1) % n]))
}

/// Checks that no two non-adjacent edges of a closed polygon intersect.
///
/// Polygons with fewer than three vertices are never simple.
#[must_use]
pub fn is_simple(polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a0 = &polygon[i];
        let a1 = &polygon[(i + 1) % n];
        for j in (i + 1)..n {
            // Adjacent edges share a vertex; skip them.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let b0 = &polygon[j];
            let b1 = &polygon[(j + 1) % n];
            if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area(&square(1.0));
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square(1.0);
        pts.reverse();
        assert!((signed_area(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid(&square(4.0));
        assert!((c - Point2::new(2.0, 2.0)).norm() < 1e-9);
    }

    #[test]
    fn centroid_of_collinear_points_is_average() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        let c = centroid(&pts);
        assert!((c - Point2::new(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn point_inside_and_outside_square() {
        let sq = square(2.0);
        assert!(point_in_polygon(&Point2::new(1.0, 1.0), &sq));
        assert!(!point_in_polygon(&Point2::new(3.0, 1.0), &sq));
        assert!(!point_in_polygon(&Point2::new(-0.1, 1.0), &sq));
    }

    #[test]
    fn point_in_concave_notch_is_outside() {
        // U shape: notch between x in [1, 2], y in [1, 3].
        let u = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        assert!(!point_in_polygon(&Point2::new(1.5, 2.0), &u));
        assert!(point_in_polygon(&Point2::new(0.5, 2.0), &u));
    }

    #[test]
    fn min_edge_distance_from_center() {
        let d = min_edge_distance(&Point2::new(1.0, 1.5), &square(4.0));
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn min_edge_distance_with_repeated_vertex() {
        let mut pts = square(4.0);
        pts.insert(1, Point2::new(0.0, 0.0));
        let d = min_edge_distance(&Point2::new(2.0, 2.0), &pts);
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn simple_and_self_intersecting() {
        assert!(is_simple(&square(1.0)));
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(!is_simple(&bowtie));
        assert!(!is_simple(&square(1.0)[..2]));
    }
}
