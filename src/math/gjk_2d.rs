use super::intersect_2d::cross_2d;
use super::{Point2, Vector2, TOLERANCE};

const MAX_ITERATIONS: usize = 64;

/// Relative convergence threshold on `|v|^2 - v.w`.
const REL_EPS: f64 = 1e-9;

/// A convex set described by its support mapping.
pub trait Support2 {
    /// Returns the point of the set farthest along `dir`.
    ///
    /// `dir` need not be normalized. A zero direction may return any point of
    /// the set.
    fn support(&self, dir: &Vector2) -> Point2;

    /// Returns any point of the set (used to seed the search).
    fn interior_point(&self) -> Point2;
}

/// A closed line segment, the convex hull of its two endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Segment2 {
    pub a: Point2,
    pub b: Point2,
}

impl Segment2 {
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }
}

impl Support2 for Segment2 {
    fn support(&self, dir: &Vector2) -> Point2 {
        if self.a.coords.dot(dir) >= self.b.coords.dot(dir) {
            self.a
        } else {
            self.b
        }
    }

    fn interior_point(&self) -> Point2 {
        nalgebra::center(&self.a, &self.b)
    }
}

/// Returns the Euclidean distance between two convex sets, `0.0` when they
/// intersect or touch (within [`TOLERANCE`]).
///
/// Gilbert-Johnson-Keerthi over the sets' support mappings, so circles,
/// ellipses, rectangles and segments share one routine. The simplex lives on
/// the stack; a query performs no heap allocation.
///
/// If the iteration budget runs out before convergence the separating-plane
/// lower bound is returned, so the result never overstates the distance.
#[must_use]
pub fn gjk_distance<A, B>(a: &A, b: &B) -> f64
where
    A: Support2 + ?Sized,
    B: Support2 + ?Sized,
{
    let mut v: Vector2 = a.interior_point() - b.interior_point();
    let mut simplex = Simplex::default();

    for _ in 0..MAX_ITERATIONS {
        let vv = v.norm_squared();
        if vv < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        let w = minkowski_support(a, b, &-v);
        if vv - v.dot(&w) <= REL_EPS * vv {
            return vv.sqrt();
        }
        simplex.push(w);
        match simplex.reduce() {
            Some(closest) => v = closest,
            // Origin enclosed by the simplex: the sets intersect.
            None => return 0.0,
        }
    }

    let norm = v.norm();
    if norm < TOLERANCE {
        return 0.0;
    }
    let w = minkowski_support(a, b, &-v);
    (v.dot(&w) / norm).max(0.0)
}

/// Support point of the Minkowski difference `A - B`.
fn minkowski_support<A, B>(a: &A, b: &B, dir: &Vector2) -> Vector2
where
    A: Support2 + ?Sized,
    B: Support2 + ?Sized,
{
    a.support(dir) - b.support(&-dir)
}

/// Up to three Minkowski-difference points.
#[derive(Debug, Default)]
struct Simplex {
    points: [Vector2; 3],
    len: usize,
}

impl Simplex {
    fn push(&mut self, w: Vector2) {
        debug_assert!(self.len < 3);
        self.points[self.len] = w;
        self.len += 1;
    }

    /// Shrinks the simplex to the feature closest to the origin and returns
    /// that closest point, or `None` if the origin lies inside the triangle.
    fn reduce(&mut self) -> Option<Vector2> {
        match self.len {
            1 => Some(self.points[0]),
            2 => {
                let (closest, kept) = segment_closest(self.points[0], self.points[1]);
                self.keep(&kept);
                Some(closest)
            }
            _ => self.reduce_triangle(),
        }
    }

    fn reduce_triangle(&mut self) -> Option<Vector2> {
        let [a, b, c] = self.points;
        let area2 = cross_2d(&(b - a), &(c - a));
        if area2.abs() > TOLERANCE * TOLERANCE {
            let d0 = cross_2d(&(b - a), &-a);
            let d1 = cross_2d(&(c - b), &-b);
            let d2 = cross_2d(&(a - c), &-c);
            let all_pos = d0 >= 0.0 && d1 >= 0.0 && d2 >= 0.0;
            let all_neg = d0 <= 0.0 && d1 <= 0.0 && d2 <= 0.0;
            if all_pos || all_neg {
                return None;
            }
        }

        let mut best: Option<(f64, Vector2, Vec2Pair)> = None;
        for (i, j) in [(0, 1), (1, 2), (0, 2)] {
            let (closest, kept) = segment_closest(self.points[i], self.points[j]);
            let dist = closest.norm_squared();
            let better = match &best {
                Some((d, _, _)) => dist < *d,
                None => true,
            };
            if better {
                best = Some((dist, closest, kept));
            }
        }
        let (_, closest, kept) = best?;
        self.keep(&kept);
        Some(closest)
    }

    fn keep(&mut self, kept: &Vec2Pair) {
        match *kept {
            Vec2Pair::One(p) => {
                self.points[0] = p;
                self.len = 1;
            }
            Vec2Pair::Two(p, q) => {
                self.points[0] = p;
                self.points[1] = q;
                self.len = 2;
            }
        }
    }
}

/// The simplex vertices that survive a reduction.
#[derive(Debug, Clone, Copy)]
enum Vec2Pair {
    One(Vector2),
    Two(Vector2, Vector2),
}

/// Closest point to the origin on segment `a`→`b`, plus the supporting vertices.
fn segment_closest(a: Vector2, b: Vector2) -> (Vector2, Vec2Pair) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-20 {
        return (b, Vec2Pair::One(b));
    }
    let t = -a.dot(&ab) / len_sq;
    if t <= 0.0 {
        (a, Vec2Pair::One(a))
    } else if t >= 1.0 {
        (b, Vec2Pair::One(b))
    } else {
        (a + ab * t, Vec2Pair::Two(a, b))
    }
}
