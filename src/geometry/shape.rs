use std::cmp::Ordering;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::Scale;
use crate::math::gjk_2d::Support2;
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Aabb, BaseSize, Pose};

/// Number of boundary samples taken around round outlines.
pub const OUTLINE_SAMPLES: usize = 16;

/// Footprint of a model's base, centered on the local origin.
///
/// Dimensions are in world units. `length` runs along the local x axis and
/// `width` along the local y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle { radius: f64 },
    Oval { length: f64, width: f64 },
    Rectangle { length: f64, width: f64 },
}

impl Shape {
    #[must_use]
    pub fn circle(radius: f64) -> Self {
        Self::Circle { radius }
    }

    #[must_use]
    pub fn oval(length: f64, width: f64) -> Self {
        Self::Oval { length, width }
    }

    #[must_use]
    pub fn rectangle(length: f64, width: f64) -> Self {
        Self::Rectangle { length, width }
    }

    /// Builds the world-unit footprint of a base descriptor.
    #[must_use]
    pub fn from_base(base: &BaseSize, scale: &Scale) -> Self {
        match *base {
            BaseSize::Circle { diameter_mm } => Self::circle(scale.mm(diameter_mm) * 0.5),
            BaseSize::Oval {
                length_mm,
                width_mm,
            } => Self::oval(scale.mm(length_mm), scale.mm(width_mm)),
            BaseSize::Rectangle {
                length_mm,
                width_mm,
            } => Self::rectangle(scale.mm(length_mm), scale.mm(width_mm)),
        }
    }

    /// Like [`Shape::from_base`], falling back to the default round base.
    #[must_use]
    pub fn from_optional_base(base: Option<&BaseSize>, scale: &Scale) -> Self {
        Self::from_base(base.unwrap_or(&BaseSize::default()), scale)
    }

    /// Axis-aligned `(width, height)` at zero rotation.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Circle { radius } => (radius * 2.0, radius * 2.0),
            Self::Oval { length, width } | Self::Rectangle { length, width } => (length, width),
        }
    }

    /// Axis-aligned `(width, height)` after rotating by `rotation` radians.
    #[must_use]
    pub fn rotated_bounds(&self, rotation: f64) -> (f64, f64) {
        let (c, s) = (rotation.cos().abs(), rotation.sin().abs());
        match *self {
            Self::Circle { radius } => (radius * 2.0, radius * 2.0),
            Self::Oval { length, width } => {
                let (a, b) = (length * 0.5, width * 0.5);
                let w = 2.0 * (a * a * c * c + b * b * s * s).sqrt();
                let h = 2.0 * (a * a * s * s + b * b * c * c).sqrt();
                (w, h)
            }
            Self::Rectangle { length, width } => {
                (length * c + width * s, length * s + width * c)
            }
        }
    }

    /// World-space bounding box of the posed shape.
    #[must_use]
    pub fn aabb(&self, pose: &Pose) -> Aabb {
        let (w, h) = self.rotated_bounds(pose.rotation);
        Aabb::from_center(pose.position, w, h)
    }

    /// Diameter of the smallest circle around the center enclosing the shape.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        match *self {
            Self::Circle { radius } => radius * 2.0,
            Self::Oval { length, width } => length.max(width),
            Self::Rectangle { length, width } => length.hypot(width),
        }
    }

    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        self.max_extent() * 0.5
    }

    /// Rotates `local` by the pose rotation, then translates by its position.
    #[must_use]
    pub fn transform_point(&self, local: &Point2, pose: &Pose) -> Point2 {
        pose.to_world(local)
    }

    /// Hit test: whether `world` lies on or inside the posed shape.
    #[must_use]
    pub fn contains_point(&self, world: &Point2, pose: &Pose) -> bool {
        let p = pose.to_local(world);
        match *self {
            Self::Circle { radius } => p.coords.norm_squared() <= radius * radius + TOLERANCE,
            Self::Oval { length, width } => {
                // (x/a)^2 + (y/b)^2 <= 1, scaled through to avoid dividing.
                let (a, b) = (length * 0.5, width * 0.5);
                (p.x * b).powi(2) + (p.y * a).powi(2) <= (a * b).powi(2) + TOLERANCE
            }
            Self::Rectangle { length, width } => {
                p.x.abs() <= length * 0.5 + TOLERANCE && p.y.abs() <= width * 0.5 + TOLERANCE
            }
        }
    }

    /// Whether this shape at `pose` intersects `other` at `other_pose`.
    #[must_use]
    pub fn overlaps(&self, other: &Shape, pose: &Pose, other_pose: &Pose) -> bool {
        crate::operations::overlaps(self, pose, other, other_pose)
    }

    /// World-space boundary samples: rectangle corners, or
    /// [`OUTLINE_SAMPLES`] parametric points around circles and ovals.
    #[must_use]
    pub fn outline(&self, pose: &Pose) -> Outline {
        let mut outline = Outline::empty();
        match *self {
            Self::Circle { radius } => outline.fill_ellipse(radius, radius, pose),
            Self::Oval { length, width } => outline.fill_ellipse(length * 0.5, width * 0.5, pose),
            Self::Rectangle { length, width } => {
                let (a, b) = (length * 0.5, width * 0.5);
                for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                    outline.push(pose.to_world(&Point2::new(sx * a, sy * b)));
                }
            }
        }
        outline
    }

    /// Farthest point of the unposed shape along a local direction.
    #[must_use]
    pub fn support_local(&self, dir: &Vector2) -> Point2 {
        match *self {
            Self::Circle { radius } => {
                let n = dir.norm();
                if n < TOLERANCE {
                    return Point2::origin();
                }
                Point2::from(dir * (radius / n))
            }
            Self::Oval { length, width } => {
                let (a, b) = (length * 0.5, width * 0.5);
                let denom = ((a * dir.x).powi(2) + (b * dir.y).powi(2)).sqrt();
                if denom < TOLERANCE {
                    return Point2::origin();
                }
                Point2::new(a * a * dir.x / denom, b * b * dir.y / denom)
            }
            Self::Rectangle { length, width } => {
                let x = if dir.x >= 0.0 { length * 0.5 } else { -length * 0.5 };
                let y = if dir.y >= 0.0 { width * 0.5 } else { -width * 0.5 };
                Point2::new(x, y)
            }
        }
    }

    /// Pairs the shape with a pose for support-mapping queries.
    #[must_use]
    pub fn posed<'a>(&'a self, pose: &'a Pose) -> PosedShape<'a> {
        PosedShape { shape: self, pose }
    }

    /// Deterministic total order over shapes, used to canonicalize pairs.
    pub(crate) fn total_cmp(&self, other: &Shape) -> Ordering {
        let key = |s: &Shape| match *s {
            Self::Circle { radius } => (0u8, radius, radius),
            Self::Oval { length, width } => (1, length, width),
            Self::Rectangle { length, width } => (2, length, width),
        };
        let (ka, a0, a1) = key(self);
        let (kb, b0, b1) = key(other);
        ka.cmp(&kb)
            .then_with(|| a0.total_cmp(&b0))
            .then_with(|| a1.total_cmp(&b1))
    }
}

/// A shape placed in the world, borrowed for the duration of a query.
#[derive(Debug, Clone, Copy)]
pub struct PosedShape<'a> {
    pub shape: &'a Shape,
    pub pose: &'a Pose,
}

impl Support2 for PosedShape<'_> {
    fn support(&self, dir: &Vector2) -> Point2 {
        let local_dir = self.pose.dir_to_local(dir);
        self.pose.to_world(&self.shape.support_local(&local_dir))
    }

    fn interior_point(&self) -> Point2 {
        self.pose.position
    }
}

/// Fixed-capacity list of world-space outline samples.
///
/// Lives on the stack so per-frame containment checks stay allocation-free.
#[derive(Debug, Clone, Copy)]
pub struct Outline {
    points: [Point2; OUTLINE_SAMPLES],
    len: usize,
}

impl Outline {
    fn empty() -> Self {
        Self {
            points: [Point2::origin(); OUTLINE_SAMPLES],
            len: 0,
        }
    }

    fn push(&mut self, p: Point2) {
        self.points[self.len] = p;
        self.len += 1;
    }

    fn fill_ellipse(&mut self, a: f64, b: f64, pose: &Pose) {
        for i in 0..OUTLINE_SAMPLES {
            #[allow(clippy::cast_precision_loss)]
            let t = TAU * i as f64 / OUTLINE_SAMPLES as f64;
            self.push(pose.to_world(&Point2::new(a * t.cos(), b * t.sin())));
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Point2] {
        &self.points[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point2> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
