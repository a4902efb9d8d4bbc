pub mod distance_2d;
pub mod gjk_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type. World units unless stated otherwise.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2D rigid transform (rotation followed by translation).
pub type Isometry2 = nalgebra::Isometry2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
