mod aabb;
mod base;
mod pose;
mod shape;
mod zone;

pub use aabb::Aabb;
pub use base::{BaseSize, DEFAULT_BASE_MM};
pub use pose::Pose;
pub use shape::{Outline, PosedShape, Shape, OUTLINE_SAMPLES};
pub use zone::Zone;
