use crate::geometry::{BaseSize, Pose, Shape};

use super::unit::UnitId;

slotmap::new_key_type! {
    /// Unique identifier for a model on the board.
    pub struct ModelId;
}

/// Data associated with a single model.
#[derive(Debug, Clone)]
pub struct ModelData {
    /// Name, unique within the owning unit.
    pub name: String,
    pub unit: UnitId,
    /// Base descriptor as given; `None` if the datasheet had none.
    pub base: Option<BaseSize>,
    /// Footprint in world units, derived from `base`.
    pub shape: Shape,
    /// `None` until the model is placed.
    pub pose: Option<Pose>,
    pub alive: bool,
}

impl ModelData {
    /// Whether the model is alive and on the table.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.alive && self.pose.is_some()
    }
}
