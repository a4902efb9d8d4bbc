use serde::{Deserialize, Serialize};

use super::model::ModelId;

slotmap::new_key_type! {
    /// Unique identifier for a unit on the board.
    pub struct UnitId;
}

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Where a unit is in the deployment sequence. Driven by the turn controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    #[default]
    Undeployed,
    Deploying,
    Deployed,
    InReserves,
}

/// Data associated with a unit.
#[derive(Debug, Clone)]
pub struct UnitData {
    pub name: String,
    pub owner: Player,
    pub status: DeploymentStatus,
    /// Member models in datasheet order.
    pub models: Vec<ModelId>,
    /// May deploy anywhere far enough from the enemy instead of in its zone.
    pub infiltrators: bool,
}

impl UnitData {
    /// Creates an empty, undeployed unit.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: Player) -> Self {
        Self {
            name: name.into(),
            owner,
            status: DeploymentStatus::Undeployed,
            models: Vec::new(),
            infiltrators: false,
        }
    }

    #[must_use]
    pub fn with_infiltrators(mut self, infiltrators: bool) -> Self {
        self.infiltrators = infiltrators;
        self
    }
}
