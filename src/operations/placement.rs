use std::fmt;

use crate::board::{ModelId, Player, UnitData, UnitId};
use crate::config::Rules;
use crate::geometry::{Aabb, Pose, Shape, Zone};

use super::collision::{overlaps, within_range};
use super::containment::{distance_to_zone, inside_zone, wholly_on_board};

/// Which area rule a placement is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRule {
    /// Wholly inside the owner's deployment zone.
    Deployment,
    /// Arriving from reserves: on the board and clear of every enemy model.
    Reinforcement,
    /// On the board, clear of the enemy zone and every enemy model.
    Infiltrators,
}

impl PlacementRule {
    /// Picks the rule for a unit entering the table.
    #[must_use]
    pub fn for_unit(unit: &UnitData, from_reserves: bool) -> Self {
        if from_reserves {
            Self::Reinforcement
        } else if unit.infiltrators {
            Self::Infiltrators
        } else {
            Self::Deployment
        }
    }
}

/// Why a placement was refused. Shown to the player; not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutsideZone,
    NoZone,
    OffBoard,
    TooCloseToEnemyModel(ModelId),
    TooCloseToEnemyZone,
    OverlapsModel(ModelId),
    /// Overlaps another model of the unit being placed, by slot index.
    OverlapsSlot(usize),
    OverlapsObstacle,
}

impl Rejection {
    /// Stable machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutsideZone => "outside_zone",
            Self::NoZone => "no_zone",
            Self::OffBoard => "off_board",
            Self::TooCloseToEnemyModel(_) => "too_close_to_enemy_model",
            Self::TooCloseToEnemyZone => "too_close_to_enemy_zone",
            Self::OverlapsModel(_) | Self::OverlapsSlot(_) => "overlaps_model",
            Self::OverlapsObstacle => "overlaps_wall",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OutsideZone => "must be wholly within your deployment zone",
            Self::NoZone => "no deployment zone is defined for this side",
            Self::OffBoard => "must be wholly on the battlefield",
            Self::TooCloseToEnemyModel(_) => "too close to an enemy model",
            Self::TooCloseToEnemyZone => "too close to the enemy deployment zone",
            Self::OverlapsModel(_) | Self::OverlapsSlot(_) => "overlaps another model",
            Self::OverlapsObstacle => "overlaps a wall",
        };
        f.write_str(text)
    }
}

/// Outcome of validating one pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Legal,
    Rejected(Rejection),
}

impl Verdict {
    #[must_use]
    pub fn is_legal(&self) -> bool {
        matches!(self, Self::Legal)
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Legal => None,
            Self::Rejected(r) => Some(*r),
        }
    }
}

impl From<Option<Rejection>> for Verdict {
    fn from(rejection: Option<Rejection>) -> Self {
        rejection.map_or(Self::Legal, Self::Rejected)
    }
}

/// Terrain the engine consults but does not model.
pub trait ObstacleCheck {
    /// Whether the posed shape overlaps an impassable obstacle.
    fn overlaps_obstacle(&self, shape: &Shape, pose: &Pose) -> bool;
}

/// A board without obstacles.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleCheck for NoObstacles {
    fn overlaps_obstacle(&self, _shape: &Shape, _pose: &Pose) -> bool {
        false
    }
}

impl<F> ObstacleCheck for F
where
    F: Fn(&Shape, &Pose) -> bool,
{
    fn overlaps_obstacle(&self, shape: &Shape, pose: &Pose) -> bool {
        self(shape, pose)
    }
}

/// A live model already on the table, as seen by a validation call.
#[derive(Debug, Clone, Copy)]
pub struct PlacedModel {
    pub id: ModelId,
    pub unit: UnitId,
    pub owner: Player,
    pub shape: Shape,
    pub pose: Pose,
    /// Cached world bounds for the broad phase.
    pub aabb: Aabb,
}

impl PlacedModel {
    #[must_use]
    pub fn new(id: ModelId, unit: UnitId, owner: Player, shape: Shape, pose: Pose) -> Self {
        Self {
            id,
            unit,
            owner,
            shape,
            pose,
            aabb: shape.aabb(&pose),
        }
    }
}

/// Read-only inputs for validating placements of one side's unit.
///
/// A placement is checked against the rule area first, then against other
/// models, then against obstacles; the first failure is reported.
#[derive(Clone, Copy)]
pub struct PlacementContext<'a> {
    pub rules: &'a Rules,
    pub rule: PlacementRule,
    pub owner: Player,
    pub own_zone: Option<&'a Zone>,
    pub enemy_zone: Option<&'a Zone>,
    pub board: Aabb,
    /// Every other live model on the table.
    pub others: &'a [PlacedModel],
    pub obstacles: &'a dyn ObstacleCheck,
}

impl PlacementContext<'_> {
    /// Full check: rule area, then model overlap, then obstacles.
    #[must_use]
    pub fn validate(&self, shape: &Shape, pose: &Pose, exclude: Option<ModelId>) -> Verdict {
        let verdict = self.check_area(shape, pose);
        if !verdict.is_legal() {
            return verdict;
        }
        let verdict = self.check_models(shape, pose, exclude);
        if !verdict.is_legal() {
            return verdict;
        }
        self.check_obstacles(shape, pose)
    }

    /// Applies the [`PlacementRule`].
    #[must_use]
    pub fn check_area(&self, shape: &Shape, pose: &Pose) -> Verdict {
        match self.rule {
            PlacementRule::Deployment => match self.own_zone {
                None => Verdict::Rejected(Rejection::NoZone),
                Some(zone) if inside_zone(self.rules.containment, shape, pose, zone) => {
                    Verdict::Legal
                }
                Some(_) => Verdict::Rejected(Rejection::OutsideZone),
            },
            PlacementRule::Reinforcement => {
                if !wholly_on_board(shape, pose, &self.board) {
                    return Verdict::Rejected(Rejection::OffBoard);
                }
                let range = self.rules.scale().inches(self.rules.reserves_min_distance_in);
                self.enemy_within(shape, pose, range).into()
            }
            PlacementRule::Infiltrators => {
                if !wholly_on_board(shape, pose, &self.board) {
                    return Verdict::Rejected(Rejection::OffBoard);
                }
                let range = self
                    .rules
                    .scale()
                    .inches(self.rules.infiltrator_min_distance_in);
                if let Some(zone) = self.enemy_zone {
                    if distance_to_zone(shape, pose, zone) <= range {
                        return Verdict::Rejected(Rejection::TooCloseToEnemyZone);
                    }
                }
                self.enemy_within(shape, pose, range).into()
            }
        }
    }

    /// Rejects overlap with any other live model, whoever owns it.
    #[must_use]
    pub fn check_models(&self, shape: &Shape, pose: &Pose, exclude: Option<ModelId>) -> Verdict {
        let bounds = shape.aabb(pose);
        self.others
            .iter()
            .filter(|m| Some(m.id) != exclude && m.aabb.intersects(&bounds))
            .find(|m| overlaps(shape, pose, &m.shape, &m.pose))
            .map(|m| Rejection::OverlapsModel(m.id))
            .into()
    }

    /// Consults the injected obstacle predicate.
    #[must_use]
    pub fn check_obstacles(&self, shape: &Shape, pose: &Pose) -> Verdict {
        if self.obstacles.overlaps_obstacle(shape, pose) {
            Verdict::Rejected(Rejection::OverlapsObstacle)
        } else {
            Verdict::Legal
        }
    }

    /// First enemy model within `range` (edge to edge), as a rejection.
    fn enemy_within(&self, shape: &Shape, pose: &Pose, range: f64) -> Option<Rejection> {
        self.others
            .iter()
            .filter(|m| m.owner != self.owner)
            .find(|m| within_range(shape, pose, &m.shape, &m.pose, range))
            .map(|m| Rejection::TooCloseToEnemyModel(m.id))
    }
}
