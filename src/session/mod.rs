pub mod events;

pub use events::SessionEvent;

use std::mem;

use tracing::{debug, trace};

use crate::board::{Board, DeploymentStatus, ModelId, Player, UnitId};
use crate::config::Rules;
use crate::error::SessionError;
use crate::geometry::{Aabb, Pose, Shape, Zone};
use crate::math::Point2;
use crate::operations::{
    check_coherency, grid_extent, overlaps, CoherencyMember, CoherencyReport, Formation,
    FormationMode, NoObstacles, ObstacleCheck, PlacedModel, PlacementContext, PlacementRule,
    Rejection, Verdict,
};

/// Where a session is in the placement flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    /// No unit selected.
    Idle,
    /// Placing the model in slot `index`.
    Placing { index: usize },
    /// The next click lays out every remaining model around an anchor.
    PlacingFormation {
        mode: FormationMode,
        rotation: f64,
        index: usize,
    },
    /// Every slot holds a pose.
    AwaitingConfirmation,
    /// Poses were written to the board.
    Confirmed,
}

/// Formation settings chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSpec {
    pub mode: FormationMode,
    /// Grid rotation in radians.
    pub rotation: f64,
}

/// Result of a [`PlacementSession::place`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceOutcome {
    /// The listed slots now hold their poses.
    Committed { indices: Vec<usize> },
    /// Nothing was committed; `index` is the first slot that failed.
    Rejected { index: usize, rejection: Rejection },
}

impl PlaceOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// State machine for placing one unit at a time.
///
/// Walks a unit through slot-by-slot (or formation) placement against a
/// snapshot of the board taken at [`PlacementSession::begin`]. Nothing is
/// written back to the [`Board`] until [`PlacementSession::confirm`].
///
/// The obstacle predicate defaults to [`NoObstacles`]; pass another
/// [`ObstacleCheck`] to [`PlacementSession::with_obstacles`] to keep bases off
/// walls the host knows about.
pub struct PlacementSession<O = NoObstacles> {
    rules: Rules,
    obstacles: O,
    state: SessionState,
    unit: Option<UnitId>,
    owner: Player,
    rule: PlacementRule,
    models: Vec<ModelId>,
    shapes: Vec<Shape>,
    slots: Vec<Option<Pose>>,
    /// Committed slot indices, most recent last.
    history: Vec<usize>,
    snapshot: Vec<PlacedModel>,
    own_zone: Option<Zone>,
    enemy_zone: Option<Zone>,
    board: Aabb,
    events: Vec<SessionEvent>,
}

impl PlacementSession<NoObstacles> {
    /// Creates an idle session on an obstacle-free table.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self::with_obstacles(rules, NoObstacles)
    }
}

impl<O: ObstacleCheck> PlacementSession<O> {
    /// Creates an idle session that consults `obstacles` for every pose.
    #[must_use]
    pub fn with_obstacles(rules: Rules, obstacles: O) -> Self {
        Self {
            rules,
            obstacles,
            state: SessionState::Idle,
            unit: None,
            owner: Player::One,
            rule: PlacementRule::Deployment,
            models: Vec::new(),
            shapes: Vec::new(),
            slots: Vec::new(),
            history: Vec::new(),
            snapshot: Vec::new(),
            own_zone: None,
            enemy_zone: None,
            board: Aabb::new(Point2::origin(), Point2::origin()),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    #[must_use]
    pub fn rule(&self) -> PlacementRule {
        self.rule
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Model IDs of the unit being placed, one per slot.
    #[must_use]
    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    /// Current pose of every slot, `None` where nothing is committed yet.
    #[must_use]
    pub fn slots(&self) -> &[Option<Pose>] {
        &self.slots
    }

    /// Number of slots holding a pose.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Starts placing a unit's live models.
    ///
    /// Every other unit's live, posed models and both zones are copied now;
    /// later changes to the board are not seen until the next `begin`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the session is idle or
    /// has just confirmed a unit.
    ///
    /// # Panics
    ///
    /// Panics if `unit` was not issued by `board`.
    pub fn begin(
        &mut self,
        board: &Board,
        unit: UnitId,
        rule: PlacementRule,
    ) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Idle | SessionState::Confirmed) {
            return Err(self.invalid("begin"));
        }
        let owner = board.unit(unit).owner;
        self.models = board.live_models(unit);
        self.shapes = self.models.iter().map(|&m| board.model(m).shape).collect();
        self.slots = vec![None; self.models.len()];
        self.history.clear();
        self.snapshot = board.placed_models(Some(unit));
        self.own_zone = board.zone(owner).cloned();
        self.enemy_zone = board.zone(owner.opponent()).cloned();
        self.board = board.bounds();
        self.unit = Some(unit);
        self.owner = owner;
        self.rule = rule;
        self.state = if self.models.is_empty() {
            SessionState::AwaitingConfirmation
        } else {
            SessionState::Placing { index: 0 }
        };
        debug!(
            ?unit,
            ?rule,
            models = self.models.len(),
            others = self.snapshot.len(),
            "placement session began"
        );
        self.events.push(SessionEvent::Began {
            unit,
            models: self.models.len(),
        });
        Ok(())
    }

    /// Places the current slot at `pose`, or in formation mode lays out every
    /// remaining model with `pose` as the anchor.
    ///
    /// A formation is committed all at once or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] outside the placing states.
    /// Illegal poses are not errors; they come back as
    /// [`PlaceOutcome::Rejected`].
    pub fn place(&mut self, pose: Pose) -> Result<PlaceOutcome, SessionError> {
        match self.state {
            SessionState::Placing { index } => Ok(self.place_single(index, pose)),
            SessionState::PlacingFormation { mode, rotation, .. } => {
                self.place_formation(FormationSpec { mode, rotation }, pose)
            }
            _ => Err(self.invalid("place")),
        }
    }

    /// Switches formation placement on or off. The slot being placed is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] outside the placing states.
    pub fn set_formation(&mut self, formation: Option<FormationSpec>) -> Result<(), SessionError> {
        let index = match self.state {
            SessionState::Placing { index } | SessionState::PlacingFormation { index, .. } => index,
            _ => return Err(self.invalid("set formation")),
        };
        self.state = match formation {
            Some(layout) => SessionState::PlacingFormation {
                mode: layout.mode,
                rotation: layout.rotation,
                index,
            },
            None => SessionState::Placing { index },
        };
        debug!(?formation, "formation mode changed");
        self.events.push(SessionEvent::FormationChanged { formation });
        Ok(())
    }

    /// Reverts the most recently committed slot and resumes placing it.
    ///
    /// A formation counts as one commit per model, so undoing it takes one
    /// call per slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] when no unit is being placed and
    /// [`SessionError::NothingToUndo`] when no slot is committed.
    pub fn undo_last(&mut self) -> Result<usize, SessionError> {
        if !self.is_editable() {
            return Err(self.invalid("undo"));
        }
        let index = self.history.pop().ok_or(SessionError::NothingToUndo)?;
        self.slots[index] = None;
        self.state = SessionState::Placing { index };
        debug!(index, "placement undone");
        self.events.push(SessionEvent::Undone { index });
        Ok(index)
    }

    /// Moves an already committed slot, validating it against everything but
    /// itself. The slot keeps its old pose if the move is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] when no unit is being placed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot holds no pose.
    pub fn reposition(&mut self, index: usize, pose: Pose) -> Result<Verdict, SessionError> {
        if !self.is_editable() {
            return Err(self.invalid("reposition"));
        }
        assert!(
            self.slots[index].is_some(),
            "slot {index} has not been placed yet"
        );
        let verdict = self.validate_slot(&self.slots, index, &pose);
        match verdict {
            Verdict::Legal => {
                self.slots[index] = Some(pose);
                self.events.push(SessionEvent::Repositioned { index, pose });
            }
            Verdict::Rejected(rejection) => self.reject(index, rejection),
        }
        Ok(verdict)
    }

    /// Coherency of the slots as they stand, by slot index. Reported coherent
    /// until every slot is placed.
    #[must_use]
    pub fn coherency(&self) -> CoherencyReport<usize> {
        let members: Vec<_> = self
            .slots
            .iter()
            .zip(&self.shapes)
            .enumerate()
            .map(|(id, (pose, shape))| CoherencyMember {
                id,
                shape: *shape,
                pose: *pose,
            })
            .collect();
        check_coherency(&members, &self.rules)
    }

    /// Writes every pose to the board and marks the unit deployed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] when no unit is being placed,
    /// [`SessionError::Incomplete`] while a slot is empty and
    /// [`SessionError::Incoherent`] if the unit is out of coherency.
    ///
    /// # Panics
    ///
    /// Panics if `board` is not the board the session began on.
    pub fn confirm(&mut self, board: &mut Board) -> Result<(), SessionError> {
        let unit = match self.unit {
            Some(unit) if self.is_editable() => unit,
            _ => return Err(self.invalid("confirm")),
        };
        let placed = self.placed_count();
        if placed < self.slots.len() {
            return Err(SessionError::Incomplete {
                placed,
                total: self.slots.len(),
            });
        }
        let report = self.coherency();
        if !report.is_coherent {
            return Err(SessionError::Incoherent {
                violating: report.violating,
            });
        }
        for (&model, pose) in self.models.iter().zip(&self.slots) {
            board.set_pose(model, *pose);
        }
        board.set_status(unit, DeploymentStatus::Deployed);
        self.state = SessionState::Confirmed;
        debug!(?unit, models = self.models.len(), "placement confirmed");
        self.events.push(SessionEvent::Confirmed { unit });
        Ok(())
    }

    /// Drops every slot and returns to idle. Nothing on the board changes.
    pub fn cancel(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.history.clear();
        self.state = SessionState::Idle;
        debug!(unit = ?self.unit, "placement cancelled");
        self.events.push(SessionEvent::Cancelled);
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    fn place_single(&mut self, index: usize, pose: Pose) -> PlaceOutcome {
        match self.validate_slot(&self.slots, index, &pose) {
            Verdict::Legal => {
                self.commit(index, pose);
                self.events.push(SessionEvent::Placed { index, pose });
                self.advance();
                PlaceOutcome::Committed {
                    indices: vec![index],
                }
            }
            Verdict::Rejected(rejection) => {
                self.reject(index, rejection);
                PlaceOutcome::Rejected { index, rejection }
            }
        }
    }

    fn place_formation(
        &mut self,
        layout: FormationSpec,
        anchor: Pose,
    ) -> Result<PlaceOutcome, SessionError> {
        let remaining: Vec<usize> = (0..self.slots.len())
            .filter(|&i| self.slots[i].is_none())
            .collect();
        // The base widest in the grid frame sets the pitch for the whole unit.
        let extent = |s: &Shape| grid_extent(s, anchor.rotation, layout.rotation);
        let shape = remaining
            .iter()
            .map(|&i| self.shapes[i])
            .max_by(|a, b| extent(a).total_cmp(&extent(b)))
            .unwrap_or_else(|| Shape::circle(0.0));
        let poses = Formation::new(anchor.position, remaining.len(), shape, layout.mode)
            .with_rotation(layout.rotation)
            .with_facing(anchor.rotation)
            .execute(&self.rules)?;

        let mut tentative = self.slots.clone();
        for (&index, pose) in remaining.iter().zip(&poses) {
            if let Verdict::Rejected(rejection) = self.validate_slot(&tentative, index, pose) {
                self.reject(index, rejection);
                return Ok(PlaceOutcome::Rejected { index, rejection });
            }
            tentative[index] = Some(*pose);
        }

        for (&index, pose) in remaining.iter().zip(poses) {
            self.commit(index, pose);
        }
        debug!(count = remaining.len(), ?layout, "formation placed");
        self.events.push(SessionEvent::FormationPlaced {
            indices: remaining.clone(),
        });
        self.advance();
        Ok(PlaceOutcome::Committed { indices: remaining })
    }

    /// Rule area, then models already on the table, then the unit's own
    /// committed slots, then obstacles.
    fn validate_slot(&self, slots: &[Option<Pose>], index: usize, pose: &Pose) -> Verdict {
        let ctx = self.context();
        let shape = &self.shapes[index];
        let verdict = ctx.check_area(shape, pose);
        if !verdict.is_legal() {
            return verdict;
        }
        let verdict = ctx.check_models(shape, pose, None);
        if !verdict.is_legal() {
            return verdict;
        }
        let clash = slots.iter().enumerate().find_map(|(j, other)| {
            let other = other.as_ref().filter(|_| j != index)?;
            overlaps(shape, pose, &self.shapes[j], other).then_some(Rejection::OverlapsSlot(j))
        });
        if let Some(rejection) = clash {
            return Verdict::Rejected(rejection);
        }
        ctx.check_obstacles(shape, pose)
    }

    fn context(&self) -> PlacementContext<'_> {
        PlacementContext {
            rules: &self.rules,
            rule: self.rule,
            owner: self.owner,
            own_zone: self.own_zone.as_ref(),
            enemy_zone: self.enemy_zone.as_ref(),
            board: self.board,
            others: &self.snapshot,
            obstacles: &self.obstacles,
        }
    }

    fn commit(&mut self, index: usize, pose: Pose) {
        self.slots[index] = Some(pose);
        self.history.push(index);
    }

    fn reject(&mut self, index: usize, rejection: Rejection) {
        trace!(index, reason = rejection.code(), "placement rejected");
        self.events.push(SessionEvent::Rejected { index, rejection });
    }

    /// Moves to the first empty slot, keeping formation mode if it is on.
    fn advance(&mut self) {
        self.state = match (self.slots.iter().position(Option::is_none), self.state) {
            (None, _) => SessionState::AwaitingConfirmation,
            (Some(index), SessionState::PlacingFormation { mode, rotation, .. }) => {
                SessionState::PlacingFormation {
                    mode,
                    rotation,
                    index,
                }
            }
            (Some(index), _) => SessionState::Placing { index },
        };
    }

    fn is_editable(&self) -> bool {
        matches!(
            self.state,
            SessionState::Placing { .. }
                | SessionState::PlacingFormation { .. }
                | SessionState::AwaitingConfirmation
        )
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state,
        }
    }
}
