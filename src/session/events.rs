use crate::board::UnitId;
use crate::geometry::Pose;
use crate::operations::Rejection;

use super::FormationSpec;

/// Something that happened during a placement session.
///
/// Events queue up inside the session in the order they occurred; the host
/// drains them with [`PlacementSession::drain_events`](super::PlacementSession::drain_events)
/// to refresh previews, play sounds or log the game.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Began { unit: UnitId, models: usize },
    Placed { index: usize, pose: Pose },
    FormationPlaced { indices: Vec<usize> },
    Rejected { index: usize, rejection: Rejection },
    FormationChanged { formation: Option<FormationSpec> },
    Undone { index: usize },
    Repositioned { index: usize, pose: Pose },
    Confirmed { unit: UnitId },
    Cancelled,
}
