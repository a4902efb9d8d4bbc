pub mod coherency;
pub mod collision;
pub mod containment;
pub mod formation;
pub mod placement;

pub use coherency::{check_coherency, CoherencyMember, CoherencyReport};
pub use collision::{edge_distance, overlaps, within_range, CONTACT_TOLERANCE};
pub use containment::{
    distance_to_zone, inside_zone, wholly_inside, wholly_inside_exact, wholly_on_board,
};
pub use formation::{grid_extent, row_count, Formation, FormationMode};
pub use placement::{
    NoObstacles, ObstacleCheck, PlacedModel, PlacementContext, PlacementRule, Rejection, Verdict,
};
