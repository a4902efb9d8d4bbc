pub mod model;
pub mod unit;

pub use model::{ModelData, ModelId};
pub use unit::{DeploymentStatus, Player, UnitData, UnitId};

use slotmap::SlotMap;
use tracing::warn;

use crate::config::{Rules, Scale};
use crate::geometry::{Aabb, BaseSize, Pose, Shape, Zone};
use crate::math::Point2;
use crate::operations::{check_coherency, CoherencyMember, CoherencyReport, PlacedModel};

/// Central arena that owns every unit and model in play, plus the table
/// itself: its bounds and each side's deployment zone.
///
/// Units and models reference each other via typed IDs. Looking up an ID the
/// board never issued is a caller bug and panics.
#[derive(Debug)]
pub struct Board {
    units: SlotMap<UnitId, UnitData>,
    models: SlotMap<ModelId, ModelData>,
    zones: [Option<Zone>; 2],
    bounds: Aabb,
    scale: Scale,
}

impl Board {
    /// Creates an empty board covering `bounds` (world units).
    #[must_use]
    pub fn new(bounds: Aabb, scale: Scale) -> Self {
        Self {
            units: SlotMap::with_key(),
            models: SlotMap::with_key(),
            zones: [None, None],
            bounds,
            scale,
        }
    }

    /// Creates a board of the given size in inches, with its corner at the
    /// origin.
    #[must_use]
    pub fn from_inches(width_in: f64, height_in: f64, rules: &Rules) -> Self {
        let scale = rules.scale();
        let bounds = Aabb::new(
            Point2::origin(),
            Point2::new(scale.inches(width_in), scale.inches(height_in)),
        );
        Self::new(bounds, scale)
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[must_use]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    // --- Unit operations ---

    /// Inserts a unit and returns its ID.
    pub fn add_unit(&mut self, data: UnitData) -> UnitId {
        self.units.insert(data)
    }

    /// Returns the unit data.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this board.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> &UnitData {
        &self.units[id]
    }

    #[must_use]
    pub fn get_unit(&self, id: UnitId) -> Option<&UnitData> {
        self.units.get(id)
    }

    /// Sets the deployment status of a unit.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this board.
    pub fn set_status(&mut self, id: UnitId, status: DeploymentStatus) {
        self.units[id].status = status;
    }

    /// IDs of the units with the given status, optionally for one side only.
    #[must_use]
    pub fn units_with_status(
        &self,
        status: DeploymentStatus,
        owner: Option<Player>,
    ) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|(_, u)| u.status == status && (owner.is_none() || owner == Some(u.owner)))
            .map(|(id, _)| id)
            .collect()
    }

    // --- Model operations ---

    /// Adds a model to the end of a unit. A model without a base descriptor
    /// gets the default round base.
    ///
    /// # Panics
    ///
    /// Panics if `unit` was not issued by this board.
    pub fn add_model(
        &mut self,
        unit: UnitId,
        name: impl Into<String>,
        base: Option<BaseSize>,
    ) -> ModelId {
        let name = name.into();
        if base.is_none() {
            warn!(model = %name, "model has no base size; using the default round base");
        }
        let shape = Shape::from_optional_base(base.as_ref(), &self.scale);
        let id = self.models.insert(ModelData {
            name,
            unit,
            base,
            shape,
            pose: None,
            alive: true,
        });
        self.units[unit].models.push(id);
        id
    }

    /// Returns the model data.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this board.
    #[must_use]
    pub fn model(&self, id: ModelId) -> &ModelData {
        &self.models[id]
    }

    #[must_use]
    pub fn get_model(&self, id: ModelId) -> Option<&ModelData> {
        self.models.get(id)
    }

    /// Moves a model onto the table, or takes it off with `None`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this board.
    pub fn set_pose(&mut self, id: ModelId, pose: Option<Pose>) {
        self.models[id].pose = pose;
    }

    /// Removes a model as a casualty. It keeps its slot in the unit but no
    /// longer counts for placement or coherency.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this board.
    pub fn kill_model(&mut self, id: ModelId) {
        let model = &mut self.models[id];
        model.alive = false;
        model.pose = None;
    }

    /// Live models of a unit, in datasheet order.
    ///
    /// # Panics
    ///
    /// Panics if `unit` was not issued by this board.
    #[must_use]
    pub fn live_models(&self, unit: UnitId) -> Vec<ModelId> {
        self.units[unit]
            .models
            .iter()
            .copied()
            .filter(|&m| self.models[m].alive)
            .collect()
    }

    /// Every live model on the table, skipping those of `except`.
    #[must_use]
    pub fn placed_models(&self, except: Option<UnitId>) -> Vec<PlacedModel> {
        self.models
            .iter()
            .filter(|(_, m)| Some(m.unit) != except && m.is_placed())
            .filter_map(|(id, m)| {
                let pose = m.pose?;
                let owner = self.units[m.unit].owner;
                Some(PlacedModel::new(id, m.unit, owner, m.shape, pose))
            })
            .collect()
    }

    // --- Zones ---

    /// Sets a side's deployment zone. A self-intersecting polygon is accepted
    /// but logged, since containment answers for it are unreliable.
    pub fn set_zone(&mut self, player: Player, zone: Zone) {
        if !zone.is_simple() {
            warn!(?player, "deployment zone is not a simple polygon");
        }
        self.zones[player.index()] = Some(zone);
    }

    #[must_use]
    pub fn zone(&self, player: Player) -> Option<&Zone> {
        self.zones[player.index()].as_ref()
    }

    // --- Queries ---

    /// Coherency of a unit's live models at their current poses.
    ///
    /// # Panics
    ///
    /// Panics if `unit` was not issued by this board.
    #[must_use]
    pub fn unit_coherency(&self, unit: UnitId, rules: &Rules) -> CoherencyReport<ModelId> {
        let members: Vec<_> = self
            .live_models(unit)
            .into_iter()
            .map(|id| {
                let model = &self.models[id];
                CoherencyMember {
                    id,
                    shape: model.shape,
                    pose: model.pose,
                }
            })
            .collect();
        check_coherency(&members, rules)
    }
}
