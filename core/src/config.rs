use serde::{Deserialize, Serialize};

use crate::errors::Match3Error;
use crate::grid::{BombType, CoverType, GroundType, Position, TileType};

/// Which layer an objective tracks destruction on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveLayer {
    /// Counts tile destructions.
    Tile,
    /// Counts cover destructions.
    Cover,
    /// Counts ground destructions.
    Ground,
}

/// The specific element an objective counts within its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveElement {
    /// A tile color.
    Tile(TileType),
    /// A cover kind.
    Cover(CoverType),
    /// A ground kind.
    Ground(GroundType),
}

/// One objective slot as authored in a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveConfig {
    /// Layer this objective tracks.
    pub target_layer: ObjectiveLayer,
    /// Element within that layer.
    pub element_type: ObjectiveElement,
    /// Number of destructions required to complete the objective.
    pub target_count: u32,
}

/// A non-empty cell the level starts with a tile/bomb/cover/ground on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialCell {
    /// Cell coordinate.
    pub pos: Position,
    /// Starting tile color, or `None` to leave empty.
    pub tile: TileType,
    /// Starting bomb charge.
    pub bomb: BombType,
    /// Starting cover.
    pub cover: CoverType,
    /// Starting cover health.
    pub cover_health: u8,
    /// Starting ground.
    pub ground: GroundType,
    /// Starting ground health.
    pub ground_health: u8,
}

/// Level authoring data: board shape, difficulty knobs, objectives, and
/// the initial non-empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Board width in cells, `3..=12`.
    pub width: i32,
    /// Board height in cells, `3..=12`.
    pub height: i32,
    /// Number of plain colors in play, `3..=7`.
    pub tile_types_count: u8,
    /// Maximum number of moves before the level is lost.
    pub move_limit: u32,
    /// Target difficulty fed to the spawn model, `0.0..=1.0`.
    pub target_difficulty: f32,
    /// Up to 4 objective slots.
    pub objectives: Vec<ObjectiveConfig>,
    /// Explicitly authored starting cells; cells not listed start empty.
    pub initial_layout: Vec<InitialCell>,
    /// RNG seed for this level.
    pub seed: u64,
}

impl LevelConfig {
    /// Validates the authored ranges, returning `InvalidData` describing
    /// the first violated constraint.
    pub fn validate(&self) -> Result<(), Match3Error> {
        if !(3..=12).contains(&self.width) {
            return Err(Match3Error::InvalidData(format!(
                "width {} out of range 3..=12",
                self.width
            )));
        }
        if !(3..=12).contains(&self.height) {
            return Err(Match3Error::InvalidData(format!(
                "height {} out of range 3..=12",
                self.height
            )));
        }
        if !(3..=7).contains(&self.tile_types_count) {
            return Err(Match3Error::InvalidData(format!(
                "tile_types_count {} out of range 3..=7",
                self.tile_types_count
            )));
        }
        if !(1..=99).contains(&self.move_limit) {
            return Err(Match3Error::InvalidData(format!(
                "move_limit {} out of range 1..=99",
                self.move_limit
            )));
        }
        if !(0.0..=1.0).contains(&self.target_difficulty) {
            return Err(Match3Error::InvalidData(format!(
                "target_difficulty {} out of range 0.0..=1.0",
                self.target_difficulty
            )));
        }
        if self.objectives.len() > 4 {
            return Err(Match3Error::InvalidData(format!(
                "{} objectives exceeds the 4-slot limit",
                self.objectives.len()
            )));
        }
        Ok(())
    }
}

/// Engine-wide timing and termination knobs, independent of any one
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds a pending swap animates before reverting with no match.
    pub swap_animation_duration_seconds: f32,
    /// Downward acceleration applied to falling tiles, cells/second^2.
    pub gravity_acceleration: f32,
    /// Ticks advanced per second of simulation time.
    pub tick_rate_hz: f32,
    /// Recognised but unused by the core; reserved for host-side budgets.
    pub max_tool_rounds: u32,
    /// Upper bound on ticks `run_until_stable` will advance.
    pub max_stability_ticks: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            swap_animation_duration_seconds: 0.15,
            gravity_acceleration: 40.0,
            tick_rate_hz: 60.0,
            max_tool_rounds: 0,
            max_stability_ticks: 10_000,
        }
    }
}
