use crate::grid::TileType;
use crate::rng::GameRng;
use crate::view::BoardView;

/// Difficulty context supplied to the spawn model for one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnContext {
    /// Target difficulty for the level, `0.0..=1.0`.
    pub target_difficulty: f32,
    /// Moves remaining before the move limit is reached.
    pub remaining_moves: u32,
    /// Progress toward the level's objectives, `0.0..=1.0`.
    pub goal_progress: f32,
    /// Consecutive failed attempts at this level.
    pub failed_attempts: u32,
    /// Whether the player is judged to be in a flow state.
    pub in_flow_state: bool,
}

/// Per-column color prediction plug-in, invoked by gravity/refill
/// whenever a column needs a new tile spawned at its top.
pub trait SpawnModel {
    /// Predicts the color for a new tile spawned above column
    /// `spawn_x`. Must not allocate.
    fn predict(
        &mut self,
        view: &dyn BoardView,
        spawn_x: i32,
        ctx: &SpawnContext,
        rng: &mut GameRng,
    ) -> TileType;

    /// Clones this model into a fresh boxed trait object. Lets the
    /// engine's `clone` deep-copy an owned `Box<dyn SpawnModel>` without
    /// requiring `SpawnModel: Clone` (object-unsafe).
    fn clone_box(&self) -> Box<dyn SpawnModel>;
}
