use serde::{Deserialize, Serialize};

use match3_core::{
    BoardView, BombType, Cover, CoverType, GameRng, Grid, Ground, GroundType, LevelConfig,
    ObjectiveConfig, Position, Tile, TileType,
};

/// Terminal or in-progress status of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    /// Objectives not yet resolved.
    InProgress,
    /// Every active objective completed before the move limit.
    Victory,
    /// The move limit was reached with objectives incomplete.
    Defeat,
}

/// One objective slot's live progress, seeded from its `ObjectiveConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    /// The authored configuration this slot tracks.
    pub config: ObjectiveConfig,
    /// Destructions counted so far, capped at `config.target_count`.
    pub current_count: u32,
    /// Whether this slot is still being tracked.
    pub active: bool,
    /// Whether `current_count` has reached `config.target_count`.
    pub completed: bool,
}

/// An in-flight swap awaiting match validation or animation-timed
/// revert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingMove {
    /// First swapped cell.
    pub from: Position,
    /// Second swapped cell.
    pub to: Position,
    /// Whether either cell produced a match immediately after the
    /// swap.
    pub had_match: bool,
    /// Accumulated seconds since the swap was applied.
    pub animation_time: f32,
}

/// The root mutable aggregate: grid state, RNG, score, objectives, and
/// in-flight swap/animation bookkeeping. Exclusively owned by one
/// engine at a time; cloning produces an independent copy (including
/// RNG state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) tile_types_count: u8,
    pub(crate) tiles: Grid<Tile>,
    pub(crate) covers: Grid<Cover>,
    pub(crate) grounds: Grid<Ground>,
    pub(crate) can_match: Grid<bool>,
    pub(crate) rng: GameRng,
    pub(crate) score: i64,
    pub(crate) move_count: u32,
    pub(crate) move_limit: u32,
    pub(crate) selected: Option<Position>,
    pub(crate) level_status: LevelStatus,
    pub(crate) objectives: Vec<ObjectiveProgress>,
    pub(crate) next_tile_id: u64,
    pub(crate) pending_move: Option<PendingMove>,
    pub(crate) tick: u64,
    pub(crate) sim_time: f32,
}

impl GameState {
    /// Builds the initial state for a level, validating its
    /// configuration first.
    pub fn new(config: &LevelConfig) -> Result<Self, match3_core::Match3Error> {
        config.validate()?;

        let width = config.width;
        let height = config.height;
        let mut tiles = Grid::filled(width, height, Tile::empty(Position::new(0, 0)));
        for y in 0..height {
            for x in 0..width {
                tiles.set_unchecked(Position::new(x, y), Tile::empty(Position::new(x, y)));
            }
        }
        let mut covers = Grid::filled(width, height, Cover::NONE);
        let mut grounds = Grid::filled(width, height, Ground::NONE);
        let can_match = Grid::filled(width, height, true);

        let mut next_tile_id = 1u64;
        for cell in &config.initial_layout {
            if cell.tile.is_present() {
                let mut tile = Tile::empty(cell.pos);
                tile.id = next_tile_id;
                tile.kind = cell.tile;
                tile.bomb = cell.bomb;
                next_tile_id += 1;
                tiles.set(cell.pos, tile)?;
            }
            if cell.cover != CoverType::None {
                covers.set(cell.pos, Cover::new(cell.cover, cell.cover_health))?;
            }
            if cell.ground != GroundType::None {
                grounds.set(
                    cell.pos,
                    Ground {
                        kind: cell.ground,
                        health: cell.ground_health,
                    },
                )?;
            }
        }

        let objectives = config
            .objectives
            .iter()
            .take(4)
            .map(|&config| ObjectiveProgress {
                config,
                current_count: 0,
                active: true,
                completed: false,
            })
            .collect();

        Ok(Self {
            width,
            height,
            tile_types_count: config.tile_types_count,
            tiles,
            covers,
            grounds,
            can_match,
            rng: GameRng::from_seed(config.seed),
            score: 0,
            move_count: 0,
            move_limit: config.move_limit,
            selected: None,
            level_status: LevelStatus::InProgress,
            objectives,
            next_tile_id,
            pending_move: None,
            tick: 0,
            sim_time: 0.0,
        })
    }

    /// Board width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Board height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Current score.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Moves performed so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Configured move limit.
    pub fn move_limit(&self) -> u32 {
        self.move_limit
    }

    /// Current level status.
    pub fn level_status(&self) -> LevelStatus {
        self.level_status
    }

    /// Current tick index.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Accumulated simulation time in seconds.
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Objective progress slots.
    pub fn objectives(&self) -> &[ObjectiveProgress] {
        &self.objectives
    }

    /// The in-flight swap awaiting resolution, if any.
    pub fn pending_move(&self) -> Option<PendingMove> {
        self.pending_move
    }

    /// Clears the in-flight swap, e.g. because it resolved into an
    /// immediate bomb detonation rather than an ordinary match.
    pub fn clear_pending_move(&mut self) {
        self.pending_move = None;
    }

    /// True while a tile anywhere on the board is mid-fall.
    pub fn has_falling_tile(&self) -> bool {
        self.tiles.iter().any(|(_, tile)| tile.is_falling)
    }

    /// Direct tile read, bypassing the `BoardView` trait object.
    pub fn tile(&self, pos: Position) -> Tile {
        *self.tiles.get_unchecked(pos)
    }

    /// Direct cover read.
    pub fn cover(&self, pos: Position) -> Cover {
        *self.covers.get_unchecked(pos)
    }

    /// Direct ground read.
    pub fn ground(&self, pos: Position) -> Ground {
        *self.grounds.get_unchecked(pos)
    }

    /// Mutable RNG access, for subsystems (spawn model, shuffler, bomb
    /// origin selection) that need to draw from it.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Allocates the next unique tile id.
    pub fn next_tile_id(&mut self) -> u64 {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    /// Removes the tile at `pos`, returning its prior value.
    pub fn destroy_tile_at(&mut self, pos: Position) -> Tile {
        let previous = self.tile(pos);
        self.tiles.set_unchecked(pos, Tile::empty(pos));
        previous
    }

    /// Overwrites the color and bomb charge of the tile at `pos`,
    /// keeping its id and render state. Used when a match group spawns
    /// a bomb in place of one of its cells.
    pub fn set_bomb_at(&mut self, pos: Position, kind: TileType, bomb: BombType) {
        let mut tile = self.tile(pos);
        tile.kind = kind;
        tile.bomb = bomb;
        self.tiles.set_unchecked(pos, tile);
    }

    /// Adds `delta` to the running score.
    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
    }

    /// Records that one player move was consumed.
    pub fn increment_move_count(&mut self) {
        self.move_count += 1;
    }

    /// Advances the tick counter and accumulates simulation time.
    pub fn advance_tick(&mut self, dt: f32) {
        self.tick += 1;
        self.sim_time += dt;
    }
}

impl BoardView for GameState {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn tile_types_count(&self) -> u8 {
        self.tile_types_count
    }

    fn tile_at(&self, pos: Position) -> Tile {
        *self.tiles.get_unchecked(pos)
    }

    fn cover_at(&self, pos: Position) -> Cover {
        *self.covers.get_unchecked(pos)
    }

    fn ground_at(&self, pos: Position) -> Ground {
        *self.grounds.get_unchecked(pos)
    }

    fn can_match_at(&self, pos: Position) -> bool {
        if !*self.can_match.get_unchecked(pos) {
            return false;
        }
        let cover = self.covers.get_unchecked(pos);
        !(cover.kind.blocks_match() && !cover.is_absent())
    }
}
