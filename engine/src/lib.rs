//! Composes the board, match finder, bomb effects, and spawn model
//! crates into the single authoritative tick loop, plus the engine
//! façade renderers, replay, and analysis depend on.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod explosion;

use match3_board::{
    apply_move as board_apply_move, damage_cover_at, damage_ground_at, find_deadlock_shuffle,
    has_any_valid_move, record_destruction, resolve_gravity, resolve_pending_move,
    update_level_status, GameState, LevelStatus,
};
use match3_core::{
    BombType, Cover, Event, EventCollector, Ground, LevelConfig, Match3Result, MatchGroup,
    NullCollector, ObjectiveElement, ObjectiveLayer, Position, SimulationConfig, SpawnContext,
    SpawnModel, TileType,
};
use match3_match_finder::find_match_groups;

use explosion::{queue_explosion, PendingExplosion};

const DEFAULT_MAX_SHUFFLE_ATTEMPTS: u32 = 10;
const TILE_SCORE: i64 = 10;

/// Outcome of a single `tick` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Tick index after this call.
    pub current_tick: u64,
    /// True if the board has no falling tiles, no pending explosions,
    /// and no pending swap.
    pub is_stable: bool,
}

/// Outcome of `run_until_stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationResult {
    /// Number of ticks actually advanced.
    pub ticks_run: u32,
    /// True if stability was reached before the tick budget ran out.
    pub is_stable: bool,
}

/// Counts of what the most recent `tick` call did. Not part of the
/// replay-critical event stream; purely diagnostic, mirroring how the
/// teacher's analytics system tracks a `last_report` alongside (not
/// instead of) its event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickTelemetry {
    /// Match groups resolved this tick.
    pub matches_resolved: u32,
    /// Bombs created from Line4/Line5/intersection/square matches.
    pub bombs_spawned: u32,
    /// Explosion waves advanced (one per `PendingExplosion` still
    /// active at the start of the tick).
    pub explosion_waves_processed: u32,
    /// Deadlock shuffles attempted (0 or 1; the engine never retries a
    /// shuffle within the same tick).
    pub shuffle_attempts: u32,
}

/// The authoritative simulation engine: owns a `GameState`, the spawn
/// model plug-in, the active event sink, and in-flight explosion
/// waves. Single-threaded; `tick` drives one strictly-ordered pass.
pub struct Engine {
    state: GameState,
    sim_config: SimulationConfig,
    spawn_model: Box<dyn SpawnModel>,
    events: Box<dyn EventCollector>,
    explosions: Vec<PendingExplosion>,
    board_changed: bool,
    spawn_ctx: SpawnContext,
    telemetry: TickTelemetry,
}

impl Engine {
    /// Builds an engine from a validated level config and simulation
    /// config, using `spawn_model` for refill prediction and `events`
    /// as the initial collector.
    pub fn new_engine(
        level: &LevelConfig,
        sim_config: SimulationConfig,
        spawn_model: Box<dyn SpawnModel>,
        events: Box<dyn EventCollector>,
    ) -> Match3Result<Self> {
        let state = GameState::new(level)?;
        Ok(Self::from_state(level, state, sim_config, spawn_model, events))
    }

    /// Builds an engine around an already-existing board state (e.g.
    /// one restored from a snapshot) instead of a fresh one. `level`
    /// supplies only the spawn model's difficulty context; `state` is
    /// used as-is.
    pub fn from_state(
        level: &LevelConfig,
        state: GameState,
        sim_config: SimulationConfig,
        spawn_model: Box<dyn SpawnModel>,
        events: Box<dyn EventCollector>,
    ) -> Self {
        Self {
            state,
            sim_config,
            spawn_model,
            events,
            explosions: Vec::new(),
            board_changed: true,
            spawn_ctx: SpawnContext {
                target_difficulty: level.target_difficulty,
                remaining_moves: level.move_limit,
                goal_progress: 0.0,
                failed_attempts: 0,
                in_flow_state: false,
            },
            telemetry: TickTelemetry::default(),
        }
    }

    /// Telemetry for the most recently completed `tick` call.
    /// Zeroed out, not accumulated, at the start of every tick.
    pub fn telemetry(&self) -> TickTelemetry {
        self.telemetry
    }

    /// The current tick index.
    pub fn current_tick(&self) -> u64 {
        self.state.tick()
    }

    /// Total simulation time elapsed, in seconds.
    pub fn elapsed_time(&self) -> f32 {
        self.state.sim_time()
    }

    /// Read-only access to the board state.
    pub fn state_ref(&self) -> &GameState {
        &self.state
    }

    /// Installs a new event sink, returning the previous one.
    pub fn set_event_collector(&mut self, collector: Box<dyn EventCollector>) -> Box<dyn EventCollector> {
        std::mem::replace(&mut self.events, collector)
    }

    /// Validates and applies a swap. Returns `false` for any rule
    /// violation (out of bounds included); never panics on bad input.
    pub fn apply_move(&mut self, from: Position, to: Position) -> bool {
        let tick = self.state.tick();
        let sim_time = self.state.sim_time();
        let bomb_from = self.state.tile(from).bomb;
        let bomb_to = self.state.tile(to).bomb;

        let applied =
            match board_apply_move(&mut self.state, from, to, tick, sim_time, &mut *self.events) {
                Ok(applied) => applied,
                Err(_) => false,
            };
        if !applied {
            return false;
        }

        self.board_changed = true;
        self.state.increment_move_count();

        if bomb_from.is_present() && bomb_to.is_present() {
            self.state.clear_pending_move();
            let color_at_from = self.state.tile(from).kind;
            let color_at_to = self.state.tile(to).kind;
            self.events.emit(Event::BombTriggered { tick, sim_time, at: to, bomb: bomb_from });
            self.events.emit(Event::BombTriggered { tick, sim_time, at: from, bomb: bomb_to });
            let cells = explosion::resolve_combo_positions(
                &mut self.state, bomb_from, bomb_to, to, from, color_at_to, color_at_from,
            );
            for pos in cells {
                if pos == to || pos == from {
                    self.destroy_cell_consuming(pos, tick, sim_time);
                } else {
                    self.destroy_cell(pos, tick, sim_time);
                }
            }
        } else if bomb_from.is_present() {
            self.state.clear_pending_move();
            let other_color = Some(self.state.tile(from).kind);
            queue_explosion(&mut self.state, bomb_from, to, other_color, &mut self.explosions, &mut *self.events, tick, sim_time);
        } else if bomb_to.is_present() {
            self.state.clear_pending_move();
            let other_color = Some(self.state.tile(to).kind);
            queue_explosion(&mut self.state, bomb_to, from, other_color, &mut self.explosions, &mut *self.events, tick, sim_time);
        }

        true
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        self.telemetry = TickTelemetry::default();
        let tick = self.state.tick();
        let sim_time = self.state.sim_time();

        let still_pending =
            resolve_pending_move(&mut self.state, dt, self.sim_config.swap_animation_duration_seconds, tick, sim_time, &mut *self.events);

        if self.board_changed || (!still_pending && self.state.pending_move().is_none()) {
            self.run_match_finder(tick, sim_time);
        }

        self.advance_explosions(tick, sim_time);

        resolve_gravity(&mut self.state, &mut *self.spawn_model, &self.spawn_ctx, dt, self.sim_config.gravity_acceleration);

        update_level_status(&mut self.state, tick, sim_time, &mut *self.events);

        let is_stable = self.is_stable();
        if is_stable {
            self.try_resolve_deadlock();
        }

        self.state.advance_tick(dt);
        self.board_changed = false;

        TickResult {
            current_tick: self.state.tick(),
            is_stable,
        }
    }

    fn is_stable(&self) -> bool {
        !self.state.has_falling_tile() && self.explosions.is_empty() && self.state.pending_move().is_none()
    }

    fn try_resolve_deadlock(&mut self) {
        if has_any_valid_move(&self.state) {
            return;
        }
        self.telemetry.shuffle_attempts += 1;
        let tick = self.state.tick();
        let sim_time = self.state.sim_time();
        let changes = find_deadlock_shuffle(&mut self.state, DEFAULT_MAX_SHUFFLE_ATTEMPTS);
        if !changes.is_empty() {
            self.events.emit(Event::BoardShuffled { tick, sim_time, changes });
        }
    }

    fn run_match_finder(&mut self, tick: u64, sim_time: f32) {
        let foci: Vec<Position> = match self.state.pending_move() {
            Some(pending) => vec![pending.from, pending.to],
            None => Vec::new(),
        };
        let mut rng = *self.state.rng_mut();
        let groups = find_match_groups(&self.state, &foci, Some(&mut rng));
        *self.state.rng_mut() = rng;

        if groups.is_empty() {
            return;
        }

        let mut total_destroyed = 0u32;
        for group in &groups {
            self.process_match_group(group, tick, sim_time);
            total_destroyed += group.positions.len() as u32;
        }
        self.state.add_score(i64::from(total_destroyed) * TILE_SCORE);
        self.board_changed = true;
        self.telemetry.matches_resolved += groups.len() as u32;
    }

    fn process_match_group(&mut self, group: &MatchGroup, tick: u64, sim_time: f32) {
        let protect = group.bomb_origin.filter(|_| group.spawn_bomb_type != BombType::None);

        for &pos in &group.positions {
            if Some(pos) == protect {
                continue;
            }
            self.destroy_cell(pos, tick, sim_time);
        }

        if let (Some(origin), bomb) = (group.bomb_origin, group.spawn_bomb_type) {
            if bomb != BombType::None {
                self.state.set_bomb_at(origin, group.kind, bomb);
                let tile_id = self.state.tile(origin).id;
                self.events.emit(Event::BombCreated { tick, sim_time, at: origin, tile_id, bomb });
                self.telemetry.bombs_spawned += 1;
            }
        }
    }

    /// Destroys the tile at `pos`, chain-triggering a carried bomb instead
    /// of a plain destroy. Used by match-group and explosion-wave sweeps,
    /// where any bomb encountered should cascade.
    fn destroy_cell(&mut self, pos: Position, tick: u64, sim_time: f32) {
        self.destroy_cell_inner(pos, true, tick, sim_time);
    }

    /// Destroys the tile at `pos` outright, even if it carries a bomb.
    /// Used to consume the two origin tiles of a swap-triggered combo,
    /// which are resolved as one combined action rather than cascading.
    fn destroy_cell_consuming(&mut self, pos: Position, tick: u64, sim_time: f32) {
        self.destroy_cell_inner(pos, false, tick, sim_time);
    }

    fn destroy_cell_inner(&mut self, pos: Position, chain: bool, tick: u64, sim_time: f32) {
        let tile = self.state.tile(pos);
        if !tile.kind.is_present() {
            return;
        }

        if chain && tile.bomb.is_present() {
            queue_explosion(&mut self.state, tile.bomb, pos, None, &mut self.explosions, &mut *self.events, tick, sim_time);
            return;
        }

        let _ = self.state.destroy_tile_at(pos);
        self.events.emit(Event::TileDestroyed { tick, sim_time, at: pos, tile_id: tile.id, kind: tile.kind });
        record_destruction(&mut self.state, ObjectiveLayer::Tile, ObjectiveElement::Tile(tile.kind), tick, sim_time, &mut *self.events);

        let cover: Cover = self.state.cover(pos);
        if !cover.is_absent() {
            damage_cover_at(&mut self.state, pos, tick, sim_time, &mut *self.events);
            if self.state.cover(pos).is_absent() {
                record_destruction(&mut self.state, ObjectiveLayer::Cover, ObjectiveElement::Cover(cover.kind), tick, sim_time, &mut *self.events);
            }
        }

        let ground: Ground = self.state.ground(pos);
        if !ground.is_absent() {
            damage_ground_at(&mut self.state, pos, tick, sim_time, &mut *self.events);
            if self.state.ground(pos).is_absent() {
                record_destruction(&mut self.state, ObjectiveLayer::Ground, ObjectiveElement::Ground(ground.kind), tick, sim_time, &mut *self.events);
            }
        }
    }

    fn advance_explosions(&mut self, tick: u64, sim_time: f32) {
        if self.explosions.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.explosions);
        self.telemetry.explosion_waves_processed += pending.len() as u32;
        let mut still_pending = Vec::new();
        let mut chained = Vec::new();

        for mut explosion in pending {
            let cells = explosion.current_wave_cells();
            for pos in cells {
                let tile = self.state.tile(pos);
                if !tile.kind.is_present() {
                    continue;
                }
                if tile.bomb.is_present() && tile.grid_pos != explosion.origin {
                    chained.push((tile.bomb, pos));
                }
                let _ = self.state.destroy_tile_at(pos);
                self.events.emit(Event::TileDestroyed { tick, sim_time, at: pos, tile_id: tile.id, kind: tile.kind });
                record_destruction(&mut self.state, ObjectiveLayer::Tile, ObjectiveElement::Tile(tile.kind), tick, sim_time, &mut *self.events);
            }
            explosion.wave += 1;
            if explosion.wave <= explosion.max_wave {
                still_pending.push(explosion);
            }
        }

        self.explosions = still_pending;
        for (bomb, pos) in chained {
            queue_explosion(&mut self.state, bomb, pos, None, &mut self.explosions, &mut *self.events, tick, sim_time);
        }
        if !self.explosions.is_empty() {
            self.board_changed = true;
        }
    }

    /// Runs ticks with events disabled until the board is stable or
    /// `max_ticks` is exhausted, then restores the original collector.
    pub fn run_until_stable(&mut self, max_ticks: u32) -> SimulationResult {
        let cap = if max_ticks == 0 { self.sim_config.max_stability_ticks } else { max_ticks };
        let original = self.set_event_collector(Box::new(NullCollector));

        let mut ticks_run = 0;
        let mut is_stable = self.is_stable() && self.state.pending_move().is_none();
        while ticks_run < cap && !is_stable {
            let result = self.tick(1.0 / self.sim_config.tick_rate_hz);
            is_stable = result.is_stable;
            ticks_run += 1;
        }

        let _ = self.set_event_collector(original);
        SimulationResult { ticks_run, is_stable }
    }

    /// Deep-copies this engine's state and RNG, installing a `Null`
    /// collector on the clone regardless of this engine's collector.
    pub fn clone_for_analysis(&self) -> Self {
        Self {
            state: self.state.clone(),
            sim_config: self.sim_config,
            spawn_model: self.spawn_model.clone_box(),
            events: Box::new(NullCollector),
            explosions: self.explosions.clone(),
            board_changed: self.board_changed,
            spawn_ctx: self.spawn_ctx,
            telemetry: self.telemetry,
        }
    }

    /// Level status after the most recent tick.
    pub fn level_status(&self) -> LevelStatus {
        self.state.level_status()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use match3_core::{CoverType, GroundType, InitialCell};
    use match3_spawn_model::DefaultSpawnModel;

    /// Shares its event buffer with the test that installed it, so the
    /// buffer can still be read after ownership moves into the engine.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl EventCollector for Recorder {
        fn emit(&mut self, event: Event) {
            self.0.borrow_mut().push(event);
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    fn level(width: i32, height: i32, initial_layout: Vec<InitialCell>) -> LevelConfig {
        LevelConfig {
            width,
            height,
            tile_types_count: 6,
            move_limit: 20,
            target_difficulty: 0.5,
            objectives: Vec::new(),
            initial_layout,
            seed: 42,
        }
    }

    fn cell(x: i32, y: i32, tile: TileType) -> InitialCell {
        InitialCell {
            pos: Position::new(x, y),
            tile,
            bomb: BombType::None,
            cover: CoverType::None,
            cover_health: 0,
            ground: GroundType::None,
            ground_health: 0,
        }
    }

    fn engine_with(level: LevelConfig) -> Engine {
        Engine::new_engine(
            &level,
            SimulationConfig::default(),
            Box::new(DefaultSpawnModel::new()),
            Box::new(NullCollector),
        )
        .expect("valid level")
    }

    #[test]
    fn three_in_a_row_destroys_tiles_and_scores() {
        let layout = vec![
            cell(0, 0, TileType::Red),
            cell(1, 0, TileType::Red),
            cell(2, 0, TileType::Red),
        ];
        let mut engine = engine_with(level(3, 3, layout));
        let recorder = Recorder::default();
        let _ = engine.set_event_collector(Box::new(recorder.clone()));

        let _ = engine.tick(1.0 / 60.0);

        let destroyed = recorder
            .0
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::TileDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 3);
        assert_eq!(engine.state_ref().score(), 30);
    }

    #[test]
    fn line4_match_spawns_horizontal_bomb() {
        let layout = vec![
            cell(0, 1, TileType::Red),
            cell(1, 1, TileType::Red),
            cell(2, 1, TileType::Red),
            cell(3, 1, TileType::Red),
        ];
        let mut engine = engine_with(level(4, 3, layout));
        let recorder = Recorder::default();
        let _ = engine.set_event_collector(Box::new(recorder.clone()));

        let _ = engine.tick(1.0 / 60.0);

        let spawned = recorder
            .0
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::BombCreated { bomb: BombType::Horizontal, .. }));
        assert!(spawned, "expected a Horizontal bomb to be created from the Line4 match");
    }

    #[test]
    fn adjacent_bomb_swap_triggers_cross_combo() {
        let mut layout = vec![cell(0, 0, TileType::Red), cell(1, 0, TileType::Blue)];
        layout[0].bomb = BombType::Horizontal;
        layout[1].bomb = BombType::Vertical;
        let mut engine = engine_with(level(5, 5, layout));
        let recorder = Recorder::default();
        let _ = engine.set_event_collector(Box::new(recorder.clone()));

        let applied = engine.apply_move(Position::new(0, 0), Position::new(1, 0));
        assert!(applied);

        let events = recorder.0.borrow();
        let triggered = events.iter().filter(|e| matches!(e, Event::BombTriggered { .. })).count();
        assert_eq!(triggered, 2);

        let destroyed = events.iter().filter(|e| matches!(e, Event::TileDestroyed { .. })).count();
        assert_eq!(destroyed, 2);
    }

    #[test]
    fn telemetry_counts_the_match_resolved_this_tick_and_resets_next_tick() {
        let layout = vec![
            cell(0, 0, TileType::Red),
            cell(1, 0, TileType::Red),
            cell(2, 0, TileType::Red),
        ];
        let mut engine = engine_with(level(3, 3, layout));
        let _ = engine.tick(1.0 / 60.0);
        assert_eq!(engine.telemetry().matches_resolved, 1);

        let _ = engine.tick(1.0 / 60.0);
        assert_eq!(engine.telemetry().matches_resolved, 0);
    }

    #[test]
    fn run_until_stable_terminates_within_budget() {
        let layout = vec![cell(0, 0, TileType::Red), cell(1, 1, TileType::Blue)];
        let mut engine = engine_with(level(4, 4, layout));
        let result = engine.run_until_stable(200);
        assert!(result.is_stable, "board should settle within the tick budget");
        assert!(result.ticks_run > 0);
    }
}
