use match3_core::{Position, SpawnContext, SpawnModel, Tile, Vec2};

use crate::state::GameState;

/// Compacts tiles downward under gravity, integrates falling tiles'
/// render position toward their resting cell, and refills emptied
/// columns from the top. Processes columns left to right, each
/// bottom-to-top, against a single consistent read of the grid so two
/// tiles never land on the same cell within one call.
pub fn resolve_gravity(
    state: &mut GameState,
    spawn_model: &mut dyn SpawnModel,
    spawn_ctx: &SpawnContext,
    dt: f32,
    gravity_acceleration: f32,
) {
    let width = state.width;
    let height = state.height;

    for x in 0..width {
        compact_column(state, x, height);
    }

    integrate_falling_tiles(state, dt, gravity_acceleration);

    for x in 0..width {
        refill_column_top(state, spawn_model, spawn_ctx, x);
    }
}

fn compact_column(state: &mut GameState, x: i32, height: i32) {
    let mut write_y = height - 1;
    let mut y = height - 1;
    while y >= 0 {
        let pos = Position::new(x, y);
        let cover = state.cover(pos);
        if cover.kind.blocks_fall() && !cover.is_absent() {
            write_y = write_y.min(y - 1);
            y -= 1;
            continue;
        }

        let tile = state.tile(pos);
        if tile.kind.is_present() {
            if write_y != y {
                move_tile(state, pos, Position::new(x, write_y));
            }
            write_y -= 1;
        }
        y -= 1;
    }
}

fn move_tile(state: &mut GameState, from: Position, to: Position) {
    let mut tile = state.tile(from);
    tile.grid_pos = to;
    tile.is_falling = true;
    state.tiles.set_unchecked(to, tile);
    state.tiles.set_unchecked(from, Tile::empty(from));

    if state.cover(from).is_dynamic {
        let cover = state.cover(from);
        state.covers.set_unchecked(to, cover);
        state.covers.set_unchecked(from, match3_core::Cover::NONE);
    }
}

fn integrate_falling_tiles(state: &mut GameState, dt: f32, gravity_acceleration: f32) {
    let width = state.width;
    let height = state.height;
    for y in 0..height {
        for x in 0..width {
            let pos = Position::new(x, y);
            let mut tile = state.tile(pos);
            if !tile.is_falling {
                continue;
            }
            tile.velocity.y += gravity_acceleration * dt;
            tile.render_pos.y += tile.velocity.y * dt;
            let target_y = tile.grid_pos.y as f32;
            if tile.render_pos.y >= target_y {
                tile.render_pos = Vec2::new(tile.grid_pos.x as f32, target_y);
                tile.velocity = Vec2::ZERO;
                tile.is_falling = false;
            }
            state.tiles.set_unchecked(pos, tile);
        }
    }
}

fn refill_column_top(
    state: &mut GameState,
    spawn_model: &mut dyn SpawnModel,
    spawn_ctx: &SpawnContext,
    x: i32,
) {
    let top = Position::new(x, 0);
    if state.tile(top).kind.is_present() {
        return;
    }

    let id = state.next_tile_id();
    let mut tile = Tile::empty(top);
    tile.id = id;
    tile.kind = spawn_color(state, spawn_model, spawn_ctx, x);
    tile.render_pos = Vec2::new(x as f32, -1.0);
    tile.velocity = Vec2::ZERO;
    tile.is_falling = true;
    state.tiles.set_unchecked(top, tile);
}

fn spawn_color(
    state: &mut GameState,
    spawn_model: &mut dyn SpawnModel,
    spawn_ctx: &SpawnContext,
    x: i32,
) -> match3_core::TileType {
    let mut rng = state.rng;
    let color = spawn_model.predict(&*state, x, spawn_ctx, &mut rng);
    state.rng = rng;
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::{BombType, CoverType, GroundType, InitialCell, LevelConfig, TileType};
    use match3_spawn_model::DefaultSpawnModel;

    fn ctx() -> SpawnContext {
        SpawnContext {
            target_difficulty: 0.5,
            remaining_moves: 20,
            goal_progress: 0.0,
            failed_attempts: 0,
            in_flow_state: false,
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

    fn level(initial_layout: Vec<InitialCell>) -> LevelConfig {
        LevelConfig {
            width: 3,
            height: 4,
            tile_types_count: 5,
            move_limit: 10,
            target_difficulty: 0.5,
            objectives: Vec::new(),
            initial_layout,
            seed: 11,
        }
    }

    #[test]
    fn compact_column_pulls_a_tile_down_into_the_gap_below_it() {
        let mut state = GameState::new(&level(vec![cell(0, 0, TileType::Red)])).expect("valid level");
        let height = state.height();
        compact_column(&mut state, 0, height);
        assert!(!state.tile(Position::new(0, 0)).kind.is_present());
        let settled = state.tile(Position::new(0, 3));
        assert_eq!(settled.kind, TileType::Red);
        assert!(settled.is_falling);
    }

    #[test]
    fn refill_column_top_spawns_a_tile_above_the_board() {
        let mut state = GameState::new(&level(Vec::new())).expect("valid level");
        let mut spawn_model = DefaultSpawnModel::new();
        refill_column_top(&mut state, &mut spawn_model, &ctx(), 1);
        let spawned = state.tile(Position::new(1, 0));
        assert!(spawned.kind.is_present());
        assert!(spawned.is_falling);
        assert!(spawned.render_pos.y < 0.0);
    }

    #[test]
    fn a_falling_tile_settles_once_its_render_position_reaches_its_cell() {
        let mut state = GameState::new(&level(vec![cell(0, 0, TileType::Red)])).expect("valid level");
        let mut spawn_model = DefaultSpawnModel::new();
        let ctx = ctx();
        for _ in 0..600 {
            resolve_gravity(&mut state, &mut spawn_model, &ctx, 1.0 / 60.0, 40.0);
            if !state.has_falling_tile() {
                break;
            }
        }
        assert!(!state.has_falling_tile(), "board should settle within the tick budget");
    }
}
