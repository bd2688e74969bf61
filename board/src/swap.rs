use match3_core::{EventCollector, Match3Error, Match3Result, Position};
use match3_match_finder::has_match_at;

use crate::state::{GameState, PendingMove};

/// Validates and applies a swap, returning `Ok(false)` when the swap is
/// rejected as an ordinary rule violation, `Ok(true)` when it takes
/// effect, and `Err` only for an out-of-bounds coordinate.
pub fn apply_move(
    state: &mut GameState,
    from: Position,
    to: Position,
    tick: u64,
    sim_time: f32,
    events: &mut dyn EventCollector,
) -> Match3Result<bool> {
    if !state.tiles.in_bounds(from) {
        return Err(Match3Error::InvalidPosition(from));
    }
    if !state.tiles.in_bounds(to) {
        return Err(Match3Error::InvalidPosition(to));
    }

    if !is_valid_swap(state, from, to) {
        return Ok(false);
    }

    let tile_from = state.tile(from);
    let tile_to = state.tile(to);
    let mut new_from = tile_to;
    let mut new_to = tile_from;
    new_from.grid_pos = from;
    new_to.grid_pos = to;
    state.tiles.set_unchecked(from, new_from);
    state.tiles.set_unchecked(to, new_to);

    events.emit(match3_core::Event::TilesSwapped {
        tick,
        sim_time,
        a: from,
        b: to,
    });

    let had_match = has_match_at(&*state, from) || has_match_at(&*state, to);
    state.pending_move = Some(PendingMove {
        from,
        to,
        had_match,
        animation_time: 0.0,
    });

    Ok(true)
}

fn is_valid_swap(state: &GameState, from: Position, to: Position) -> bool {
    if !from.is_cardinally_adjacent(to) {
        return false;
    }
    let tile_from = state.tile(from);
    let tile_to = state.tile(to);
    if !tile_from.kind.is_present() || !tile_to.kind.is_present() {
        return false;
    }
    if tile_from.is_falling || tile_to.is_falling {
        return false;
    }
    let cover_from = state.cover(from);
    let cover_to = state.cover(to);
    if cover_from.kind.blocks_swap() && !cover_from.is_absent() {
        return false;
    }
    if cover_to.kind.blocks_swap() && !cover_to.is_absent() {
        return false;
    }
    true
}

/// Advances the pending swap's animation clock by `dt`, reverting the
/// swap (and emitting `SwapReverted`) if it times out without producing
/// a match. Returns `true` while a pending move remains after this call.
pub fn resolve_pending_move(
    state: &mut GameState,
    dt: f32,
    swap_animation_duration: f32,
    tick: u64,
    sim_time: f32,
    events: &mut dyn EventCollector,
) -> bool {
    let Some(mut pending) = state.pending_move else {
        return false;
    };

    if pending.had_match {
        state.pending_move = None;
        return false;
    }

    pending.animation_time += dt;
    if pending.animation_time < swap_animation_duration {
        state.pending_move = Some(pending);
        return true;
    }

    let tile_from = state.tile(pending.from);
    let tile_to = state.tile(pending.to);
    let mut new_from = tile_to;
    let mut new_to = tile_from;
    new_from.grid_pos = pending.from;
    new_to.grid_pos = pending.to;
    state.tiles.set_unchecked(pending.from, new_from);
    state.tiles.set_unchecked(pending.to, new_to);

    events.emit(match3_core::Event::SwapReverted {
        tick,
        sim_time,
        a: pending.from,
        b: pending.to,
    });
    state.pending_move = None;
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::{BombType, CoverType, Event, GroundType, InitialCell, LevelConfig, NullCollector, TileType};

    fn level(initial_layout: Vec<InitialCell>) -> LevelConfig {
        LevelConfig {
            width: 4,
            height: 4,
            tile_types_count: 5,
            move_limit: 10,
            target_difficulty: 0.5,
            objectives: Vec::new(),
            initial_layout,
            seed: 3,
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

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl EventCollector for Recorder {
        fn emit(&mut self, event: Event) {
            self.0.push(event);
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    #[test]
    fn rejects_non_adjacent_swap() {
        let mut state = GameState::new(&level(vec![cell(0, 0, TileType::Red), cell(2, 0, TileType::Blue)])).expect("valid level");
        let mut events = NullCollector;
        let applied = apply_move(&mut state, Position::new(0, 0), Position::new(2, 0), 0, 0.0, &mut events).expect("in bounds");
        assert!(!applied);
    }

    #[test]
    fn rejects_out_of_bounds_swap() {
        let mut state = GameState::new(&level(vec![cell(0, 0, TileType::Red)])).expect("valid level");
        let mut events = NullCollector;
        let result = apply_move(&mut state, Position::new(0, 0), Position::new(-1, 0), 0, 0.0, &mut events);
        assert!(result.is_err());
    }

    #[test]
    fn valid_swap_exchanges_tiles_and_emits_event() {
        let mut state = GameState::new(&level(vec![cell(0, 0, TileType::Red), cell(1, 0, TileType::Blue)])).expect("valid level");
        let mut recorder = Recorder::default();
        let applied = apply_move(&mut state, Position::new(0, 0), Position::new(1, 0), 0, 0.0, &mut recorder).expect("in bounds");
        assert!(applied);
        assert_eq!(state.tile(Position::new(0, 0)).kind, TileType::Blue);
        assert_eq!(state.tile(Position::new(1, 0)).kind, TileType::Red);
        assert!(recorder.0.iter().any(|e| matches!(e, Event::TilesSwapped { .. })));
    }

    #[test]
    fn swap_without_match_reverts_after_animation_timeout() {
        let mut state = GameState::new(&level(vec![cell(0, 0, TileType::Red), cell(1, 0, TileType::Blue)])).expect("valid level");
        let mut events = NullCollector;
        let _ = apply_move(&mut state, Position::new(0, 0), Position::new(1, 0), 0, 0.0, &mut events).expect("in bounds");

        let mut recorder = Recorder::default();
        let still_pending = resolve_pending_move(&mut state, 0.2, 0.15, 1, 1.0 / 60.0, &mut recorder);

        assert!(!still_pending);
        assert_eq!(state.tile(Position::new(0, 0)).kind, TileType::Red);
        assert_eq!(state.tile(Position::new(1, 0)).kind, TileType::Blue);
        assert!(recorder.0.iter().any(|e| matches!(e, Event::SwapReverted { .. })));
    }
}
