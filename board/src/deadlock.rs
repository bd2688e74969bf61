use match3_core::{BoardView, Cover, Ground, Position, Tile, TileType};
use match3_match_finder::has_match_at;

use crate::state::GameState;

struct SwappedView<'a> {
    inner: &'a dyn BoardView,
    a: Position,
    b: Position,
}

impl BoardView for SwappedView<'_> {
    fn width(&self) -> i32 {
        self.inner.width()
    }

    fn height(&self) -> i32 {
        self.inner.height()
    }

    fn tile_types_count(&self) -> u8 {
        self.inner.tile_types_count()
    }

    fn tile_at(&self, pos: Position) -> Tile {
        if pos == self.a {
            self.inner.tile_at(self.b)
        } else if pos == self.b {
            self.inner.tile_at(self.a)
        } else {
            self.inner.tile_at(pos)
        }
    }

    fn cover_at(&self, pos: Position) -> Cover {
        self.inner.cover_at(pos)
    }

    fn ground_at(&self, pos: Position) -> Ground {
        self.inner.ground_at(pos)
    }

    fn can_match_at(&self, pos: Position) -> bool {
        self.inner.can_match_at(pos)
    }
}

fn is_swappable(view: &dyn BoardView, pos: Position) -> bool {
    let tile = view.tile_at(pos);
    if !tile.kind.is_present() || tile.is_falling {
        return false;
    }
    let cover = view.cover_at(pos);
    !(cover.kind.blocks_swap() && !cover.is_absent())
}

fn swap_produces_match(view: &dyn BoardView, a: Position, b: Position) -> bool {
    let swapped = SwappedView { inner: view, a, b };
    has_match_at(&swapped, a) || has_match_at(&swapped, b)
}

/// True if at least one cardinally adjacent, swappable pair produces a
/// match. O(w*h*(w+h)) via `has_match_at`'s run-length scan.
pub fn has_any_valid_move(view: &dyn BoardView) -> bool {
    for y in 0..view.height() {
        for x in 0..view.width() {
            let a = Position::new(x, y);
            if !is_swappable(view, a) {
                continue;
            }
            for &b in &[Position::new(x + 1, y), Position::new(x, y + 1)] {
                if !view.in_bounds(b) || !is_swappable(view, b) {
                    continue;
                }
                if swap_produces_match(view, a, b) {
                    return true;
                }
            }
        }
    }
    false
}

/// Shuffles every plain-color, uncovered tile's color (preserving the
/// color-count multiset) until a valid move exists or `max_attempts` is
/// exhausted. Returns the list of `(position, tile_id, new_type)`
/// changes from the attempt that broke the deadlock, or the last
/// attempt's changes if the budget ran out.
pub fn find_deadlock_shuffle(
    state: &mut GameState,
    max_attempts: u32,
) -> Vec<(Position, u64, TileType)> {
    let mut last_changes = Vec::new();
    for _ in 0..max_attempts.max(1) {
        let changes = shuffle_once(state);
        last_changes = changes;
        if has_any_valid_move(&*state) {
            break;
        }
    }
    last_changes
}

fn shuffle_once(state: &mut GameState) -> Vec<(Position, u64, TileType)> {
    let width = state.width();
    let height = state.height();
    let mut slots: Vec<Position> = Vec::new();
    let mut colors: Vec<TileType> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let pos = Position::new(x, y);
            let tile = state.tile(pos);
            let cover = state.cover(pos);
            let blocked = cover.kind.blocks_swap() && !cover.is_absent();
            if tile.kind.is_plain_color() && !blocked && !tile.is_falling {
                slots.push(pos);
                colors.push(tile.kind);
            }
        }
    }

    let n = slots.len();
    for i in (1..n).rev() {
        let j = state.rng_mut().next_u32((i + 1) as u32) as usize;
        colors.swap(i, j);
    }

    let mut changes = Vec::new();
    for (pos, &new_kind) in slots.iter().zip(colors.iter()) {
        let mut tile = state.tile(*pos);
        if tile.kind != new_kind {
            tile.kind = new_kind;
            changes.push((*pos, tile.id, new_kind));
            state.tiles.set_unchecked(*pos, tile);
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::{BombType, CoverType, GroundType, InitialCell, LevelConfig};

    const STRIPE: [TileType; 3] = [TileType::Red, TileType::Green, TileType::Blue];

    fn deadlocked_level() -> LevelConfig {
        let mut initial_layout = Vec::new();
        for y in 0..6 {
            for x in 0..6 {
                initial_layout.push(InitialCell {
                    pos: Position::new(x, y),
                    tile: STRIPE[((x + y) % 3) as usize],
                    bomb: BombType::None,
                    cover: CoverType::None,
                    cover_health: 0,
                    ground: GroundType::None,
                    ground_health: 0,
                });
            }
        }
        LevelConfig {
            width: 6,
            height: 6,
            tile_types_count: 3,
            move_limit: 30,
            target_difficulty: 0.5,
            objectives: Vec::new(),
            initial_layout,
            seed: 99,
        }
    }

    #[test]
    fn diagonal_stripe_pattern_has_no_valid_move() {
        let state = GameState::new(&deadlocked_level()).expect("valid level");
        assert!(!has_any_valid_move(&state));
    }

    #[test]
    fn find_deadlock_shuffle_breaks_the_deadlock_within_budget() {
        let mut state = GameState::new(&deadlocked_level()).expect("valid level");
        assert!(!has_any_valid_move(&state));

        let changes = find_deadlock_shuffle(&mut state, 10);
        assert!(!changes.is_empty(), "shuffle should have changed at least one tile");
        assert!(has_any_valid_move(&state));
    }

    #[test]
    fn shuffle_preserves_the_color_count_multiset() {
        let mut state = GameState::new(&deadlocked_level()).expect("valid level");
        let before = count_colors(&state);
        let _ = find_deadlock_shuffle(&mut state, 10);
        let after = count_colors(&state);
        assert_eq!(before, after);
    }

    fn count_colors(state: &GameState) -> [u32; 3] {
        let mut counts = [0u32; 3];
        for y in 0..state.height() {
            for x in 0..state.width() {
                let kind = state.tile(Position::new(x, y)).kind;
                if let Some(index) = STRIPE.iter().position(|&c| c == kind) {
                    counts[index] += 1;
                }
            }
        }
        counts
    }
}
