//! Connected-component match detection: groups cells sharing a color
//! (Rainbow wildcard) into components, validates that each contains an
//! axis-aligned run of length >= 3, and delegates promotion to
//! `MatchGroup`s to the bomb generator.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

use std::collections::{HashSet, VecDeque};

use match3_bomb_generator::generate_groups;
use match3_core::{BoardView, GameRng, MatchGroup, Position, TileType};

fn colors_match(a: TileType, b: TileType) -> bool {
    a == b || a == TileType::Rainbow || b == TileType::Rainbow
}

fn orthogonal_neighbors(pos: Position) -> [Position; 4] {
    [
        Position::new(pos.x + 1, pos.y),
        Position::new(pos.x - 1, pos.y),
        Position::new(pos.x, pos.y + 1),
        Position::new(pos.x, pos.y - 1),
    ]
}

/// A maximal connected region of cells sharing a color under cardinal
/// adjacency, excluding cells where matching is currently blocked.
struct Component {
    kind: TileType,
    cells: HashSet<Position>,
}

fn find_components(view: &dyn BoardView) -> Vec<Component> {
    let mut visited: HashSet<Position> = HashSet::new();
    let mut components = Vec::new();

    for y in 0..view.height() {
        for x in 0..view.width() {
            let start = Position::new(x, y);
            if visited.contains(&start) {
                continue;
            }
            let tile = view.tile_at(start);
            if !tile.kind.is_present() || !view.can_match_at(start) {
                continue;
            }

            let mut cells = HashSet::new();
            let mut representative_kind = tile.kind;
            let mut queue = VecDeque::new();
            queue.push_back(start);
            let _ = visited.insert(start);

            while let Some(current) = queue.pop_front() {
                let current_kind = view.tile_at(current).kind;
                if current_kind.is_plain_color() {
                    representative_kind = current_kind;
                }
                let _ = cells.insert(current);

                for neighbor in orthogonal_neighbors(current) {
                    if !view.in_bounds(neighbor) || visited.contains(&neighbor) {
                        continue;
                    }
                    if !view.can_match_at(neighbor) {
                        continue;
                    }
                    let neighbor_tile = view.tile_at(neighbor);
                    if neighbor_tile.kind.is_present() && colors_match(current_kind, neighbor_tile.kind)
                    {
                        let _ = visited.insert(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }

            components.push(Component {
                kind: representative_kind,
                cells,
            });
        }
    }

    components
}

/// Scans every component on the board and returns the match groups the
/// bomb generator produces for each. `foci` influences affinity
/// tie-breaks and bomb-origin selection; pass an empty slice outside a
/// swap-triggered scan.
pub fn find_match_groups(
    view: &dyn BoardView,
    foci: &[Position],
    mut rng: Option<&mut GameRng>,
) -> Vec<MatchGroup> {
    let components = find_components(view);
    let mut groups = Vec::new();
    for component in components {
        groups.extend(generate_groups(
            &component.cells,
            component.kind,
            foci,
            rng.as_deref_mut(),
        ));
    }
    groups
}

/// Cheap O(width + height) check for a run of length >= 3 through
/// `pos` in either orthogonal direction. Used by swap validation and
/// the deadlock detector, which probe many candidate cells per tick.
pub fn has_match_at(view: &dyn BoardView, pos: Position) -> bool {
    if !view.in_bounds(pos) || !view.can_match_at(pos) {
        return false;
    }
    let kind = view.tile_at(pos).kind;
    if !kind.is_present() {
        return false;
    }

    run_length(view, pos, kind, (1, 0)) + run_length(view, pos, kind, (-1, 0)) + 1 >= 3
        || run_length(view, pos, kind, (0, 1)) + run_length(view, pos, kind, (0, -1)) + 1 >= 3
}

fn run_length(view: &dyn BoardView, start: Position, kind: TileType, step: (i32, i32)) -> i32 {
    let mut length = 0;
    let mut current = Position::new(start.x + step.0, start.y + step.1);
    while view.in_bounds(current) && view.can_match_at(current) {
        let tile = view.tile_at(current);
        if !tile.kind.is_present() || !colors_match(tile.kind, kind) {
            break;
        }
        length += 1;
        current = Position::new(current.x + step.0, current.y + step.1);
    }
    length
}
