//! Per-bomb-type area predicates and wave-propagated explosion timing.
//! This crate only computes *which cells* an explosion affects on a
//! given wave; the board crate owns the actual destruction (so that
//! cover/ground resolution stays in one place alongside match
//! destruction).
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod combo;

pub use combo::{resolve_combo, ComboEffect};

use match3_core::{BoardView, BombType, GameRng, Position, TileType};

/// Default number of Ufo projectile targets when a level does not
/// override it.
pub const DEFAULT_UFO_TARGET_COUNT: u32 = 3;

/// Every cell a bomb type's area predicate covers, with no wave
/// subdivision. Used for combo resolution and to bound wave iteration.
pub fn full_area(view: &dyn BoardView, bomb: BombType, origin: Position) -> Vec<Position> {
    match bomb {
        BombType::None => Vec::new(),
        BombType::Horizontal => (0..view.width())
            .map(|x| Position::new(x, origin.y))
            .collect(),
        BombType::Vertical => (0..view.height())
            .map(|y| Position::new(origin.x, y))
            .collect(),
        BombType::Square5x5 => {
            let mut cells = Vec::with_capacity(25);
            for dy in -2..=2 {
                for dx in -2..=2 {
                    let pos = Position::new(origin.x + dx, origin.y + dy);
                    if view.in_bounds(pos) {
                        cells.push(pos);
                    }
                }
            }
            cells
        }
        BombType::Ufo => Vec::new(),
        BombType::Color => Vec::new(),
    }
}

/// Every tile matching `color` on the board (the Color/Rainbow bomb's
/// area, resolved by the caller via [`color_to_destroy`]).
pub fn color_area(view: &dyn BoardView, color: TileType) -> Vec<Position> {
    let mut cells = Vec::new();
    for y in 0..view.height() {
        for x in 0..view.width() {
            let pos = Position::new(x, y);
            let tile = view.tile_at(pos);
            if tile.kind == color {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Resolves which color a Color/Rainbow bomb destroys: the color of
/// the tile it was swapped against, or, when triggered by a match
/// rather than a swap, the most common non-Rainbow color on the board.
pub fn color_to_destroy(view: &dyn BoardView, swapped_against: Option<TileType>) -> TileType {
    if let Some(color) = swapped_against {
        if color.is_plain_color() {
            return color;
        }
    }
    most_common_color(view).unwrap_or(TileType::Red)
}

fn most_common_color(view: &dyn BoardView) -> Option<TileType> {
    let mut counts = [0u32; TileType::PLAIN_COLORS.len()];
    for y in 0..view.height() {
        for x in 0..view.width() {
            let kind = view.tile_at(Position::new(x, y)).kind;
            if let Some(idx) = TileType::PLAIN_COLORS.iter().position(|&c| c == kind) {
                counts[idx] += 1;
            }
        }
    }
    counts
        .iter()
        .enumerate()
        .max_by_key(|&(_, count)| *count)
        .filter(|&(_, count)| *count > 0)
        .map(|(idx, _)| TileType::PLAIN_COLORS[idx])
}

/// Selects `count` Ufo projectile targets: tiles not equal to the
/// origin's color, weighted toward scarce colors (rarer colors are
/// proportionally more likely to be picked).
pub fn ufo_targets(
    view: &dyn BoardView,
    origin: Position,
    count: u32,
    rng: &mut GameRng,
) -> Vec<Position> {
    let origin_color = view.tile_at(origin).kind;
    let mut candidates: Vec<(Position, TileType)> = Vec::new();
    for y in 0..view.height() {
        for x in 0..view.width() {
            let pos = Position::new(x, y);
            let kind = view.tile_at(pos).kind;
            if kind.is_plain_color() && kind != origin_color {
                candidates.push((pos, kind));
            }
        }
    }
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut color_counts = std::collections::HashMap::new();
    for &(_, kind) in &candidates {
        *color_counts.entry(kind).or_insert(0u32) += 1;
    }

    let mut targets = Vec::new();
    let mut remaining = candidates;
    for _ in 0..count {
        if remaining.is_empty() {
            break;
        }
        let weights: Vec<u32> = remaining
            .iter()
            .map(|&(_, kind)| 1000 / (color_counts[&kind] + 1))
            .collect();
        let total: u32 = weights.iter().sum();
        let mut roll = rng.next_u32(total.max(1));
        let mut chosen_idx = remaining.len() - 1;
        for (idx, &w) in weights.iter().enumerate() {
            if roll < w {
                chosen_idx = idx;
                break;
            }
            roll -= w;
        }
        let (pos, kind) = remaining.remove(chosen_idx);
        if let Some(c) = color_counts.get_mut(&kind) {
            *c = c.saturating_sub(1);
        }
        targets.push(pos);
    }
    targets
}

/// The cells destroyed by `bomb` on wave `wave`, given its full area.
/// `Square5x5` and `Ufo` resolve in a single wave (wave 0); the
/// remaining bomb types destroy one Chebyshev ring per wave.
pub fn wave_cells(bomb: BombType, origin: Position, wave: u32, area: &[Position]) -> Vec<Position> {
    match bomb {
        BombType::Square5x5 | BombType::Ufo => {
            if wave == 0 {
                area.to_vec()
            } else {
                Vec::new()
            }
        }
        BombType::None => Vec::new(),
        BombType::Horizontal | BombType::Vertical | BombType::Color => area
            .iter()
            .copied()
            .filter(|&pos| origin.chebyshev_distance(pos) as u32 == wave)
            .collect(),
    }
}

/// Highest wave index at which `area` still has cells to destroy.
pub fn max_wave(bomb: BombType, origin: Position, area: &[Position]) -> u32 {
    match bomb {
        BombType::Square5x5 | BombType::Ufo => 0,
        BombType::None => 0,
        _ => area
            .iter()
            .map(|&pos| origin.chebyshev_distance(pos) as u32)
            .max()
            .unwrap_or(0),
    }
}
