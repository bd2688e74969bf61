//! The default per-column color prediction strategy: a diversity guard
//! layered over help / challenge / balance sub-strategies, as described
//! in the level's difficulty context. No strategy allocates on the
//! heap; color counts are tracked in fixed-size arrays sized to the
//! 7-color cap.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

use match3_core::{BoardView, GameRng, Position, SpawnContext, SpawnModel, TileType};

const MAX_COLORS: usize = 7;

/// Composes the diversity guard, help, challenge, and balance
/// strategies into the spawn model's `predict` contract.
#[derive(Debug, Default)]
pub struct DefaultSpawnModel;

impl DefaultSpawnModel {
    /// Builds the default model. Stateless; a unit struct is enough.
    pub fn new() -> Self {
        Self
    }
}

impl SpawnModel for DefaultSpawnModel {
    fn predict(
        &mut self,
        view: &dyn BoardView,
        spawn_x: i32,
        ctx: &SpawnContext,
        rng: &mut GameRng,
    ) -> TileType {
        let n = (view.tile_types_count() as usize).min(MAX_COLORS).max(1);
        let colors = &TileType::PLAIN_COLORS[..n];
        let counts = count_colors(view, colors);
        let total: u32 = counts[..n].iter().sum();

        if let Some(color) = diversity_guard(colors, &counts, total) {
            return color;
        }

        let help_triggered = ctx.failed_attempts >= 3
            || (ctx.remaining_moves <= 3 && ctx.goal_progress < 0.9)
            || ctx.target_difficulty < 0.3;
        if help_triggered {
            return help_strategy(view, spawn_x, colors, rng);
        }

        let challenge_triggered =
            (ctx.goal_progress > 0.7 && ctx.remaining_moves > 5) || ctx.target_difficulty > 0.7;
        if challenge_triggered {
            return challenge_strategy(view, spawn_x, colors, &counts);
        }

        balance_strategy(colors, &counts, rng)
    }

    fn clone_box(&self) -> Box<dyn SpawnModel> {
        Box::new(Self)
    }
}

fn count_colors(view: &dyn BoardView, colors: &[TileType]) -> [u32; MAX_COLORS] {
    let mut counts = [0u32; MAX_COLORS];
    for y in 0..view.height() {
        for x in 0..view.width() {
            let kind = view.tile_at(Position::new(x, y)).kind;
            if let Some(idx) = colors.iter().position(|&c| c == kind) {
                counts[idx] += 1;
            }
        }
    }
    counts
}

fn diversity_guard(colors: &[TileType], counts: &[u32; MAX_COLORS], total: u32) -> Option<TileType> {
    if total == 0 || (total as usize) < colors.len() {
        return None;
    }
    let n = colors.len();
    let (max_idx, &max_count) = counts[..n]
        .iter()
        .enumerate()
        .max_by_key(|&(_, c)| *c)?;
    let fair_share = total as f32 / n as f32;
    if (max_count as f32) > 2.0 * fair_share {
        let _ = max_idx;
        let rarest = counts[..n]
            .iter()
            .enumerate()
            .min_by_key(|&(_, c)| *c)
            .map(|(idx, _)| colors[idx])
            .expect("colors is non-empty");
        return Some(rarest);
    }
    None
}

fn would_match(view: &dyn BoardView, spawn_x: i32, color: TileType, threshold: i32) -> bool {
    let left = run_length_row(view, spawn_x, -1, color);
    let right = run_length_row(view, spawn_x, 1, color);
    if left + right + 1 >= threshold {
        return true;
    }
    let below = run_length_column(view, spawn_x, color);
    below + 1 >= threshold
}

fn run_length_row(view: &dyn BoardView, spawn_x: i32, step: i32, color: TileType) -> i32 {
    let mut length = 0;
    let mut x = spawn_x + step;
    while view.in_bounds(Position::new(x, 0)) {
        if view.tile_at(Position::new(x, 0)).kind != color {
            break;
        }
        length += 1;
        x += step;
    }
    length
}

fn run_length_column(view: &dyn BoardView, spawn_x: i32, color: TileType) -> i32 {
    let mut length = 0;
    let mut y = 0;
    while view.in_bounds(Position::new(spawn_x, y)) {
        if view.tile_at(Position::new(spawn_x, y)).kind != color {
            break;
        }
        length += 1;
        y += 1;
    }
    length
}

fn help_strategy(
    view: &dyn BoardView,
    spawn_x: i32,
    colors: &[TileType],
    rng: &mut GameRng,
) -> TileType {
    for &color in colors {
        if would_match(view, spawn_x, color, 3) {
            return color;
        }
    }
    for &color in colors {
        if would_match(view, spawn_x, color, 2) {
            return color;
        }
    }
    let idx = rng.pick_index(colors.len()).unwrap_or(0);
    colors[idx]
}

fn challenge_strategy(
    view: &dyn BoardView,
    spawn_x: i32,
    colors: &[TileType],
    counts: &[u32; MAX_COLORS],
) -> TileType {
    let mut best: Option<(usize, TileType)> = None;
    for (idx, &color) in colors.iter().enumerate() {
        if would_match(view, spawn_x, color, 3) {
            continue;
        }
        if best.map_or(true, |(best_idx, _)| counts[idx] < counts[best_idx]) {
            best = Some((idx, color));
        }
    }
    best.map(|(_, color)| color).unwrap_or(colors[0])
}

fn balance_strategy(colors: &[TileType], counts: &[u32; MAX_COLORS], rng: &mut GameRng) -> TileType {
    let mut weights = [0u32; MAX_COLORS];
    for idx in 0..colors.len() {
        weights[idx] = 100 / (counts[idx] + 1);
    }
    let total: u32 = weights[..colors.len()].iter().sum();
    let mut roll = rng.next_u32(total.max(1));
    for (idx, &w) in weights[..colors.len()].iter().enumerate() {
        if roll < w {
            return colors[idx];
        }
        roll -= w;
    }
    colors[colors.len() - 1]
}
