use match3_board::GameState;
use match3_bomb_effects::{
    color_area, color_to_destroy, full_area, max_wave, ufo_targets, wave_cells,
    DEFAULT_UFO_TARGET_COUNT,
};
use match3_core::{BombType, Event, EventCollector, Position, TileType};

/// A bomb mid-explosion: the full set of cells it will eventually
/// destroy, and how many Chebyshev-distance waves have fired so far.
#[derive(Debug, Clone)]
pub(crate) struct PendingExplosion {
    pub bomb: BombType,
    pub origin: Position,
    pub area: Vec<Position>,
    pub wave: u32,
    pub max_wave: u32,
}

impl PendingExplosion {
    /// The cells destroyed on the current wave.
    pub(crate) fn current_wave_cells(&self) -> Vec<Position> {
        wave_cells(self.bomb, self.origin, self.wave, &self.area)
    }
}

/// Computes a bomb's blast area, queues it as a pending explosion, and
/// emits `BombTriggered` (plus one `BombProjectile` per target for a
/// Ufo). `other_color` is the color of the tile the bomb was swapped
/// against, if this trigger came from a player swap rather than a
/// chain reaction.
pub(crate) fn queue_explosion(
    state: &mut GameState,
    bomb: BombType,
    origin: Position,
    other_color: Option<TileType>,
    explosions: &mut Vec<PendingExplosion>,
    events: &mut dyn EventCollector,
    tick: u64,
    sim_time: f32,
) {
    let mut area = match bomb {
        BombType::Horizontal | BombType::Vertical | BombType::Square5x5 => {
            full_area(&*state, bomb, origin)
        }
        BombType::Ufo => {
            let mut rng = *state.rng_mut();
            let targets = ufo_targets(&*state, origin, DEFAULT_UFO_TARGET_COUNT, &mut rng);
            *state.rng_mut() = rng;
            for &target in &targets {
                events.emit(Event::BombProjectile { tick, sim_time, from: origin, to: target });
            }
            targets
        }
        BombType::Color => {
            let color = color_to_destroy(&*state, other_color);
            color_area(&*state, color)
        }
        BombType::None => Vec::new(),
    };
    if !area.contains(&origin) {
        area.push(origin);
    }

    let wave_cap = max_wave(bomb, origin, &area);
    events.emit(Event::BombTriggered { tick, sim_time, at: origin, bomb });
    explosions.push(PendingExplosion { bomb, origin, area, wave: 0, max_wave: wave_cap });
}

/// Resolves a swap between two bomb-charged tiles into the combined
/// set of cells it destroys, per the combo rule. Combos are a single
/// combined action, not staged across waves.
pub(crate) fn resolve_combo_positions(
    state: &mut GameState,
    bomb_a: BombType,
    bomb_b: BombType,
    pos_a: Position,
    pos_b: Position,
    color_a: TileType,
    color_b: TileType,
) -> Vec<Position> {
    use match3_bomb_effects::{resolve_combo, ComboEffect};

    let other_color = if bomb_a == BombType::Color { color_b } else { color_a };
    match resolve_combo(bomb_a, bomb_b, other_color) {
        ComboEffect::Cross => {
            let mut cells = full_area(&*state, BombType::Horizontal, pos_a);
            cells.extend(full_area(&*state, BombType::Vertical, pos_b));
            cells
        }
        ComboEffect::ColorBlast(color) => {
            let other_bomb = if bomb_a == BombType::Color { bomb_b } else { bomb_a };
            let other_origin = if bomb_a == BombType::Color { pos_b } else { pos_a };
            let mut cells = Vec::new();
            for pos in color_area(&*state, color) {
                for cell in full_area(&*state, other_bomb, pos) {
                    if !cells.contains(&cell) {
                        cells.push(cell);
                    }
                }
            }
            if !cells.contains(&other_origin) {
                cells.push(other_origin);
            }
            cells
        }
        ComboEffect::ClearAll => {
            let mut cells = Vec::new();
            for y in 0..state.height() {
                for x in 0..state.width() {
                    cells.push(Position::new(x, y));
                }
            }
            cells
        }
    }
}
