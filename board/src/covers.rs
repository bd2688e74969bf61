use match3_core::{CoverType, Event, EventCollector, GroundType, Position};

use crate::state::GameState;

/// Decrements the cover at `pos` by one point of damage, emitting
/// `CoverDestroyed` once its health reaches zero. A cell with no cover
/// is a no-op.
pub fn damage_cover_at(
    state: &mut GameState,
    pos: Position,
    tick: u64,
    sim_time: f32,
    events: &mut dyn EventCollector,
) {
    let mut cover = state.cover(pos);
    if cover.kind == CoverType::None || cover.health == 0 {
        return;
    }
    cover.health -= 1;
    if cover.health == 0 {
        events.emit(Event::CoverDestroyed {
            tick,
            sim_time,
            at: pos,
            kind: cover.kind,
        });
    }
    state.covers.set_unchecked(pos, cover);
}

/// Decrements the ground layer at `pos` by one point of damage, emitting
/// `GroundDestroyed` once its health reaches zero.
pub fn damage_ground_at(
    state: &mut GameState,
    pos: Position,
    tick: u64,
    sim_time: f32,
    events: &mut dyn EventCollector,
) {
    let mut ground = state.ground(pos);
    if ground.kind == GroundType::None || ground.health == 0 {
        return;
    }
    ground.health -= 1;
    if ground.health == 0 {
        events.emit(Event::GroundDestroyed {
            tick,
            sim_time,
            at: pos,
            kind: ground.kind,
        });
    }
    state.grounds.set_unchecked(pos, ground);
}
