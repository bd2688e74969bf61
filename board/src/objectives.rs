use match3_core::{Event, EventCollector, ObjectiveElement, ObjectiveLayer};

use crate::state::{GameState, LevelStatus};

/// Increments every active, incomplete objective slot matching
/// `layer`/`element` by one, capped at the slot's target, emitting
/// `ObjectiveProgress` for each slot it touches.
pub fn record_destruction(
    state: &mut GameState,
    layer: ObjectiveLayer,
    element: ObjectiveElement,
    tick: u64,
    sim_time: f32,
    events: &mut dyn EventCollector,
) {
    for (slot, objective) in state.objectives.iter_mut().enumerate() {
        if !objective.active || objective.completed {
            continue;
        }
        if objective.config.target_layer != layer || objective.config.element_type != element {
            continue;
        }
        objective.current_count = (objective.current_count + 1).min(objective.config.target_count);
        let is_completed = objective.current_count == objective.config.target_count;
        objective.completed = is_completed;
        events.emit(Event::ObjectiveProgress {
            tick,
            sim_time,
            slot,
            current_count: objective.current_count,
            is_completed,
        });
    }
}

/// Re-evaluates the level's terminal status, emitting `LevelCompleted`
/// exactly once on the transition into `Victory` or `Defeat`. A no-op
/// once the level is already terminal.
pub fn update_level_status(
    state: &mut GameState,
    tick: u64,
    sim_time: f32,
    events: &mut dyn EventCollector,
) {
    if state.level_status != LevelStatus::InProgress {
        return;
    }

    let all_completed = state
        .objectives
        .iter()
        .filter(|o| o.active)
        .all(|o| o.completed);

    if all_completed && !state.objectives.is_empty() {
        state.level_status = LevelStatus::Victory;
        events.emit(Event::LevelCompleted {
            tick,
            sim_time,
            victory: true,
        });
    } else if state.move_count >= state.move_limit {
        state.level_status = LevelStatus::Defeat;
        events.emit(Event::LevelCompleted {
            tick,
            sim_time,
            victory: false,
        });
    }
}
