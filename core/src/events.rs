use serde::{Deserialize, Serialize};

use crate::grid::{BombType, CoverType, GroundType, Position, TileType};

/// One emitted simulation event. Every variant carries the tick and
/// simulation time at which it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Two tiles exchanged cells following a validated swap.
    TilesSwapped {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// First swapped cell.
        a: Position,
        /// Second swapped cell.
        b: Position,
    },
    /// A pending swap produced no match and was undone.
    SwapReverted {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// First swapped cell.
        a: Position,
        /// Second swapped cell.
        b: Position,
    },
    /// A tile was removed from the board.
    TileDestroyed {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Cell the tile occupied.
        at: Position,
        /// Id of the destroyed tile.
        tile_id: u64,
        /// Color of the destroyed tile.
        kind: TileType,
    },
    /// A new bomb-charged tile was created from a match group.
    BombCreated {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Cell the bomb occupies.
        at: Position,
        /// Id of the bomb tile.
        tile_id: u64,
        /// Bomb kind created.
        bomb: BombType,
    },
    /// A bomb began its explosion sequence.
    BombTriggered {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Origin cell of the explosion.
        at: Position,
        /// Bomb kind that triggered.
        bomb: BombType,
    },
    /// A Ufo bomb launched a projectile at a target cell.
    BombProjectile {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Launch cell.
        from: Position,
        /// Target cell.
        to: Position,
    },
    /// A cover was destroyed (health reached zero).
    CoverDestroyed {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Cell the cover occupied.
        at: Position,
        /// Cover kind destroyed.
        kind: CoverType,
    },
    /// A ground layer was destroyed (health reached zero).
    GroundDestroyed {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Cell the ground occupied.
        at: Position,
        /// Ground kind destroyed.
        kind: GroundType,
    },
    /// An objective slot's progress changed.
    ObjectiveProgress {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// Objective slot index.
        slot: usize,
        /// New progress count.
        current_count: u32,
        /// Whether this update completed the objective.
        is_completed: bool,
    },
    /// The level transitioned to a terminal status.
    LevelCompleted {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// True for victory, false for defeat.
        victory: bool,
    },
    /// The board was reshuffled to escape a deadlock.
    BoardShuffled {
        /// Tick of emission.
        tick: u64,
        /// Simulation time in seconds.
        sim_time: f32,
        /// `(position, tile_id, new_type)` for every tile that changed
        /// color.
        changes: Vec<(Position, u64, TileType)>,
    },
}

/// Sink for engine-emitted events.
pub trait EventCollector {
    /// Records an event. Implementations that are disabled may drop it.
    fn emit(&mut self, event: Event);

    /// Whether this collector retains emitted events. The engine checks
    /// this before constructing events expensive to build (e.g.
    /// `BoardShuffled`'s change list).
    fn is_enabled(&self) -> bool;
}

/// Retains every emitted event in arrival order.
#[derive(Debug, Default, Clone)]
pub struct BufferedCollector {
    events: Vec<Event>,
}

impl BufferedCollector {
    /// Builds an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event collected so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Removes and returns every collected event.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl EventCollector for BufferedCollector {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Discards every emitted event. Installed on cloned engines and during
/// `run_until_stable` lookahead.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCollector;

impl EventCollector for NullCollector {
    fn emit(&mut self, _event: Event) {}

    fn is_enabled(&self) -> bool {
        false
    }
}
