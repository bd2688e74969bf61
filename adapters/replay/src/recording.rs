//! `GameRecording`: the ground truth a `ReplayController` plays back.

use serde::{Deserialize, Serialize};

use match3_core::{Command, Match3Error};
use match3_snapshot::SessionSnapshot;

/// A full recorded session: the state it started from, the commands
/// that drove it, and the outcome they produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecording {
    /// Board state at tick 0.
    pub initial_snapshot: SessionSnapshot,
    /// RNG seed the recording was produced with. Redundant with
    /// `initial_snapshot.level.seed` but kept as its own field per the
    /// command-stream format.
    pub seed: u64,
    /// Every command issued during the session, sorted by
    /// `(issued_at_tick, id)`.
    pub commands: Vec<Command>,
    /// Tick the session ran to.
    pub duration_ticks: u32,
    /// Score at `duration_ticks`.
    pub final_score: i64,
    /// Total moves the player made.
    pub total_moves: u32,
}

impl GameRecording {
    /// Builds a recording, sorting `commands` into execution order.
    pub fn new(
        initial_snapshot: SessionSnapshot,
        seed: u64,
        mut commands: Vec<Command>,
        duration_ticks: u32,
        final_score: i64,
        total_moves: u32,
    ) -> Self {
        commands.sort_by_key(|c| (c.issued_at_tick, c.id));
        Self {
            initial_snapshot,
            seed,
            commands,
            duration_ticks,
            final_score,
            total_moves,
        }
    }

    /// Serializes via `bincode`.
    pub fn serialize(&self) -> Result<Vec<u8>, Match3Error> {
        bincode::serialize(self).map_err(|e| Match3Error::InvalidData(e.to_string()))
    }

    /// Deserializes a previously serialized recording.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Match3Error> {
        bincode::deserialize(bytes).map_err(|e| Match3Error::InvalidData(e.to_string()))
    }
}
