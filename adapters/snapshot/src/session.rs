//! The full-session snapshot: board state plus the level config it was
//! built from, serialized with `serde` + `bincode`. Unlike the item
//! table this format is opaque and implementation-defined; its only
//! contract is a byte-exact round trip.

use serde::{Deserialize, Serialize};

use match3_board::GameState;
use match3_core::{LevelConfig, Match3Error};

/// Everything needed to resume a session exactly where it left off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The level this state was built from, so a loader can rebuild a
    /// fresh engine around the restored state if needed.
    pub level: LevelConfig,
    /// The board state, including RNG.
    pub state: GameState,
}

impl SessionSnapshot {
    /// Captures a snapshot of `state` against its originating `level`.
    pub fn capture(level: LevelConfig, state: GameState) -> Self {
        Self { level, state }
    }

    /// Serializes via `bincode`.
    pub fn serialize(&self) -> Result<Vec<u8>, Match3Error> {
        bincode::serialize(self).map_err(|e| Match3Error::InvalidData(e.to_string()))
    }

    /// Deserializes a previously serialized snapshot.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Match3Error> {
        bincode::deserialize(bytes).map_err(|e| Match3Error::InvalidData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::InitialCell;
    use match3_core::{BombType, CoverType, GroundType, Position, TileType};

    fn level() -> LevelConfig {
        LevelConfig {
            width: 4,
            height: 4,
            tile_types_count: 5,
            move_limit: 30,
            target_difficulty: 0.4,
            objectives: Vec::new(),
            initial_layout: vec![InitialCell {
                pos: Position::new(0, 0),
                tile: TileType::Red,
                bomb: BombType::None,
                cover: CoverType::None,
                cover_health: 0,
                ground: GroundType::None,
                ground_health: 0,
            }],
            seed: 7,
        }
    }

    #[test]
    fn round_trips_byte_exact() {
        let level = level();
        let state = GameState::new(&level).expect("valid level");
        let snapshot = SessionSnapshot::capture(level, state);

        let first = snapshot.serialize().expect("serializes");
        let restored = SessionSnapshot::deserialize(&first).expect("deserializes");
        let second = restored.serialize().expect("serializes again");

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(SessionSnapshot::deserialize(&[0xff; 3]).is_err());
    }
}
