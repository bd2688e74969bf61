use serde::{Deserialize, Serialize};

use crate::grid::Position;

/// The payload of a player- or AI-issued command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    /// Swap the tiles at `from` and `to`.
    Swap {
        /// First cell.
        from: Position,
        /// Second cell.
        to: Position,
    },
    /// Trigger a held power-up at `at`.
    UsePowerUp {
        /// Cell the power-up is used on.
        at: Position,
    },
}

/// A single recorded input to the simulation, ordered by
/// `(issued_at_tick, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Monotonic id, used to break ties within the same tick.
    pub id: u64,
    /// Tick the command is scheduled to execute on.
    pub issued_at_tick: u64,
    /// The command's payload.
    pub kind: CommandKind,
}
