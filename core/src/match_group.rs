use crate::grid::{BombType, Position, TileType};

/// The detected geometry of a match group, used to pick which bomb (if
/// any) it spawns and which scrap-absorption rule applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchShape {
    /// A bare 3-in-a-row/column with no bomb candidate.
    Simple3,
    /// A pure 4-in-a-line.
    Line4,
    /// A pure 5-in-a-line.
    Line5,
    /// A 2x2 block, possibly with absorbed scraps.
    Square,
    /// An intersection with the crossing at an endpoint of one run.
    TL,
    /// An intersection with the crossing interior to both runs.
    Plus,
}

/// A finalized group of cells the engine treats as a single destruction
/// event, optionally spawning a bomb.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGroup {
    /// Color shared by this group's cells (the wildcard-resolved color,
    /// not `Rainbow`, unless the whole group is a Rainbow flood).
    pub kind: TileType,
    /// Every cell destroyed by this group.
    pub positions: Vec<Position>,
    /// Detected geometry.
    pub shape: MatchShape,
    /// Bomb spawned at `bomb_origin`, or `BombType::None`.
    pub spawn_bomb_type: BombType,
    /// Cell the new bomb occupies, if any.
    pub bomb_origin: Option<Position>,
}
