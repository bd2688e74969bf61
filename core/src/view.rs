use crate::grid::{Cover, Ground, Position, Tile};

/// Read-only board access shared by every external system crate
/// (spawn model, match finder, bomb effects). The board crate's
/// `GameState` implements this; systems depend only on the trait, never
/// on the board crate itself, so they stay reusable and testable in
/// isolation.
pub trait BoardView {
    /// Board width in cells.
    fn width(&self) -> i32;
    /// Board height in cells.
    fn height(&self) -> i32;
    /// Number of distinct plain colors configured for this level.
    fn tile_types_count(&self) -> u8;
    /// Full tile value at `pos`. Callers must bounds-check first via
    /// `in_bounds`.
    fn tile_at(&self, pos: Position) -> Tile;
    /// Cover layered on `pos`.
    fn cover_at(&self, pos: Position) -> Cover;
    /// Ground layered under `pos`.
    fn ground_at(&self, pos: Position) -> Ground;
    /// Whether `pos` currently participates in match detection (false
    /// while, e.g., a blocking cover is present).
    fn can_match_at(&self, pos: Position) -> bool;
    /// True if `pos` lies within the board bounds.
    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }
}
