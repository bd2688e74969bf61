use thiserror::Error;

use crate::grid::Position;

/// Error taxonomy for the simulation engine.
///
/// `InvalidPosition`/`InvalidSwap` are expected, recoverable outcomes of
/// normal play and are typically converted to a `bool`/no-op by the
/// caller rather than propagated. `InvalidData` surfaces a corrupt
/// snapshot or recording to the caller. `BudgetExceeded` reports that a
/// bounded search (bomb generation, deadlock shuffling) hit its cap and
/// returned a partial, still-valid result. `Internal` indicates a
/// programmer error: an invariant the engine itself is responsible for
/// maintaining was violated.
#[derive(Debug, Error)]
pub enum Match3Error {
    /// A position lies outside the grid bounds.
    #[error("position {0:?} is out of range")]
    InvalidPosition(Position),
    /// A requested swap cannot be performed (not adjacent, blocked, or a
    /// tile involved is already falling).
    #[error("swap between {0:?} and {1:?} is invalid")]
    InvalidSwap(Position, Position),
    /// A snapshot or recording failed to decode.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// A bounded search exceeded its attempt budget; the caller received
    /// a partial but still-valid result.
    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),
    /// An engine-maintained invariant was violated. This represents a
    /// programmer error rather than bad input.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}
