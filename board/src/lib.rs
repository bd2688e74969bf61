//! The mutable board aggregate: grid state, swap validation, gravity and
//! refill, cover/ground destruction, objective tracking, and the
//! deadlock detector/shuffler. Composed by the engine crate into a full
//! tick.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod covers;
mod deadlock;
mod gravity;
mod objectives;
mod state;
mod swap;

pub use covers::{damage_cover_at, damage_ground_at};
pub use deadlock::{find_deadlock_shuffle, has_any_valid_move};
pub use gravity::resolve_gravity;
pub use objectives::{record_destruction, update_level_status};
pub use state::{GameState, LevelStatus, ObjectiveProgress, PendingMove};
pub use swap::{apply_move, resolve_pending_move};
