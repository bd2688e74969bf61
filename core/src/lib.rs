//! Shared data model for the match-3 simulation engine: grid primitives,
//! the deterministic RNG, the event bus contract, the error taxonomy, and
//! the bitmask/pool utilities the rest of the workspace builds on.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod bitmask;
mod command;
mod config;
mod errors;
mod events;
mod grid;
mod match_group;
mod pool;
mod rng;
mod spawn;
mod view;

pub use bitmask::Mask256;
pub use command::{Command, CommandKind};
pub use config::{
    InitialCell, LevelConfig, ObjectiveConfig, ObjectiveElement, ObjectiveLayer, SimulationConfig,
};
pub use errors::Match3Error;
pub use events::{BufferedCollector, Event, EventCollector, NullCollector};
pub use grid::{
    BombType, Cover, CoverType, Grid, Ground, GroundType, Position, Tile, TileType, Vec2,
};
pub use match_group::{MatchGroup, MatchShape};
pub use pool::{Pool, Pooled};
pub use rng::GameRng;
pub use spawn::{SpawnContext, SpawnModel};
pub use view::BoardView;

/// Result alias used throughout the workspace.
pub type Match3Result<T> = Result<T, Match3Error>;
