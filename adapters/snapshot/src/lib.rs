//! Persistence formats for the simulation engine: the `"M3CF"` power-up
//! catalog (bit-exact, hand-rolled) and the full-session snapshot
//! (opaque, `bincode`-backed). Consumed by `match3-replay` and the CLI
//! adapter.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod item_table;
mod session;

pub use item_table::{ItemEntry, ItemTable};
pub use session::SessionSnapshot;
